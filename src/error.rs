use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::content::QueryError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found")]
    NotFound,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Query(#[from] QueryError),
}

/// Failure body handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorPage {
    pub code: u16,
    pub message: String,
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Query(QueryError::InvalidSortColumn(_))
            | AppError::Query(QueryError::InvalidPostType(_)) => StatusCode::BAD_REQUEST,
            AppError::Query(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_error_page(&self) -> ErrorPage {
        let status = self.status();
        let message = match self {
            AppError::NotFound => "Not found".to_string(),
            AppError::BadRequest(msg) => msg.clone(),
            AppError::Query(e) if status == StatusCode::BAD_REQUEST => e.to_string(),
            AppError::Query(e) => {
                tracing::error!("Query error: {}", e);
                "Internal server error".to_string()
            }
        };

        ErrorPage {
            code: status.as_u16(),
            message,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let page = self.to_error_page();
        (self.status(), Json(page)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
