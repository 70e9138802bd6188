use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use crate::content::filterset::{channel_from_param, PostSortColumn, VoteSortColumn};
use crate::content::{
    explore, recent_activity, ActivityPage, ExplorePage, PostFilterset, PostType, PubKey,
    VoteFilterset,
};
use crate::db::models::{Post, Vote};
use crate::error::AppResult;
use crate::state::AppState;

// --- Query params ---

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct ActivityParams {
    pub pubkey: String,
    pub channel: String,
}

#[derive(Deserialize)]
#[serde(default)]
pub struct PostParams {
    pub pubkey: String,
    pub channel: String,
    #[serde(rename = "type")]
    pub post_type: String,
    pub sort: String,
}

impl Default for PostParams {
    fn default() -> Self {
        Self {
            pubkey: String::new(),
            channel: String::new(),
            post_type: "posts".to_string(),
            sort: PostSortColumn::CreatedAt.as_str().to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(default)]
pub struct VoteParams {
    pub pubkey: String,
    pub sort: String,
}

impl Default for VoteParams {
    fn default() -> Self {
        Self {
            pubkey: String::new(),
            sort: VoteSortColumn::CreatedAt.as_str().to_string(),
        }
    }
}

// --- Router ---

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/recent", get(recent_page))
        .route("/explore", get(explore_page))
        .route("/posts", get(list_posts))
        .route("/votes", get(list_votes))
}

// --- Handlers ---

async fn recent_page(
    State(state): State<AppState>,
    query: Result<Query<ActivityParams>, QueryRejection>,
) -> AppResult<Json<ActivityPage>> {
    let Query(params) = query?;
    let page = recent_activity(
        state.store.as_ref(),
        PubKey::from_param(&params.pubkey),
        channel_from_param(&params.channel),
        state.config.query.page_size,
    )
    .await?;

    Ok(Json(page))
}

async fn explore_page(State(state): State<AppState>) -> AppResult<Json<ExplorePage>> {
    Ok(Json(explore(state.store.as_ref()).await?))
}

async fn list_posts(
    State(state): State<AppState>,
    query: Result<Query<PostParams>, QueryRejection>,
) -> AppResult<Json<Vec<Post>>> {
    let Query(params) = query?;
    let post_type: PostType = params.post_type.parse()?;
    let sort: PostSortColumn = params.sort.parse()?;

    let filter = PostFilterset::new(post_type)
        .with_channel(Some(params.channel.as_str()))
        .with_pub_key(PubKey::from_param(&params.pubkey))
        .order_by(sort)
        .with_limit(state.config.query.page_size);

    Ok(Json(state.store.fetch_posts(&filter).await?))
}

async fn list_votes(
    State(state): State<AppState>,
    query: Result<Query<VoteParams>, QueryRejection>,
) -> AppResult<Json<Vec<Vote>>> {
    let Query(params) = query?;
    let sort: VoteSortColumn = params.sort.parse()?;

    let filter = VoteFilterset::new()
        .with_pub_key(PubKey::from_param(&params.pubkey))
        .order_by(sort)
        .with_limit(state.config.query.page_size);

    Ok(Json(state.store.fetch_votes(&filter).await?))
}
