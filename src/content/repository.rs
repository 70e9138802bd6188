// Repository pattern - every store read goes through here
use async_trait::async_trait;
use rusqlite::{params_from_iter, Connection, InterruptHandle};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;

use crate::content::filterset::{PostFilterset, PubKey, VoteFilterset};
use crate::db::models::{ChannelRanking, Post, Vote};
use crate::state::DbPool;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Database error: {0}")]
    Database(#[from] r2d2::Error),

    #[error("SQL error: {0}")]
    Sql(rusqlite::Error),

    #[error("Malformed row: {0}")]
    MalformedRow(String),

    #[error("Invalid sort column: {0}")]
    InvalidSortColumn(String),

    #[error("Invalid post type: {0}")]
    InvalidPostType(String),

    #[error("Query timed out after {0:?}")]
    Timeout(Duration),

    #[error("Query task failed: {0}")]
    Task(String),
}

impl From<rusqlite::Error> for QueryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::FromSqlConversionFailure(..)
            | rusqlite::Error::InvalidColumnType(..)
            | rusqlite::Error::IntegralValueOutOfRange(..) => {
                QueryError::MalformedRow(err.to_string())
            }
            other => QueryError::Sql(other),
        }
    }
}

/// Read access to posts, comments and votes.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Posts or comments matching every present predicate, sorted descending.
    async fn fetch_posts(&self, filter: &PostFilterset) -> Result<Vec<Post>, QueryError>;

    /// Votes matching the filter, sorted descending.
    async fn fetch_votes(&self, filter: &VoteFilterset) -> Result<Vec<Vote>, QueryError>;

    /// Channels ranked by number of top-level posts.
    async fn top_channels(&self) -> Result<Vec<ChannelRanking>, QueryError>;
}

/// SQLite implementation
pub struct SqliteContentStore {
    pool: DbPool,
    timeout: Duration,
}

impl SqliteContentStore {
    pub fn new(pool: DbPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }

    /// Runs a query on the blocking pool, bounded by the configured timeout.
    /// On timeout the running statement is interrupted so its connection
    /// goes back to the pool.
    async fn run<T, F>(&self, op: F) -> Result<T, QueryError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, QueryError> + Send + 'static,
    {
        let pool = self.pool.clone();
        let interrupt: Arc<Mutex<Option<InterruptHandle>>> = Arc::default();
        let slot = Arc::clone(&interrupt);
        let task = tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            if let Ok(mut slot) = slot.lock() {
                *slot = Some(conn.get_interrupt_handle());
            }
            op(&*conn)
        });

        match tokio::time::timeout(self.timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_err)) => Err(QueryError::Task(join_err.to_string())),
            Err(_) => {
                if let Some(handle) = interrupt.lock().ok().and_then(|mut slot| slot.take()) {
                    handle.interrupt();
                }
                tracing::warn!("Query exceeded {:?}, interrupted", self.timeout);
                Err(QueryError::Timeout(self.timeout))
            }
        }
    }
}

#[async_trait]
impl ContentStore for SqliteContentStore {
    async fn fetch_posts(&self, filter: &PostFilterset) -> Result<Vec<Post>, QueryError> {
        let filter = filter.clone();
        self.run(move |conn| query_posts(conn, &filter)).await
    }

    async fn fetch_votes(&self, filter: &VoteFilterset) -> Result<Vec<Vote>, QueryError> {
        let filter = filter.clone();
        self.run(move |conn| query_votes(conn, &filter)).await
    }

    async fn top_channels(&self) -> Result<Vec<ChannelRanking>, QueryError> {
        self.run(query_top_channels).await
    }
}

// --- Query helpers ---

pub fn query_posts(conn: &Connection, filter: &PostFilterset) -> Result<Vec<Post>, QueryError> {
    let mut clauses = vec![filter.post_type().as_sql().to_string()];
    let mut args: Vec<String> = Vec::new();

    if let Some(channel) = filter.channel() {
        args.push(channel.to_string());
        clauses.push(format!("channel = ?{}", args.len()));
    }
    if let Some(pub_key) = filter.pub_key() {
        args.push(pub_key.as_str().to_string());
        clauses.push(format!("pub_key = ?{}", args.len()));
    }

    let mut sql = format!(
        "SELECT id, pub_key, channel, parent, title, body, score, created_at
         FROM posts
         WHERE {}
         ORDER BY {}",
        clauses.join(" AND "),
        filter.sort_column().order_by_sql(),
    );
    if let Some(limit) = filter.limit() {
        sql.push_str(&format!(" LIMIT {}", limit));
    }

    tracing::debug!(
        post_type = ?filter.post_type(),
        channel = ?filter.channel(),
        pub_key = ?filter.pub_key().map(PubKey::as_str),
        order_by = filter.sort_column().as_str(),
        "Fetching posts"
    );

    let mut stmt = conn.prepare(&sql)?;
    let posts = stmt
        .query_map(params_from_iter(args.iter()), |row| {
            Ok(Post {
                id: row.get(0)?,
                pub_key: PubKey::new(row.get::<_, String>(1)?),
                channel: row.get(2)?,
                parent: row.get(3)?,
                title: row.get(4)?,
                body: row.get(5)?,
                score: row.get(6)?,
                created_at: row.get(7)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(posts)
}

pub fn query_votes(conn: &Connection, filter: &VoteFilterset) -> Result<Vec<Vote>, QueryError> {
    let mut sql = String::from(
        "SELECT id, pub_key, target, direction, created_at
         FROM votes",
    );
    let mut args: Vec<String> = Vec::new();

    if let Some(pub_key) = filter.pub_key() {
        args.push(pub_key.as_str().to_string());
        sql.push_str(" WHERE pub_key = ?1");
    }
    sql.push_str(" ORDER BY ");
    sql.push_str(filter.sort_column().order_by_sql());
    if let Some(limit) = filter.limit() {
        sql.push_str(&format!(" LIMIT {}", limit));
    }

    tracing::debug!(
        pub_key = ?filter.pub_key().map(PubKey::as_str),
        order_by = filter.sort_column().as_str(),
        "Fetching votes"
    );

    let mut stmt = conn.prepare(&sql)?;
    let votes = stmt
        .query_map(params_from_iter(args.iter()), |row| {
            Ok(Vote {
                id: row.get(0)?,
                pub_key: PubKey::new(row.get::<_, String>(1)?),
                target: row.get(2)?,
                direction: row.get(3)?,
                created_at: row.get(4)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(votes)
}

pub fn query_top_channels(conn: &Connection) -> Result<Vec<ChannelRanking>, QueryError> {
    // Comments carry their parent's channel but don't count toward it
    let mut stmt = conn.prepare(
        "SELECT channel, COUNT(*) AS cnt
         FROM posts
         WHERE parent = ''
         GROUP BY channel
         ORDER BY cnt DESC, channel ASC",
    )?;

    let ranking = stmt
        .query_map([], |row| {
            Ok(ChannelRanking {
                channel: row.get(0)?,
                post_count: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(channels = ranking.len(), "Ranked channels");
    Ok(ranking)
}
