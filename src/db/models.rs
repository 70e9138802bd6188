use chrono::NaiveDateTime;
use serde::Serialize;

use crate::content::filterset::{PostType, PubKey};

/// A top-level post or a comment. Which one is decided by `parent`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Post {
    pub id: String,
    pub pub_key: PubKey,
    pub channel: String,
    pub parent: String,
    pub title: String,
    pub body: String,
    pub score: i64,
    pub created_at: NaiveDateTime,
}

impl Post {
    pub fn post_type(&self) -> PostType {
        PostType::of_parent(&self.parent)
    }

    pub fn is_comment(&self) -> bool {
        self.post_type() == PostType::Comments
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Vote {
    pub id: String,
    pub pub_key: PubKey,
    pub target: String,
    pub direction: i64,
    pub created_at: NaiveDateTime,
}

/// Derived from the posts table, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelRanking {
    pub channel: String,
    pub post_count: i64,
}
