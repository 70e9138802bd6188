// Filtersets - immutable query constraints for posts and votes
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::content::repository::QueryError;

/// Request value reserved to mean "every channel".
pub const ALL_CHANNELS: &str = "all";

/// Public key identifying an author or voter. Opaque to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PubKey(pub String);

impl PubKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Only the empty string means "no identity filter"; anything else is
    /// matched exactly.
    pub fn from_param(param: &str) -> Option<Self> {
        if param.is_empty() {
            None
        } else {
            Some(Self::new(param))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PubKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Translates a raw channel parameter into a channel predicate.
/// Both "" and "all" mean no channel filter. Other values match exactly.
pub fn channel_from_param(param: &str) -> Option<String> {
    if param.is_empty() || param == ALL_CHANNELS {
        None
    } else {
        Some(param.to_string())
    }
}

/// Top-level posts versus comments, derived from the parent reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PostType {
    Posts,
    Comments,
}

impl PostType {
    pub fn of_parent(parent: &str) -> Self {
        if parent.is_empty() {
            PostType::Posts
        } else {
            PostType::Comments
        }
    }

    pub(crate) fn as_sql(self) -> &'static str {
        match self {
            PostType::Posts => "parent = ''",
            PostType::Comments => "parent <> ''",
        }
    }
}

impl FromStr for PostType {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "posts" => Ok(PostType::Posts),
            "comments" => Ok(PostType::Comments),
            other => Err(QueryError::InvalidPostType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PostSortColumn {
    #[default]
    CreatedAt,
    Score,
}

impl PostSortColumn {
    pub fn as_str(self) -> &'static str {
        match self {
            PostSortColumn::CreatedAt => "created_at",
            PostSortColumn::Score => "score",
        }
    }

    /// Fixed ORDER BY fragment; rowid breaks ties newest-first.
    /// Timestamps go through datetime() so "T" and " " separators compare equal.
    pub(crate) fn order_by_sql(self) -> &'static str {
        match self {
            PostSortColumn::CreatedAt => "datetime(created_at) DESC, rowid DESC",
            PostSortColumn::Score => "score DESC, rowid DESC",
        }
    }
}

impl FromStr for PostSortColumn {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created_at" => Ok(PostSortColumn::CreatedAt),
            "score" => Ok(PostSortColumn::Score),
            other => Err(QueryError::InvalidSortColumn(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VoteSortColumn {
    #[default]
    CreatedAt,
}

impl VoteSortColumn {
    pub fn as_str(self) -> &'static str {
        match self {
            VoteSortColumn::CreatedAt => "created_at",
        }
    }

    pub(crate) fn order_by_sql(self) -> &'static str {
        match self {
            VoteSortColumn::CreatedAt => "datetime(created_at) DESC, rowid DESC",
        }
    }
}

impl FromStr for VoteSortColumn {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created_at" => Ok(VoteSortColumn::CreatedAt),
            other => Err(QueryError::InvalidSortColumn(other.to_string())),
        }
    }
}

/// Constraints for a post or comment query. Absent predicates don't filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostFilterset {
    channel: Option<String>,
    pub_key: Option<PubKey>,
    post_type: PostType,
    order_by: PostSortColumn,
    limit: Option<u32>,
}

impl PostFilterset {
    pub fn new(post_type: PostType) -> Self {
        Self {
            channel: None,
            pub_key: None,
            post_type,
            order_by: PostSortColumn::default(),
            limit: None,
        }
    }

    /// "" and "all" clear the channel predicate.
    pub fn with_channel(mut self, channel: Option<&str>) -> Self {
        self.channel = channel.and_then(channel_from_param);
        self
    }

    pub fn with_pub_key(mut self, pub_key: Option<PubKey>) -> Self {
        self.pub_key = pub_key.filter(|k| !k.as_str().is_empty());
        self
    }

    pub fn order_by(mut self, column: PostSortColumn) -> Self {
        self.order_by = column;
        self
    }

    /// Zero means unbounded.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = (limit > 0).then_some(limit);
        self
    }

    pub fn channel(&self) -> Option<&str> {
        self.channel.as_deref()
    }

    pub fn pub_key(&self) -> Option<&PubKey> {
        self.pub_key.as_ref()
    }

    pub fn post_type(&self) -> PostType {
        self.post_type
    }

    pub fn sort_column(&self) -> PostSortColumn {
        self.order_by
    }

    pub fn limit(&self) -> Option<u32> {
        self.limit
    }
}

/// Constraints for a vote query. Votes have no channel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VoteFilterset {
    pub_key: Option<PubKey>,
    order_by: VoteSortColumn,
    limit: Option<u32>,
}

impl VoteFilterset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pub_key(mut self, pub_key: Option<PubKey>) -> Self {
        self.pub_key = pub_key.filter(|k| !k.as_str().is_empty());
        self
    }

    pub fn order_by(mut self, column: VoteSortColumn) -> Self {
        self.order_by = column;
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = (limit > 0).then_some(limit);
        self
    }

    pub fn pub_key(&self) -> Option<&PubKey> {
        self.pub_key.as_ref()
    }

    pub fn sort_column(&self) -> VoteSortColumn {
        self.order_by
    }

    pub fn limit(&self) -> Option<u32> {
        self.limit
    }
}
