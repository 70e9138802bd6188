use serde::Serialize;

use crate::content::filterset::{
    PostFilterset, PostSortColumn, PostType, PubKey, VoteFilterset, VoteSortColumn,
};
use crate::content::repository::{ContentStore, QueryError};
use crate::db::models::{Post, Vote};

/// Recent activity for an identity and/or channel, as three separate lists.
#[derive(Debug, Clone, Serialize)]
pub struct ActivityPage {
    pub pub_key: Option<PubKey>,
    pub channel: Option<String>,
    pub posts: Vec<Post>,
    pub comments: Vec<Post>,
    pub votes: Vec<Vote>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExplorePage {
    pub channels: Vec<String>,
}

/// Fetches posts, comments and votes concurrently. Any failure fails the
/// whole page. Votes have no channel, so only the identity applies to them.
pub async fn recent_activity<S>(
    store: &S,
    pub_key: Option<PubKey>,
    channel: Option<String>,
    limit: u32,
) -> Result<ActivityPage, QueryError>
where
    S: ContentStore + ?Sized,
{
    let posts_filter = PostFilterset::new(PostType::Posts)
        .with_channel(channel.as_deref())
        .with_pub_key(pub_key.clone())
        .order_by(PostSortColumn::CreatedAt)
        .with_limit(limit);
    let comments_filter = PostFilterset::new(PostType::Comments)
        .with_channel(channel.as_deref())
        .with_pub_key(pub_key.clone())
        .order_by(PostSortColumn::CreatedAt)
        .with_limit(limit);
    let votes_filter = VoteFilterset::new()
        .with_pub_key(pub_key)
        .order_by(VoteSortColumn::CreatedAt)
        .with_limit(limit);

    let (posts, comments, votes) = tokio::try_join!(
        store.fetch_posts(&posts_filter),
        store.fetch_posts(&comments_filter),
        store.fetch_votes(&votes_filter),
    )?;

    tracing::debug!(
        posts = posts.len(),
        comments = comments.len(),
        votes = votes.len(),
        "Assembled recent activity"
    );

    Ok(ActivityPage {
        pub_key: posts_filter.pub_key().cloned(),
        channel: posts_filter.channel().map(str::to_string),
        posts,
        comments,
        votes,
    })
}

/// Channel names ranked by top-level post count.
pub async fn explore<S>(store: &S) -> Result<ExplorePage, QueryError>
where
    S: ContentStore + ?Sized,
{
    let channels = store
        .top_channels()
        .await?
        .into_iter()
        .map(|entry| entry.channel)
        .collect();

    Ok(ExplorePage { channels })
}
