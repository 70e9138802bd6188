pub mod activity;
pub mod filterset;
pub mod repository;

pub use activity::{explore, recent_activity, ActivityPage, ExplorePage};
pub use filterset::{
    PostFilterset, PostSortColumn, PostType, PubKey, VoteFilterset, VoteSortColumn,
};
pub use repository::{ContentStore, QueryError, SqliteContentStore};
