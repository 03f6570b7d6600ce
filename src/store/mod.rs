//! Storage port for posts.
//!
//! Resolvers and handlers only ever talk to a [`PostStore`], carried in the
//! application state as a [`Store`]. [`PgStore`] backs it with Postgres,
//! [`MemoryStore`] keeps everything in process.

mod memory;
mod postgres;
pub mod seed;

pub use memory::MemoryStore;
pub use postgres::{PgStore, PgStoreConfig};

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::model::{NewPost, Post, PostChanges};

pub type StoreResult<T> = Result<T, StoreError>;

/// A shared, type-erased post store.
pub type Store = Arc<dyn PostStore>;

/// Errors raised by a store.
///
/// None of these are shown to the client.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
	#[error("database error: {0}")]
	Database(#[from] sqlx::Error),
	#[error("migration error: {0}")]
	Migrate(#[from] sqlx::migrate::MigrateError),
	#[error("a post with slug {0} already exists")]
	DuplicateSlug(String),
}

/// A closed interval `[start, end]` over the `created` timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreatedRange {
	pub start: DateTime<Utc>,
	pub end: DateTime<Utc>,
}

impl CreatedRange {
	pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
		Self { start, end }
	}

	pub fn contains(&self, created: &DateTime<Utc>) -> bool {
		self.start <= *created && *created <= self.end
	}
}

/// The ids of the posts directly around a target post, ordered by
/// `created` descending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NeighborIds {
	/// The next older post.
	pub previous: Option<i64>,
	/// The next newer post.
	pub next: Option<i64>,
}

/// Query interface over the `post` relation.
///
/// Every ordered read uses `created DESC, id DESC`, so posts sharing a
/// timestamp still have a stable position.
#[async_trait]
pub trait PostStore: Send + Sync {
	/// Counts the posts matching `filter`.
	async fn count(&self, filter: Option<CreatedRange>) -> StoreResult<i64>;

	/// Returns up to `take` posts matching `filter`, newest first, skipping
	/// the first `skip`.
	async fn find_many(
		&self,
		filter: Option<CreatedRange>,
		skip: i64,
		take: i64,
	) -> StoreResult<Vec<Post>>;

	async fn find_by_slug(&self, slug: &str) -> StoreResult<Option<Post>>;

	async fn find_by_id(&self, id: i64) -> StoreResult<Option<Post>>;

	/// Resolves the neighbor ids of the post with `id` over the full
	/// ordering. Returns `None` when no such post exists.
	async fn neighbor_ids(&self, id: i64) -> StoreResult<Option<NeighborIds>>;

	async fn create(&self, post: NewPost) -> StoreResult<Post>;

	/// Applies `changes` to the post with `slug`, returning the updated post
	/// or `None` if it does not exist.
	async fn update(&self, slug: &str, changes: PostChanges) -> StoreResult<Option<Post>>;

	/// Deletes the post with `slug`, returning whether it existed.
	async fn delete(&self, slug: &str) -> StoreResult<bool>;

	/// Releases any resources held by the store.
	async fn close(&self) {}
}
