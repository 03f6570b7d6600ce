use std::cmp::Reverse;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{CreatedRange, NeighborIds, PostStore, StoreError, StoreResult};
use crate::model::{NewPost, Post, PostChanges};

#[derive(Default)]
struct Inner {
	next_id: i64,
	/// Kept sorted by `created DESC, id DESC`.
	posts: Vec<Post>,
}

impl Inner {
	fn insert(&mut self, mut post: Post) -> Post {
		self.next_id += 1;
		post.id = self.next_id;

		self.posts.push(post.clone());
		self.posts.sort_by_key(|post| Reverse((post.created, post.id)));

		post
	}

	fn matching(&self, filter: Option<CreatedRange>) -> impl Iterator<Item = &Post> {
		self.posts
			.iter()
			.filter(move |post| filter.map_or(true, |range| range.contains(&post.created)))
	}
}

/// A [`PostStore`] that keeps posts in process memory.
///
/// Ids are assigned sequentially starting at 1, as a `BIGSERIAL` would.
#[derive(Default)]
pub struct MemoryStore {
	inner: RwLock<Inner>,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a store holding `posts`. Their `created` timestamps are kept
	/// and new ids are assigned in iteration order.
	#[cfg(test)]
	pub fn with_posts(posts: impl IntoIterator<Item = Post>) -> Self {
		let mut inner = Inner::default();

		for post in posts {
			inner.insert(post);
		}

		Self {
			inner: RwLock::new(inner),
		}
	}
}

#[async_trait]
impl PostStore for MemoryStore {
	async fn count(&self, filter: Option<CreatedRange>) -> StoreResult<i64> {
		let count = self.inner.read().await.matching(filter).count();

		Ok(i64::try_from(count).unwrap_or(i64::MAX))
	}

	async fn find_many(
		&self,
		filter: Option<CreatedRange>,
		skip: i64,
		take: i64,
	) -> StoreResult<Vec<Post>> {
		let skip = usize::try_from(skip).unwrap_or(usize::MAX);
		let take = usize::try_from(take).unwrap_or(0);

		Ok(self
			.inner
			.read()
			.await
			.matching(filter)
			.skip(skip)
			.take(take)
			.cloned()
			.collect())
	}

	async fn find_by_slug(&self, slug: &str) -> StoreResult<Option<Post>> {
		let inner = self.inner.read().await;

		Ok(inner.posts.iter().find(|post| post.slug == slug).cloned())
	}

	async fn find_by_id(&self, id: i64) -> StoreResult<Option<Post>> {
		let inner = self.inner.read().await;

		Ok(inner.posts.iter().find(|post| post.id == id).cloned())
	}

	async fn neighbor_ids(&self, id: i64) -> StoreResult<Option<NeighborIds>> {
		let inner = self.inner.read().await;
		let Some(index) = inner.posts.iter().position(|post| post.id == id) else {
			return Ok(None);
		};

		Ok(Some(NeighborIds {
			previous: inner.posts.get(index + 1).map(|post| post.id),
			next: index
				.checked_sub(1)
				.and_then(|index| inner.posts.get(index))
				.map(|post| post.id),
		}))
	}

	async fn create(&self, post: NewPost) -> StoreResult<Post> {
		let mut inner = self.inner.write().await;

		if inner.posts.iter().any(|existing| existing.slug == post.slug) {
			return Err(StoreError::DuplicateSlug(post.slug));
		}

		Ok(inner.insert(Post {
			id: 0,
			slug: post.slug,
			title: post.title,
			body: post.body,
			created: Utc::now(),
		}))
	}

	async fn update(&self, slug: &str, changes: PostChanges) -> StoreResult<Option<Post>> {
		let mut inner = self.inner.write().await;
		let Some(post) = inner.posts.iter_mut().find(|post| post.slug == slug) else {
			return Ok(None);
		};

		if let Some(title) = changes.title {
			post.title = title;
		}

		if let Some(body) = changes.body {
			post.body = body;
		}

		Ok(Some(post.clone()))
	}

	async fn delete(&self, slug: &str) -> StoreResult<bool> {
		let mut inner = self.inner.write().await;
		let before = inner.posts.len();

		inner.posts.retain(|post| post.slug != slug);

		Ok(inner.posts.len() < before)
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::test::post_at;

	fn store() -> MemoryStore {
		MemoryStore::with_posts([
			post_at(2000, 1, 1, 0, "jan-1"),
			post_at(2000, 6, 1, 0, "june-1"),
			post_at(2001, 12, 31, 0, "dec-31"),
		])
	}

	#[tokio::test]
	async fn test_ids_are_assigned_in_order() {
		let store = store();

		assert_eq!(store.find_by_slug("jan-1").await.unwrap().unwrap().id, 1);
		assert_eq!(store.find_by_slug("dec-31").await.unwrap().unwrap().id, 3);
		assert_eq!(store.find_by_id(2).await.unwrap().unwrap().slug, "june-1");
		assert!(store.find_by_id(4).await.unwrap().is_none());
	}

	#[tokio::test]
	async fn test_find_many_is_newest_first() {
		let store = store();
		let slugs = store
			.find_many(None, 1, 5)
			.await
			.unwrap()
			.into_iter()
			.map(|post| post.slug)
			.collect::<Vec<_>>();

		assert_eq!(slugs, ["june-1", "jan-1"]);
	}

	#[tokio::test]
	async fn test_filter_is_inclusive() {
		let store = store();
		let jan = store.find_by_slug("jan-1").await.unwrap().unwrap();
		let june = store.find_by_slug("june-1").await.unwrap().unwrap();
		let range = CreatedRange::new(jan.created, june.created);

		assert_eq!(store.count(Some(range)).await.unwrap(), 2);
		assert_eq!(store.count(None).await.unwrap(), 3);
	}

	#[tokio::test]
	async fn test_ties_are_broken_by_id() {
		let store = MemoryStore::with_posts([
			post_at(2000, 1, 1, 0, "first"),
			post_at(2000, 1, 1, 0, "second"),
		]);

		let posts = store.find_many(None, 0, 5).await.unwrap();

		assert_eq!(posts[0].slug, "second");
		assert_eq!(posts[1].slug, "first");
		assert_eq!(
			store.neighbor_ids(posts[0].id).await.unwrap(),
			Some(NeighborIds {
				previous: Some(posts[1].id),
				next: None,
			})
		);
	}

	#[tokio::test]
	async fn test_duplicate_slug_is_rejected() {
		let store = store();
		let result = store
			.create(NewPost {
				slug: "jan-1".into(),
				title: "again".into(),
				body: String::new(),
			})
			.await;

		assert!(matches!(result, Err(StoreError::DuplicateSlug(slug)) if slug == "jan-1"));
	}

	#[tokio::test]
	async fn test_update_and_delete() {
		let store = store();
		let updated = store
			.update(
				"june-1",
				PostChanges {
					title: None,
					body: Some("new body".into()),
				},
			)
			.await
			.unwrap()
			.unwrap();

		assert_eq!(updated.title, "june-1");
		assert_eq!(updated.body, "new body");
		assert!(store.update("missing", PostChanges::default()).await.unwrap().is_none());

		assert!(store.delete("june-1").await.unwrap());
		assert!(!store.delete("june-1").await.unwrap());
		assert_eq!(
			store.neighbor_ids(1).await.unwrap(),
			Some(NeighborIds {
				previous: None,
				next: Some(3),
			})
		);
	}
}
