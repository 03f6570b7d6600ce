use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{debug, instrument};

use super::{CreatedRange, NeighborIds, PostStore, StoreError, StoreResult};
use crate::model::{NewPost, Post, PostChanges};

/// Connection settings for [`PgStore`].
#[derive(Debug, Clone)]
pub struct PgStoreConfig {
	pub url: String,
	pub max_connections: u32,
	pub acquire_timeout: Duration,
}

/// A [`PostStore`] backed by a Postgres connection pool.
#[derive(Clone)]
pub struct PgStore {
	pool: PgPool,
}

impl PgStore {
	/// Opens a connection pool with the given configuration.
	#[instrument(skip_all)]
	pub async fn connect(config: &PgStoreConfig) -> StoreResult<Self> {
		debug!(max_conn = config.max_connections, "creating connection pool");

		let pool = PgPoolOptions::new()
			.max_connections(config.max_connections)
			.acquire_timeout(config.acquire_timeout)
			.connect(&config.url)
			.await?;

		Ok(Self { pool })
	}

	/// Wraps an existing pool.
	#[cfg(test)]
	pub fn from_pool(pool: PgPool) -> Self {
		Self { pool }
	}

	/// Applies pending migrations from `./migrations`.
	#[instrument(skip(self))]
	pub async fn migrate(&self) -> StoreResult<()> {
		sqlx::migrate!("./migrations").run(&self.pool).await?;

		debug!("migrations completed");
		Ok(())
	}
}

fn bounds(filter: Option<CreatedRange>) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
	filter.map_or((None, None), |range| (Some(range.start), Some(range.end)))
}

#[async_trait]
impl PostStore for PgStore {
	#[instrument(skip(self))]
	async fn count(&self, filter: Option<CreatedRange>) -> StoreResult<i64> {
		let (start, end) = bounds(filter);
		let count = sqlx::query_scalar::<_, i64>(
			r#"
				SELECT COUNT(*) FROM post
				WHERE ($1::timestamptz IS NULL OR created >= $1)
					AND ($2::timestamptz IS NULL OR created <= $2)
			"#,
		)
		.bind(start)
		.bind(end)
		.fetch_one(&self.pool)
		.await?;

		Ok(count)
	}

	#[instrument(skip(self))]
	async fn find_many(
		&self,
		filter: Option<CreatedRange>,
		skip: i64,
		take: i64,
	) -> StoreResult<Vec<Post>> {
		let (start, end) = bounds(filter);
		let posts = sqlx::query_as::<_, Post>(
			r#"
				SELECT * FROM post
				WHERE ($1::timestamptz IS NULL OR created >= $1)
					AND ($2::timestamptz IS NULL OR created <= $2)
				ORDER BY created DESC, id DESC
				LIMIT $3 OFFSET $4
			"#,
		)
		.bind(start)
		.bind(end)
		.bind(take)
		.bind(skip)
		.fetch_all(&self.pool)
		.await?;

		Ok(posts)
	}

	#[instrument(skip(self))]
	async fn find_by_slug(&self, slug: &str) -> StoreResult<Option<Post>> {
		let post = sqlx::query_as::<_, Post>("SELECT * FROM post WHERE slug = $1")
			.bind(slug)
			.fetch_optional(&self.pool)
			.await?;

		Ok(post)
	}

	#[instrument(skip(self))]
	async fn find_by_id(&self, id: i64) -> StoreResult<Option<Post>> {
		let post = sqlx::query_as::<_, Post>("SELECT * FROM post WHERE id = $1")
			.bind(id)
			.fetch_optional(&self.pool)
			.await?;

		Ok(post)
	}

	/// `LEAD` looks one row further down the newest-first ordering, which is
	/// the older post.
	#[instrument(skip(self))]
	async fn neighbor_ids(&self, id: i64) -> StoreResult<Option<NeighborIds>> {
		let row = sqlx::query_as::<_, (Option<i64>, Option<i64>)>(
			r#"
				WITH shifted AS (
					SELECT id,
						LEAD(id, 1) OVER (ORDER BY created DESC, id DESC) AS previous_id,
						LAG(id, 1) OVER (ORDER BY created DESC, id DESC) AS next_id
					FROM post
				)
				SELECT previous_id, next_id FROM shifted
				WHERE id = $1
			"#,
		)
		.bind(id)
		.fetch_optional(&self.pool)
		.await?;

		Ok(row.map(|(previous, next)| NeighborIds { previous, next }))
	}

	#[instrument(skip(self, post), fields(slug = %post.slug))]
	async fn create(&self, post: NewPost) -> StoreResult<Post> {
		let result = sqlx::query_as::<_, Post>(
			r#"
				INSERT INTO post (slug, title, body)
				VALUES ($1, $2, $3)
				RETURNING *
			"#,
		)
		.bind(&post.slug)
		.bind(post.title)
		.bind(post.body)
		.fetch_one(&self.pool)
		.await;

		match result {
			Ok(post) => Ok(post),
			Err(sqlx::Error::Database(error)) if error.is_unique_violation() => {
				Err(StoreError::DuplicateSlug(post.slug))
			}
			Err(error) => Err(error.into()),
		}
	}

	#[instrument(skip(self, changes))]
	async fn update(&self, slug: &str, changes: PostChanges) -> StoreResult<Option<Post>> {
		let post = sqlx::query_as::<_, Post>(
			r#"
				UPDATE post
				SET title = COALESCE($1, title), body = COALESCE($2, body)
				WHERE slug = $3
				RETURNING *
			"#,
		)
		.bind(changes.title)
		.bind(changes.body)
		.bind(slug)
		.fetch_optional(&self.pool)
		.await?;

		Ok(post)
	}

	#[instrument(skip(self))]
	async fn delete(&self, slug: &str) -> StoreResult<bool> {
		let status = sqlx::query("DELETE FROM post WHERE slug = $1")
			.bind(slug)
			.execute(&self.pool)
			.await?;

		Ok(status.rows_affected() > 0)
	}

	async fn close(&self) {
		self.pool.close().await;
	}
}

#[cfg(test)]
mod test {
	use sqlx::PgPool;

	use super::*;
	use crate::store::seed;

	async fn insert_on(pool: &PgPool, slug: &str, created: &str) {
		sqlx::query(
			"INSERT INTO post (slug, title, body, created) VALUES ($1, $1, '', $2::timestamptz)",
		)
		.bind(slug)
		.bind(created)
		.execute(pool)
		.await
		.unwrap();
	}

	#[sqlx::test]
	#[ignore = "requires a Postgres server at DATABASE_URL"]
	async fn test_find_many_orders_and_filters(pool: PgPool) {
		insert_on(&pool, "end-of-2021", "2021-12-31T00:00:00Z").await;
		insert_on(&pool, "start-of-2022", "2022-01-01T00:00:00Z").await;
		insert_on(&pool, "end-of-2022", "2022-12-31T00:00:00Z").await;
		insert_on(&pool, "start-of-2023", "2023-01-01T00:00:00Z").await;

		let store = PgStore::from_pool(pool);
		let year = CreatedRange::new(
			"2022-01-01T00:00:00Z".parse().unwrap(),
			"2022-12-31T23:59:59.999999Z".parse().unwrap(),
		);

		assert_eq!(store.count(None).await.unwrap(), 4);
		assert_eq!(store.count(Some(year)).await.unwrap(), 2);

		let slugs = store
			.find_many(Some(year), 0, 5)
			.await
			.unwrap()
			.into_iter()
			.map(|post| post.slug)
			.collect::<Vec<_>>();

		assert_eq!(slugs, ["end-of-2022", "start-of-2022"]);
	}

	#[sqlx::test]
	#[ignore = "requires a Postgres server at DATABASE_URL"]
	async fn test_neighbor_ids_window(pool: PgPool) {
		insert_on(&pool, "jan-1", "2000-01-01T00:00:00Z").await;
		insert_on(&pool, "june-1", "2000-06-01T00:00:00Z").await;
		insert_on(&pool, "dec-31", "2001-12-31T00:00:00Z").await;

		let store = PgStore::from_pool(pool);
		let jan = store.find_by_slug("jan-1").await.unwrap().unwrap();
		let june = store.find_by_slug("june-1").await.unwrap().unwrap();
		let dec = store.find_by_slug("dec-31").await.unwrap().unwrap();

		assert_eq!(
			store.neighbor_ids(june.id).await.unwrap(),
			Some(NeighborIds {
				previous: Some(jan.id),
				next: Some(dec.id),
			})
		);
		assert_eq!(store.neighbor_ids(-1).await.unwrap(), None);
	}

	#[sqlx::test]
	#[ignore = "requires a Postgres server at DATABASE_URL"]
	async fn test_write_round_trip(pool: PgPool) {
		let store = PgStore::from_pool(pool);

		assert_eq!(seed::populate(&store).await.unwrap(), seed::TITLES.len());

		let updated = store
			.update(
				"a",
				PostChanges {
					title: Some("renamed".into()),
					body: None,
				},
			)
			.await
			.unwrap()
			.unwrap();

		assert_eq!(updated.title, "renamed");
		assert_eq!(updated.body, seed::BODY);
		assert!(store.delete("a").await.unwrap());
		assert!(!store.delete("a").await.unwrap());
		assert!(matches!(
			store
				.create(NewPost {
					slug: "b".into(),
					title: "b".into(),
					body: String::new(),
				})
				.await,
			Err(StoreError::DuplicateSlug(slug)) if slug == "b"
		));
	}
}
