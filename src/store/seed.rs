//! Demo posts for a fresh store.

use tracing::info;

use super::{PostStore, StoreResult};
use crate::model::NewPost;

pub const TITLES: [&str; 9] = [
	"a",
	"b",
	"c",
	"d",
	"e",
	"f",
	"g",
	"h",
	"this last post title is quite long. Quite a slog. Veryyyyy lengthy.",
];

pub const BODY: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do eiusmod \
	tempor incididunt ut labore et dolore magna aliqua. Ut enim ad minim veniam, quis nostrud \
	exercitation ullamco laboris nisi ut aliquip ex ea commodo consequat. Duis aute irure dolor \
	in reprehenderit in voluptate velit esse cillum dolore eu fugiat nulla pariatur. Excepteur \
	sint occaecat cupidatat non proident, sunt in culpa qui officia deserunt mollit anim id est \
	laborum.";

/// Inserts the demo posts if the store is empty, returning how many were
/// created.
///
/// Posts are inserted last title first, so `a` ends up as the newest post.
pub async fn populate(store: &dyn PostStore) -> StoreResult<usize> {
	if store.count(None).await? > 0 {
		info!("store already has posts, skipping demo data");
		return Ok(0);
	}

	for title in TITLES.iter().rev() {
		store
			.create(NewPost {
				slug: (*title).to_owned(),
				title: (*title).to_owned(),
				body: BODY.to_owned(),
			})
			.await?;
	}

	info!(count = TITLES.len(), "inserted demo posts");

	Ok(TITLES.len())
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::store::MemoryStore;

	#[tokio::test]
	async fn test_populate_only_fills_empty_store() {
		let store = MemoryStore::new();

		assert_eq!(populate(&store).await.unwrap(), TITLES.len());
		assert_eq!(populate(&store).await.unwrap(), 0);
		assert_eq!(store.count(None).await.unwrap(), 9);

		let newest = store.find_many(None, 0, 1).await.unwrap();

		assert_eq!(newest[0].slug, "a");
	}
}
