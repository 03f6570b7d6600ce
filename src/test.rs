pub use std::sync::Arc;

pub use axum_test::TestServer;
pub use chrono::{TimeZone, Utc};
pub use serde_json::{json, Value};

pub(crate) use crate::{model::Post, route, store::MemoryStore, State};

/// Builds a test server over the full router, backed by `store`.
pub fn app(store: MemoryStore) -> TestServer {
	TestServer::new(route::app(State {
		store: Arc::new(store),
	}))
	.unwrap()
}

/// A post created at the given UTC hour, with its slug as its title.
/// The id is assigned by the store.
pub fn post_at(year: i32, month: u32, day: u32, hour: u32, slug: &str) -> Post {
	Post {
		id: 0,
		slug: slug.into(),
		title: slug.into(),
		body: "I know what you're thinking, but the science is in.".into(),
		created: Utc.with_ymd_and_hms(year, month, day, hour, 0, 0).unwrap(),
	}
}

/// Collects the `slug` of every post in a JSON array.
pub fn slugs(posts: &Value) -> Vec<String> {
	posts
		.as_array()
		.unwrap()
		.iter()
		.map(|post| post["slug"].as_str().unwrap().to_owned())
		.collect()
}
