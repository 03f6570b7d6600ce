use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A single blog post.
///
/// Use this when fetching from the store and returning to the client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema, sqlx::FromRow)]
pub struct Post {
	/// The unique identifier of the post, assigned by the store.
	pub id: i64,
	/// The external lookup key of the post.
	pub slug: String,
	/// The title of the post.
	pub title: String,
	/// The free-text body of the post.
	pub body: String,
	/// The creation time of the post. Posts are ordered by this, newest first.
	pub created: DateTime<Utc>,
}

/// The fields needed to insert a new post.
#[derive(Debug, Clone)]
pub struct NewPost {
	pub slug: String,
	pub title: String,
	pub body: String,
}

/// A partial update to an existing post. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct PostChanges {
	pub title: Option<String>,
	pub body: Option<String>,
}
