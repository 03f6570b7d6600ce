use schemars::JsonSchema;
use serde::Serialize;

/// The number of posts on a single page.
pub const PAGE_SIZE: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Status {
	Success,
	Failure,
	Error,
}

/// The body of every response.
///
/// Logical failures are still sent with a `200 OK`, so clients should
/// always check `status`.
#[derive(Debug, Serialize, JsonSchema)]
pub struct Envelope<T> {
	pub status: Status,
	pub data: T,
}

impl<T> Envelope<T> {
	pub fn success(data: T) -> Self {
		Self {
			status: Status::Success,
			data,
		}
	}
}

impl Envelope<String> {
	pub fn failure(message: impl Into<String>) -> Self {
		Self {
			status: Status::Failure,
			data: message.into(),
		}
	}

	/// An opaque internal error. The cause is only logged.
	pub fn error() -> Self {
		Self {
			status: Status::Error,
			data: "internal server error".into(),
		}
	}
}

/// A fixed-size window over posts, newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginate {
	/// The page number to return (1-indexed).
	pub page: i64,
}

impl Paginate {
	pub fn new(page: i64) -> Self {
		Self { page }
	}

	pub fn offset(&self) -> i64 {
		(self.page - 1).saturating_mul(PAGE_SIZE)
	}

	pub fn limit(&self) -> i64 {
		PAGE_SIZE
	}

	/// Returns the number of pages needed to show `count` posts.
	pub fn number_of_pages(count: i64) -> i64 {
		(count + PAGE_SIZE - 1) / PAGE_SIZE
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_paginate_offset() {
		assert_eq!(Paginate::new(1).offset(), 0);
		assert_eq!(Paginate::new(2).offset(), 5);
		assert_eq!(Paginate::new(3).offset(), 10);
		assert_eq!(Paginate::new(i64::MAX).offset(), i64::MAX);
	}

	#[test]
	fn test_paginate_limit() {
		assert_eq!(Paginate::new(7).limit(), PAGE_SIZE);
	}

	#[test]
	fn test_number_of_pages() {
		assert_eq!(Paginate::number_of_pages(0), 0);
		assert_eq!(Paginate::number_of_pages(1), 1);
		assert_eq!(Paginate::number_of_pages(5), 1);
		assert_eq!(Paginate::number_of_pages(6), 2);
		assert_eq!(Paginate::number_of_pages(9), 2);
		assert_eq!(Paginate::number_of_pages(10), 2);
		assert_eq!(Paginate::number_of_pages(11), 3);
	}

	#[test]
	fn test_envelope_shape() {
		let success = serde_json::to_value(Envelope::success(())).unwrap();
		let failure = serde_json::to_value(Envelope::failure("nope")).unwrap();

		assert_eq!(success, serde_json::json!({ "status": "success", "data": null }));
		assert_eq!(failure, serde_json::json!({ "status": "failure", "data": "nope" }));
	}
}
