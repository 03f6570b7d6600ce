use aide::axum::{routing::get_with, ApiRouter};

use crate::{error, AppState};

pub mod model;
pub mod resolve;
pub mod route;

/// A failure presented to the client in a failure envelope.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("missing slug")]
	MissingSlug,
	#[error("post with slug {0} not found")]
	UnknownPost(String),
	#[error("no posts found on page {0}")]
	PageOutOfRange(i64),
	#[error("invalid `{0}` parameter")]
	InvalidParameter(&'static str),
}

pub type RouteError = error::RouteError<Error>;

impl From<Error> for RouteError {
	fn from(error: Error) -> Self {
		Self::Route(error)
	}
}

impl error::ErrorShape for Error {}

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.api_route("/page/:page", get_with(get_page, get_page_docs))
		.api_route(
			"/year/:year/page/:page",
			get_with(get_year_page, get_year_page_docs),
		)
		.api_route(
			"/month/:year/:month/page/:page",
			get_with(get_month_page, get_month_page_docs),
		)
		.api_route(
			"/day/:year/:month/:day/page/:page",
			get_with(get_day_page, get_day_page_docs),
		)
		.api_route(
			"/:slug",
			get_with(get_post, get_post_docs)
				.post_with(create_post, create_post_docs)
				.put_with(update_post, update_post_docs)
				.delete_with(delete_post, delete_post_docs),
		)
}
