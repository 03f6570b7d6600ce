//! Page and neighbor resolution over a [`PostStore`].

use tracing::{debug, instrument};

use super::{
	model::{Neighbors, Page, PostWithNeighbors},
	Error, RouteError,
};
use crate::{
	route::model::Paginate,
	store::{CreatedRange, PostStore},
};

/// Returns a page of posts matching `filter`, newest first, along with the
/// total number of pages.
///
/// A page past the last one is a failure, so an empty period is too.
///
/// The count and the fetch are separate queries. A concurrent write between
/// them can leave `number_of_pages` one off from what the returned posts
/// suggest; that is accepted rather than wrapped in a transaction.
#[instrument(skip(store))]
pub async fn resolve_page(
	store: &dyn PostStore,
	paginate: Paginate,
	filter: Option<CreatedRange>,
) -> Result<Page, RouteError> {
	if paginate.page < 1 {
		return Err(Error::InvalidParameter("page").into());
	}

	let count = store.count(filter).await?;
	let number_of_pages = Paginate::number_of_pages(count);

	if paginate.page > number_of_pages {
		return Err(Error::PageOutOfRange(paginate.page).into());
	}

	let posts = store
		.find_many(filter, paginate.offset(), paginate.limit())
		.await?;

	debug!(count, number_of_pages, returned = posts.len(), "resolved page");

	Ok(Page {
		number_of_pages,
		posts,
	})
}

/// Returns the posts directly older and newer than the post with `id`.
///
/// Both are absent if the post does not exist.
#[instrument(skip(store))]
pub async fn resolve_neighbors(store: &dyn PostStore, id: i64) -> Result<Neighbors, RouteError> {
	let Some(ids) = store.neighbor_ids(id).await? else {
		return Ok(Neighbors::default());
	};

	let previous_post = match ids.previous {
		Some(id) => store.find_by_id(id).await?,
		None => None,
	};

	let next_post = match ids.next {
		Some(id) => store.find_by_id(id).await?,
		None => None,
	};

	Ok(Neighbors {
		previous_post,
		next_post,
	})
}

/// Returns the post with `slug` along with its neighbors.
#[instrument(skip(store))]
pub async fn get_post_with_neighbors(
	store: &dyn PostStore,
	slug: &str,
) -> Result<PostWithNeighbors, RouteError> {
	if slug.trim().is_empty() {
		return Err(Error::MissingSlug.into());
	}

	let post = store
		.find_by_slug(slug)
		.await?
		.ok_or_else(|| Error::UnknownPost(slug.to_owned()))?;

	let neighbors = resolve_neighbors(store, post.id).await?;

	Ok(PostWithNeighbors { post, neighbors })
}
