use aide::transform::TransformOperation;
use axum::extract::State;

use crate::{
	extract::{Json, Path},
	model::{NewPost, PostChanges},
	openapi::tag,
	route::model::Envelope,
	store::{PostStore, Store},
};

use super::{model, resolve, Error, RouteError};

pub fn get_page_docs(op: TransformOperation) -> TransformOperation {
	op.summary("Get a page of posts")
		.description("Returns a page of five posts, newest first, along with the total number of pages.")
		.tag(tag::POST)
}

/// Returns a page of posts, newest first.
pub async fn get_page(
	State(store): State<Store>,
	Path(input): Path<model::PageInput>,
) -> Result<Json<Envelope<model::Page>>, RouteError> {
	let page = resolve::resolve_page(store.as_ref(), input.paginate(), None).await?;

	Ok(Json(Envelope::success(page)))
}

pub fn get_year_page_docs(op: TransformOperation) -> TransformOperation {
	op.summary("Get a page of posts from a year")
		.description("Returns a page of posts created in the given year (UTC), newest first.")
		.tag(tag::POST)
}

/// Returns a page of posts created in a year, newest first.
pub async fn get_year_page(
	State(store): State<Store>,
	Path(input): Path<model::YearPageInput>,
) -> Result<Json<Envelope<model::Page>>, RouteError> {
	let filter = input.period().range()?;
	let page = resolve::resolve_page(store.as_ref(), input.paginate(), Some(filter)).await?;

	Ok(Json(Envelope::success(page)))
}

pub fn get_month_page_docs(op: TransformOperation) -> TransformOperation {
	op.summary("Get a page of posts from a month")
		.description("Returns a page of posts created in the given month (UTC), newest first.")
		.tag(tag::POST)
}

/// Returns a page of posts created in a month, newest first.
pub async fn get_month_page(
	State(store): State<Store>,
	Path(input): Path<model::MonthPageInput>,
) -> Result<Json<Envelope<model::Page>>, RouteError> {
	let filter = input.period().range()?;
	let page = resolve::resolve_page(store.as_ref(), input.paginate(), Some(filter)).await?;

	Ok(Json(Envelope::success(page)))
}

pub fn get_day_page_docs(op: TransformOperation) -> TransformOperation {
	op.summary("Get a page of posts from a day")
		.description("Returns a page of posts created on the given day (UTC), newest first.")
		.tag(tag::POST)
}

/// Returns a page of posts created on a day, newest first.
pub async fn get_day_page(
	State(store): State<Store>,
	Path(input): Path<model::DayPageInput>,
) -> Result<Json<Envelope<model::Page>>, RouteError> {
	let filter = input.period().range()?;
	let page = resolve::resolve_page(store.as_ref(), input.paginate(), Some(filter)).await?;

	Ok(Json(Envelope::success(page)))
}

pub fn get_post_docs(op: TransformOperation) -> TransformOperation {
	op.summary("Get a single post")
		.description("Returns a single post by its slug, with the posts directly older and newer than it.")
		.tag(tag::POST)
}

/// Returns a single post by its slug.
pub async fn get_post(
	State(store): State<Store>,
	Path(input): Path<model::SlugInput>,
) -> Result<Json<Envelope<model::PostWithNeighbors>>, RouteError> {
	let post = resolve::get_post_with_neighbors(store.as_ref(), &input.slug).await?;

	Ok(Json(Envelope::success(post)))
}

pub fn create_post_docs(op: TransformOperation) -> TransformOperation {
	op.summary("Create post")
		.description("Creates a new post under the given slug.")
		.tag(tag::POST)
}

/// Creates a new post.
pub async fn create_post(
	State(store): State<Store>,
	Path(path): Path<model::SlugInput>,
	Json(input): Json<model::CreatePostInput>,
) -> Result<Json<Envelope<()>>, RouteError> {
	if path.slug.trim().is_empty() {
		return Err(Error::MissingSlug.into());
	}

	store
		.create(NewPost {
			slug: path.slug,
			title: input.title,
			body: input.body,
		})
		.await?;

	Ok(Json(Envelope::success(())))
}

pub fn update_post_docs(op: TransformOperation) -> TransformOperation {
	op.summary("Update post")
		.description("Updates the title and/or body of an existing post by its slug.")
		.tag(tag::POST)
}

/// Updates an existing post.
pub async fn update_post(
	State(store): State<Store>,
	Path(path): Path<model::SlugInput>,
	Json(input): Json<model::UpdatePostInput>,
) -> Result<Json<Envelope<()>>, RouteError> {
	let changes = PostChanges {
		title: input.title,
		body: input.body,
	};

	if store.update(&path.slug, changes).await?.is_none() {
		return Err(Error::UnknownPost(path.slug).into());
	}

	Ok(Json(Envelope::success(())))
}

pub fn delete_post_docs(op: TransformOperation) -> TransformOperation {
	op.summary("Delete post")
		.description("Deletes an existing post by its slug.")
		.tag(tag::POST)
}

/// Deletes an existing post.
pub async fn delete_post(
	State(store): State<Store>,
	Path(path): Path<model::SlugInput>,
) -> Result<Json<Envelope<()>>, RouteError> {
	if !store.delete(&path.slug).await? {
		return Err(Error::UnknownPost(path.slug).into());
	}

	Ok(Json(Envelope::success(())))
}
