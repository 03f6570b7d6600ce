use aide::{openapi::Tag, transform::TransformOpenApi};

use crate::{extract::Json, route::model::Envelope};

pub mod tag {
	pub const POST: &str = "Post";
}

pub fn docs(api: TransformOpenApi) -> TransformOpenApi {
	api.title("Blog API")
		.summary("Paginated blog posts with previous/next navigation")
		.description(include_str!("../README.md"))
		.tag(Tag {
			name: tag::POST.into(),
			description: Some("Reading and managing posts".into()),
			..Default::default()
		})
		.default_response_with::<Json<Envelope<String>>, _>(|res| {
			res.example(Envelope::failure("post with slug hello-world not found"))
		})
}
