use std::fmt;

use aide::OperationOutput;
use axum::{
	body::Body,
	extract::{
		path::ErrorKind,
		rejection::{JsonRejection, PathRejection},
	},
	http::{Response, StatusCode},
	response::IntoResponse,
	Json,
};

use crate::{route::model::Envelope, store::StoreError};

/// Error type for failures that happen outside of a route's own logic.
///
/// The Display trait is not sent to the client, so it can show
/// sensitive information.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
	#[error("validation error: {0}")]
	Validation(#[from] validator::ValidationErrors),
	#[error("path error: {0}")]
	Path(#[from] PathRejection),
	#[error("json error: {0}")]
	Json(#[from] JsonRejection),
	#[error("store error: {0}")]
	Store(#[from] StoreError),
}

/// Formats the failure message for a bad request parameter.
pub fn invalid_parameter(field: impl fmt::Display) -> String {
	format!("invalid `{field}` parameter")
}

impl AppError {
	/// Returns the message presented to the client, or `None` if the error
	/// is internal and must not be shown.
	pub fn message(&self) -> Option<String> {
		match self {
			Self::Validation(errors) => {
				let mut fields = errors.field_errors().into_keys().collect::<Vec<_>>();
				fields.sort();

				Some(
					fields
						.into_iter()
						.map(invalid_parameter)
						.collect::<Vec<_>>()
						.join(", "),
				)
			}
			Self::Path(PathRejection::FailedToDeserializePathParams(inner)) => {
				Some(match inner.kind() {
					ErrorKind::ParseErrorAtKey { key, .. }
					| ErrorKind::InvalidUtf8InPathParam { key } => invalid_parameter(key),
					_ => inner.body_text(),
				})
			}
			Self::Path(rejection) => Some(rejection.body_text()),
			Self::Json(rejection) => Some(rejection.body_text()),
			Self::Store(..) => None,
		}
	}
}

impl IntoResponse for AppError {
	fn into_response(self) -> Response<Body> {
		match self.message() {
			Some(message) => (StatusCode::OK, Json(Envelope::failure(message))).into_response(),
			None => {
				tracing::error!(error = %self, "internal error");

				(StatusCode::INTERNAL_SERVER_ERROR, Json(Envelope::error())).into_response()
			}
		}
	}
}

/// The shape of a route-specific error.
///
/// Route errors are expected outcomes (bad input, unknown records), so they
/// are sent as a failure envelope with a `200 OK` unless a route says otherwise.
pub trait ErrorShape: std::error::Error {
	fn status(&self) -> StatusCode {
		StatusCode::OK
	}

	/// The message presented to the client.
	fn message(&self) -> String {
		self.to_string()
	}
}

/// The error returned by route handlers, either a route-specific error
/// or an application-level one.
#[derive(Debug)]
pub enum RouteError<E> {
	App(AppError),
	Route(E),
}

impl<E> From<AppError> for RouteError<E> {
	fn from(error: AppError) -> Self {
		Self::App(error)
	}
}

impl<E> From<StoreError> for RouteError<E> {
	fn from(error: StoreError) -> Self {
		Self::App(AppError::Store(error))
	}
}

impl<E: ErrorShape> IntoResponse for RouteError<E> {
	fn into_response(self) -> Response<Body> {
		match self {
			Self::App(error) => error.into_response(),
			Self::Route(error) => {
				tracing::debug!(%error, "route failure");

				(error.status(), Json(Envelope::failure(error.message()))).into_response()
			}
		}
	}
}

impl<E> OperationOutput for RouteError<E> {
	type Inner = Self;
}
