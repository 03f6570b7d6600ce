#![warn(clippy::pedantic)]

mod config;
mod error;
mod extract;
mod model;
mod openapi;
mod route;
mod store;
#[cfg(test)]
mod test;
mod trace;

use std::sync::Arc;

use axum::{extract::Request, ServiceExt};
use tower::Layer;
use tower_http::normalize_path::NormalizePathLayer;

use crate::{
	config::{Config, StoreConfig},
	store::{MemoryStore, PgStore, Store},
};

pub type AppState = State;

/// The shared application state.
///
/// This should contain all shared dependencies that handlers need to access.
/// The store is the only one: every request is otherwise independent.
#[derive(Clone, axum::extract::FromRef)]
pub struct State {
	pub store: Store,
}

/// Opens the configured store, applying migrations for Postgres.
async fn open_store(config: &StoreConfig) -> Result<Store, store::StoreError> {
	Ok(match config {
		StoreConfig::Postgres(config) => {
			let store = PgStore::connect(config).await?;
			store.migrate().await?;

			Arc::new(store)
		}
		StoreConfig::Memory => {
			tracing::warn!("using the in-memory store, posts will not be persisted");

			Arc::new(MemoryStore::new())
		}
	})
}

async fn shutdown_signal() {
	if let Err(error) = tokio::signal::ctrl_c().await {
		tracing::error!(%error, "failed to listen for shutdown signal");
	}
}

#[tokio::main]
async fn main() {
	dotenvy::dotenv().ok();

	let config = Config::from_env().expect("invalid configuration");
	let _guard = trace::init_tracing_subscriber(config.log_level, config.otlp_endpoint.as_deref())
		.expect("failed to initialize tracing");

	let store = open_store(&config.store)
		.await
		.expect("failed to open store");

	if config.populate {
		store::seed::populate(store.as_ref())
			.await
			.expect("failed to populate store");
	}

	let state = State {
		store: store.clone(),
	};
	let app = NormalizePathLayer::trim_trailing_slash().layer(route::app(state));

	let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port))
		.await
		.expect("failed to bind to port");

	tracing::info!("listening on {}:{}", config.host, config.port);

	if let Err(error) = axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
		.with_graceful_shutdown(shutdown_signal())
		.await
	{
		tracing::error!(%error, "server error");
	}

	store.close().await;
	tracing::info!("store closed, shutting down");
}
