use std::{str::FromStr, time::Duration};

use tracing::Level;

use crate::store::PgStoreConfig;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("{0} must be set")]
	Missing(&'static str),
	#[error("{key} has an invalid value: {value:?}")]
	Invalid { key: &'static str, value: String },
}

/// Which [`crate::store::PostStore`] to run against.
#[derive(Debug, Clone)]
pub enum StoreConfig {
	Postgres(PgStoreConfig),
	Memory,
}

/// Runtime configuration, read from the environment (and a `.env` file,
/// if present).
#[derive(Debug, Clone)]
pub struct Config {
	pub host: String,
	pub port: u16,
	pub store: StoreConfig,
	pub log_level: Level,
	/// Enables OpenTelemetry export when set.
	pub otlp_endpoint: Option<String>,
	/// Seeds demo posts into an empty store at startup.
	pub populate: bool,
}

impl Config {
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|key| std::env::var(key).ok())
	}

	/// Builds a configuration from any key lookup.
	pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
		let store = match lookup("STORE").as_deref() {
			None | Some("postgres") => StoreConfig::Postgres(PgStoreConfig {
				url: lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?,
				max_connections: parse(&lookup, "DATABASE_MAX_CONNECTIONS")?.unwrap_or(10),
				acquire_timeout: Duration::from_secs(
					parse(&lookup, "DATABASE_ACQUIRE_TIMEOUT_SECS")?.unwrap_or(5),
				),
			}),
			Some("memory") => StoreConfig::Memory,
			Some(other) => {
				return Err(ConfigError::Invalid {
					key: "STORE",
					value: other.to_owned(),
				})
			}
		};

		let populate = match lookup("POPULATE").as_deref() {
			None | Some("" | "0" | "false") => false,
			Some("1" | "true") => true,
			Some(other) => {
				return Err(ConfigError::Invalid {
					key: "POPULATE",
					value: other.to_owned(),
				})
			}
		};

		Ok(Self {
			host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".into()),
			port: parse(&lookup, "PORT")?.unwrap_or(3000),
			store,
			log_level: parse(&lookup, "LOG_LEVEL")?.unwrap_or(Level::INFO),
			otlp_endpoint: lookup("OTEL_EXPORTER_OTLP_ENDPOINT").filter(|value| !value.is_empty()),
			populate,
		})
	}
}

fn parse<T: FromStr>(
	lookup: &impl Fn(&str) -> Option<String>,
	key: &'static str,
) -> Result<Option<T>, ConfigError> {
	lookup(key)
		.map(|value| {
			value
				.parse()
				.map_err(|_| ConfigError::Invalid { key, value })
		})
		.transpose()
}

#[cfg(test)]
mod test {
	use std::collections::HashMap;

	use super::*;

	fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
		let vars = vars
			.iter()
			.map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
			.collect::<HashMap<_, _>>();

		Config::from_lookup(|key| vars.get(key).cloned())
	}

	#[test]
	fn test_defaults() {
		let config = config(&[("DATABASE_URL", "postgres://localhost/blog")]).unwrap();

		assert_eq!(config.host, "127.0.0.1");
		assert_eq!(config.port, 3000);
		assert_eq!(config.log_level, Level::INFO);
		assert!(config.otlp_endpoint.is_none());
		assert!(!config.populate);

		let StoreConfig::Postgres(store) = config.store else {
			panic!("expected a postgres store");
		};

		assert_eq!(store.url, "postgres://localhost/blog");
		assert_eq!(store.max_connections, 10);
		assert_eq!(store.acquire_timeout, Duration::from_secs(5));
	}

	#[test]
	fn test_memory_store_needs_no_database() {
		let config = config(&[("STORE", "memory"), ("POPULATE", "true"), ("PORT", "8080")]).unwrap();

		assert!(matches!(config.store, StoreConfig::Memory));
		assert!(config.populate);
		assert_eq!(config.port, 8080);
	}

	#[test]
	fn test_invalid_values() {
		assert!(matches!(
			config(&[]),
			Err(ConfigError::Missing("DATABASE_URL"))
		));
		assert!(matches!(
			config(&[("STORE", "memory"), ("PORT", "eighty")]),
			Err(ConfigError::Invalid { key: "PORT", .. })
		));
		assert!(matches!(
			config(&[("STORE", "sqlite")]),
			Err(ConfigError::Invalid { key: "STORE", .. })
		));
		assert!(matches!(
			config(&[("STORE", "memory"), ("LOG_LEVEL", "loud")]),
			Err(ConfigError::Invalid { key: "LOG_LEVEL", .. })
		));
	}
}
