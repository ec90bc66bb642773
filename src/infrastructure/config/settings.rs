use config::Environment;
use serde::Deserialize;

/// Runtime configuration, read from the process environment. The processor
/// and database endpoints are required; everything else has a default tuned
/// for the expected bursty load.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
	pub database_url: String,
	pub default_payment_processor: String,
	pub fallback_payment_processor: String,
	pub cache_url: String,
	pub server_keepalive: u64,
	pub worker_count: usize,
	pub queue_capacity: usize,
	pub retry_queue_capacity: usize,
	pub retry_backoff_ms: u64,
	pub batch_size: usize,
	pub flush_interval_ms: u64,
	pub probe_interval_secs: u64,
}

impl Config {
	pub fn load() -> Result<Self, config::ConfigError> {
		Self::load_from(Environment::default())
	}

	fn load_from(environment: Environment) -> Result<Self, config::ConfigError> {
		config::Config::builder()
			.set_default("cache_url", "redis://cache:6379")?
			.set_default("server_keepalive", 75_i64)?
			.set_default("worker_count", 10_i64)?
			.set_default("queue_capacity", 10_000_i64)?
			.set_default("retry_queue_capacity", 1_000_i64)?
			.set_default("retry_backoff_ms", 100_i64)?
			.set_default("batch_size", 50_i64)?
			.set_default("flush_interval_ms", 1_500_i64)?
			.set_default("probe_interval_secs", 5_i64)?
			.add_source(environment)
			.build()?
			.try_deserialize()
	}
}

#[cfg(test)]
mod tests {
	use std::collections::HashMap;

	use super::*;

	#[test]
	fn test_config_load_fails_without_required_endpoints() {
		let source = Environment::default().source(Some(HashMap::new()));

		assert!(Config::load_from(source).is_err());
	}

	#[test]
	fn test_config_load_applies_defaults_for_tunables() {
		let source = Environment::default().source(Some({
			let mut env = HashMap::new();
			env.insert(
				"DATABASE_URL".into(),
				"postgresql://payments:payments@db:5432/payments".into(),
			);
			env.insert(
				"DEFAULT_PAYMENT_PROCESSOR".into(),
				"http://test_default:8080".into(),
			);
			env.insert(
				"FALLBACK_PAYMENT_PROCESSOR".into(),
				"http://test_fallback:8080".into(),
			);
			env
		}));

		let config =
			Config::load_from(source).expect("Failed to load config in test");

		assert_eq!(config.cache_url, "redis://cache:6379");
		assert_eq!(config.worker_count, 10);
		assert_eq!(config.queue_capacity, 10_000);
		assert_eq!(config.retry_queue_capacity, 1_000);
		assert_eq!(config.retry_backoff_ms, 100);
		assert_eq!(config.batch_size, 50);
		assert_eq!(config.flush_interval_ms, 1_500);
		assert_eq!(config.probe_interval_secs, 5);
	}

	#[test]
	fn test_config_load_overrides_from_environment() {
		let source = Environment::default().source(Some({
			let mut env = HashMap::new();
			env.insert(
				"DATABASE_URL".into(),
				"postgresql://payments:payments@db:5432/payments".into(),
			);
			env.insert(
				"DEFAULT_PAYMENT_PROCESSOR".into(),
				"http://test_default:8080".into(),
			);
			env.insert(
				"FALLBACK_PAYMENT_PROCESSOR".into(),
				"http://test_fallback:8080".into(),
			);
			env.insert("CACHE_URL".into(), "redis://test_cache:6379".into());
			env.insert("WORKER_COUNT".into(), "4".into());
			env.insert("BATCH_SIZE".into(), "25".into());
			env
		}));

		let config =
			Config::load_from(source).expect("Failed to load config in test");

		assert_eq!(
			config.database_url,
			"postgresql://payments:payments@db:5432/payments"
		);
		assert_eq!(
			config.default_payment_processor,
			"http://test_default:8080"
		);
		assert_eq!(
			config.fallback_payment_processor,
			"http://test_fallback:8080"
		);
		assert_eq!(config.cache_url, "redis://test_cache:6379");
		assert_eq!(config.worker_count, 4);
		assert_eq!(config.batch_size, 25);
	}
}
