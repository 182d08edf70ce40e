//! Runtime settings, fixed at build time.
//!
//! `PURPOSEPAY_RISK_ENDPOINT` and `PURPOSEPAY_POLL_MS` may be set when the
//! bundle is built; anything unset falls back to the defaults below.

use std::time::Duration;

use log::warn;
use thiserror::Error;

pub const DEFAULT_RISK_ENDPOINT: &str = "http://localhost:8000/predict-risk";
pub const DEFAULT_POLL_MS: u64 = 5000;
/// The TCN stability is not served by the backend yet.
pub const DEFAULT_TCN_SCORE: f64 = 0.79;

const MIN_POLL_MS: u64 = 500;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
	#[error("poll interval `{0}` is not a number of milliseconds")]
	BadPollInterval(String),
	#[error("poll interval {0}ms is below the 500ms minimum")]
	PollTooFast(u64),
	#[error("risk endpoint `{0}` is not an http(s) URL")]
	BadEndpoint(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
	pub risk_endpoint: String,
	pub poll_interval: Duration,
	pub tcn_fixed_score: f64,
}

impl Default for AppConfig {
	fn default() -> Self {
		Self {
			risk_endpoint: DEFAULT_RISK_ENDPOINT.to_string(),
			poll_interval: Duration::from_millis(DEFAULT_POLL_MS),
			tcn_fixed_score: DEFAULT_TCN_SCORE,
		}
	}
}

impl AppConfig {
	/// Apply raw override strings on top of the defaults.
	pub fn with_overrides(
		risk_endpoint: Option<&str>,
		poll_ms: Option<&str>,
	) -> Result<Self, ConfigError> {
		let mut config = Self::default();

		if let Some(endpoint) = risk_endpoint.map(str::trim).filter(|e| !e.is_empty()) {
			if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
				return Err(ConfigError::BadEndpoint(endpoint.to_string()));
			}
			config.risk_endpoint = endpoint.to_string();
		}

		if let Some(raw) = poll_ms.map(str::trim).filter(|p| !p.is_empty()) {
			let ms: u64 = raw
				.parse()
				.map_err(|_| ConfigError::BadPollInterval(raw.to_string()))?;
			if ms < MIN_POLL_MS {
				return Err(ConfigError::PollTooFast(ms));
			}
			config.poll_interval = Duration::from_millis(ms);
		}

		Ok(config)
	}

	/// Settings baked in at build time. Invalid overrides are logged and ignored.
	pub fn load() -> Self {
		Self::with_overrides(
			option_env!("PURPOSEPAY_RISK_ENDPOINT"),
			option_env!("PURPOSEPAY_POLL_MS"),
		)
		.unwrap_or_else(|e| {
			warn!("ignoring build-time config: {e}");
			Self::default()
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn no_overrides_gives_defaults() {
		assert_eq!(AppConfig::with_overrides(None, None), Ok(AppConfig::default()));
		assert_eq!(
			AppConfig::with_overrides(Some("  "), Some("")),
			Ok(AppConfig::default())
		);
	}

	#[test]
	fn overrides_apply() {
		let c = AppConfig::with_overrides(Some("https://risk.example/api"), Some("2500")).unwrap();
		assert_eq!(c.risk_endpoint, "https://risk.example/api");
		assert_eq!(c.poll_interval, Duration::from_millis(2500));
		assert_eq!(c.tcn_fixed_score, 0.79);
	}

	#[test]
	fn bad_overrides_are_errors() {
		assert_eq!(
			AppConfig::with_overrides(None, Some("soon")),
			Err(ConfigError::BadPollInterval("soon".into()))
		);
		assert_eq!(
			AppConfig::with_overrides(None, Some("10")),
			Err(ConfigError::PollTooFast(10))
		);
		assert_eq!(
			AppConfig::with_overrides(Some("ftp://x"), None),
			Err(ConfigError::BadEndpoint("ftp://x".into()))
		);
	}
}
