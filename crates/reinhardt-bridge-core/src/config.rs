//! Configuration shared by the server renderer and the client reader.
//!
//! Both sides must agree on the element id, so applications usually build a
//! single [`BridgeConfig`] (or load it from the environment) and hand it to
//! both the middleware and the hydration entry point.

use crate::error::{BridgeError, Result, validate_element_id};
use serde::{Deserialize, Serialize};
use std::env;

/// Default id of the `<script>` element carrying the blob.
pub const DEFAULT_ELEMENT_ID: &str = "__REINHARDT_BRIDGE__";

/// Default upper bound for the serialized blob (1 MiB).
pub const DEFAULT_MAX_BLOB_SIZE: usize = 1024 * 1024;

/// Environment variable overriding [`BridgeConfig::element_id`].
pub const ENV_ELEMENT_ID: &str = "REINHARDT_BRIDGE_ELEMENT_ID";

/// Environment variable overriding [`BridgeConfig::max_blob_size`].
pub const ENV_MAX_BLOB_SIZE: &str = "REINHARDT_BRIDGE_MAX_BLOB_SIZE";

/// Bridge configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
	/// The `id` attribute of the embedded `<script>` element.
	pub element_id: String,
	/// Maximum size of the serialized blob in bytes.
	pub max_blob_size: usize,
}

impl Default for BridgeConfig {
	fn default() -> Self {
		Self {
			element_id: DEFAULT_ELEMENT_ID.to_string(),
			max_blob_size: DEFAULT_MAX_BLOB_SIZE,
		}
	}
}

impl BridgeConfig {
	/// Creates the default configuration.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the element id.
	pub fn with_element_id(mut self, element_id: impl Into<String>) -> Self {
		self.element_id = element_id.into();
		self
	}

	/// Sets the maximum blob size in bytes.
	pub fn with_max_blob_size(mut self, max_blob_size: usize) -> Self {
		self.max_blob_size = max_blob_size;
		self
	}

	/// Load configuration from environment variables.
	///
	/// # Environment Variables
	///
	/// - `REINHARDT_BRIDGE_ELEMENT_ID`: element id (optional)
	/// - `REINHARDT_BRIDGE_MAX_BLOB_SIZE`: maximum blob size in bytes (optional)
	///
	/// Unset variables keep their defaults. The loaded configuration is
	/// validated before it is returned.
	pub fn from_env() -> Result<Self> {
		let mut config = Self::default();

		if let Some(element_id) = read_env(ENV_ELEMENT_ID)? {
			config.element_id = element_id;
		}

		if let Some(raw) = read_env(ENV_MAX_BLOB_SIZE)? {
			config.max_blob_size = raw.trim().parse::<usize>().map_err(|e| {
				BridgeError::Config(format!("Invalid {}: '{}' ({})", ENV_MAX_BLOB_SIZE, raw, e))
			})?;
		}

		config.validate()?;
		Ok(config)
	}

	/// Validates the configuration.
	pub fn validate(&self) -> Result<()> {
		validate_element_id(&self.element_id)?;
		if self.max_blob_size == 0 {
			return Err(BridgeError::Config(
				"max_blob_size must be greater than zero".to_string(),
			));
		}
		Ok(())
	}
}

fn read_env(name: &str) -> Result<Option<String>> {
	match env::var(name) {
		Ok(value) => Ok(Some(value)),
		Err(env::VarError::NotPresent) => Ok(None),
		Err(env::VarError::NotUnicode(_)) => Err(BridgeError::Config(format!(
			"{} is not valid Unicode",
			name
		))),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serial_test::serial;

	fn clear_env() {
		// SAFETY: callers are marked #[serial], no other thread touches these variables.
		unsafe {
			env::remove_var(ENV_ELEMENT_ID);
			env::remove_var(ENV_MAX_BLOB_SIZE);
		}
	}

	#[rstest]
	fn test_default_config() {
		let config = BridgeConfig::default();
		assert_eq!(config.element_id, "__REINHARDT_BRIDGE__");
		assert_eq!(config.max_blob_size, 1024 * 1024);
		assert!(config.validate().is_ok());
	}

	#[rstest]
	fn test_builder_setters() {
		let config = BridgeConfig::new()
			.with_element_id("page-data")
			.with_max_blob_size(64);
		assert_eq!(config.element_id, "page-data");
		assert_eq!(config.max_blob_size, 64);
	}

	#[rstest]
	fn test_validate_rejects_zero_size() {
		let config = BridgeConfig::new().with_max_blob_size(0);
		assert!(matches!(config.validate(), Err(BridgeError::Config(_))));
	}

	#[rstest]
	fn test_validate_rejects_bad_element_id() {
		let config = BridgeConfig::new().with_element_id("bad id");
		assert!(matches!(
			config.validate(),
			Err(BridgeError::InvalidIdentifier { .. })
		));
	}

	#[rstest]
	fn test_deserialize_partial_uses_defaults() {
		let config: BridgeConfig = serde_json::from_str(r#"{"element_id":"state"}"#).unwrap();
		assert_eq!(config.element_id, "state");
		assert_eq!(config.max_blob_size, DEFAULT_MAX_BLOB_SIZE);
	}

	#[rstest]
	#[serial(bridge_env)]
	fn test_from_env_defaults() {
		clear_env();
		let config = BridgeConfig::from_env().unwrap();
		assert_eq!(config, BridgeConfig::default());
	}

	#[rstest]
	#[serial(bridge_env)]
	fn test_from_env_overrides() {
		clear_env();
		// SAFETY: serialized with the other environment tests.
		unsafe {
			env::set_var(ENV_ELEMENT_ID, "custom-bridge");
			env::set_var(ENV_MAX_BLOB_SIZE, " 2048 ");
		}

		let config = BridgeConfig::from_env().unwrap();
		clear_env();

		assert_eq!(config.element_id, "custom-bridge");
		assert_eq!(config.max_blob_size, 2048);
	}

	#[rstest]
	#[serial(bridge_env)]
	fn test_from_env_invalid_size() {
		clear_env();
		// SAFETY: serialized with the other environment tests.
		unsafe {
			env::set_var(ENV_MAX_BLOB_SIZE, "lots");
		}

		let result = BridgeConfig::from_env();
		clear_env();

		assert!(matches!(result, Err(BridgeError::Config(msg)) if msg.contains("lots")));
	}

	#[rstest]
	#[serial(bridge_env)]
	fn test_from_env_invalid_element_id() {
		clear_env();
		// SAFETY: serialized with the other environment tests.
		unsafe {
			env::set_var(ENV_ELEMENT_ID, "\"><script>");
		}

		let result = BridgeConfig::from_env();
		clear_env();

		assert!(matches!(
			result,
			Err(BridgeError::InvalidIdentifier { .. })
		));
	}

	#[rstest]
	#[cfg(unix)]
	#[serial(bridge_env)]
	fn test_from_env_non_unicode_element_id() {
		use std::ffi::OsStr;
		use std::os::unix::ffi::OsStrExt;

		clear_env();
		// SAFETY: serialized with the other environment tests.
		unsafe {
			env::set_var(ENV_ELEMENT_ID, OsStr::from_bytes(b"bridge-\xff"));
		}

		let result = BridgeConfig::from_env();
		clear_env();

		match result {
			Err(BridgeError::Config(message)) => assert!(message.contains(ENV_ELEMENT_ID)),
			other => panic!("expected a config error, got {:?}", other),
		}
	}
}
