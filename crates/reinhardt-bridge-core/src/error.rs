//! Error types for bridge operations.

/// Errors produced while storing, serializing or hydrating bridge data.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
	/// A server-side store operation ran outside of a request scope.
	#[error("No bridge scope is active for the current task")]
	NoScope,
	/// A value could not be converted to JSON.
	#[error("Failed to serialize value for bridge '{id}': {source}")]
	Serialize {
		/// The bridge identifier.
		id: String,
		/// The underlying serde error.
		#[source]
		source: serde_json::Error,
	},
	/// A hydrated value does not match the requested type.
	#[error("Failed to deserialize value for bridge '{id}': {source}")]
	Deserialize {
		/// The bridge identifier.
		id: String,
		/// The underlying serde error.
		#[source]
		source: serde_json::Error,
	},
	/// The embedded blob is not a JSON object.
	#[error("Invalid bridge blob: {0}")]
	InvalidBlob(String),
	/// The serialized blob exceeds the configured size limit.
	#[error("Bridge blob of {size} bytes exceeds the maximum of {max} bytes")]
	BlobTooLarge {
		/// Actual size in bytes.
		size: usize,
		/// Configured maximum in bytes.
		max: usize,
	},
	/// A bridge or element identifier is not usable.
	#[error("Invalid identifier '{id}': {reason}")]
	InvalidIdentifier {
		/// The offending identifier.
		id: String,
		/// Why it was rejected.
		reason: &'static str,
	},
	/// Configuration could not be loaded.
	#[error("Bridge configuration error: {0}")]
	Config(String),
}

/// Result type for bridge operations.
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Checks that an identifier is non-empty and free of control characters.
///
/// Bridge identifiers end up as JSON object keys, so any printable text is
/// accepted; element identifiers go through the stricter
/// [`validate_element_id`].
// Allow dead_code: only `Bridge::set` validates ids, and it is server-only
#[cfg_attr(target_arch = "wasm32", allow(dead_code))]
pub(crate) fn validate_bridge_id(id: &str) -> Result<()> {
	if id.is_empty() {
		return Err(BridgeError::InvalidIdentifier {
			id: id.to_string(),
			reason: "identifier is empty",
		});
	}
	if id.chars().any(char::is_control) {
		return Err(BridgeError::InvalidIdentifier {
			id: id.to_string(),
			reason: "identifier contains control characters",
		});
	}
	Ok(())
}

/// Checks that an element id can be written into an HTML attribute verbatim.
pub(crate) fn validate_element_id(id: &str) -> Result<()> {
	if id.is_empty() {
		return Err(BridgeError::InvalidIdentifier {
			id: id.to_string(),
			reason: "element id is empty",
		});
	}
	let allowed = |ch: char| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | ':' | '.');
	if !id.chars().all(allowed) {
		return Err(BridgeError::InvalidIdentifier {
			id: id.to_string(),
			reason: "element id may only contain ASCII alphanumerics, '_', '-', ':' or '.'",
		});
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("user")]
	#[case("page.title")]
	#[case("ユーザー")]
	#[case("with space")]
	fn test_valid_bridge_ids(#[case] id: &str) {
		assert!(validate_bridge_id(id).is_ok());
	}

	#[rstest]
	#[case("")]
	#[case("line\nbreak")]
	#[case("nul\0")]
	fn test_invalid_bridge_ids(#[case] id: &str) {
		assert!(matches!(
			validate_bridge_id(id),
			Err(BridgeError::InvalidIdentifier { .. })
		));
	}

	#[rstest]
	#[case("__REINHARDT_BRIDGE__", true)]
	#[case("bridge-data", true)]
	#[case("app:state.v1", true)]
	#[case("", false)]
	#[case("a b", false)]
	#[case("x\"onload=\"", false)]
	#[case("<script>", false)]
	fn test_element_id_validation(#[case] id: &str, #[case] valid: bool) {
		assert_eq!(validate_element_id(id).is_ok(), valid);
	}

	#[rstest]
	fn test_error_display() {
		let err = BridgeError::BlobTooLarge { size: 10, max: 5 };
		assert_eq!(
			err.to_string(),
			"Bridge blob of 10 bytes exceeds the maximum of 5 bytes"
		);
		assert_eq!(
			BridgeError::NoScope.to_string(),
			"No bridge scope is active for the current task"
		);
	}
}
