//! Error types for the HTTP integration.

use reinhardt_bridge_core::BridgeError;

/// Errors raised while handling a request.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
	/// A bridge operation failed inside a handler.
	#[error(transparent)]
	Bridge(#[from] BridgeError),
	/// The handler failed for its own reasons.
	#[error("Handler failed: {0}")]
	Handler(#[source] Box<dyn std::error::Error + Send + Sync>),
	/// A response could not be assembled.
	#[error("Failed to build response: {0}")]
	Response(#[from] http::Error),
}

impl HttpError {
	/// Wraps an arbitrary handler error.
	pub fn handler(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
		Self::Handler(error.into())
	}
}

/// Result type for handlers and middleware.
pub type Result<T> = std::result::Result<T, HttpError>;

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_bridge_error_is_transparent() {
		let err = HttpError::from(BridgeError::NoScope);
		assert_eq!(err.to_string(), BridgeError::NoScope.to_string());
	}

	#[rstest]
	fn test_handler_error_from_string() {
		let err = HttpError::handler("database unavailable");
		assert_eq!(err.to_string(), "Handler failed: database unavailable");
	}
}
