//! Bridge middleware
//!
//! Runs every request inside its own bridge scope and embeds the collected
//! values into HTML responses:
//!
//! - A fresh store per request, so `Bridge::set` works anywhere in the handler
//! - Only `text/html` responses are touched
//! - Responses that carry no body (`HEAD`, 1xx, 204, 304) are left alone
//! - Responses from handlers that set nothing pass through unchanged
//! - `Content-Length` is rewritten after injection

use crate::error::Result;
use crate::handler::{Handler, Middleware, Request, Response, Wrapped};
use async_trait::async_trait;
use bytes::Bytes;
use http::header::{CONTENT_LENGTH, CONTENT_TYPE, HeaderValue};
use http::{Method, StatusCode};
use reinhardt_bridge_core::{BridgeConfig, BridgeStore, render_into_html, with_bridge_scope};
use std::sync::Arc;

/// Middleware that scopes bridge data to a request and embeds it in the page.
#[derive(Debug, Clone, Default)]
pub struct BridgeMiddleware {
	config: BridgeConfig,
}

impl BridgeMiddleware {
	/// Creates a middleware with the default configuration.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a middleware with a custom configuration.
	pub fn with_config(config: BridgeConfig) -> Self {
		Self { config }
	}

	/// Returns the configuration.
	pub fn config(&self) -> &BridgeConfig {
		&self.config
	}

	/// Wraps a handler so every request it serves runs inside a bridge scope.
	pub fn wrap(self, handler: Arc<dyn Handler>) -> Wrapped {
		Wrapped::new(Arc::new(self), handler)
	}

	/// Embeds the store into an HTML response.
	///
	/// `method` is the method of the request being answered. Non-HTML
	/// responses, responses without a body, empty stores and bodies that are
	/// not UTF-8 are returned as they are. If the blob cannot be rendered (for
	/// example it exceeds the size limit) the page is sent without it and the
	/// client falls back to defaults.
	pub fn embed(&self, method: &Method, response: Response, store: &BridgeStore) -> Response {
		if store.is_empty() || !allows_body(method, response.status()) || !is_html(&response) {
			return response;
		}

		let (mut parts, body) = response.into_parts();
		let Ok(html) = std::str::from_utf8(&body) else {
			tracing::warn!(
				entries = store.len(),
				"HTML response body is not valid UTF-8, skipping bridge blob"
			);
			return Response::from_parts(parts, body);
		};

		match render_into_html(html, store, &self.config) {
			Ok(page) => {
				parts
					.headers
					.insert(CONTENT_LENGTH, HeaderValue::from(page.len()));
				Response::from_parts(parts, Bytes::from(page))
			}
			Err(e) => {
				tracing::warn!(error = %e, "Failed to render bridge blob, sending page without it");
				Response::from_parts(parts, body)
			}
		}
	}
}

#[async_trait]
impl Middleware for BridgeMiddleware {
	async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response> {
		let method = request.method().clone();
		let (result, store) = with_bridge_scope(next.handle(request)).await;
		let response = result?;
		Ok(self.embed(&method, response, &store))
	}
}

fn allows_body(method: &Method, status: StatusCode) -> bool {
	method != Method::HEAD
		&& !status.is_informational()
		&& status != StatusCode::NO_CONTENT
		&& status != StatusCode::NOT_MODIFIED
}

fn is_html(response: &Response) -> bool {
	response
		.headers()
		.get(CONTENT_TYPE)
		.and_then(|value| value.to_str().ok())
		.and_then(|value| value.split(';').next())
		.is_some_and(|mime| mime.trim().eq_ignore_ascii_case("text/html"))
}
