//! Handler and middleware traits for HTTP request processing.
//!
//! ## Handler
//!
//! ```rust,ignore
//! use reinhardt_bridge_http::{Handler, Request, Response, Result};
//! use async_trait::async_trait;
//!
//! struct HomePage;
//!
//! #[async_trait]
//! impl Handler for HomePage {
//!     async fn handle(&self, _request: Request) -> Result<Response> {
//!         Ok(http::Response::new("<html><body>home</body></html>".into()))
//!     }
//! }
//! ```
//!
//! ## Middleware
//!
//! Middleware wraps a handler to add cross-cutting concerns; see
//! [`BridgeMiddleware`](crate::BridgeMiddleware).

use crate::error::Result;
use async_trait::async_trait;
use bytes::Bytes;
use std::future::Future;
use std::sync::Arc;

/// An HTTP request with a fully buffered body.
pub type Request = http::Request<Bytes>;

/// An HTTP response with a fully buffered body.
pub type Response = http::Response<Bytes>;

/// Handler trait for processing requests.
#[async_trait]
pub trait Handler: Send + Sync {
	/// Handles an HTTP request and produces a response.
	///
	/// # Errors
	///
	/// Returns an error if the request cannot be processed.
	async fn handle(&self, request: Request) -> Result<Response>;
}

/// Blanket implementation for `Arc<T>` where T: Handler.
#[async_trait]
impl<T: Handler + ?Sized> Handler for Arc<T> {
	async fn handle(&self, request: Request) -> Result<Response> {
		(**self).handle(request).await
	}
}

/// Middleware trait for request/response processing.
#[async_trait]
pub trait Middleware: Send + Sync {
	/// Processes a request through this middleware.
	///
	/// # Arguments
	///
	/// * `request` - The incoming HTTP request
	/// * `next` - The next handler in the chain to call
	async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response>;

	/// Determines whether this middleware should run for the given request.
	///
	/// Defaults to `true`.
	fn should_continue(&self, _request: &Request) -> bool {
		true
	}
}

/// A handler built from an async closure.
pub struct FnHandler<F> {
	f: F,
}

#[async_trait]
impl<F, Fut> Handler for FnHandler<F>
where
	F: Fn(Request) -> Fut + Send + Sync,
	Fut: Future<Output = Result<Response>> + Send + 'static,
{
	async fn handle(&self, request: Request) -> Result<Response> {
		(self.f)(request).await
	}
}

/// Turns an async closure into a [`Handler`].
///
/// ```rust,ignore
/// let handler = handler_fn(|_request| async {
///     Ok(http::Response::new(Bytes::from_static(b"ok")))
/// });
/// ```
pub fn handler_fn<F, Fut>(f: F) -> FnHandler<F>
where
	F: Fn(Request) -> Fut + Send + Sync,
	Fut: Future<Output = Result<Response>> + Send + 'static,
{
	FnHandler { f }
}

/// Handler wrapped by a middleware, usable wherever a handler is.
pub struct Wrapped {
	middleware: Arc<dyn Middleware>,
	next: Arc<dyn Handler>,
}

impl Wrapped {
	/// Wraps `next` with `middleware`.
	pub fn new(middleware: Arc<dyn Middleware>, next: Arc<dyn Handler>) -> Self {
		Self { middleware, next }
	}
}

#[async_trait]
impl Handler for Wrapped {
	async fn handle(&self, request: Request) -> Result<Response> {
		if self.middleware.should_continue(&request) {
			self.middleware.process(request, self.next.clone()).await
		} else {
			self.next.handle(request).await
		}
	}
}
