//! # Reinhardt Bridge HTTP
//!
//! Request-scoped bridge data for HTTP handlers.
//!
//! [`BridgeMiddleware`] opens a fresh bridge scope for every request, lets the
//! handler set values through `Bridge::set`, then embeds them as a JSON blob in
//! the HTML response. [`server`] serves any [`Handler`] over hyper.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use reinhardt_bridge_core::Bridge;
//! use reinhardt_bridge_http::{BridgeMiddleware, HttpError, Request, handler_fn, server};
//! use std::sync::Arc;
//!
//! static GREETING: Bridge<String> = Bridge::new_static("greeting", String::new());
//!
//! let page = handler_fn(|_request: Request| async {
//!     GREETING.set(&"hello".to_string())?;
//!     Ok::<_, HttpError>(
//!         http::Response::builder()
//!             .header("content-type", "text/html")
//!             .body("<html><body></body></html>".into())?,
//!     )
//! });
//!
//! let app = BridgeMiddleware::new().wrap(Arc::new(page));
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8000").await?;
//! server::serve(listener, Arc::new(app)).await?;
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod handler;
pub mod middleware;
pub mod server;

pub use error::{HttpError, Result};
pub use handler::{FnHandler, Handler, Middleware, Request, Response, Wrapped, handler_fn};
pub use middleware::BridgeMiddleware;
pub use server::{DEFAULT_MAX_BODY_SIZE, HandlerService, serve, serve_connection};
