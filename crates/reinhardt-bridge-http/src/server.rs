//! Serving handlers over hyper.
//!
//! Request bodies are buffered (up to a limit) before the handler runs, and
//! responses are sent as a single [`Full`] body, which is what bridge
//! injection needs anyway.

use crate::handler::{Handler, Request};
use bytes::Bytes;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::StatusCode;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::Service;
use hyper_util::rt::TokioIo;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};

/// Default maximum request body size (10 MB)
pub const DEFAULT_MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Service implementation for hyper
#[derive(Clone)]
pub struct HandlerService {
	handler: Arc<dyn Handler>,
	max_body_size: usize,
}

impl HandlerService {
	/// Creates a service for `handler` with the default body limit.
	pub fn new(handler: Arc<dyn Handler>) -> Self {
		Self {
			handler,
			max_body_size: DEFAULT_MAX_BODY_SIZE,
		}
	}

	/// Sets the maximum request body size in bytes.
	pub fn with_max_body_size(mut self, max_body_size: usize) -> Self {
		self.max_body_size = max_body_size;
		self
	}
}

impl Service<hyper::Request<Incoming>> for HandlerService {
	type Response = hyper::Response<Full<Bytes>>;
	type Error = BoxError;
	type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

	fn call(&self, req: hyper::Request<Incoming>) -> Self::Future {
		let handler = self.handler.clone();
		let max_body_size = self.max_body_size;

		Box::pin(async move {
			let (parts, body) = req.into_parts();

			let body = match Limited::new(body, max_body_size).collect().await {
				Ok(collected) => collected.to_bytes(),
				Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
					return Ok(plain_response(
						StatusCode::PAYLOAD_TOO_LARGE,
						"Request body too large",
					)?);
				}
				Err(e) => return Err(e),
			};

			let response = match handler.handle(Request::from_parts(parts, body)).await {
				Ok(response) => response,
				Err(e) => {
					tracing::error!(error = %e, "Handler failed");
					return Ok(plain_response(
						StatusCode::INTERNAL_SERVER_ERROR,
						"Internal Server Error",
					)?);
				}
			};

			let (parts, body) = response.into_parts();
			Ok(hyper::Response::from_parts(parts, Full::new(body)))
		})
	}
}

fn plain_response(
	status: StatusCode,
	message: &'static str,
) -> Result<hyper::Response<Full<Bytes>>, http::Error> {
	hyper::Response::builder()
		.status(status)
		.header(http::header::CONTENT_TYPE, "text/plain; charset=utf-8")
		.body(Full::new(Bytes::from_static(message.as_bytes())))
}

/// Serves one HTTP/1 connection.
pub async fn serve_connection(stream: TcpStream, handler: Arc<dyn Handler>) -> hyper::Result<()> {
	http1::Builder::new()
		.serve_connection(TokioIo::new(stream), HandlerService::new(handler))
		.await
}

/// Accepts connections from `listener` until accepting fails.
///
/// Each connection is served on its own task.
pub async fn serve(listener: TcpListener, handler: Arc<dyn Handler>) -> std::io::Result<()> {
	if let Ok(addr) = listener.local_addr() {
		tracing::info!("Serving on http://{}", addr);
	}

	loop {
		let (stream, peer) = listener.accept().await?;
		let handler = handler.clone();
		tokio::spawn(async move {
			if let Err(e) = serve_connection(stream, handler).await {
				tracing::debug!(%peer, error = %e, "Connection closed with error");
			}
		});
	}
}
