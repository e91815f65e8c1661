//! # Reinhardt Bridge
//!
//! Hand values computed during server-side rendering to the client without a
//! second round trip.
//!
//! A [`Bridge`] is a typed, named slot with a default. On the server, code
//! running inside a request scope calls [`Bridge::set`]; once the page is
//! rendered the collected values are embedded as a JSON blob inside a
//! `<script>` element. On the client, the blob is read once and every
//! [`Bridge::get`] returns the server's value, or the default when the page
//! carried nothing usable.
//!
//! ## Server
//!
//! ```rust,ignore
//! use reinhardt_bridge::{Bridge, BridgeConfig, render_into_html, with_bridge_scope};
//!
//! static USER_NAME: Bridge<String> = Bridge::new_static("user_name", String::new());
//!
//! let (html, store) = with_bridge_scope(async {
//!     USER_NAME.set(&"alice".to_string())?;
//!     Ok::<_, reinhardt_bridge::BridgeError>(render_page())
//! })
//! .await;
//! let page = render_into_html(&html?, &store, &BridgeConfig::default())?;
//! ```
//!
//! With the `http` feature (enabled by default), [`http::BridgeMiddleware`]
//! does the scoping and embedding for every HTML response.
//!
//! ## Client
//!
//! ```rust,ignore
//! use reinhardt_bridge::{Bridge, hydrate};
//!
//! static USER_NAME: Bridge<String> = Bridge::new_static("user_name", String::new());
//!
//! hydrate();
//! assert_eq!(USER_NAME.get(), "alice");
//! ```
//!
//! ## Feature Flags
//!
//! - `http` (default) - request middleware and hyper server integration

pub use reinhardt_bridge_core::*;

/// HTTP middleware and server integration.
#[cfg(all(feature = "http", not(target_arch = "wasm32")))]
pub mod http {
	pub use reinhardt_bridge_http::*;
}
