//! Reinhardt Bridge Core - SSR data handoff without re-fetching
//!
//! Values computed while a page renders on the server are collected in a
//! request-scoped store, embedded in the page as one JSON blob, and read back
//! once on the client.
//!
//! ## Architecture
//!
//! - [`bridge`]: typed [`Bridge`] handles with server `set` and client `get`
//! - [`scope`]: task-local request scope holding the server-side store
//! - [`store`]: the identifier → JSON mapping shared by both sides
//! - [`blob`]: `<script type="application/json">` rendering and extraction
//! - [`hydration`]: one-time client-side parse with a cached result
//! - [`config`]: element id and size limit, shared by server and client
//!
//! ## Example
//!
//! ```ignore
//! use reinhardt_bridge_core::{Bridge, BridgeConfig, render_into_html, with_bridge_scope};
//!
//! static GREETING: Bridge<String> = Bridge::new_static("greeting", String::new());
//!
//! // Server
//! let (html, store) = with_bridge_scope(async {
//!     GREETING.set(&"Hello from the server".to_string())?;
//!     Ok::<_, reinhardt_bridge_core::BridgeError>(render_app())
//! })
//! .await;
//! let page = render_into_html(&html?, &store, &BridgeConfig::default())?;
//!
//! // Client
//! let greeting = GREETING.get();
//! ```
//!
//! Values must be JSON-serializable. The blob is written once per response
//! and never updated afterwards.

#![warn(missing_docs)]

pub mod blob;
pub mod bridge;
pub mod config;
pub mod error;
pub mod escape;
pub mod hydration;
#[cfg(not(target_arch = "wasm32"))]
pub mod scope;
pub mod store;

pub use blob::{
	BLOB_CONTENT_TYPE, decode_blob, extract_blob, inject_script_tag, render_into_html,
	render_script_tag,
};
pub use bridge::{Bridge, create_bridge};
pub use config::BridgeConfig;
pub use error::{BridgeError, Result};
pub use escape::escape_json_for_script;
#[cfg(target_arch = "wasm32")]
pub use hydration::DocumentSource;
pub use hydration::{
	BlobSource, EmptySource, HtmlSource, HydrationOutcome, hydrate, hydrate_from_html,
	hydrate_with, hydrated_value, hydration_outcome, is_hydrated, reset_hydration,
};
#[cfg(not(target_arch = "wasm32"))]
pub use scope::{in_scope, with_bridge_scope, with_bridge_scope_sync, with_store};
pub use store::BridgeStore;
