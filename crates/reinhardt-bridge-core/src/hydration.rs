//! Client-side hydration of bridge data.
//!
//! Hydration locates the serialization blob and parses it exactly once. The
//! result is cached for the rest of the client session and every
//! [`Bridge::get`] afterwards is a map lookup. A missing or unparsable blob
//! is not an error: the cache holds an empty mapping and accessors return
//! their defaults.
//!
//! The cache is thread-local. In the browser everything runs on the main
//! thread, so this is one cache per page.
//!
//! [`Bridge::get`]: crate::Bridge::get

use crate::blob::{decode_blob, extract_blob};
use crate::config::BridgeConfig;
use crate::store::BridgeStore;
use std::cell::RefCell;
use std::rc::Rc;

/// Somewhere the serialized blob can be read from.
pub trait BlobSource {
	/// Returns the raw text of the element with the given id, if present.
	fn read_blob(&self, element_id: &str) -> Option<String>;
}

/// Reads the blob out of an HTML document string.
#[derive(Debug, Clone, Copy)]
pub struct HtmlSource<'a> {
	html: &'a str,
}

impl<'a> HtmlSource<'a> {
	/// Wraps an HTML document.
	pub fn new(html: &'a str) -> Self {
		Self { html }
	}
}

impl BlobSource for HtmlSource<'_> {
	fn read_blob(&self, element_id: &str) -> Option<String> {
		extract_blob(self.html, element_id).map(str::to_string)
	}
}

/// A source with nothing in it. Every bridge falls back to its default.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptySource;

impl BlobSource for EmptySource {
	fn read_blob(&self, _element_id: &str) -> Option<String> {
		None
	}
}

/// Reads the blob from the live browser document.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentSource;

#[cfg(target_arch = "wasm32")]
impl BlobSource for DocumentSource {
	fn read_blob(&self, element_id: &str) -> Option<String> {
		web_sys::window()?
			.document()?
			.get_element_by_id(element_id)?
			.text_content()
	}
}

/// What the one-time hydration found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HydrationOutcome {
	/// The blob was parsed; holds the number of entries.
	Loaded(usize),
	/// No blob was present in the source.
	Missing,
	/// A blob was present but could not be parsed.
	Invalid(String),
}

impl HydrationOutcome {
	/// Checks whether hydration recovered a blob.
	pub fn is_loaded(&self) -> bool {
		matches!(self, Self::Loaded(_))
	}
}

#[derive(Debug)]
struct Hydration {
	store: Rc<BridgeStore>,
	outcome: HydrationOutcome,
}

thread_local! {
	static HYDRATION: RefCell<Option<Hydration>> = const { RefCell::new(None) };
}

/// Hydrates from `source` unless hydration already happened.
///
/// The first call reads and parses the blob; every later call returns the
/// cached outcome without touching any source, including after a first
/// attempt that found nothing.
pub fn hydrate_with(source: &dyn BlobSource, config: &BridgeConfig) -> HydrationOutcome {
	if let Some(outcome) = hydration_outcome() {
		return outcome;
	}

	let (store, outcome) = load(source, config);
	HYDRATION.with(|cell| {
		*cell.borrow_mut() = Some(Hydration {
			store: Rc::new(store),
			outcome: outcome.clone(),
		});
	});
	outcome
}

/// Hydrates from the platform's default source with the default config.
///
/// In the browser this reads the live document. Elsewhere there is no
/// document to read, so every bridge falls back to its default unless
/// [`hydrate_with`] or [`hydrate_from_html`] ran first.
pub fn hydrate() -> HydrationOutcome {
	hydrate_with(&default_source(), &BridgeConfig::default())
}

/// Hydrates from an HTML document string.
pub fn hydrate_from_html(html: &str, config: &BridgeConfig) -> HydrationOutcome {
	hydrate_with(&HtmlSource::new(html), config)
}

/// Checks whether hydration has happened on this thread.
pub fn is_hydrated() -> bool {
	HYDRATION.with(|cell| cell.borrow().is_some())
}

/// Returns the cached outcome, or `None` before hydration.
pub fn hydration_outcome() -> Option<HydrationOutcome> {
	HYDRATION.with(|cell| cell.borrow().as_ref().map(|h| h.outcome.clone()))
}

/// Looks up a hydrated value, hydrating first if needed.
pub fn hydrated_value(id: &str) -> Option<serde_json::Value> {
	with_hydrated_store(|store| store.get(id).cloned())
}

/// Clears the cache so the next access hydrates again.
///
/// Meant for tests and for hosts that reuse one thread across several
/// independent documents.
pub fn reset_hydration() {
	HYDRATION.with(|cell| {
		cell.borrow_mut().take();
	});
}

/// Runs `f` against the hydrated store, hydrating from the default source first if needed.
pub(crate) fn with_hydrated_store<R>(f: impl FnOnce(&BridgeStore) -> R) -> R {
	if !is_hydrated() {
		hydrate();
	}
	let store = HYDRATION
		.with(|cell| cell.borrow().as_ref().map(|h| Rc::clone(&h.store)))
		.unwrap_or_default();
	f(&store)
}

fn load(source: &dyn BlobSource, config: &BridgeConfig) -> (BridgeStore, HydrationOutcome) {
	let Some(text) = source.read_blob(&config.element_id) else {
		tracing::debug!(
			element_id = %config.element_id,
			"No bridge blob found, bridges will use their defaults"
		);
		return (BridgeStore::new(), HydrationOutcome::Missing);
	};

	match decode_blob(&text, config) {
		Ok(store) => {
			tracing::debug!(entries = store.len(), "Hydrated bridge blob");
			let count = store.len();
			(store, HydrationOutcome::Loaded(count))
		}
		Err(e) => {
			tracing::warn!(
				element_id = %config.element_id,
				error = %e,
				"Failed to parse bridge blob, bridges will use their defaults"
			);
			(BridgeStore::new(), HydrationOutcome::Invalid(e.to_string()))
		}
	}
}

#[cfg(target_arch = "wasm32")]
fn default_source() -> DocumentSource {
	DocumentSource
}

#[cfg(not(target_arch = "wasm32"))]
fn default_source() -> EmptySource {
	EmptySource
}
