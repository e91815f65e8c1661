//! Typed bridges between the server render pass and the client.

use crate::error::Result;
use crate::hydration::with_hydrated_store;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::borrow::Cow;

/// A named channel carrying one value from server rendering to the client.
///
/// The server calls [`set`](Self::set) while rendering a request. The client
/// calls [`get`](Self::get), which hydrates the page's blob on first use and
/// falls back to the default when nothing usable was sent.
///
/// # Example
///
/// ```ignore
/// use reinhardt_bridge_core::Bridge;
///
/// static CURRENT_USER: Bridge<Option<String>> = Bridge::new_static("current-user", None);
///
/// // server, inside a request scope
/// CURRENT_USER.set(&Some("alice".to_string()))?;
///
/// // client
/// let user = CURRENT_USER.get();
/// ```
#[derive(Debug, Clone)]
pub struct Bridge<T> {
	id: Cow<'static, str>,
	default: T,
}

impl<T> Bridge<T>
where
	T: Serialize + DeserializeOwned + Clone,
{
	/// Creates a bridge with an identifier and a default value.
	pub fn new(id: impl Into<Cow<'static, str>>, default: T) -> Self {
		Self {
			id: id.into(),
			default,
		}
	}

	/// Returns the identifier.
	pub fn id(&self) -> &str {
		&self.id
	}

	/// Returns the default value.
	pub fn default_value(&self) -> &T {
		&self.default
	}

	/// Stores `value` in the current request's store.
	///
	/// Setting the same bridge twice in one request keeps the last value.
	///
	/// # Errors
	///
	/// - [`BridgeError::NoScope`] outside of a request scope
	/// - [`BridgeError::Serialize`] if the value is not representable as JSON
	/// - [`BridgeError::InvalidIdentifier`] for an empty or control-character id
	///
	/// [`BridgeError::NoScope`]: crate::BridgeError::NoScope
	/// [`BridgeError::Serialize`]: crate::BridgeError::Serialize
	/// [`BridgeError::InvalidIdentifier`]: crate::BridgeError::InvalidIdentifier
	#[cfg(not(target_arch = "wasm32"))]
	pub fn set(&self, value: &T) -> Result<()> {
		crate::error::validate_bridge_id(&self.id)?;
		let previous = crate::scope::with_store(|store| store.insert(self.id.as_ref(), value))??;
		if previous.is_some() {
			tracing::debug!(bridge = %self.id, "Bridge value overwritten in this request");
		}
		Ok(())
	}

	/// Reads the value set so far in the current request.
	///
	/// Returns `None` outside of a scope, when nothing was set, or when the
	/// stored value does not deserialize into `T`.
	#[cfg(not(target_arch = "wasm32"))]
	pub fn server_value(&self) -> Option<T> {
		crate::scope::with_store(|store| store.get_as::<T>(&self.id).ok().flatten())
			.ok()
			.flatten()
	}

	/// Returns the hydrated value, or a clone of the default.
	///
	/// The default is used when the blob was absent or unparsable, the
	/// identifier was never set on the server, or the value does not match `T`.
	pub fn get(&self) -> T {
		self.resolve(|| self.default.clone())
	}

	/// Like [`get`](Self::get) but with a per-call fallback.
	pub fn get_or(&self, fallback: T) -> T {
		self.resolve(|| fallback)
	}

	fn resolve(&self, fallback: impl FnOnce() -> T) -> T {
		match self.try_get() {
			Ok(Some(value)) => value,
			Ok(None) => fallback(),
			Err(e) => {
				tracing::warn!(bridge = %self.id, error = %e, "Falling back to default bridge value");
				fallback()
			}
		}
	}

	/// Returns the hydrated value, distinguishing "absent" from "wrong type".
	///
	/// # Errors
	///
	/// Returns [`BridgeError::Deserialize`](crate::BridgeError::Deserialize)
	/// when a value exists but does not match `T`.
	pub fn try_get(&self) -> Result<Option<T>> {
		with_hydrated_store(|store| store.get_as::<T>(&self.id))
	}
}

impl<T> Bridge<T> {
	/// Creates a bridge usable in a `static`.
	pub const fn new_static(id: &'static str, default: T) -> Self {
		Self {
			id: Cow::Borrowed(id),
			default,
		}
	}
}

/// Creates a bridge. Shorthand for [`Bridge::new`].
pub fn create_bridge<T>(id: impl Into<Cow<'static, str>>, default: T) -> Bridge<T>
where
	T: Serialize + DeserializeOwned + Clone,
{
	Bridge::new(id, default)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::BridgeConfig;
	use crate::error::BridgeError;
	use crate::hydration::{hydrate_with, reset_hydration};
	use rstest::rstest;
	use serde::Deserialize;

	#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
	struct Profile {
		name: String,
		visits: u32,
	}

	struct Blob(&'static str);

	impl crate::hydration::BlobSource for Blob {
		fn read_blob(&self, _element_id: &str) -> Option<String> {
			Some(self.0.to_string())
		}
	}

	static THEME: Bridge<String> = Bridge::new_static("theme", String::new());

	#[rstest]
	fn test_bridge_accessors() {
		let bridge = create_bridge("count", 0_i64);
		assert_eq!(bridge.id(), "count");
		assert_eq!(*bridge.default_value(), 0);
		assert_eq!(THEME.id(), "theme");
	}

	#[cfg(not(target_arch = "wasm32"))]
	mod server {
		use super::*;
		use crate::scope::{with_bridge_scope, with_bridge_scope_sync};
		use serde_json::json;

		#[rstest]
		fn test_set_outside_scope() {
			let bridge = create_bridge("count", 0_i64);
			assert!(matches!(bridge.set(&1), Err(BridgeError::NoScope)));
			assert_eq!(bridge.server_value(), None);
		}

		#[rstest]
		#[tokio::test]
		async fn test_set_inside_scope() {
			let bridge = create_bridge(
				"profile",
				Profile {
					name: String::new(),
					visits: 0,
				},
			);
			let profile = Profile {
				name: "alice".to_string(),
				visits: 3,
			};

			let (seen, store) = with_bridge_scope(async {
				bridge.set(&profile).unwrap();
				bridge.server_value()
			})
			.await;

			assert_eq!(seen, Some(profile));
			assert_eq!(store.get("profile"), Some(&json!({"name": "alice", "visits": 3})));
		}

		#[rstest]
		fn test_set_twice_keeps_last() {
			let ((), store) = with_bridge_scope_sync(|| {
				THEME.set(&"light".to_string()).unwrap();
				THEME.set(&"dark".to_string()).unwrap();
			});
			assert_eq!(store.get("theme"), Some(&json!("dark")));
		}

		#[rstest]
		fn test_set_rejects_empty_id() {
			let bridge = create_bridge("", 0_u8);
			let (result, store) = with_bridge_scope_sync(|| bridge.set(&1));
			assert!(matches!(result, Err(BridgeError::InvalidIdentifier { .. })));
			assert!(store.is_empty());
		}

		#[rstest]
		fn test_set_rejects_non_json_value() {
			let keyed = create_bridge(
				"keyed",
				std::collections::BTreeMap::<(u8, u8), u8>::new(),
			);
			let mut value = std::collections::BTreeMap::new();
			value.insert((1, 2), 3);

			let (result, store) = with_bridge_scope_sync(|| keyed.set(&value));

			assert!(matches!(result, Err(BridgeError::Serialize { id, .. }) if id == "keyed"));
			assert!(store.is_empty());
		}
	}

	#[rstest]
	fn test_get_hydrated_value() {
		reset_hydration();
		hydrate_with(
			&Blob(r#"{"profile":{"name":"bob","visits":9}}"#),
			&BridgeConfig::default(),
		);
		let bridge = create_bridge(
			"profile",
			Profile {
				name: "guest".to_string(),
				visits: 0,
			},
		);

		assert_eq!(
			bridge.get(),
			Profile {
				name: "bob".to_string(),
				visits: 9
			}
		);
	}

	#[rstest]
	fn test_get_missing_id_uses_default() {
		reset_hydration();
		hydrate_with(&Blob(r#"{"other":1}"#), &BridgeConfig::default());
		let bridge = create_bridge("count", 42_i32);

		assert_eq!(bridge.get(), 42);
		assert_eq!(bridge.get_or(7), 7);
		assert_eq!(bridge.try_get().unwrap(), None);
	}

	#[rstest]
	fn test_get_type_mismatch_uses_default() {
		reset_hydration();
		hydrate_with(&Blob(r#"{"count":"many"}"#), &BridgeConfig::default());
		let bridge = create_bridge("count", 42_i32);

		assert_eq!(bridge.get(), 42);
		assert!(matches!(
			bridge.try_get(),
			Err(BridgeError::Deserialize { id, .. }) if id == "count"
		));
	}

	#[rstest]
	fn test_get_unparsable_blob_uses_default() {
		reset_hydration();
		hydrate_with(&Blob("<not json>"), &BridgeConfig::default());
		let bridge = create_bridge("count", 1_i32);
		assert_eq!(bridge.get(), 1);
	}

	#[rstest]
	fn test_get_without_any_blob_uses_default() {
		reset_hydration();
		let bridge = create_bridge("flags", vec!["a".to_string()]);
		assert_eq!(bridge.get(), vec!["a".to_string()]);
	}

	#[rstest]
	fn test_get_null_for_option_is_none() {
		reset_hydration();
		hydrate_with(&Blob(r#"{"user":null}"#), &BridgeConfig::default());
		let bridge = create_bridge("user", Some("fallback".to_string()));
		assert_eq!(bridge.get(), None);
	}

	#[derive(Debug, PartialEq, Serialize, Deserialize)]
	struct Counted(u32);

	thread_local! {
		static CLONES: std::cell::Cell<usize> = const { std::cell::Cell::new(0) };
	}

	impl Clone for Counted {
		fn clone(&self) -> Self {
			CLONES.with(|clones| clones.set(clones.get() + 1));
			Self(self.0)
		}
	}

	#[rstest]
	fn test_get_clones_default_only_on_fallback() {
		reset_hydration();
		hydrate_with(&Blob(r#"{"counted":5}"#), &BridgeConfig::default());
		let present = create_bridge("counted", Counted(0));
		let absent = create_bridge("missing", Counted(0));
		CLONES.with(|clones| clones.set(0));

		assert_eq!(present.get(), Counted(5));
		assert_eq!(CLONES.with(|clones| clones.get()), 0);

		assert_eq!(absent.get(), Counted(0));
		assert_eq!(CLONES.with(|clones| clones.get()), 1);
	}
}
