//! The key-value store behind every bridge.
//!
//! On the server a [`BridgeStore`] collects values for one request; on the
//! client the same type holds whatever hydration recovered from the page.

use crate::error::{BridgeError, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;

/// Bridge values indexed by identifier.
///
/// Entries are kept in key order so the rendered blob is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct BridgeStore {
	entries: BTreeMap<String, serde_json::Value>,
}

impl BridgeStore {
	/// Creates an empty store.
	pub fn new() -> Self {
		Self::default()
	}

	/// Serializes `value` and stores it under `id`.
	///
	/// Returns the previous value when the identifier was already set; the
	/// last write wins.
	pub fn insert(
		&mut self,
		id: impl Into<String>,
		value: impl Serialize,
	) -> Result<Option<serde_json::Value>> {
		let id = id.into();
		let json = serde_json::to_value(value).map_err(|source| BridgeError::Serialize {
			id: id.clone(),
			source,
		})?;
		Ok(self.insert_value(id, json))
	}

	/// Stores an already serialized value.
	pub fn insert_value(
		&mut self,
		id: impl Into<String>,
		value: serde_json::Value,
	) -> Option<serde_json::Value> {
		self.entries.insert(id.into(), value)
	}

	/// Gets a value by identifier.
	pub fn get(&self, id: &str) -> Option<&serde_json::Value> {
		self.entries.get(id)
	}

	/// Gets a value by identifier and deserializes it into `T`.
	pub fn get_as<T: DeserializeOwned>(&self, id: &str) -> Result<Option<T>> {
		self.entries
			.get(id)
			.map(|value| {
				T::deserialize(value).map_err(|source| BridgeError::Deserialize {
					id: id.to_string(),
					source,
				})
			})
			.transpose()
	}

	/// Removes a value, returning it if present.
	pub fn remove(&mut self, id: &str) -> Option<serde_json::Value> {
		self.entries.remove(id)
	}

	/// Checks whether an identifier is set.
	pub fn contains(&self, id: &str) -> bool {
		self.entries.contains_key(id)
	}

	/// Returns the number of entries.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Checks if the store is empty.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Iterates over the identifiers in key order.
	pub fn ids(&self) -> impl Iterator<Item = &str> {
		self.entries.keys().map(String::as_str)
	}

	/// Merges another store into this one. Entries from `other` win.
	pub fn merge(&mut self, other: BridgeStore) {
		self.entries.extend(other.entries);
	}

	/// Serializes the store to a JSON object.
	pub fn to_json(&self) -> Result<String> {
		serde_json::to_string(&self.entries)
			.map_err(|e| BridgeError::InvalidBlob(format!("Failed to serialize store: {}", e)))
	}

	/// Deserializes a store from a JSON object.
	pub fn from_json(json: &str) -> Result<Self> {
		let value: serde_json::Value = serde_json::from_str(json)
			.map_err(|e| BridgeError::InvalidBlob(format!("Malformed JSON: {}", e)))?;
		Self::from_value(value)
	}

	/// Builds a store from a parsed JSON value, which must be an object.
	pub fn from_value(value: serde_json::Value) -> Result<Self> {
		match value {
			serde_json::Value::Object(map) => Ok(Self {
				entries: map.into_iter().collect(),
			}),
			other => Err(BridgeError::InvalidBlob(format!(
				"Expected a JSON object, found {}",
				json_kind(&other)
			))),
		}
	}
}

fn json_kind(value: &serde_json::Value) -> &'static str {
	match value {
		serde_json::Value::Null => "null",
		serde_json::Value::Bool(_) => "a boolean",
		serde_json::Value::Number(_) => "a number",
		serde_json::Value::String(_) => "a string",
		serde_json::Value::Array(_) => "an array",
		serde_json::Value::Object(_) => "an object",
	}
}
