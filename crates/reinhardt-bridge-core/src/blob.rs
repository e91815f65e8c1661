//! The serialization blob: one JSON document embedded in the rendered page.
//!
//! The server writes the blob as
//!
//! ```html
//! <script id="__REINHARDT_BRIDGE__" type="application/json">{"user":{"name":"alice"}}</script>
//! ```
//!
//! and the client reads it back by element id. The `application/json` type
//! keeps browsers from executing the content.

use crate::config::BridgeConfig;
use crate::error::{BridgeError, Result};
use crate::escape::escape_json_for_script;
use crate::store::BridgeStore;

/// MIME type written on the blob's `<script>` element.
pub const BLOB_CONTENT_TYPE: &str = "application/json";

/// Renders the store as a `<script>` element.
///
/// # Errors
///
/// Returns [`BridgeError::BlobTooLarge`] when the escaped JSON exceeds
/// `config.max_blob_size`, or a validation error for a bad element id.
pub fn render_script_tag(store: &BridgeStore, config: &BridgeConfig) -> Result<String> {
	config.validate()?;

	let json = escape_json_for_script(&store.to_json()?);
	if json.len() > config.max_blob_size {
		return Err(BridgeError::BlobTooLarge {
			size: json.len(),
			max: config.max_blob_size,
		});
	}

	tracing::debug!(
		entries = store.len(),
		bytes = json.len(),
		element_id = %config.element_id,
		"Rendered bridge blob"
	);

	Ok(format!(
		r#"<script id="{}" type="{}">{}</script>"#,
		config.element_id, BLOB_CONTENT_TYPE, json
	))
}

/// Inserts `tag` right before the last `</body>` of `html`.
///
/// The match is ASCII case-insensitive. Documents without a closing body tag
/// get the tag appended at the end.
pub fn inject_script_tag(html: &str, tag: &str) -> String {
	let mut out = String::with_capacity(html.len() + tag.len());
	match rfind_ascii_ci(html, "</body") {
		Some(index) => {
			out.push_str(&html[..index]);
			out.push_str(tag);
			out.push_str(&html[index..]);
		}
		None => {
			out.push_str(html);
			out.push_str(tag);
		}
	}
	out
}

/// Renders the store and injects it into `html`.
///
/// An empty store leaves the document untouched.
pub fn render_into_html(html: &str, store: &BridgeStore, config: &BridgeConfig) -> Result<String> {
	if store.is_empty() {
		return Ok(html.to_string());
	}
	let tag = render_script_tag(store, config)?;
	Ok(inject_script_tag(html, &tag))
}

/// Finds the text content of the `<script>` element whose `id` is `element_id`.
///
/// Tag and attribute names are matched case-insensitively; attribute values
/// may be double-quoted, single-quoted or unquoted. Elements inside HTML
/// comments are ignored. Returns `None` when no such element exists or it is
/// never closed.
pub fn extract_blob<'a>(html: &'a str, element_id: &str) -> Option<&'a str> {
	let bytes = html.as_bytes();
	let mut pos = 0;

	while let Some(start) = find_ascii_ci(html, pos, "<script") {
		if let Some(comment) = html[pos..start].find("<!--") {
			// An unterminated comment runs to the end of the document.
			let body = pos + comment + "<!--".len();
			pos = body + html[body..].find("-->")? + "-->".len();
			continue;
		}

		let after_name = start + "<script".len();
		match bytes.get(after_name) {
			Some(b) if b.is_ascii_whitespace() || *b == b'>' || *b == b'/' => {}
			_ => {
				// `<scripts>` or similar; not our element.
				pos = after_name;
				continue;
			}
		}

		let (attrs, tag_end) = parse_attributes(html, after_name)?;
		let content_start = tag_end + 1;
		let content_end = find_ascii_ci(html, content_start, "</script")?;

		let is_target = attrs
			.iter()
			.any(|(name, value)| name.eq_ignore_ascii_case("id") && *value == Some(element_id));
		if is_target {
			return Some(&html[content_start..content_end]);
		}
		pos = content_end;
	}

	None
}

/// Parses blob text into a store.
///
/// Surrounding whitespace is ignored. The top level must be a JSON object.
pub fn decode_blob(text: &str, config: &BridgeConfig) -> Result<BridgeStore> {
	let text = text.trim();
	if text.len() > config.max_blob_size {
		return Err(BridgeError::BlobTooLarge {
			size: text.len(),
			max: config.max_blob_size,
		});
	}
	BridgeStore::from_json(text)
}

type Attributes<'a> = Vec<(&'a str, Option<&'a str>)>;

/// Parses tag attributes starting at `from`; returns them with the index of the closing `>`.
fn parse_attributes(html: &str, from: usize) -> Option<(Attributes<'_>, usize)> {
	let bytes = html.as_bytes();
	let mut attrs = Vec::new();
	let mut i = from;

	loop {
		while i < bytes.len() && (bytes[i].is_ascii_whitespace() || bytes[i] == b'/') {
			i += 1;
		}
		if *bytes.get(i)? == b'>' {
			return Some((attrs, i));
		}

		let name_start = i;
		while i < bytes.len()
			&& !bytes[i].is_ascii_whitespace()
			&& !matches!(bytes[i], b'=' | b'>' | b'/')
		{
			i += 1;
		}
		let name = &html[name_start..i];

		while i < bytes.len() && bytes[i].is_ascii_whitespace() {
			i += 1;
		}
		if bytes.get(i) != Some(&b'=') {
			attrs.push((name, None));
			continue;
		}
		i += 1;
		while i < bytes.len() && bytes[i].is_ascii_whitespace() {
			i += 1;
		}

		let value = match *bytes.get(i)? {
			quote @ (b'"' | b'\'') => {
				let value_start = i + 1;
				let len = bytes[value_start..].iter().position(|&c| c == quote)?;
				i = value_start + len + 1;
				&html[value_start..value_start + len]
			}
			_ => {
				let value_start = i;
				while i < bytes.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>' {
					i += 1;
				}
				&html[value_start..i]
			}
		};
		attrs.push((name, Some(value)));
	}
}

fn find_ascii_ci(haystack: &str, from: usize, needle: &str) -> Option<usize> {
	let needle = needle.as_bytes();
	haystack
		.as_bytes()
		.get(from..)?
		.windows(needle.len())
		.position(|window| window.eq_ignore_ascii_case(needle))
		.map(|offset| offset + from)
}

fn rfind_ascii_ci(haystack: &str, needle: &str) -> Option<usize> {
	let needle = needle.as_bytes();
	haystack
		.as_bytes()
		.windows(needle.len())
		.rposition(|window| window.eq_ignore_ascii_case(needle))
}
