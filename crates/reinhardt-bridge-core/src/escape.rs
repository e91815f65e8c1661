//! Escaping for JSON embedded in `<script>` elements.

/// Escapes serialized JSON for safe embedding in an HTML `<script>` element.
///
/// HTML parsers do not understand JavaScript or JSON string context, so a
/// `</script>` inside a string value would close the element early and let
/// the rest of the value run as markup. `<`, `>` and `&` are replaced with
/// their `\uXXXX` JSON escapes, which also neutralises `<!--` and `]]>`.
/// U+2028 and U+2029 are escaped as well since some script parsers treat
/// them as line terminators.
///
/// These characters can only occur inside JSON string literals, where the
/// `\uXXXX` forms decode to the original characters, so the output is still
/// valid JSON that parses to the same value.
pub fn escape_json_for_script(json: &str) -> String {
	let mut escaped = String::with_capacity(json.len());
	for ch in json.chars() {
		match ch {
			'<' => escaped.push_str("\\u003c"),
			'>' => escaped.push_str("\\u003e"),
			'&' => escaped.push_str("\\u0026"),
			'\u{2028}' => escaped.push_str("\\u2028"),
			'\u{2029}' => escaped.push_str("\\u2029"),
			_ => escaped.push(ch),
		}
	}
	escaped
}
