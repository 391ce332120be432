//! Display string and link helpers used when shaping tokens.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

lazy_static! {
	// Anything that is not an ASCII word character or whitespace
	static ref NON_WORD: Regex = Regex::new(r"[^A-Za-z0-9_\s]").unwrap();
}

/// Shortens `value` to `limit` characters, strips non-word characters and trims it.
///
/// A `limit` of 0 keeps the whole string.
pub fn clean_display_string(value: &str, limit: usize) -> String {
	let shortened: String = if limit == 0 {
		value.to_string()
	} else {
		value.chars().take(limit).collect()
	};

	NON_WORD.replace_all(&shortened, "").trim().to_string()
}

/// Rewrites `ipfs://` links to `gateway`, leaving every other link untouched.
pub fn format_link_for_expose(link: &str, gateway: &str) -> String {
	let link = link.trim();
	let Some(path) = link.strip_prefix("ipfs://") else {
		return link.to_string();
	};
	let path = path.strip_prefix("ipfs/").unwrap_or(path);

	format!("{}/{}", gateway.trim_end_matches('/'), path)
}

/// Coerces raw decimals into a token's decimals.
///
/// Accepts non-negative JSON integers and strings holding a base-10 or `0x`
/// prefixed hexadecimal integer. Returns `None` for everything else, including
/// values that do not fit in a `u8`.
pub fn coerce_decimals(value: &Value) -> Option<u8> {
	let decimals = match value {
		Value::Number(number) => number.as_u64()?,
		Value::String(text) => {
			let text = text.trim();
			match text.strip_prefix("0x") {
				Some(hex) => u64::from_str_radix(hex, 16).ok()?,
				None => text.parse::<u64>().ok()?,
			}
		}
		_ => return None,
	};

	u8::try_from(decimals).ok()
}

/// Replaces every `{key}` placeholder of `template` with its value.
pub fn render_template(template: &str, values: &[(&str, &str)]) -> String {
	values
		.iter()
		.fold(template.to_string(), |rendered, (key, value)| {
			rendered.replace(&format!("{{{}}}", key), value)
		})
}
