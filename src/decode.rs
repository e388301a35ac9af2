//! Response decoder: success bodies into structured payloads, failures into short details.

// crates.io
use serde_json::Map;
// self
use crate::{
	_prelude::*,
	endpoint::{Endpoint, PageShape},
	http::ApiResponse,
};

const DETAIL_LIMIT: usize = 256;

/// Decoded success body plus pagination metadata for endpoints that page.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ApiPayload {
	/// Response body as opaque structured data.
	pub payload: Value,
	/// Pagination metadata; `None` for endpoints that never page.
	pub pagination: Option<Pagination>,
}

/// Pagination metadata extracted from a paginated response.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
	/// The service reported more results past this page.
	pub more: bool,
	/// Cursor to pass as `after` to fetch the next page, when more results exist.
	pub next_after: Option<u64>,
}

/// Well-formed HTTP success whose body does not have the expected structure.
#[derive(Debug, ThisError)]
pub enum DecodeError {
	/// The body is not valid JSON.
	#[error("Response body is not valid JSON.")]
	Json {
		/// Underlying parsing failure.
		#[source]
		source: serde_json::Error,
	},
	/// A field has the wrong type.
	#[error("Response field `{}` has an unexpected type.", .source.path())]
	Field {
		/// Structured parsing failure carrying the field path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// The body is valid JSON but not shaped like an API response.
	#[error("Expected {expected} but found {found}.")]
	UnexpectedShape {
		/// Description of the expected value.
		expected: &'static str,
		/// JSON type that was found instead.
		found: &'static str,
	},
}

#[derive(Deserialize)]
struct PageMarker {
	#[serde(default)]
	more: bool,
}

/// Decodes a 2xx response for `endpoint`.
///
/// `202 Accepted` and `204 No Content` decode to an empty object.
pub fn decode_success(endpoint: Endpoint, response: &ApiResponse) -> Result<ApiPayload, DecodeError> {
	let payload = if matches!(response.status, 202 | 204) {
		Value::Object(Map::new())
	} else {
		serde_json::from_slice::<Value>(&response.body)
			.map_err(|source| DecodeError::Json { source })?
	};

	if !payload.is_object() {
		return Err(DecodeError::UnexpectedShape {
			expected: "a JSON object",
			found: json_type(&payload),
		});
	}

	let pagination =
		endpoint.page_shape().map(|shape| extract_pagination(&payload, shape)).transpose()?;

	Ok(ApiPayload { payload, pagination })
}

/// Reads the `more` flag and, when set, the cursor of the last list entry.
pub fn extract_pagination(payload: &Value, shape: PageShape) -> Result<Pagination, DecodeError> {
	let marker: PageMarker = serde_path_to_error::deserialize(payload)
		.map_err(|source| DecodeError::Field { source })?;
	let entries = match payload.get(shape.list_key) {
		None | Some(Value::Null) => &[][..],
		Some(Value::Array(entries)) => entries.as_slice(),
		Some(other) =>
			return Err(DecodeError::UnexpectedShape {
				expected: "a result array",
				found: json_type(other),
			}),
	};
	let next_after = if marker.more {
		entries.last().and_then(|entry| entry.get(shape.cursor_field)).and_then(cursor_value)
	} else {
		None
	};

	Ok(Pagination { more: marker.more, next_after })
}

/// Extracts a short human-readable detail from an error response body.
///
/// Prefers the service's `error`/`Error` message or `errors` map; falls back to the raw
/// text. The result is truncated to 256 characters.
pub fn error_detail(body: &[u8]) -> String {
	let structured = serde_json::from_slice::<Value>(body).ok().and_then(|value| {
		let object = value.as_object()?;

		["error", "Error", "errors"]
			.into_iter()
			.find_map(|key| object.get(key).and_then(detail_text))
	});
	let detail = structured.unwrap_or_else(|| String::from_utf8_lossy(body).trim().to_owned());

	if detail.is_empty() {
		return "empty response body".into();
	}

	truncate(detail)
}

// Null, blank, and empty-container values carry no message.
fn detail_text(value: &Value) -> Option<String> {
	match value {
		Value::Null => None,
		Value::String(text) => Some(text.trim()).filter(|text| !text.is_empty()).map(str::to_owned),
		Value::Object(map) if map.is_empty() => None,
		Value::Array(items) if items.is_empty() => None,
		other => Some(other.to_string()),
	}
}

fn truncate(mut detail: String) -> String {
	if let Some((idx, _)) = detail.char_indices().nth(DETAIL_LIMIT) {
		detail.truncate(idx);
		detail.push('…');
	}

	detail
}

fn cursor_value(value: &Value) -> Option<u64> {
	match value {
		Value::Number(number) => number.as_u64(),
		Value::String(raw) => raw.parse().ok(),
		_ => None,
	}
}

fn json_type(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "a boolean",
		Value::Number(_) => "a number",
		Value::String(_) => "a string",
		Value::Array(_) => "an array",
		Value::Object(_) => "an object",
	}
}
