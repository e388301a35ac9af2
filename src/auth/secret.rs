//! API key wrapper that redacts sensitive material.

// self
use crate::{
	_prelude::*,
	auth::{CredentialError, id},
};

/// Redacted GoatCounter API key keeping the secret out of logs.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);
impl ApiKey {
	const KIND: &'static str = "API key";

	/// Wraps a new API key after validation.
	pub fn new(value: impl Into<String>) -> Result<Self, CredentialError> {
		let value = value.into();

		id::validate_opaque(Self::KIND, &value)?;

		Ok(Self(value))
	}

	/// Returns the inner key value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl Debug for ApiKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("ApiKey").field(&"<redacted>").finish()
	}
}
impl Display for ApiKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn api_key_formatters_redact() {
		let key = ApiKey::new("super-secret").expect("API key fixture should be valid.");

		assert_eq!(format!("{key:?}"), "ApiKey(\"<redacted>\")");
		assert_eq!(format!("{key}"), "<redacted>");
		assert_eq!(key.expose(), "super-secret");
	}

	#[test]
	fn api_key_rejects_empty_and_whitespace() {
		assert_eq!(ApiKey::new(""), Err(CredentialError::Empty { kind: "API key" }));
		assert!(ApiKey::new("abc\ndef").is_err());
	}
}
