//! Strongly typed site identifier and the validation shared with API keys.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

const SITE_CODE_MAX_LEN: usize = 63;

/// Error returned when a credential value fails validation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum CredentialError {
	/// The value was empty.
	#[error("{kind} cannot be empty.")]
	Empty {
		/// Kind of credential (site code, API key).
		kind: &'static str,
	},
	/// The value contains whitespace or control characters.
	#[error("{kind} contains whitespace or control characters.")]
	ContainsWhitespace {
		/// Kind of credential (site code, API key).
		kind: &'static str,
	},
	/// The site code contains a character that cannot appear in a host label.
	#[error("{kind} contains the invalid character {character:?}.")]
	InvalidCharacter {
		/// Kind of credential (site code, API key).
		kind: &'static str,
		/// Offending character.
		character: char,
	},
	/// The value exceeded the allowed character count.
	#[error("{kind} exceeds {max} characters.")]
	TooLong {
		/// Kind of credential (site code, API key).
		kind: &'static str,
		/// Maximum permitted character count.
		max: usize,
	},
}

/// GoatCounter site code; forms the subdomain of every request host.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SiteCode(String);
impl SiteCode {
	const KIND: &'static str = "Site code";

	/// Creates a new site code after validation.
	pub fn new(value: impl AsRef<str>) -> Result<Self, CredentialError> {
		let view = value.as_ref();

		validate_site_code(view)?;

		Ok(Self(view.to_owned()))
	}
}
impl Deref for SiteCode {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl AsRef<str> for SiteCode {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl Borrow<str> for SiteCode {
	fn borrow(&self) -> &str {
		&self.0
	}
}
impl From<SiteCode> for String {
	fn from(value: SiteCode) -> Self {
		value.0
	}
}
impl TryFrom<String> for SiteCode {
	type Error = CredentialError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		validate_site_code(&value)?;

		Ok(Self(value))
	}
}
impl FromStr for SiteCode {
	type Err = CredentialError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}
impl Debug for SiteCode {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "SiteCode({})", self.0)
	}
}
impl Display for SiteCode {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}

pub(crate) fn validate_opaque(kind: &'static str, view: &str) -> Result<(), CredentialError> {
	if view.is_empty() {
		return Err(CredentialError::Empty { kind });
	}
	if view.chars().any(|c| c.is_whitespace() || c.is_control()) {
		return Err(CredentialError::ContainsWhitespace { kind });
	}

	Ok(())
}

fn validate_site_code(view: &str) -> Result<(), CredentialError> {
	let kind = SiteCode::KIND;

	validate_opaque(kind, view)?;

	if let Some(character) = view.chars().find(|c| !(c.is_ascii_alphanumeric() || *c == '-')) {
		return Err(CredentialError::InvalidCharacter { kind, character });
	}
	if view.len() > SITE_CODE_MAX_LEN {
		return Err(CredentialError::TooLong { kind, max: SITE_CODE_MAX_LEN });
	}

	Ok(())
}
