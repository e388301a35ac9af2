//! Immutable site/key pairs plus the deferred loader used by long-lived clients.
//!
//! A tool surface can be constructed and advertised before any credentials exist.
//! [`LazyCredentials`] consults its [`CredentialSource`] only when a call actually
//! needs to reach the network, caches the first valid pair for the rest of the
//! process, and keeps re-reading the source while it still fails so configuration
//! supplied later is picked up by subsequent calls.

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
// self
use crate::{
	_prelude::*,
	auth::{ApiKey, SiteCode},
	error::ConfigError,
};

/// Environment variable holding the site code by default.
pub const SITE_CODE_ENV: &str = "GOATCOUNTER_CODE";
/// Environment variable holding the API key by default.
pub const API_KEY_ENV: &str = "GOATCOUNTER_API_KEY";

/// How the API key is presented in the `Authorization` header.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthScheme {
	#[default]
	/// `Authorization: Bearer <key>`.
	Bearer,
	/// `Authorization: Basic base64("apitoken:<key>")`.
	Basic,
}

/// Validated site code and API key shared read-only by every call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credentials {
	/// Site the client is scoped to.
	pub site_code: SiteCode,
	/// Secret authorizing requests for the account.
	pub api_key: ApiKey,
}
impl Credentials {
	/// Validates both values and builds the pair.
	pub fn new(site_code: impl AsRef<str>, api_key: impl Into<String>) -> Result<Self, ConfigError> {
		Ok(Self { site_code: SiteCode::new(site_code)?, api_key: ApiKey::new(api_key)? })
	}

	/// Renders the `Authorization` header value for the provided scheme.
	pub fn authorization(&self, scheme: AuthScheme) -> String {
		match scheme {
			AuthScheme::Bearer => format!("Bearer {}", self.api_key.expose()),
			AuthScheme::Basic => {
				let encoded = STANDARD.encode(format!("apitoken:{}", self.api_key.expose()));

				format!("Basic {encoded}")
			},
		}
	}
}

/// Supplies credentials on demand.
///
/// Implementations are consulted by [`LazyCredentials`] until they return a valid pair.
pub trait CredentialSource
where
	Self: Send + Sync,
{
	/// Loads and validates the credentials.
	fn load(&self) -> Result<Credentials, ConfigError>;
}
impl CredentialSource for Credentials {
	fn load(&self) -> Result<Credentials, ConfigError> {
		Ok(self.clone())
	}
}
impl<F> CredentialSource for F
where
	F: Send + Sync + Fn() -> Result<Credentials, ConfigError>,
{
	fn load(&self) -> Result<Credentials, ConfigError> {
		self()
	}
}

/// Reads the site code and API key from process environment variables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnvCredentialSource {
	/// Variable holding the site code.
	pub site_code_var: String,
	/// Variable holding the API key.
	pub api_key_var: String,
}
impl EnvCredentialSource {
	/// Creates a source reading the provided variable names.
	pub fn new(site_code_var: impl Into<String>, api_key_var: impl Into<String>) -> Self {
		Self { site_code_var: site_code_var.into(), api_key_var: api_key_var.into() }
	}

	fn load_with<L>(&self, lookup: L) -> Result<Credentials, ConfigError>
	where
		L: Fn(&str) -> Option<String>,
	{
		let read = |name: &str| {
			lookup(name)
				.filter(|value| !value.trim().is_empty())
				.ok_or_else(|| ConfigError::missing(name))
		};
		let site_code = read(&self.site_code_var)?;
		let api_key = read(&self.api_key_var)?;

		Credentials::new(site_code.trim(), api_key.trim())
	}
}
impl Default for EnvCredentialSource {
	fn default() -> Self {
		Self::new(SITE_CODE_ENV, API_KEY_ENV)
	}
}
impl CredentialSource for EnvCredentialSource {
	fn load(&self) -> Result<Credentials, ConfigError> {
		self.load_with(|name| std::env::var(name).ok())
	}
}

/// Credential holder that validates on first read instead of at construction.
pub struct LazyCredentials {
	source: Arc<dyn CredentialSource>,
	resolved: RwLock<Option<Arc<Credentials>>>,
}
impl LazyCredentials {
	/// Wraps a credential source without consulting it.
	pub fn new(source: impl 'static + CredentialSource) -> Self {
		Self::with_source(Arc::new(source))
	}

	/// Wraps a shared credential source without consulting it.
	pub fn with_source(source: Arc<dyn CredentialSource>) -> Self {
		Self { source, resolved: RwLock::new(None) }
	}

	/// Defers to [`EnvCredentialSource::default`].
	pub fn from_env() -> Self {
		Self::new(EnvCredentialSource::default())
	}

	/// Returns the cached credentials, loading them from the source if needed.
	pub fn get(&self) -> Result<Arc<Credentials>, ConfigError> {
		if let Some(credentials) = self.resolved.read().as_ref() {
			return Ok(credentials.clone());
		}

		let loaded = Arc::new(self.source.load()?);
		let mut slot = self.resolved.write();

		Ok(slot.get_or_insert(loaded).clone())
	}

	/// Reports whether a valid pair has been loaded yet.
	pub fn is_resolved(&self) -> bool {
		self.resolved.read().is_some()
	}
}
impl From<Credentials> for LazyCredentials {
	fn from(credentials: Credentials) -> Self {
		Self::new(credentials)
	}
}
impl Debug for LazyCredentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("LazyCredentials").field("resolved", &self.is_resolved()).finish()
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::sync::atomic::{AtomicUsize, Ordering};
	// self
	use super::*;

	#[test]
	fn credentials_reject_empty_values() {
		assert!(matches!(Credentials::new("", "key"), Err(ConfigError::InvalidCredential(_))));
		assert!(matches!(Credentials::new("site", ""), Err(ConfigError::InvalidCredential(_))));
	}

	#[test]
	fn authorization_header_matches_scheme() {
		let credentials =
			Credentials::new("site", "secret").expect("Credential fixture should be valid.");

		assert_eq!(credentials.authorization(AuthScheme::Bearer), "Bearer secret");
		assert_eq!(
			credentials.authorization(AuthScheme::Basic),
			format!("Basic {}", STANDARD.encode("apitoken:secret"))
		);
	}

	#[test]
	fn env_source_reports_missing_variables() {
		let source = EnvCredentialSource::new("SITE", "KEY");
		let err = source
			.load_with(|name| (name == "SITE").then(|| "stats".to_owned()))
			.expect_err("Missing API key should be reported.");

		assert!(matches!(err, ConfigError::Missing { ref name } if name == "KEY"));

		let err = source
			.load_with(|_| Some("   ".to_owned()))
			.expect_err("Blank values should count as missing.");

		assert!(matches!(err, ConfigError::Missing { ref name } if name == "SITE"));

		let credentials = source
			.load_with(|name| Some(if name == "SITE" { "stats".into() } else { "k3y".into() }))
			.expect("Both variables should yield credentials.");

		assert_eq!(&*credentials.site_code, "stats");
	}

	#[test]
	fn lazy_credentials_retry_until_valid_then_cache() {
		let calls = Arc::new(AtomicUsize::new(0));
		let counter = calls.clone();
		let lazy = LazyCredentials::new(move || {
			if counter.fetch_add(1, Ordering::SeqCst) == 0 {
				Err(ConfigError::missing(SITE_CODE_ENV))
			} else {
				Credentials::new("stats", "secret")
			}
		});

		assert!(!lazy.is_resolved(), "Construction must not consult the source.");
		assert_eq!(calls.load(Ordering::SeqCst), 0);
		assert!(lazy.get().is_err());
		assert!(lazy.get().is_ok());
		assert!(lazy.get().is_ok());
		assert!(lazy.is_resolved());
		assert_eq!(calls.load(Ordering::SeqCst), 2);
	}
}
