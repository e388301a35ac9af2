//! High-level client that runs every logical call through normalization, the rate-limited
//! transport, and the response decoder.

pub mod ops;
pub mod transport;

// self
use crate::{
	_prelude::*,
	auth::{AuthScheme, LazyCredentials, SiteCode},
	endpoint::{API_PREFIX, Endpoint},
	error::ConfigError,
	http::ApiHttpClient,
	retry::{JitterSource, RetryPolicy, ThreadRngJitter},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

/// Placeholder replaced by the site code inside [`ClientConfig::base_url_template`].
pub const SITE_PLACEHOLDER: &str = "{site}";
/// Hosted GoatCounter base URL.
pub const DEFAULT_BASE_URL_TEMPLATE: &str = "https://{site}.goatcounter.com";

/// Settings shared by every call a [`Client`] makes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
	/// Base URL; `{site}` is replaced by the site code.
	pub base_url_template: String,
	/// How the API key is presented.
	pub auth_scheme: AuthScheme,
	/// Per-request deadline applied by the default reqwest transport.
	pub request_timeout: Duration,
	/// Rate-limit retry policy.
	pub retry: RetryPolicy,
}
impl ClientConfig {
	const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

	/// Overrides the base URL template (self-hosted instances, tests).
	pub fn with_base_url_template(mut self, template: impl Into<String>) -> Self {
		self.base_url_template = template.into();

		self
	}

	/// Overrides the authorization scheme.
	pub fn with_auth_scheme(mut self, scheme: AuthScheme) -> Self {
		self.auth_scheme = scheme;

		self
	}

	/// Overrides the per-request deadline.
	pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
		self.request_timeout = timeout;

		self
	}

	/// Overrides the retry policy.
	pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
		self.retry = retry;

		self
	}

	/// Builds the absolute URL for `endpoint` on `site`, without a query string.
	pub fn endpoint_url(&self, site: &SiteCode, endpoint: Endpoint) -> Result<Url, ConfigError> {
		let base = self.base_url_template.replace(SITE_PLACEHOLDER, site);
		let raw = format!("{}{API_PREFIX}{}", base.trim_end_matches('/'), endpoint.path());

		Url::parse(&raw).map_err(|source| ConfigError::InvalidBaseUrl { url: raw, source })
	}
}
impl Default for ClientConfig {
	fn default() -> Self {
		Self {
			base_url_template: DEFAULT_BASE_URL_TEMPLATE.into(),
			auth_scheme: AuthScheme::default(),
			request_timeout: Self::DEFAULT_REQUEST_TIMEOUT,
			retry: RetryPolicy::default(),
		}
	}
}

/// GoatCounter API client scoped to one site code and API key.
///
/// The client owns the HTTP transport, the deferred credential holder, and the retry
/// configuration. Every operation is a self-contained pipeline; the client holds no
/// mutable state across calls, so it can be shared freely and used concurrently.
pub struct Client<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// HTTP transport used for every outbound request.
	pub http_client: Arc<C>,
	/// Credentials validated on first use.
	pub credentials: Arc<LazyCredentials>,
	/// Shared call settings.
	pub config: ClientConfig,
	jitter: Arc<dyn JitterSource>,
}
impl<C> Client<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Creates a client that reuses the caller-provided transport.
	///
	/// Credentials are not consulted until the first call.
	pub fn with_http_client(
		config: ClientConfig,
		credentials: impl Into<Arc<LazyCredentials>>,
		http_client: impl Into<Arc<C>>,
	) -> Self {
		Self {
			http_client: http_client.into(),
			credentials: credentials.into(),
			config,
			jitter: Arc::new(ThreadRngJitter),
		}
	}

	/// Replaces the randomness source used for backoff jitter.
	pub fn with_jitter(mut self, jitter: impl 'static + JitterSource) -> Self {
		self.jitter = Arc::new(jitter);

		self
	}
}
#[cfg(feature = "reqwest")]
impl Client<ReqwestHttpClient> {
	/// Creates a client with its own reqwest transport honoring
	/// [`ClientConfig::request_timeout`].
	pub fn new(
		config: ClientConfig,
		credentials: impl Into<Arc<LazyCredentials>>,
	) -> Result<Self, ConfigError> {
		let http_client = ReqwestHttpClient::with_timeout(config.request_timeout)?;

		Ok(Self::with_http_client(config, credentials, http_client))
	}

	/// Creates a client whose credentials come from `GOATCOUNTER_CODE` and
	/// `GOATCOUNTER_API_KEY` on first use.
	pub fn from_env(config: ClientConfig) -> Result<Self, ConfigError> {
		Self::new(config, LazyCredentials::from_env())
	}
}
impl<C> Clone for Client<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn clone(&self) -> Self {
		Self {
			http_client: self.http_client.clone(),
			credentials: self.credentials.clone(),
			config: self.config.clone(),
			jitter: self.jitter.clone(),
		}
	}
}
impl<C> Debug for Client<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Client")
			.field("config", &self.config)
			.field("credentials", &self.credentials)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn site(code: &str) -> SiteCode {
		SiteCode::new(code).expect("Site code fixture should be valid.")
	}

	#[test]
	fn default_template_uses_site_subdomain() {
		let url = ClientConfig::default()
			.endpoint_url(&site("mysite"), Endpoint::StatsTotal)
			.expect("Default template should produce a valid URL.");

		assert_eq!(url.as_str(), "https://mysite.goatcounter.com/api/v0/stats/total");
	}

	#[test]
	fn custom_templates_tolerate_trailing_slashes() {
		let config = ClientConfig::default().with_base_url_template("http://127.0.0.1:8080/");
		let url = config
			.endpoint_url(&site("ignored"), Endpoint::Me)
			.expect("Custom template should produce a valid URL.");

		assert_eq!(url.as_str(), "http://127.0.0.1:8080/api/v0/me");
	}

	#[test]
	fn invalid_templates_are_configuration_errors() {
		let err = ClientConfig::default()
			.with_base_url_template("not a url {site}")
			.endpoint_url(&site("mysite"), Endpoint::Me)
			.expect_err("Garbage templates should be rejected.");

		assert!(matches!(err, ConfigError::InvalidBaseUrl { .. }));
	}
}
