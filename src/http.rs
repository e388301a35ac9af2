//! Transport primitives for GoatCounter API calls.
//!
//! The module exposes [`ApiHttpClient`] alongside the crate-owned [`ApiRequest`],
//! [`ApiResponse`], and [`ResponseHeaders`] types so downstream crates can plug in a
//! custom HTTP stack (or a scripted fake in tests) without the retry loop ever
//! depending on reqwest. Implementations perform exactly one HTTP exchange per
//! [`ApiHttpClient::execute`] call and must not retry on their own; rate-limit
//! handling lives above this seam.

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// self
use crate::_prelude::*;
#[cfg(feature = "reqwest")]
use crate::error::{ConfigError, TransportError};

/// Boxed future returned by [`ApiHttpClient::execute`].
pub type HttpFuture<'a> = Pin<Box<dyn Future<Output = Result<ApiResponse>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of issuing a single authenticated GET.
///
/// Implementations must be `Send + Sync + 'static` so one transport can be shared by
/// every concurrent call. Network failures map to [`Error::Transport`]; a request that
/// cannot be constructed maps to [`Error::Config`]. Any HTTP status, including 429 and
/// 5xx, is a successful exchange at this layer and must be returned as an [`ApiResponse`].
pub trait ApiHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Performs the request and buffers the full response body.
	fn execute(&self, request: ApiRequest) -> HttpFuture<'_>;
}

/// Fully resolved GET request.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiRequest {
	/// Absolute URL including the encoded query string.
	pub url: Url,
	/// Request headers; names are lowercase.
	pub headers: Vec<(&'static str, String)>,
}
impl ApiRequest {
	/// Creates a request without headers.
	pub fn new(url: Url) -> Self {
		Self { url, headers: Vec::new() }
	}

	/// Appends a header.
	pub fn with_header(mut self, name: &'static str, value: impl Into<String>) -> Self {
		self.headers.push((name, value.into()));

		self
	}

	/// Returns the first value recorded for `name` (case-insensitive).
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers
			.iter()
			.find(|(key, _)| key.eq_ignore_ascii_case(name))
			.map(|(_, value)| value.as_str())
	}
}
impl Debug for ApiRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let headers = self
			.headers
			.iter()
			.map(|(name, value)| {
				if name.eq_ignore_ascii_case("authorization") {
					(*name, "<redacted>")
				} else {
					(*name, value.as_str())
				}
			})
			.collect::<Vec<_>>();

		f.debug_struct("ApiRequest")
			.field("url", &self.url.as_str())
			.field("headers", &headers)
			.finish()
	}
}

/// Response headers keyed by lowercase name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResponseHeaders(BTreeMap<String, String>);
impl ResponseHeaders {
	/// Builds a header map from name/value pairs; later duplicates win.
	pub fn from_pairs<I, K, V>(pairs: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: AsRef<str>,
		V: Into<String>,
	{
		Self(
			pairs
				.into_iter()
				.map(|(name, value)| (name.as_ref().to_ascii_lowercase(), value.into()))
				.collect(),
		)
	}

	/// Returns the value for `name` (case-insensitive).
	pub fn get(&self, name: &str) -> Option<&str> {
		self.0.get(&name.to_ascii_lowercase()).map(String::as_str)
	}
}

/// Buffered HTTP response handed to the retry loop and decoder.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ApiResponse {
	/// HTTP status code.
	pub status: u16,
	/// Captured response headers.
	pub headers: ResponseHeaders,
	/// Raw response body.
	pub body: Vec<u8>,
}
impl ApiResponse {
	/// HTTP status signalling the rate limit was exceeded.
	pub const TOO_MANY_REQUESTS: u16 = 429;

	/// Creates a response with the provided status and body and no headers.
	pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
		Self { status, headers: ResponseHeaders::default(), body: body.into() }
	}

	/// Adds a header.
	pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
		self.headers.0.insert(name.to_ascii_lowercase(), value.into());

		self
	}

	/// Reports a 2xx status.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// Reports the rate-limit signal.
	pub fn is_rate_limited(&self) -> bool {
		self.status == Self::TOO_MANY_REQUESTS
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client whose requests fail with a timeout after `timeout`.
	pub fn with_timeout(timeout: Duration) -> Result<Self, ConfigError> {
		Ok(Self(ReqwestClient::builder().timeout(timeout).build()?))
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl ApiHttpClient for ReqwestHttpClient {
	fn execute(&self, request: ApiRequest) -> HttpFuture<'_> {
		Box::pin(async move {
			let mut builder = self.0.get(request.url);

			for (name, value) in request.headers {
				builder = builder.header(name, value);
			}

			let response = builder.send().await.map_err(map_reqwest_error)?;
			let status = response.status().as_u16();
			let headers = ResponseHeaders::from_pairs(
				response
					.headers()
					.iter()
					.filter_map(|(name, value)| Some((name.as_str(), value.to_str().ok()?))),
			);
			let body = response.bytes().await.map_err(map_reqwest_error)?.to_vec();

			Ok(ApiResponse { status, headers, body })
		})
	}
}

#[cfg(feature = "reqwest")]
fn map_reqwest_error(err: ReqwestError) -> Error {
	if err.is_builder() {
		return ConfigError::from(err).into();
	}

	TransportError::from(err).into()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn response_headers_are_case_insensitive() {
		let headers = ResponseHeaders::from_pairs([("X-Rate-Limit-Reset", "3")]);

		assert_eq!(headers.get("x-rate-limit-reset"), Some("3"));
		assert_eq!(headers.get("X-RATE-LIMIT-RESET"), Some("3"));
		assert_eq!(headers.get("retry-after"), None);
	}

	#[test]
	fn request_debug_redacts_authorization() {
		let url = Url::parse("https://stats.goatcounter.com/api/v0/me")
			.expect("Fixture URL should parse.");
		let request = ApiRequest::new(url)
			.with_header("authorization", "Bearer hunter2")
			.with_header("accept", "application/json");
		let rendered = format!("{request:?}");

		assert!(!rendered.contains("hunter2"));
		assert!(rendered.contains("<redacted>"));
		assert_eq!(request.header("Authorization"), Some("Bearer hunter2"));
	}

	#[test]
	fn response_classification() {
		assert!(ApiResponse::new(204, Vec::new()).is_success());
		assert!(ApiResponse::new(429, "slow down").is_rate_limited());
		assert!(!ApiResponse::new(500, "boom").is_success());
		assert_eq!(ApiResponse::new(500, "boom").body, b"boom");
	}
}
