//! Client-level error types shared across credentials, query normalization, transport, and
//! decoding.

// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
///
/// Only [`Error::RateLimitExceeded`] is the product of local recovery; every other variant
/// propagates unchanged from the stage that raised it.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Missing or invalid credentials, or a client that cannot be built.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Caller-supplied parameters are malformed or out of range.
	#[error(transparent)]
	Validation(#[from] crate::query::ValidationError),
	/// Transport failure (DNS, TCP, TLS, timeout).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Successful HTTP exchange whose body could not be decoded.
	#[error(transparent)]
	Decode(#[from] crate::decode::DecodeError),

	/// The service kept answering HTTP 429 until the retry budget ran out.
	#[error("Rate limit still exceeded after {attempts} attempts.")]
	RateLimitExceeded {
		/// Number of HTTP requests issued before giving up.
		attempts: u32,
	},
	/// The service answered with a non-success status other than 429.
	#[error("GoatCounter API responded with HTTP {status}: {message}.")]
	Api {
		/// HTTP status code returned by the service.
		status: u16,
		/// Error detail extracted from the response body.
		message: String,
	},
}
impl Error {
	/// Returns the taxonomy bucket for this error.
	pub const fn kind(&self) -> ErrorKind {
		match self {
			Self::Config(_) => ErrorKind::Configuration,
			Self::Validation(_) => ErrorKind::Validation,
			Self::Transport(_) => ErrorKind::Network,
			Self::Decode(_) => ErrorKind::Decoding,
			Self::RateLimitExceeded { .. } => ErrorKind::RateLimitExceeded,
			Self::Api { .. } => ErrorKind::Api,
		}
	}
}

/// Error taxonomy surfaced to the tool dispatch layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
	/// Missing or invalid credentials.
	Configuration,
	/// Malformed or out-of-range parameters.
	Validation,
	/// Retry budget exhausted on HTTP 429.
	RateLimitExceeded,
	/// Transport-level failure.
	Network,
	/// Non-success, non-429 HTTP status.
	Api,
	/// Unparseable success body.
	Decoding,
}
impl ErrorKind {
	/// Returns a stable label suitable for span, metric, or protocol fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Configuration => "configuration_error",
			Self::Validation => "validation_error",
			Self::RateLimitExceeded => "rate_limit_exceeded",
			Self::Network => "network_error",
			Self::Api => "api_error",
			Self::Decoding => "decoding_error",
		}
	}
}
impl Display for ErrorKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Configuration and credential failures raised by the client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Base URL template does not produce a valid URL for the site code.
	#[error("Base URL `{url}` is invalid.")]
	InvalidBaseUrl {
		/// URL produced from the template.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// A required configuration value was absent or empty.
	#[error("Required configuration value `{name}` is not set.")]
	Missing {
		/// Name of the missing value.
		name: String,
	},
	/// A credential value failed validation.
	#[error(transparent)]
	InvalidCredential(#[from] crate::auth::CredentialError),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}

	/// Reports an absent configuration value.
	pub fn missing(name: impl Into<String>) -> Self {
		Self::Missing { name: name.into() }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// The request did not complete before the transport's deadline.
	#[error("Request to the GoatCounter API timed out.")]
	Timeout {
		/// Transport-specific timeout error.
		#[source]
		source: BoxError,
	},
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the GoatCounter API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Wraps a transport-specific timeout error.
	pub fn timeout(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Timeout { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() { Self::timeout(e) } else { Self::network(e) }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn kinds_expose_stable_labels() {
		let err = Error::RateLimitExceeded { attempts: 5 };

		assert_eq!(err.kind(), ErrorKind::RateLimitExceeded);
		assert_eq!(err.kind().as_str(), "rate_limit_exceeded");
		assert_eq!(err.to_string(), "Rate limit still exceeded after 5 attempts.");

		let err = Error::Api { status: 500, message: "boom".into() };

		assert_eq!(err.kind(), ErrorKind::Api);
		assert_eq!(err.to_string(), "GoatCounter API responded with HTTP 500: boom.");
		assert_eq!(
			Error::from(ConfigError::missing("GOATCOUNTER_CODE")).kind(),
			ErrorKind::Configuration
		);
	}
}
