//! Resilient GoatCounter API client for tool-calling agents.
//!
//! Loosely typed analytics queries are normalized before any request is made, HTTP 429
//! responses are retried behind the caller's back, and every failure surfaces as a typed
//! [`error::Error`].

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod client;
pub mod decode;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod obs;
pub mod query;
pub mod retry;
#[cfg(feature = "reqwest")]
#[doc(hidden)]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::{Credentials, LazyCredentials},
		client::{Client, ClientConfig},
		http::ReqwestHttpClient,
		retry::ZeroJitter,
	};

	/// Client type alias used by reqwest-backed integration tests.
	pub type ReqwestTestClient = Client<ReqwestHttpClient>;

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Constructs a [`Client`] pointed at `base_url` with fixed credentials and no jitter.
	pub fn build_reqwest_test_client(
		base_url: &str,
		site_code: &str,
		api_key: &str,
	) -> ReqwestTestClient {
		let credentials = Credentials::new(site_code, api_key)
			.expect("Test credentials should pass validation.");
		let config = ClientConfig::default().with_base_url_template(base_url);

		Client::with_http_client(
			config,
			LazyCredentials::new(credentials),
			test_reqwest_http_client(),
		)
		.with_jitter(ZeroJitter)
	}
}

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
		time::Duration,
	};

	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::Value;
	pub use thiserror::Error as ThisError;
	pub use time::{Date, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use serde_json;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
