//! Rate-limited transport: one logical call, up to `max_attempts` HTTP requests.

// crates.io
use tokio::time::sleep;
// self
use crate::{
	_prelude::*,
	auth::Credentials,
	client::Client,
	decode,
	endpoint::Endpoint,
	http::{ApiHttpClient, ApiRequest, ApiResponse},
	obs,
	query::QueryParameters,
	retry::{CallPhase, RetryState},
};

impl<C> Client<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Validates the parameters, resolves credentials, builds the request, and sends it
	/// through the retry loop.
	///
	/// Returns the first 2xx response. HTTP 429 is retried until the policy's attempt
	/// ceiling; any other status or a network failure ends the call immediately. Relative
	/// dates resolve against the current UTC date.
	pub async fn send(&self, endpoint: Endpoint, params: &QueryParameters) -> Result<ApiResponse> {
		params.validate()?;

		let credentials = self.credentials.get()?;
		let request =
			self.build_request(&credentials, endpoint, params, OffsetDateTime::now_utc().date())?;

		self.send_request(endpoint, request).await
	}

	/// Builds the fully resolved GET request for `endpoint`.
	pub fn build_request(
		&self,
		credentials: &Credentials,
		endpoint: Endpoint,
		params: &QueryParameters,
		today: Date,
	) -> Result<ApiRequest> {
		let mut url = self.config.endpoint_url(&credentials.site_code, endpoint)?;
		let pairs = endpoint.query_pairs(params, today);

		if !pairs.is_empty() {
			url.query_pairs_mut()
				.extend_pairs(pairs.iter().map(|(key, value)| (*key, value.as_str())));
		}

		Ok(ApiRequest::new(url)
			.with_header("accept", "application/json")
			.with_header("authorization", credentials.authorization(self.config.auth_scheme)))
	}

	/// Sends an already built request through the retry loop.
	pub async fn send_request(&self, endpoint: Endpoint, request: ApiRequest) -> Result<ApiResponse> {
		let policy = &self.config.retry;
		let mut state = RetryState::new(policy);
		let result = loop {
			state.begin_attempt();

			let response = match self.http_client.execute(request.clone()).await {
				Ok(response) => response,
				Err(e) => {
					state.finish(CallPhase::Failed);

					break Err(e);
				},
			};

			if response.is_success() {
				state.finish(CallPhase::Succeeded);

				break Ok(response);
			}
			if !response.is_rate_limited() {
				state.finish(CallPhase::Failed);

				break Err(Error::Api {
					status: response.status,
					message: decode::error_detail(&response.body),
				});
			}

			obs::record_rate_limited(endpoint);

			if !state.rate_limited() {
				break Err(Error::RateLimitExceeded { attempts: state.attempt });
			}

			let delay =
				policy.compute_delay(&response.headers, state.retry_index(), self.jitter.as_ref());

			state.schedule(delay.duration);
			obs::log_rate_limited(endpoint, &state, &delay);
			sleep(delay.duration).await;
		};

		obs::log_call_result(endpoint, &state, result.as_ref().map(|response| response.status));

		result
	}
}
