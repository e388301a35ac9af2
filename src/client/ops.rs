//! Logical operations, one per GoatCounter endpoint.

// self
use crate::{
	_prelude::*,
	client::Client,
	decode::{self, ApiPayload},
	endpoint::Endpoint,
	http::ApiHttpClient,
	obs::{self, CallOutcome, CallSpan},
	query::{QueryInput, QueryParameters},
};

impl<C> Client<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Runs one logical call: transport with rate-limit retries, then decoding.
	///
	/// Parameters the endpoint does not understand are ignored.
	pub async fn query(&self, endpoint: Endpoint, params: &QueryParameters) -> Result<ApiPayload> {
		obs::record_call_outcome(endpoint, CallOutcome::Attempt);

		let span = CallSpan::new(endpoint);
		let result = span
			.instrument(async move {
				let response = self.send(endpoint, params).await?;

				Ok(decode::decode_success(endpoint, &response)?)
			})
			.await;

		match &result {
			Ok(_) => obs::record_call_outcome(endpoint, CallOutcome::Success),
			Err(err) => {
				if matches!(err, Error::Decode(_)) {
					obs::log_decode_failure(endpoint, err);
				}

				obs::record_call_outcome(endpoint, CallOutcome::Failure);
			},
		}

		result
	}

	/// Normalizes raw tool arguments, then runs [`Client::query`].
	///
	/// Invalid arguments fail before credentials are resolved or any request is made.
	pub async fn query_input(&self, endpoint: Endpoint, input: &QueryInput) -> Result<ApiPayload> {
		let params = input.normalize()?;

		self.query(endpoint, &params).await
	}

	/// `GET /me`: the user and API key behind the credentials.
	pub async fn me(&self) -> Result<ApiPayload> {
		self.query(Endpoint::Me, &QueryParameters::default()).await
	}

	/// `GET /sites`: every site the API key can access.
	pub async fn sites(&self) -> Result<ApiPayload> {
		self.query(Endpoint::Sites, &QueryParameters::default()).await
	}

	/// `GET /paths`: paths recorded for the site; honors `limit` and `after`.
	pub async fn paths(&self, params: &QueryParameters) -> Result<ApiPayload> {
		self.query(Endpoint::Paths, params).await
	}

	/// `GET /stats/total`: total pageviews and visitors.
	pub async fn stats_total(&self, params: &QueryParameters) -> Result<ApiPayload> {
		self.query(Endpoint::StatsTotal, params).await
	}

	/// `GET /stats/hits`: pageviews and visitors per path.
	pub async fn stats_hits(&self, params: &QueryParameters) -> Result<ApiPayload> {
		self.query(Endpoint::StatsHits, params).await
	}

	/// `GET /stats/refs`: referrers.
	pub async fn stats_refs(&self, params: &QueryParameters) -> Result<ApiPayload> {
		self.query(Endpoint::StatsRefs, params).await
	}

	/// `GET /stats/browsers`.
	pub async fn stats_browsers(&self, params: &QueryParameters) -> Result<ApiPayload> {
		self.query(Endpoint::StatsBrowsers, params).await
	}

	/// `GET /stats/systems`.
	pub async fn stats_systems(&self, params: &QueryParameters) -> Result<ApiPayload> {
		self.query(Endpoint::StatsSystems, params).await
	}

	/// `GET /stats/sizes`.
	pub async fn stats_sizes(&self, params: &QueryParameters) -> Result<ApiPayload> {
		self.query(Endpoint::StatsSizes, params).await
	}

	/// `GET /stats/locations`.
	pub async fn stats_locations(&self, params: &QueryParameters) -> Result<ApiPayload> {
		self.query(Endpoint::StatsLocations, params).await
	}
}
