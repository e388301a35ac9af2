//! Demonstrates fetching site totals with the default reqwest transport while the mock server
//! throttles the first request.

// std
use std::time::Duration;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde_json::json;
// self
use goatcounter_client::{
	auth::{Credentials, LazyCredentials},
	client::{Client, ClientConfig},
	endpoint::Endpoint,
	http::ReqwestHttpClient,
	query::QueryInput,
	reqwest,
	retry::RESET_HEADER,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let mut throttled = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v0/stats/total");
			then.status(429).header(RESET_HEADER, "1").body("rate limited");
		})
		.await;
	let http_client = ReqwestHttpClient::with_client(
		reqwest::Client::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()?,
	);
	let client = Client::with_http_client(
		ClientConfig::default().with_base_url_template(server.base_url()),
		LazyCredentials::new(Credentials::new("demo", "demo-api-key")?),
		http_client,
	);
	let input = QueryInput {
		start: Some("7 days ago".into()),
		end: Some("today".into()),
		daily: Some(true),
		..Default::default()
	};
	let call = tokio::spawn({
		let client = client.clone();

		async move { client.query_input(Endpoint::StatsTotal, &input).await }
	});

	// Let the first attempt hit the throttled mock, then swap in a healthy one.
	while throttled.calls_async().await == 0 {
		tokio::time::sleep(Duration::from_millis(10)).await;
	}

	throttled.delete_async().await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v0/stats/total");
			then.status(200).json_body(json!({ "total": 4321, "total_utc": 4300, "stats": [] }));
		})
		.await;

	let totals = call.await??;

	println!("Pageviews in the last week: {}.", totals.payload["total"]);

	Ok(())
}
