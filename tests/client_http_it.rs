// crates.io
use httpmock::prelude::*;
use serde_json::json;
use time::macros::date;
// self
use goatcounter_client::{
	_preludet::*,
	auth::{AuthScheme, Credentials, LazyCredentials},
	client::{Client, ClientConfig},
	endpoint::Endpoint,
	error::ErrorKind,
	query::{DateSpec, QueryInput, QueryParameters},
	retry::{RESET_HEADER, ZeroJitter},
};

const SITE: &str = "mysite";
const API_KEY: &str = "integration-key";

#[tokio::test]
async fn stats_total_sends_bearer_auth_and_range() {
	let server = MockServer::start_async().await;
	let client = build_reqwest_test_client(&server.base_url(), SITE, API_KEY);
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api/v0/stats/total")
				.header("authorization", format!("Bearer {API_KEY}"))
				.header("accept", "application/json")
				.query_param("start", "2024-05-01")
				.query_param("end", "2024-05-31")
				.query_param("filter", "blog")
				.query_param("daily", "true")
				.query_param_missing("limit");
			then.status(200).json_body(json!({ "total": 1234, "total_utc": 1200 }));
		})
		.await;
	let params = QueryParameters::default()
		.with_range(
			DateSpec::Absolute(date!(2024 - 05 - 01)),
			DateSpec::Absolute(date!(2024 - 05 - 31)),
		)
		.with_filter("blog")
		.with_daily(true);
	let payload = client.stats_total(&params).await.expect("Stats total should succeed.");

	assert_eq!(payload.payload["total"], 1234);
	assert_eq!(payload.pagination, None);

	mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn paths_use_capitalized_pagination_keys() {
	let server = MockServer::start_async().await;
	let client = build_reqwest_test_client(&server.base_url(), SITE, API_KEY);
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api/v0/paths")
				.query_param("Limit", "20")
				.query_param_missing("After")
				.query_param_missing("daily");
			then.status(200).json_body(json!({ "paths": [{ "id": 1, "path": "/" }], "more": false }));
		})
		.await;
	let payload = client.paths(&QueryParameters::default()).await.expect("Paths should succeed.");

	assert_eq!(payload.payload["paths"][0]["path"], "/");

	mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn raw_tool_arguments_are_normalized_before_sending() {
	let server = MockServer::start_async().await;
	let client = build_reqwest_test_client(&server.base_url(), SITE, API_KEY);
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api/v0/stats/browsers")
				.query_param("start", "2024-01-02")
				.query_param("limit", "5")
				.query_param("daily", "false")
				.query_param_missing("end")
				.query_param_missing("filter");
			then.status(200).json_body(json!({ "stats": [], "more": false }));
		})
		.await;
	let input = QueryInput {
		start: Some(" 2024-01-02 ".into()),
		end: Some("   ".into()),
		filter: Some(String::new()),
		limit: Some(5),
		..Default::default()
	};

	client
		.query_input(Endpoint::StatsBrowsers, &input)
		.await
		.expect("Normalized browser stats should succeed.");

	mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn server_errors_surface_without_retry() {
	let server = MockServer::start_async().await;
	let client = build_reqwest_test_client(&server.base_url(), SITE, API_KEY);
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v0/me");
			then.status(500).json_body(json!({ "error": "internal failure" }));
		})
		.await;
	let err = client.me().await.expect_err("HTTP 500 should fail the call.");

	assert_eq!(err.kind(), ErrorKind::Api);
	assert!(err.to_string().contains("internal failure"));

	mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn unauthorized_responses_are_api_errors() {
	let server = MockServer::start_async().await;
	let client = build_reqwest_test_client(&server.base_url(), SITE, API_KEY);
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v0/sites");
			then.status(401).body("unauthorized");
		})
		.await;
	let err = client.sites().await.expect_err("HTTP 401 should fail the call.");

	assert_eq!(err.kind(), ErrorKind::Api);

	mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn rate_limiting_is_retried_until_the_budget_runs_out() {
	let server = MockServer::start_async().await;
	let client = build_reqwest_test_client(&server.base_url(), SITE, API_KEY);
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v0/stats/refs");
			then.status(429).header(RESET_HEADER, "0").body("slow down");
		})
		.await;
	let err = client
		.stats_refs(&QueryParameters::default())
		.await
		.expect_err("Persistent 429s should exhaust the retry budget.");

	assert_eq!(err.kind(), ErrorKind::RateLimitExceeded);

	mock.assert_calls_async(5).await;
}

#[tokio::test]
async fn malformed_success_bodies_are_decoding_errors() {
	let server = MockServer::start_async().await;
	let client = build_reqwest_test_client(&server.base_url(), SITE, API_KEY);
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v0/stats/sizes");
			then.status(200).body("not json");
		})
		.await;
	let err = client
		.stats_sizes(&QueryParameters::default())
		.await
		.expect_err("Plain text should fail to decode.");

	assert_eq!(err.kind(), ErrorKind::Decoding);

	mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn no_content_decodes_to_an_empty_object() {
	let server = MockServer::start_async().await;
	let client = build_reqwest_test_client(&server.base_url(), SITE, API_KEY);
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v0/stats/locations");
			then.status(204);
		})
		.await;
	let payload = client
		.stats_locations(&QueryParameters::default())
		.await
		.expect("No content should decode.");

	assert_eq!(payload.payload, json!({}));

	mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn hits_pages_follow_the_next_cursor() {
	let server = MockServer::start_async().await;
	let client = build_reqwest_test_client(&server.base_url(), SITE, API_KEY);
	let first = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api/v0/stats/hits")
				.query_param("start", "2024-05-01")
				.query_param("end", "2024-05-31")
				.query_param("daily", "true")
				.query_param("limit", "2")
				.query_param_missing("after");
			then.status(200)
				.json_body(json!({ "hits": [{ "path_id": 1 }, { "path_id": 2 }], "more": true }));
		})
		.await;
	let second = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api/v0/stats/hits")
				.query_param("start", "2024-05-01")
				.query_param("end", "2024-05-31")
				.query_param("daily", "true")
				.query_param("limit", "2")
				.query_param("after", "2");
			then.status(200).json_body(json!({ "hits": [{ "path_id": 3 }], "more": false }));
		})
		.await;
	let mut params = QueryParameters::default()
		.with_range(
			DateSpec::Absolute(date!(2024 - 05 - 01)),
			DateSpec::Absolute(date!(2024 - 05 - 31)),
		)
		.with_daily(true)
		.with_limit(2)
		.expect("Limit should be valid.");
	let mut seen = Vec::new();

	loop {
		let page = client.stats_hits(&params).await.expect("Hits page should succeed.");
		let entries = page.payload["hits"].as_array().cloned().unwrap_or_default();

		seen.extend(entries.iter().filter_map(|entry| entry["path_id"].as_u64()));

		match page.pagination.and_then(|pagination| pagination.next_after) {
			Some(after) => params = params.with_after(after),
			None => break,
		}
	}

	assert_eq!(seen, [1, 2, 3]);

	first.assert_calls_async(1).await;
	second.assert_calls_async(1).await;
}

#[tokio::test]
async fn basic_scheme_sends_apitoken_credentials() {
	let server = MockServer::start_async().await;
	let credentials =
		Credentials::new(SITE, API_KEY).expect("Test credentials should pass validation.");
	let config = ClientConfig::default()
		.with_base_url_template(server.base_url())
		.with_auth_scheme(AuthScheme::Basic);
	let client = Client::with_http_client(
		config,
		LazyCredentials::new(credentials.clone()),
		test_reqwest_http_client(),
	)
	.with_jitter(ZeroJitter);
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api/v0/me")
				.header("authorization", credentials.authorization(AuthScheme::Basic));
			then.status(200).json_body(json!({ "user": { "email": "me@example.com" } }));
		})
		.await;

	client.me().await.expect("Basic-authenticated call should succeed.");

	mock.assert_calls_async(1).await;
}
