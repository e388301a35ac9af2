// self
use crate::{endpoint::Endpoint, obs::CallOutcome};

/// Records a call outcome via the global metrics recorder (when enabled).
pub fn record_call_outcome(endpoint: Endpoint, outcome: CallOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"goatcounter_client_call_total",
			"endpoint" => endpoint.name(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (endpoint, outcome);
	}
}

/// Records an HTTP 429 received from the service (when enabled).
pub fn record_rate_limited(endpoint: Endpoint) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("goatcounter_client_rate_limited_total", "endpoint" => endpoint.name())
			.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = endpoint;
	}
}
