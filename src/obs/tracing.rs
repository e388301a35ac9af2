// self
use crate::{
	_prelude::*,
	endpoint::Endpoint,
	retry::{RetryDelay, RetryState},
};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedCall<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedCall<F> = F;

/// A span builder used by client operations.
#[derive(Clone, Debug)]
pub struct CallSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl CallSpan {
	/// Creates a new span tagged with the provided endpoint.
	pub fn new(endpoint: Endpoint) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!(
				"goatcounter_client.call",
				endpoint = endpoint.name(),
				path = endpoint.path()
			);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = endpoint;

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedCall<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Logs a scheduled wait after an HTTP 429.
pub fn log_rate_limited(endpoint: Endpoint, state: &RetryState, delay: &RetryDelay) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(
			endpoint = endpoint.name(),
			attempt = state.attempt,
			max_attempts = state.max_attempts,
			delay_ms = u64::try_from(delay.duration.as_millis()).unwrap_or(u64::MAX),
			source = delay.source.as_str(),
			"Rate limited; waiting before the next attempt."
		);
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (endpoint, state, delay);
	}
}

/// Logs how a call ended.
pub fn log_call_result(endpoint: Endpoint, state: &RetryState, result: Result<u16, &Error>) {
	#[cfg(feature = "tracing")]
	{
		match result {
			Ok(status) => tracing::debug!(
				endpoint = endpoint.name(),
				attempts = state.attempt,
				status,
				"Call succeeded."
			),
			Err(err) => tracing::error!(
				endpoint = endpoint.name(),
				attempts = state.attempt,
				phase = state.phase.as_str(),
				kind = err.kind().as_str(),
				error = %err,
				"Call failed."
			),
		}
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (endpoint, state, result);
	}
}

/// Logs a 2xx body that could not be decoded.
pub fn log_decode_failure(endpoint: Endpoint, err: &Error) {
	#[cfg(feature = "tracing")]
	{
		tracing::error!(endpoint = endpoint.name(), error = %err, "Response body rejected.");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (endpoint, err);
	}
}
