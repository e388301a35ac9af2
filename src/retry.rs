//! Rate-limit retry policy, per-call retry state, and delay computation.
//!
//! [`RetryPolicy::compute_delay`] is the single decision point for how long a call
//! waits after an HTTP 429: a valid reset hint header wins outright, otherwise the
//! policy falls back to capped exponential backoff plus jitter drawn from a
//! [`JitterSource`]. The function touches no I/O, so the precedence rules can be
//! exercised without a network.

mod jitter;

pub use jitter::*;

// self
use crate::{_prelude::*, http::ResponseHeaders};

/// Header carrying the authoritative number of seconds until the rate limit resets.
pub const RESET_HEADER: &str = "X-Rate-Limit-Reset";

/// Bounded retry policy applied to HTTP 429 responses only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
	/// Total HTTP requests allowed per logical call, including the first.
	pub max_attempts: u32,
	/// Backoff before the first retry; doubles on every subsequent retry.
	pub base_delay: Duration,
	/// Ceiling for the exponential component (jitter is added on top).
	pub max_delay: Duration,
	/// Response header holding the reset hint in seconds.
	pub reset_header: String,
}
impl RetryPolicy {
	const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);
	const DEFAULT_MAX_ATTEMPTS: u32 = 5;
	const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(32);

	/// Overrides the attempt ceiling; values below one are raised to one.
	pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
		self.max_attempts = max_attempts.max(1);

		self
	}

	/// Overrides the base backoff delay.
	pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
		self.base_delay = base_delay;

		self
	}

	/// Overrides the backoff ceiling.
	pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
		self.max_delay = max_delay;

		self
	}

	/// Overrides the reset hint header name.
	pub fn with_reset_header(mut self, name: impl Into<String>) -> Self {
		self.reset_header = name.into();

		self
	}

	/// Exponential component for the zero-based retry index: `min(base * 2^retry, max_delay)`.
	pub fn backoff(&self, retry: u32) -> Duration {
		1_u32
			.checked_shl(retry)
			.and_then(|factor| self.base_delay.checked_mul(factor))
			.map_or(self.max_delay, |delay| delay.min(self.max_delay))
	}

	/// Parses the reset hint; negative, non-numeric, or non-finite values are ignored.
	pub fn reset_hint(&self, headers: &ResponseHeaders) -> Option<Duration> {
		let raw = headers.get(&self.reset_header)?.trim();
		let secs = raw.parse::<f64>().ok().filter(|secs| secs.is_finite() && *secs >= 0.)?;

		Duration::try_from_secs_f64(secs).ok()
	}

	/// Decides how long to wait before retry number `retry` (zero-based).
	pub fn compute_delay(
		&self,
		headers: &ResponseHeaders,
		retry: u32,
		jitter: &dyn JitterSource,
	) -> RetryDelay {
		if let Some(duration) = self.reset_hint(headers) {
			return RetryDelay { duration, source: DelaySource::ResetHint };
		}

		let base = self.backoff(retry);
		let jitter = bounded_jitter(jitter, base);

		RetryDelay { duration: base.saturating_add(jitter), source: DelaySource::Backoff { base } }
	}
}
impl Default for RetryPolicy {
	fn default() -> Self {
		Self {
			max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
			base_delay: Self::DEFAULT_BASE_DELAY,
			max_delay: Self::DEFAULT_MAX_DELAY,
			reset_header: RESET_HEADER.into(),
		}
	}
}

/// Wait chosen by [`RetryPolicy::compute_delay`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryDelay {
	/// Total time to wait before the next request.
	pub duration: Duration,
	/// Which rule produced the wait.
	pub source: DelaySource,
}

/// Rule that produced a [`RetryDelay`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DelaySource {
	/// The service's reset hint header.
	ResetHint,
	/// Exponential backoff; `base` is the value before jitter.
	Backoff {
		/// Exponential component before jitter.
		base: Duration,
	},
}
impl DelaySource {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::ResetHint => "reset_hint",
			Self::Backoff { .. } => "backoff",
		}
	}
}

/// Transport state for a single logical call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallPhase {
	/// Nothing sent yet.
	Idle,
	/// A request is in flight.
	Sending,
	/// The service answered HTTP 429.
	RateLimited,
	/// Sleeping before the next attempt.
	Waiting,
	/// A 2xx response was received.
	Succeeded,
	/// The retry budget ran out.
	Exhausted,
	/// A non-retryable failure occurred.
	Failed,
}
impl CallPhase {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Idle => "idle",
			Self::Sending => "sending",
			Self::RateLimited => "rate_limited",
			Self::Waiting => "waiting",
			Self::Succeeded => "succeeded",
			Self::Exhausted => "exhausted",
			Self::Failed => "failed",
		}
	}

	/// Reports whether the phase ends the call.
	pub const fn is_terminal(self) -> bool {
		matches!(self, Self::Succeeded | Self::Exhausted | Self::Failed)
	}
}
impl Display for CallPhase {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Retry bookkeeping scoped to one logical call; dropped when the call resolves.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryState {
	/// HTTP requests issued so far.
	pub attempt: u32,
	/// Attempt ceiling copied from the policy.
	pub max_attempts: u32,
	/// Most recently scheduled wait.
	pub next_delay: Duration,
	/// Current transport phase.
	pub phase: CallPhase,
}
impl RetryState {
	/// Starts a fresh call in [`CallPhase::Idle`].
	pub fn new(policy: &RetryPolicy) -> Self {
		Self {
			attempt: 0,
			max_attempts: policy.max_attempts.max(1),
			next_delay: Duration::ZERO,
			phase: CallPhase::Idle,
		}
	}

	/// Moves to [`CallPhase::Sending`] and counts the request.
	pub fn begin_attempt(&mut self) {
		self.attempt = self.attempt.saturating_add(1);
		self.phase = CallPhase::Sending;
	}

	/// Handles an HTTP 429 and reports whether another attempt is allowed.
	pub fn rate_limited(&mut self) -> bool {
		self.phase = CallPhase::RateLimited;

		if self.attempt >= self.max_attempts {
			self.phase = CallPhase::Exhausted;

			return false;
		}

		true
	}

	/// Records the wait before the next attempt.
	pub fn schedule(&mut self, delay: Duration) {
		self.next_delay = delay;
		self.phase = CallPhase::Waiting;
	}

	/// Zero-based index of the retry about to be scheduled.
	pub fn retry_index(&self) -> u32 {
		self.attempt.saturating_sub(1)
	}

	/// Marks the call as finished in `phase`.
	pub fn finish(&mut self, phase: CallPhase) {
		self.phase = phase;
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn headers(pairs: &[(&str, &str)]) -> ResponseHeaders {
		ResponseHeaders::from_pairs(pairs.iter().map(|(k, v)| (*k, *v)))
	}

	#[test]
	fn reset_header_takes_precedence_over_backoff() {
		let policy = RetryPolicy::default();
		let delay =
			policy.compute_delay(&headers(&[("x-rate-limit-reset", "3")]), 4, &FractionJitter(0.9));

		assert_eq!(
			delay,
			RetryDelay { duration: Duration::from_secs(3), source: DelaySource::ResetHint }
		);

		let delay =
			policy.compute_delay(&headers(&[("X-Rate-Limit-Reset", "0.5")]), 0, &ZeroJitter);

		assert_eq!(delay.duration, Duration::from_millis(500));
	}

	#[test]
	fn invalid_reset_header_falls_back_to_backoff() {
		let policy = RetryPolicy::default();

		for value in ["-1", "soon", "NaN", "inf", ""] {
			let delay = policy.compute_delay(&headers(&[(RESET_HEADER, value)]), 2, &ZeroJitter);

			assert_eq!(
				delay.source,
				DelaySource::Backoff { base: Duration::from_secs(4) },
				"Header value {value:?} must be ignored."
			);
		}
	}

	#[test]
	fn backoff_doubles_then_saturates_at_cap() {
		let policy = RetryPolicy::default();
		let bases = (0..8).map(|retry| policy.backoff(retry)).collect::<Vec<_>>();

		assert_eq!(
			bases,
			[1, 2, 4, 8, 16, 32, 32, 32].map(Duration::from_secs).to_vec(),
			"Backoff should double per retry and saturate at 32s."
		);

		for window in bases[..5].windows(2) {
			assert!(window[0] < window[1]);
		}

		assert_eq!(policy.backoff(u32::MAX), Duration::from_secs(32));
	}

	#[test]
	fn jitter_stays_within_the_base_delay() {
		let policy = RetryPolicy::default();
		let empty = ResponseHeaders::default();

		for retry in 0..4 {
			let base = policy.backoff(retry);

			let sources: [&dyn JitterSource; 3] =
				[&ZeroJitter, &FractionJitter(0.5), &ThreadRngJitter];

			for source in sources {
				let delay = policy.compute_delay(&empty, retry, source).duration;

				assert!(delay >= base && delay < base * 2, "Delay {delay:?} escaped [base, 2x).");
			}

			let delay = policy.compute_delay(&empty, retry, &FractionJitter(7.0)).duration;

			assert!(delay < base * 2, "Misbehaving jitter sources must be clamped.");
		}
	}

	#[test]
	fn retry_state_exhausts_after_max_attempts() {
		let mut state = RetryState::new(&RetryPolicy::default());
		let mut retries = 0;

		loop {
			state.begin_attempt();

			if !state.rate_limited() {
				break;
			}

			state.schedule(Duration::from_secs(1));
			retries += 1;
		}

		assert_eq!(state.attempt, 5);
		assert_eq!(retries, 4);
		assert_eq!(state.phase, CallPhase::Exhausted);
		assert!(state.phase.is_terminal());
	}

	#[test]
	fn max_attempts_never_drops_below_one() {
		assert_eq!(RetryPolicy::default().with_max_attempts(0).max_attempts, 1);
	}
}
