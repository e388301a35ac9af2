//! Randomness sources for backoff jitter.

// crates.io
use rand::Rng;
// self
use crate::_prelude::*;

/// Supplies the random component added to exponential backoff.
///
/// Implementations should return a value in `[0, bound)`; the policy clamps anything
/// larger so a misbehaving source can never push a wait past twice its base.
pub trait JitterSource
where
	Self: Send + Sync,
{
	/// Draws a jitter value for the provided upper bound.
	fn jitter(&self, bound: Duration) -> Duration;
}

/// Uniform jitter drawn from the thread-local RNG.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadRngJitter;
impl JitterSource for ThreadRngJitter {
	fn jitter(&self, bound: Duration) -> Duration {
		let nanos = u64::try_from(bound.as_nanos()).unwrap_or(u64::MAX);

		if nanos == 0 {
			return Duration::ZERO;
		}

		Duration::from_nanos(rand::rng().random_range(0..nanos))
	}
}

/// Disables jitter entirely.
#[derive(Clone, Copy, Debug, Default)]
pub struct ZeroJitter;
impl JitterSource for ZeroJitter {
	fn jitter(&self, _bound: Duration) -> Duration {
		Duration::ZERO
	}
}

/// Deterministic jitter equal to a fixed fraction of the bound.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FractionJitter(pub f64);
impl JitterSource for FractionJitter {
	fn jitter(&self, bound: Duration) -> Duration {
		if !self.0.is_finite() || self.0 <= 0. {
			return Duration::ZERO;
		}

		Duration::try_from_secs_f64(bound.as_secs_f64() * self.0).unwrap_or(Duration::MAX)
	}
}

/// Draws jitter and clamps it into `[0, bound)`.
pub(crate) fn bounded_jitter(source: &dyn JitterSource, bound: Duration) -> Duration {
	if bound.is_zero() {
		return Duration::ZERO;
	}

	source.jitter(bound).min(bound.saturating_sub(Duration::from_nanos(1)))
}
