//! Query parameter normalizer: loosely typed tool arguments in, canonical parameters out.
//!
//! Normalization is synchronous and free of side effects. Relative dates stay relative
//! until the transport boundary resolves them against the current day, so the same
//! input always normalizes to the same [`QueryParameters`].

pub mod date;
pub mod params;

pub use date::*;
pub use params::*;

// self
use crate::_prelude::*;

/// Smallest accepted page size.
pub const LIMIT_MIN: i64 = 1;
/// Largest accepted page size.
pub const LIMIT_MAX: i64 = 200;

/// Errors emitted when caller-supplied parameters are malformed or out of range.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum ValidationError {
	/// A date bound could not be parsed as an ISO date or relative expression.
	#[error("Parameter `{field}` holds an invalid date: {value:?}.")]
	InvalidDate {
		/// Parameter name (`start` or `end`).
		field: &'static str,
		/// Raw value supplied by the caller.
		value: String,
	},
	/// The page size lies outside `[LIMIT_MIN, LIMIT_MAX]`.
	#[error("Parameter `limit` must lie in [{LIMIT_MIN}, {LIMIT_MAX}], got {value}.")]
	LimitOutOfRange {
		/// Raw value supplied by the caller.
		value: i64,
	},
	/// The pagination cursor was negative.
	#[error("Parameter `after` must be a non-negative integer, got {value}.")]
	NegativeCursor {
		/// Raw value supplied by the caller.
		value: i64,
	},
}
impl ValidationError {
	/// Short machine-readable reason for the failure.
	pub const fn reason(&self) -> &'static str {
		match self {
			Self::InvalidDate { .. } => "invalid date",
			Self::LimitOutOfRange { .. } => "limit out of range",
			Self::NegativeCursor { .. } => "invalid cursor",
		}
	}
}
