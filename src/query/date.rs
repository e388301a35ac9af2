//! Absolute and relative date bounds.

// crates.io
use time::{format_description::BorrowedFormatItem, macros::format_description};
// self
use crate::_prelude::*;

const ISO_DATE: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");
/// Upper bound for `N days ago`, roughly one century.
pub const MAX_DAYS_AGO: u32 = 36_525;

/// Date bound accepted by stats queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DateSpec {
	/// Calendar date in `YYYY-MM-DD` form.
	Absolute(Date),
	/// The current day.
	Today,
	/// `N` days before the current day; `yesterday` parses as `DaysAgo(1)`.
	DaysAgo(u32),
}
impl DateSpec {
	/// Parses an ISO date or one of `today`, `yesterday`, `N day(s) ago`.
	///
	/// Matching is case-insensitive and tolerates surrounding or repeated whitespace.
	pub fn parse(input: &str) -> Option<Self> {
		let normalized = input.trim().to_ascii_lowercase();
		let words = normalized.split_whitespace().collect::<Vec<_>>();

		match words.as_slice() {
			["today"] => Some(Self::Today),
			["yesterday"] => Some(Self::DaysAgo(1)),
			[count, "day" | "days", "ago"] => {
				let days = count.parse::<u32>().ok()?;

				(days <= MAX_DAYS_AGO).then_some(Self::DaysAgo(days))
			},
			[iso] => Date::parse(iso, ISO_DATE).ok().map(Self::Absolute),
			_ => None,
		}
	}

	/// Resolves the bound to a concrete calendar date relative to `today`.
	pub fn resolve(self, today: Date) -> Date {
		match self {
			Self::Absolute(date) => date,
			Self::Today => today,
			Self::DaysAgo(days) => today.saturating_sub(time::Duration::days(i64::from(days))),
		}
	}
}
impl Display for DateSpec {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::Absolute(date) => f.write_str(&format_iso(*date)),
			Self::Today => f.write_str("today"),
			Self::DaysAgo(1) => f.write_str("yesterday"),
			Self::DaysAgo(days) => write!(f, "{days} days ago"),
		}
	}
}

/// Formats a date as `YYYY-MM-DD`, the wire format the API expects.
pub fn format_iso(date: Date) -> String {
	format!("{:04}-{:02}-{:02}", date.year(), u8::from(date.month()), date.day())
}
