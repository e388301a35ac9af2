//! Raw tool arguments and their normalized form.

// self
use crate::{
	_prelude::*,
	query::{DateSpec, LIMIT_MAX, LIMIT_MIN, ValidationError},
};

/// Loosely typed query arguments as received from a tool call.
///
/// Every field is optional; empty or whitespace-only strings count as absent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryInput {
	/// Start bound (`YYYY-MM-DD` or relative, e.g. `7 days ago`).
	pub start: Option<String>,
	/// End bound (`YYYY-MM-DD` or relative, e.g. `yesterday`).
	pub end: Option<String>,
	/// Path filter, e.g. `/blog*`.
	pub filter: Option<String>,
	/// Requests per-day statistics instead of totals.
	pub daily: Option<bool>,
	/// Page size in `[1, 200]`.
	pub limit: Option<i64>,
	/// Pagination cursor.
	pub after: Option<i64>,
}
impl QueryInput {
	/// Validates the arguments and produces canonical [`QueryParameters`].
	pub fn normalize(&self) -> Result<QueryParameters, ValidationError> {
		let start = parse_bound("start", self.start.as_deref())?;
		let end = parse_bound("end", self.end.as_deref())?;
		let filter = non_blank(self.filter.as_deref()).map(str::to_owned);
		let limit = self.limit.map(check_limit).transpose()?;
		let after = self
			.after
			.map(|value| u64::try_from(value).map_err(|_| ValidationError::NegativeCursor { value }))
			.transpose()?;

		Ok(QueryParameters { start, end, filter, daily: self.daily.unwrap_or(false), limit, after })
	}
}

/// Canonical request parameters shared by every endpoint.
///
/// `limit` stays unset when the caller omitted it; endpoints that paginate apply their own
/// default when encoding the request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct QueryParameters {
	/// Start bound.
	pub start: Option<DateSpec>,
	/// End bound.
	pub end: Option<DateSpec>,
	/// Path filter.
	pub filter: Option<String>,
	/// Per-day statistics flag.
	pub daily: bool,
	/// Page size in `[1, 200]`, when set.
	pub limit: Option<u16>,
	/// Pagination cursor.
	pub after: Option<u64>,
}
impl QueryParameters {
	/// Sets both date bounds.
	pub fn with_range(mut self, start: DateSpec, end: DateSpec) -> Self {
		self.start = Some(start);
		self.end = Some(end);

		self
	}

	/// Sets the path filter; blank filters clear it.
	pub fn with_filter(mut self, filter: impl AsRef<str>) -> Self {
		self.filter = non_blank(Some(filter.as_ref())).map(str::to_owned);

		self
	}

	/// Toggles per-day statistics.
	pub fn with_daily(mut self, daily: bool) -> Self {
		self.daily = daily;

		self
	}

	/// Sets the page size after range validation.
	pub fn with_limit(mut self, limit: i64) -> Result<Self, ValidationError> {
		self.limit = Some(check_limit(limit)?);

		Ok(self)
	}

	/// Sets the pagination cursor.
	pub fn with_after(mut self, after: u64) -> Self {
		self.after = Some(after);

		self
	}

	/// Re-checks the invariants the builders enforce, for values assembled field by field.
	pub fn validate(&self) -> Result<(), ValidationError> {
		if let Some(limit) = self.limit {
			check_limit(i64::from(limit))?;
		}

		Ok(())
	}
}

fn non_blank(value: Option<&str>) -> Option<&str> {
	value.map(str::trim).filter(|value| !value.is_empty())
}

fn parse_bound(field: &'static str, raw: Option<&str>) -> Result<Option<DateSpec>, ValidationError> {
	non_blank(raw)
		.map(|value| {
			DateSpec::parse(value)
				.ok_or_else(|| ValidationError::InvalidDate { field, value: value.to_owned() })
		})
		.transpose()
}

fn check_limit(value: i64) -> Result<u16, ValidationError> {
	if !(LIMIT_MIN..=LIMIT_MAX).contains(&value) {
		return Err(ValidationError::LimitOutOfRange { value });
	}

	u16::try_from(value).map_err(|_| ValidationError::LimitOutOfRange { value })
}
