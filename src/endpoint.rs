//! Logical operations exposed by the client and how each one is encoded on the wire.

// self
use crate::{
	_prelude::*,
	query::{QueryParameters, format_iso},
};

/// Page size applied when a paginated endpoint is queried without `limit`.
pub const DEFAULT_LIMIT: u16 = 20;
/// Path prefix shared by every API endpoint.
pub const API_PREFIX: &str = "/api/v0";

/// One GoatCounter API endpoint per logical query kind.
///
/// Serializes as its operation name, matching [`Endpoint::name`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Endpoint {
	/// Current user and API key information.
	#[serde(rename = "get_me")]
	Me,
	/// Sites accessible with the API key.
	#[serde(rename = "list_sites")]
	Sites,
	/// Paths recorded for the site, without statistics.
	#[serde(rename = "list_paths")]
	Paths,
	/// Total pageviews and visitors.
	#[serde(rename = "get_stats_total")]
	StatsTotal,
	/// Pageviews and visitors per path.
	#[serde(rename = "get_stats_hits")]
	StatsHits,
	/// Referrer statistics.
	#[serde(rename = "get_stats_refs")]
	StatsRefs,
	/// Browser statistics.
	#[serde(rename = "get_stats_browsers")]
	StatsBrowsers,
	/// Operating system statistics.
	#[serde(rename = "get_stats_systems")]
	StatsSystems,
	/// Screen size statistics.
	#[serde(rename = "get_stats_sizes")]
	StatsSizes,
	/// Location statistics.
	#[serde(rename = "get_stats_locations")]
	StatsLocations,
}
impl Endpoint {
	/// Every endpoint, in advertisement order.
	pub const ALL: [Self; 10] = [
		Self::Me,
		Self::Sites,
		Self::Paths,
		Self::StatsTotal,
		Self::StatsHits,
		Self::StatsRefs,
		Self::StatsBrowsers,
		Self::StatsSystems,
		Self::StatsSizes,
		Self::StatsLocations,
	];

	/// Operation name a tool layer advertises for this endpoint.
	pub const fn name(self) -> &'static str {
		match self {
			Self::Me => "get_me",
			Self::Sites => "list_sites",
			Self::Paths => "list_paths",
			Self::StatsTotal => "get_stats_total",
			Self::StatsHits => "get_stats_hits",
			Self::StatsRefs => "get_stats_refs",
			Self::StatsBrowsers => "get_stats_browsers",
			Self::StatsSystems => "get_stats_systems",
			Self::StatsSizes => "get_stats_sizes",
			Self::StatsLocations => "get_stats_locations",
		}
	}

	/// Looks up an endpoint by its operation name.
	pub fn from_name(name: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|endpoint| endpoint.name() == name)
	}

	/// Path relative to [`API_PREFIX`].
	pub const fn path(self) -> &'static str {
		match self {
			Self::Me => "/me",
			Self::Sites => "/sites",
			Self::Paths => "/paths",
			Self::StatsTotal => "/stats/total",
			Self::StatsHits => "/stats/hits",
			Self::StatsRefs => "/stats/refs",
			Self::StatsBrowsers => "/stats/browsers",
			Self::StatsSystems => "/stats/systems",
			Self::StatsSizes => "/stats/sizes",
			Self::StatsLocations => "/stats/locations",
		}
	}

	/// Pagination layout of the response, for endpoints that page.
	pub const fn page_shape(self) -> Option<PageShape> {
		match self {
			Self::Me | Self::Sites | Self::StatsTotal => None,
			Self::Paths => Some(PageShape { list_key: "paths", cursor_field: "id" }),
			Self::StatsHits => Some(PageShape { list_key: "hits", cursor_field: "path_id" }),
			Self::StatsRefs
			| Self::StatsBrowsers
			| Self::StatsSystems
			| Self::StatsSizes
			| Self::StatsLocations => Some(PageShape { list_key: "stats", cursor_field: "id" }),
		}
	}

	/// Reports whether the endpoint accepts date range, filter, and daily parameters.
	pub const fn accepts_range(self) -> bool {
		!matches!(self, Self::Me | Self::Sites | Self::Paths)
	}

	/// Encodes the subset of `params` this endpoint understands.
	///
	/// Relative dates resolve against `today`. `/paths` expects capitalized keys.
	pub fn query_pairs(self, params: &QueryParameters, today: Date) -> Vec<(&'static str, String)> {
		let mut pairs = Vec::new();

		if self.accepts_range() {
			if let Some(start) = params.start {
				pairs.push(("start", format_iso(start.resolve(today))));
			}
			if let Some(end) = params.end {
				pairs.push(("end", format_iso(end.resolve(today))));
			}
			if let Some(filter) = &params.filter {
				pairs.push(("filter", filter.clone()));
			}

			pairs.push(("daily", params.daily.to_string()));
		}
		if self.page_shape().is_some() {
			let (limit_key, after_key) =
				if matches!(self, Self::Paths) { ("Limit", "After") } else { ("limit", "after") };

			pairs.push((limit_key, params.limit.unwrap_or(DEFAULT_LIMIT).to_string()));

			if let Some(after) = params.after {
				pairs.push((after_key, after.to_string()));
			}
		}

		pairs
	}
}
impl Display for Endpoint {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.name())
	}
}

/// Where the list and its cursor live inside a paginated response.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageShape {
	/// Top-level key holding the result array.
	pub list_key: &'static str,
	/// Integer field of each entry used as the `after` cursor.
	pub cursor_field: &'static str,
}
