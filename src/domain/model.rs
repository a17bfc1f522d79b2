use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::Display;
use std::str::FromStr;

pub type CharityId = i64;
pub type SupplierId = i64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Charity {
    pub charity_id: CharityId,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
    pub supplier_id: SupplierId,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    pub charity_id: CharityId,
    pub supplier_id: SupplierId,
    pub rating: i64,
}

/// A supplier ranked for one charity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredSupplier {
    pub supplier_id: SupplierId,
    pub name: String,
    pub avg_rating: f64,
    pub distance_km: f64,
    /// Only reported under [`RankingPolicy::Composite`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

/// The three flat tables backing the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dataset {
    Charities,
    Suppliers,
    Ratings,
}

impl Dataset {
    pub const ALL: [Dataset; 3] = [Dataset::Charities, Dataset::Suppliers, Dataset::Ratings];

    pub fn file_name(self) -> &'static str {
        match self {
            Dataset::Charities => "charities.csv",
            Dataset::Suppliers => "suppliers.csv",
            Dataset::Ratings => "ratings.csv",
        }
    }

    pub fn headers(self) -> &'static [&'static str] {
        match self {
            Dataset::Charities => &["charity_id", "name", "lat", "lng"],
            Dataset::Suppliers => &["supplier_id", "name", "lat", "lng"],
            Dataset::Ratings => &["charity_id", "supplier_id", "rating"],
        }
    }
}

/// How candidate suppliers are filtered and ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankingPolicy {
    /// Drop suppliers beyond the distance cap, then order by average rating
    /// (descending) and distance (ascending).
    #[default]
    Lexicographic,
    /// No distance cap; order by `avg_rating / (distance_km + 1e-5)` descending.
    Composite,
}

impl std::str::FromStr for RankingPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lexicographic" => Ok(RankingPolicy::Lexicographic),
            "composite" => Ok(RankingPolicy::Composite),
            other => Err(format!(
                "unknown ranking policy '{}', expected 'lexicographic' or 'composite'",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecommendOptions {
    pub max_distance_km: f64,
    pub top_n: usize,
    pub policy: RankingPolicy,
}

impl Default for RecommendOptions {
    fn default() -> Self {
        Self {
            max_distance_km: 50.0,
            top_n: 5,
            policy: RankingPolicy::Lexicographic,
        }
    }
}

/// Optional equality filters for the ratings listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct RatingFilter {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub charity_id: Option<CharityId>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub supplier_id: Option<SupplierId>,
}

/// Query-string helper: `?key=` (blank value) means the key was not given.
pub fn empty_as_none<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse::<T>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

impl RatingFilter {
    pub fn matches(&self, rating: &Rating) -> bool {
        self.charity_id.map_or(true, |id| rating.charity_id == id)
            && self.supplier_id.map_or(true, |id| rating.supplier_id == id)
    }
}
