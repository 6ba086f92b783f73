use serde::{Deserialize, Serialize};
use std::fmt;

/// Year shown when the metadata service has no release date
pub const UNKNOWN_YEAR: &str = "unknown";

/// A single search match offered to the user.
///
/// Candidates live only for the duration of one search/select round and are
/// never written anywhere directly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Candidate {
    pub name: String,
    /// 4-digit year or [`UNKNOWN_YEAR`]
    pub year: String,
    /// Primary key in the metadata service
    pub tmdb_id: u64,
    #[serde(default)]
    pub genres: Vec<String>,
}

impl Candidate {
    pub fn new(name: impl Into<String>, release_date: Option<&str>, tmdb_id: u64) -> Self {
        Self {
            name: name.into(),
            year: year_from_date(release_date),
            tmdb_id,
            genres: Vec::new(),
        }
    }

    pub fn with_genres(mut self, genres: Vec<String>) -> Self {
        self.genres = genres;
        self
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.year)
    }
}

/// First four characters of a release date, or [`UNKNOWN_YEAR`].
pub fn year_from_date(date: Option<&str>) -> String {
    match date.map(str::trim).filter(|d| !d.is_empty()) {
        Some(d) => d.chars().take(4).collect(),
        None => UNKNOWN_YEAR.to_string(),
    }
}
