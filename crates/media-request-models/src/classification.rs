use serde::{Deserialize, Serialize};
use std::fmt;

/// Which catalog a request belongs to.
///
/// The tag is what gets written into the request database's multi-select
/// column, and it decides which cross-reference id and which acquisition
/// service a request is routed to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Classification {
    Tv,
    Movie,
}

impl Classification {
    /// Multi-select tag stored on request rows
    pub fn tag(&self) -> &'static str {
        match self {
            Classification::Tv => "TV",
            Classification::Movie => "Movie",
        }
    }

    /// Path segment used by the metadata service ("tv" / "movie")
    pub fn endpoint(&self) -> &'static str {
        match self {
            Classification::Tv => "tv",
            Classification::Movie => "movie",
        }
    }

    /// Human label used in prompts
    pub fn label(&self) -> &'static str {
        match self {
            Classification::Tv => "TV show",
            Classification::Movie => "movie",
        }
    }

    /// Name of the catalog whose id the acquisition service is keyed on
    pub fn cross_ref_catalog(&self) -> &'static str {
        match self {
            Classification::Tv => "tvdb",
            Classification::Movie => "tmdb",
        }
    }

    /// Picks the classification from a row's tags.
    ///
    /// "TV" wins when a row carries both tags.
    pub fn from_tags<S: AsRef<str>>(tags: &[S]) -> Option<Self> {
        if tags.iter().any(|t| t.as_ref() == "TV") {
            Some(Classification::Tv)
        } else if tags.iter().any(|t| t.as_ref() == "Movie") {
            Some(Classification::Movie)
        } else {
            None
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}
