//! Turn a free-text query into a short list of concrete titles.
//!
//! The metadata search is tried first. Only when it finds nothing is the
//! title suggester asked for guesses, and each guess is searched again so
//! every candidate shown to the user is a real catalog entry.

use media_request_models::{Candidate, Classification};
use media_request_sources::{MetadataProvider, SearchHit, TitleSuggester};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Most candidates ever offered for one query
pub const MAX_CANDIDATES: usize = 5;

static NUMBERED_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\d+\.\s+(.*)$").expect("numbered line regex should compile"));

static TRAILING_PARENTHETICAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\([^()]*\)\s*$").expect("parenthetical regex should compile"));

/// Where the candidates came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "origin", rename_all = "snake_case")]
pub enum Origin {
    Primary,
    /// The suggester was asked; `suggestions` are the cleaned guesses
    Fallback { suggestions: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub candidates: Vec<Candidate>,
    #[serde(flatten)]
    pub origin: Origin,
}

impl Resolution {
    pub fn primary(candidates: Vec<Candidate>) -> Self {
        Self {
            candidates,
            origin: Origin::Primary,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Guessed titles, empty unless the fallback ran
    pub fn suggestions(&self) -> &[String] {
        match &self.origin {
            Origin::Primary => &[],
            Origin::Fallback { suggestions } => suggestions,
        }
    }
}

/// Pull the item text out of every `N. text` line
pub fn parse_numbered_list(text: &str) -> Vec<String> {
    text.lines()
        .filter_map(|line| NUMBERED_LINE.captures(line))
        .filter_map(|caps| caps.get(1))
        .map(|m| clean_guess(m.as_str()))
        .filter(|guess| !guess.is_empty())
        .collect()
}

/// Strip markdown emphasis, surrounding quotes and one trailing
/// parenthetical such as `(2014, UK)`
pub fn clean_guess(raw: &str) -> String {
    let unwrapped = raw.trim().trim_matches(|c: char| matches!(c, '*' | '_' | '`')).trim();
    let without_suffix = TRAILING_PARENTHETICAL.replace(unwrapped, "");
    without_suffix
        .trim()
        .trim_matches(|c: char| matches!(c, '*' | '_' | '`' | '"' | '“' | '”'))
        .trim()
        .to_string()
}

pub struct CandidateResolver {
    metadata: Arc<dyn MetadataProvider>,
    suggester: Option<Arc<dyn TitleSuggester>>,
}

impl CandidateResolver {
    pub fn new(metadata: Arc<dyn MetadataProvider>, suggester: Option<Arc<dyn TitleSuggester>>) -> Self {
        Self { metadata, suggester }
    }

    /// Never fails: service errors are logged and count as "no results"
    #[instrument(skip(self, classification), fields(classification = %classification))]
    pub async fn resolve(&self, query: &str, classification: Classification) -> Resolution {
        let hits = self.search(query, classification).await;
        if !hits.is_empty() {
            let candidates = self.enrich(hits, classification).await;
            return Resolution::primary(candidates);
        }

        let Some(suggester) = &self.suggester else {
            info!(query, "No search results and no title suggester configured");
            return Resolution::primary(Vec::new());
        };

        info!(query, classification = %classification, "No search results, asking for title suggestions");
        let reply = match suggester.suggest_titles(query, classification).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(query, error = %e, "Title suggestion failed");
                return Resolution {
                    candidates: Vec::new(),
                    origin: Origin::Fallback { suggestions: Vec::new() },
                };
            }
        };

        let suggestions: Vec<String> = parse_numbered_list(&reply).into_iter().take(MAX_CANDIDATES).collect();
        debug!(?suggestions, "Parsed title suggestions");

        let mut seen = HashSet::new();
        let mut merged = Vec::new();
        for guess in &suggestions {
            for hit in self.search(guess, classification).await {
                if seen.insert(hit.tmdb_id) {
                    merged.push(hit);
                }
            }
        }
        merged.truncate(MAX_CANDIDATES);

        let candidates = self.enrich(merged, classification).await;
        Resolution {
            candidates,
            origin: Origin::Fallback { suggestions },
        }
    }

    async fn search(&self, query: &str, classification: Classification) -> Vec<SearchHit> {
        match self.metadata.search(query, classification).await {
            Ok(mut hits) => {
                hits.truncate(MAX_CANDIDATES);
                hits
            }
            Err(e) => {
                warn!(query, error = %e, "Metadata search failed");
                Vec::new()
            }
        }
    }

    /// Attach genres; a failed details call just leaves them empty
    async fn enrich(&self, hits: Vec<SearchHit>, classification: Classification) -> Vec<Candidate> {
        let mut candidates = Vec::with_capacity(hits.len());
        for hit in hits {
            let genres = match self.metadata.genres(hit.tmdb_id, classification).await {
                Ok(genres) => genres,
                Err(e) => {
                    debug!(tmdb_id = hit.tmdb_id, error = %e, "Genre lookup failed");
                    Vec::new()
                }
            };
            candidates.push(Candidate::new(hit.name, hit.release_date.as_deref(), hit.tmdb_id).with_genres(genres));
        }
        candidates
    }
}
