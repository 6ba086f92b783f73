use crate::error::SourceError;
use crate::http::{expect_success, join_url, read_json, send};
use crate::traits::SearchHit;
use media_request_models::Classification;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

pub const SERVICE: &str = "tmdb";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

/// Movies carry `title`/`release_date`, series `name`/`first_air_date`
#[derive(Debug, Deserialize)]
struct SearchResult {
    id: u64,
    name: Option<String>,
    title: Option<String>,
    original_name: Option<String>,
    original_title: Option<String>,
    release_date: Option<String>,
    first_air_date: Option<String>,
}

impl SearchResult {
    fn into_hit(self) -> Option<SearchHit> {
        let name = [self.name, self.title, self.original_name, self.original_title]
            .into_iter()
            .flatten()
            .find(|n| !n.trim().is_empty())?;
        let release_date = self
            .first_air_date
            .or(self.release_date)
            .filter(|d| !d.trim().is_empty());
        Some(SearchHit {
            tmdb_id: self.id,
            name,
            release_date,
        })
    }
}

#[derive(Debug, Deserialize)]
struct Details {
    #[serde(default)]
    genres: Vec<Genre>,
}

#[derive(Debug, Deserialize)]
struct Genre {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ExternalIds {
    tvdb_id: Option<u64>,
}

fn get(client: &Client, base_url: &str, path: &str, api_key: &str) -> reqwest::RequestBuilder {
    client
        .get(join_url(base_url, path))
        .query(&[("api_key", api_key)])
}

/// Search results in the order TMDB returns them; results without any name
/// are dropped
pub async fn search(
    client: &Client,
    base_url: &str,
    api_key: &str,
    query: &str,
    classification: Classification,
) -> Result<Vec<SearchHit>, SourceError> {
    let path = format!("search/{}", classification.endpoint());
    let request = get(client, base_url, &path, api_key).query(&[("query", query)]);
    let response = expect_success(SERVICE, send(SERVICE, request).await?).await?;
    let body: SearchResponse = read_json(SERVICE, response).await?;

    let hits: Vec<SearchHit> = body.results.into_iter().filter_map(SearchResult::into_hit).collect();
    debug!(query, classification = %classification, count = hits.len(), "TMDB search");
    Ok(hits)
}

pub async fn genres(
    client: &Client,
    base_url: &str,
    api_key: &str,
    tmdb_id: u64,
    classification: Classification,
) -> Result<Vec<String>, SourceError> {
    let path = format!("{}/{}", classification.endpoint(), tmdb_id);
    let response = expect_success(SERVICE, send(SERVICE, get(client, base_url, &path, api_key)).await?).await?;
    let details: Details = read_json(SERVICE, response).await?;
    Ok(details.genres.into_iter().map(|g| g.name).collect())
}

/// TVDB id of a series. TMDB reports unmapped series as null or 0.
pub async fn tvdb_id(client: &Client, base_url: &str, api_key: &str, tmdb_id: u64) -> Result<Option<u64>, SourceError> {
    let path = format!("tv/{}/external_ids", tmdb_id);
    let response = expect_success(SERVICE, send(SERVICE, get(client, base_url, &path, api_key)).await?).await?;
    let ids: ExternalIds = read_json(SERVICE, response).await?;
    Ok(ids.tvdb_id.filter(|id| *id != 0))
}
