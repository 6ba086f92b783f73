use crate::error::SourceError;
use crate::http::{expect_status, join_url, read_json, send};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::debug;

/// Connection details for one Sonarr/Radarr instance
#[derive(Debug, Clone, Copy)]
pub struct Instance<'a> {
    pub service: &'static str,
    pub url: &'a str,
    pub api_key: &'a str,
}

impl Instance<'_> {
    fn url(&self, path: &str) -> String {
        join_url(self.url, path)
    }
}

/// `GET /api/v3/{resource}/lookup?term=...`; anything but 200 is an error
pub async fn lookup(client: &Client, instance: Instance<'_>, resource: &str, term: &str) -> Result<Vec<Value>, SourceError> {
    let request = client
        .get(instance.url(&format!("api/v3/{}/lookup", resource)))
        .header("X-Api-Key", instance.api_key)
        .query(&[("term", term)]);
    let response = send(instance.service, request).await?;
    let response = expect_status(instance.service, response, StatusCode::OK).await?;
    let results: Vec<Value> = read_json(instance.service, response).await?;
    debug!(service = instance.service, term, count = results.len(), "Lookup finished");
    Ok(results)
}

/// `POST /api/v3/{resource}`; only 201 Created counts as added
pub async fn add(client: &Client, instance: Instance<'_>, resource: &str, body: &Value) -> Result<(), SourceError> {
    let request = client
        .post(instance.url(&format!("api/v3/{}", resource)))
        .header("X-Api-Key", instance.api_key)
        .json(body);
    let response = send(instance.service, request).await?;
    expect_status(instance.service, response, StatusCode::CREATED).await?;
    Ok(())
}
