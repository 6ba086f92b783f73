use crate::error::SourceError;
use crate::http::{expect_success, join_url, read_json, send};
use crate::notion::page::Page;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde_json::{json, Value};
use std::future::Future;
use tracing::debug;

pub const SERVICE: &str = "notion";

/// Largest page Notion will return from a database query
pub const PAGE_SIZE: u32 = 100;

/// Base URL, token and API version for one workspace integration
#[derive(Debug, Clone, Copy)]
pub struct Endpoint<'a> {
    pub base_url: &'a str,
    pub token: &'a str,
    pub version: &'a str,
}

impl Endpoint<'_> {
    fn url(&self, path: &str) -> String {
        join_url(self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Notion-Version", self.version)
            .header("Content-Type", "application/json")
    }
}

#[derive(Debug, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub results: Vec<Page>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// One page of rows from a database
pub async fn query_database(
    client: &Client,
    endpoint: Endpoint<'_>,
    database_id: &str,
    start_cursor: Option<&str>,
) -> Result<QueryResponse, SourceError> {
    let mut body = json!({ "page_size": PAGE_SIZE });
    if let Some(cursor) = start_cursor {
        body["start_cursor"] = json!(cursor);
    }

    let url = endpoint.url(&format!("v1/databases/{}/query", database_id));
    debug!(database_id, cursor = ?start_cursor, "Querying Notion database");

    let response = send(SERVICE, endpoint.authorize(client.post(&url)).json(&body)).await?;
    let response = expect_success(SERVICE, response).await?;
    read_json(SERVICE, response).await
}

/// Follow `next_cursor` from the first page until Notion reports no more.
/// `fetch` gets the cursor to start from (`None` for the first page).
pub async fn collect_pages<F, Fut>(mut fetch: F) -> Result<Vec<Page>, SourceError>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<QueryResponse, SourceError>>,
{
    let mut pages = Vec::new();
    let mut cursor: Option<String> = None;
    loop {
        let response = fetch(cursor.take()).await?;
        pages.extend(response.results);

        match response.next_cursor {
            Some(next) if response.has_more => cursor = Some(next),
            _ => return Ok(pages),
        }
    }
}

/// Create a page from a prepared `{parent, properties}` body
pub async fn create_page(client: &Client, endpoint: Endpoint<'_>, body: &Value) -> Result<(), SourceError> {
    let url = endpoint.url("v1/pages");
    let response = send(SERVICE, endpoint.authorize(client.post(&url)).json(body)).await?;
    expect_success(SERVICE, response).await?;
    Ok(())
}

pub async fn archive_page(client: &Client, endpoint: Endpoint<'_>, page_id: &str) -> Result<(), SourceError> {
    let url = endpoint.url(&format!("v1/pages/{}", page_id));
    let body = json!({ "archived": true });
    let response = send(SERVICE, endpoint.authorize(client.patch(&url)).json(&body)).await?;
    expect_success(SERVICE, response).await?;
    Ok(())
}
