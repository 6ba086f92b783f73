//! Request helpers shared by every service client.

use crate::error::SourceError;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::trace;

/// One client per process; connections are pooled across services.
pub fn create_client() -> Client {
    Client::builder()
        .user_agent(concat!("pirrate/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Unwrap an optional setting or fail the call that needs it
pub fn require<'a>(value: &'a Option<String>, setting: &'static str) -> Result<&'a str, SourceError> {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .ok_or(SourceError::MissingSetting { setting })
}

/// Join a base URL and a path without doubling or dropping the slash
pub fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

pub async fn send(service: &'static str, request: RequestBuilder) -> Result<Response, SourceError> {
    request
        .send()
        .await
        .map_err(|source| SourceError::Transport { service, source })
}

/// Pass the response through if its status is `expected`, otherwise turn it
/// into an [`SourceError::Http`] carrying the body text
pub async fn expect_status(
    service: &'static str,
    response: Response,
    expected: StatusCode,
) -> Result<Response, SourceError> {
    let status = response.status();
    if status == expected {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(SourceError::http(service, status.as_u16(), body))
}

/// Like [`expect_status`] but accepts any 2xx
pub async fn expect_success(service: &'static str, response: Response) -> Result<Response, SourceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(SourceError::http(service, status.as_u16(), body))
}

pub async fn read_json<T: DeserializeOwned>(service: &'static str, response: Response) -> Result<T, SourceError> {
    let text = response
        .text()
        .await
        .map_err(|source| SourceError::Transport { service, source })?;
    trace!(service, body = %text, "Raw response body");
    serde_json::from_str(&text).map_err(|e| SourceError::decode(service, e.to_string()))
}
