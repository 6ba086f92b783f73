use crate::error::SourceError;
use crate::http::{expect_success, join_url, read_json, send};
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub const SERVICE: &str = "deepseek";

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

fn first_reply(response: ChatResponse) -> Result<String, SourceError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| SourceError::decode(SERVICE, "response has no choices"))
}

/// Run one chat completion and return the first choice's text
pub async fn chat_completion(
    client: &Client,
    base_url: &str,
    api_key: &str,
    request: &ChatRequest<'_>,
) -> Result<String, SourceError> {
    let builder = client
        .post(join_url(base_url, "chat/completions"))
        .bearer_auth(api_key)
        .json(request);
    let response = expect_success(SERVICE, send(SERVICE, builder).await?).await?;
    let body: ChatResponse = read_json(SERVICE, response).await?;
    first_reply(body)
}
