use crate::deepseek::api::{self, ChatMessage, ChatRequest};
use crate::error::SourceError;
use crate::http::require;
use crate::traits::TitleSuggester;
use async_trait::async_trait;
use media_request_config::Settings;
use media_request_models::Classification;
use reqwest::Client;
use std::sync::Arc;
use tracing::debug;

const SYSTEM_PROMPT: &str = "You are a movie and TV title lookup assistant.";

/// Ask for real titles only, one per numbered line
pub fn suggestion_prompt(query: &str, classification: Classification) -> String {
    format!(
        "A user searching for a {label} typed: \"{query}\"\n\
         Return up to 5 real {label} titles that exactly or closely match what they meant.\n\
         Answer with a numbered list only, one title per line, for example:\n\
         1. Title",
        label = classification.label(),
        query = query,
    )
}

#[derive(Clone)]
pub struct DeepseekClient {
    client: Arc<Client>,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl DeepseekClient {
    pub fn new(client: Arc<Client>, settings: &Settings) -> Self {
        Self {
            client,
            base_url: settings.deepseek_base_url.clone(),
            model: settings.deepseek_model.clone(),
            api_key: settings.deepseek_api_key.clone(),
        }
    }

}

#[async_trait]
impl TitleSuggester for DeepseekClient {
    async fn suggest_titles(&self, query: &str, classification: Classification) -> Result<String, SourceError> {
        let api_key = require(&self.api_key, "DEEPSEEK_API_KEY")?;
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage::system(SYSTEM_PROMPT),
                ChatMessage::user(suggestion_prompt(query, classification)),
            ],
        };
        let reply = api::chat_completion(&self.client, &self.base_url, api_key, &request).await?;
        debug!(query, reply = %reply, "Title suggestions received");
        Ok(reply)
    }
}
