//! Mapping between request rows and Notion page JSON.

use chrono::{DateTime, Utc};
use media_request_models::{Classification, CompletedRequest, NewRequest, PendingRequest, WAITING_STATUS};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;

pub const TITLE_PROPERTY: &str = "Raw Title";
pub const NOTES_PROPERTY: &str = "Notes";
pub const TVDB_ID_PROPERTY: &str = "TVDB ID";
pub const TMDB_ID_PROPERTY: &str = "TMDB ID";
pub const CONFIRMED_PROPERTY: &str = "Confirmed";
pub const ADDED_PROPERTY: &str = "Added";
pub const SYSTEM_RESPONSE_PROPERTY: &str = "System Response";

#[derive(Debug, Deserialize)]
pub struct Page {
    pub id: String,
    #[serde(default)]
    pub created_time: Option<String>,
    #[serde(default)]
    pub properties: HashMap<String, Value>,
}

#[derive(Debug, Deserialize)]
struct RichTextFragment {
    #[serde(default)]
    plain_text: Option<String>,
    #[serde(default)]
    text: Option<TextContent>,
}

#[derive(Debug, Deserialize)]
struct TextContent {
    content: String,
}

#[derive(Debug, Deserialize)]
struct SelectOption {
    name: String,
}

fn id_property(classification: Classification) -> &'static str {
    match classification {
        Classification::Tv => TVDB_ID_PROPERTY,
        Classification::Movie => TMDB_ID_PROPERTY,
    }
}

fn property<'a>(properties: &'a HashMap<String, Value>, name: &str, kind: &str) -> Option<&'a Value> {
    properties.get(name).and_then(|p| p.get(kind))
}

fn text_property(properties: &HashMap<String, Value>, name: &str, kind: &str) -> Option<String> {
    let fragments: Vec<RichTextFragment> = property(properties, name, kind)
        .and_then(|v| serde_json::from_value(v.clone()).ok())?;
    let text: String = fragments
        .into_iter()
        .filter_map(|f| f.plain_text.or_else(|| f.text.map(|t| t.content)))
        .collect();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn tags_property(properties: &HashMap<String, Value>, name: &str) -> Vec<String> {
    property(properties, name, "multi_select")
        .and_then(|v| serde_json::from_value::<Vec<SelectOption>>(v.clone()).ok())
        .map(|options| options.into_iter().map(|o| o.name).collect())
        .unwrap_or_default()
}

/// Numbers are stored as floats by Notion. Zero is the "no id" sentinel.
fn id_number_property(properties: &HashMap<String, Value>, name: &str) -> Option<u64> {
    let number = property(properties, name, "number")?.as_f64()?;
    if number.is_finite() && number >= 1.0 && number.fract() == 0.0 {
        Some(number as u64)
    } else {
        None
    }
}

fn checkbox_property(properties: &HashMap<String, Value>, name: &str) -> bool {
    property(properties, name, "checkbox")
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

impl Page {
    /// Decode a row; missing or mistyped properties read as absent
    pub fn into_request(self) -> PendingRequest {
        let props = &self.properties;
        PendingRequest {
            title: text_property(props, TITLE_PROPERTY, "title"),
            tags: tags_property(props, NOTES_PROPERTY),
            tvdb_id: id_number_property(props, TVDB_ID_PROPERTY),
            tmdb_id: id_number_property(props, TMDB_ID_PROPERTY),
            confirmed: checkbox_property(props, CONFIRMED_PROPERTY),
            added: checkbox_property(props, ADDED_PROPERTY),
            system_response: text_property(props, SYSTEM_RESPONSE_PROPERTY, "rich_text"),
            created_at: self
                .created_time
                .as_deref()
                .and_then(|t| DateTime::parse_from_rfc3339(t).ok())
                .map(|dt| dt.with_timezone(&Utc)),
            page_id: self.id,
        }
    }
}

fn title_value(content: &str) -> Value {
    json!({ "title": [{ "text": { "content": content } }] })
}

fn rich_text_value(content: &str) -> Value {
    json!({ "rich_text": [{ "text": { "content": content } }] })
}

/// Body of the create-page call for a freshly submitted request
pub fn pending_page(database_id: &str, request: &NewRequest) -> Value {
    let mut properties = serde_json::Map::new();
    properties.insert(TITLE_PROPERTY.to_string(), title_value(&request.title));
    properties.insert(
        id_property(request.classification).to_string(),
        // Absent ids are written as the zero sentinel
        json!({ "number": request.cross_ref_id.unwrap_or(0) }),
    );
    properties.insert(
        NOTES_PROPERTY.to_string(),
        json!({ "multi_select": [{ "name": request.classification.tag() }] }),
    );
    properties.insert(CONFIRMED_PROPERTY.to_string(), json!({ "checkbox": true }));
    properties.insert(ADDED_PROPERTY.to_string(), json!({ "checkbox": false }));
    properties.insert(SYSTEM_RESPONSE_PROPERTY.to_string(), rich_text_value(WAITING_STATUS));

    json!({
        "parent": { "database_id": database_id },
        "properties": properties,
    })
}

/// Body of the create-page call for the completed store
pub fn completed_page(database_id: &str, completed: &CompletedRequest) -> Value {
    let tags: Vec<Value> = completed.tags.iter().map(|t| json!({ "name": t })).collect();

    let mut properties = serde_json::Map::new();
    properties.insert(TITLE_PROPERTY.to_string(), title_value(&completed.title));
    properties.insert(NOTES_PROPERTY.to_string(), json!({ "multi_select": tags }));
    properties.insert(
        id_property(completed.classification).to_string(),
        json!({ "number": completed.cross_ref_id }),
    );
    properties.insert(CONFIRMED_PROPERTY.to_string(), json!({ "checkbox": true }));
    properties.insert(ADDED_PROPERTY.to_string(), json!({ "checkbox": true }));
    properties.insert(SYSTEM_RESPONSE_PROPERTY.to_string(), rich_text_value(completed.status()));

    json!({
        "parent": { "database_id": database_id },
        "properties": properties,
    })
}
