//! Wire types for the backend JSON contract.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::llm::ChatMessage;

/// `GET /api/providers`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvidersResponse {
    #[serde(default)]
    pub providers: Vec<String>,
    #[serde(rename = "default", default)]
    pub default_provider: String,
}

/// `POST /api/chat` with a single prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptRequest {
    pub provider: Option<String>,
    pub prompt: String,
    pub system: Option<String>,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
}

/// `POST /api/chat` with a native message list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessagesRequest {
    pub provider: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
}

/// Reply to a prompt request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptReply {
    #[serde(default)]
    pub response: Option<String>,
}

/// Fallback shown when the backend returns nothing usable.
pub const NO_RESPONSE: &str = "(no response)";

impl PromptReply {
    /// Response text, or [`NO_RESPONSE`] when missing or empty.
    pub fn text(&self) -> &str {
        match self.response.as_deref() {
            Some(text) if !text.is_empty() => text,
            _ => NO_RESPONSE,
        }
    }
}

/// Extract the assistant text from a messages-format reply.
///
/// The backend may answer with a bare JSON string or with an object carrying
/// `response`, `message` or `content` (first non-empty string wins). Any
/// other object is shown serialized.
pub fn reply_text(reply: &Value) -> String {
    match reply {
        Value::String(text) => text.clone(),
        Value::Object(map) => ["response", "message", "content"]
            .iter()
            .find_map(|key| match map.get(*key) {
                Some(Value::String(text)) if !text.is_empty() => Some(text.clone()),
                _ => None,
            })
            .unwrap_or_else(|| reply.to_string()),
        Value::Null => NO_RESPONSE.to_string(),
        other => other.to_string(),
    }
}

/// `POST /api/story`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoryRequest {
    pub trama: String,
    pub genero: Option<String>,
    pub arco: Option<String>,
    pub personajes: Vec<String>,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
    pub model: Option<String>,
    pub mode: Option<String>,
    pub experiment_id: Option<String>,
    pub aoi_names: Option<Vec<String>>,
    pub strategy: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryResponse {
    pub story: String,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

/// A selectable option (creation mode, AOI strategy, generation method).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// `GET /api/options`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OptionsResponse {
    pub models: Vec<String>,
    pub default_model: Option<String>,
    pub default_mode: Option<String>,
    pub modes: Vec<Choice>,
    pub aoi_names: Vec<String>,
    pub strategies: Vec<Choice>,
    pub generation_methods: Vec<Choice>,
}

/// A canned story setup that can be replayed into the story form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experiment {
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub trama: String,
    #[serde(default)]
    pub genero: Option<String>,
    #[serde(default)]
    pub arco: Option<String>,
    #[serde(default)]
    pub personajes: Vec<String>,
    #[serde(default)]
    pub aoi_names: Vec<String>,
    #[serde(default)]
    pub strategy: Option<String>,
}

/// `GET /api/experiments`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperimentsResponse {
    #[serde(default)]
    pub experiments: Vec<Experiment>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reply_text_variants() {
        assert_eq!(reply_text(&json!("plain")), "plain");
        assert_eq!(reply_text(&json!({"response": "a", "content": "b"})), "a");
        assert_eq!(reply_text(&json!({"response": "", "message": "m"})), "m");
        assert_eq!(reply_text(&json!({"content": "c"})), "c");
        assert_eq!(reply_text(&json!({"other": 1})), r#"{"other":1}"#);
        assert_eq!(reply_text(&Value::Null), NO_RESPONSE);
    }

    #[test]
    fn test_prompt_request_sends_nulls() {
        let req = PromptRequest {
            provider: Some("openai".to_string()),
            prompt: "hi".to_string(),
            system: None,
            temperature: None,
            max_tokens: Some(64),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["system"], Value::Null);
        assert_eq!(json["temperature"], Value::Null);
        assert_eq!(json["max_tokens"], 64);
    }

    #[test]
    fn test_options_camel_case() {
        let options: OptionsResponse = serde_json::from_value(json!({
            "models": ["gpt-4o-mini"],
            "defaultModel": "gpt-4o-mini",
            "defaultMode": "0",
            "modes": [{"id": "0", "name": "Mode 0", "description": "raw"}],
            "aoiNames": ["JOURNEY"],
            "strategies": [{"id": "sequential", "name": "Sequential"}],
            "generationMethods": []
        }))
        .unwrap();
        assert_eq!(options.default_model.as_deref(), Some("gpt-4o-mini"));
        assert_eq!(options.modes[0].id, "0");
        assert_eq!(options.aoi_names, vec!["JOURNEY"]);
        assert!(options.strategies[0].description.is_empty());
    }

    #[test]
    fn test_prompt_reply_fallback() {
        assert_eq!(PromptReply::default().text(), NO_RESPONSE);
        let reply = PromptReply {
            response: Some("ok".to_string()),
        };
        assert_eq!(reply.text(), "ok");
    }
}
