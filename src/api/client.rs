//! reqwest-backed implementation of [`PlaygroundApi`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use super::error::{classify_http_status, ApiError};
use super::types::*;
use super::PlaygroundApi;
use crate::config::Config;

/// Message used when the provider list cannot be loaded.
pub const PROVIDERS_UNAVAILABLE: &str = "could not load the provider list";

/// HTTP client for the playground backend.
#[derive(Debug, Clone)]
pub struct PlaygroundClient {
    http: reqwest::Client,
    base_url: Url,
}

impl PlaygroundClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        let mut base_url = Url::parse(base_url)?;
        // Url::join replaces the last segment unless the path ends in '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { http, base_url })
    }

    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        Self::new(config.api_url.as_str(), config.timeout)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(path)?)
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Response, ApiError> {
        let url = self.endpoint(path)?;
        tracing::debug!(%method, %url, "backend request");

        let mut request = self.http.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;

        if response.status().is_success() {
            return Ok(response);
        }
        Err(status_error(response).await)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send::<()>(Method::GET, path, None).await?;
        decode(response).await
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.send(Method::POST, path, Some(body)).await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Turn a non-2xx response into [`ApiError::Status`].
async fn status_error(response: Response) -> ApiError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body).unwrap_or_else(|| {
        format!(
            "Error {}: {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown")
        )
    });

    tracing::warn!(
        status = status.as_u16(),
        kind = ?classify_http_status(status.as_u16()),
        "backend error: {}",
        message
    );

    ApiError::Status {
        status: status.as_u16(),
        message,
    }
}

/// Pull a user-facing message out of an error body (`detail`, then `message`).
pub(crate) fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["detail", "message"].iter().find_map(|key| match value.get(*key) {
        Some(Value::String(text)) if !text.is_empty() => Some(text.clone()),
        Some(Value::Null) | None => None,
        Some(Value::String(_)) => None,
        // Validation errors arrive as a list of objects.
        Some(other) => Some(other.to_string()),
    })
}

#[async_trait]
impl PlaygroundApi for PlaygroundClient {
    async fn providers(&self) -> Result<ProvidersResponse, ApiError> {
        match self.get_json("api/providers").await {
            Err(ApiError::Status { status, .. }) => Err(ApiError::Status {
                status,
                message: PROVIDERS_UNAVAILABLE.to_string(),
            }),
            other => other,
        }
    }

    async fn chat_prompt(&self, request: &PromptRequest) -> Result<PromptReply, ApiError> {
        self.post_json("api/chat", request).await
    }

    async fn chat_messages(&self, request: &MessagesRequest) -> Result<String, ApiError> {
        let reply: Value = self.post_json("api/chat", request).await?;
        Ok(reply_text(&reply))
    }

    async fn story(&self, request: &StoryRequest) -> Result<StoryResponse, ApiError> {
        self.post_json("api/story", request).await
    }

    async fn options(&self) -> Result<OptionsResponse, ApiError> {
        self.get_json("api/options").await
    }

    async fn experiments(&self) -> Result<Vec<Experiment>, ApiError> {
        let response: ExperimentsResponse = self.get_json("api/experiments").await?;
        Ok(response.experiments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_prefers_detail() {
        assert_eq!(
            error_message(r#"{"detail":"Modelo no habilitado: x","message":"m"}"#).as_deref(),
            Some("Modelo no habilitado: x")
        );
        assert_eq!(error_message(r#"{"message":"m"}"#).as_deref(), Some("m"));
        assert_eq!(error_message("not json"), None);
        assert_eq!(error_message("{}"), None);
    }

    #[test]
    fn test_error_message_validation_list() {
        let message = error_message(r#"{"detail":[{"msg":"too short"}]}"#).unwrap();
        assert!(message.contains("too short"));
    }

    #[test]
    fn test_endpoint_join_keeps_base_path() {
        for base in ["http://localhost:8000/proxy/", "http://localhost:8000/proxy"] {
            let client = PlaygroundClient::new(base, Duration::from_secs(5)).unwrap();
            assert_eq!(
                client.endpoint("api/chat").unwrap().as_str(),
                "http://localhost:8000/proxy/api/chat"
            );
        }
    }

    #[test]
    fn test_rejects_bad_base_url() {
        let err = PlaygroundClient::new("not a url", Duration::from_secs(5)).unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl(_)));
    }
}
