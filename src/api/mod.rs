//! Client for the playground backend.
//!
//! ## Endpoints
//!
//! - `GET /api/providers` - Available providers and the default one
//! - `POST /api/chat` - Single prompt or native message list
//! - `POST /api/story` - Generate a story from structured fields
//! - `GET /api/options` - Models, creation modes, AOI names and strategies
//! - `GET /api/experiments` - Canned story setups for playback

mod client;
mod error;
pub mod types;

pub use client::{PlaygroundClient, PROVIDERS_UNAVAILABLE};
pub use error::{classify_http_status, ApiError, ApiErrorKind};
pub use types::*;

use async_trait::async_trait;

/// Operations the backend exposes.
///
/// Sessions and forms talk to this trait rather than to [`PlaygroundClient`]
/// directly.
#[async_trait]
pub trait PlaygroundApi: Send + Sync {
    /// List providers and the backend default.
    async fn providers(&self) -> Result<ProvidersResponse, ApiError>;

    /// Send a single prompt with an optional system message.
    async fn chat_prompt(&self, request: &PromptRequest) -> Result<PromptReply, ApiError>;

    /// Send a native message list and return the assistant text.
    async fn chat_messages(&self, request: &MessagesRequest) -> Result<String, ApiError>;

    /// Generate a story.
    async fn story(&self, request: &StoryRequest) -> Result<StoryResponse, ApiError>;

    /// Fetch the story workspace options.
    async fn options(&self) -> Result<OptionsResponse, ApiError>;

    /// Fetch the canned experiments.
    async fn experiments(&self) -> Result<Vec<Experiment>, ApiError>;
}
