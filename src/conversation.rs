//! Multi-turn chat session with client-side memory.
//!
//! The backend is stateless, so every turn resends the recent history. Only
//! the last [`MAX_HISTORY`] user/assistant messages go out, and the system
//! prompt is injected on the first turn only.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::api::{MessagesRequest, PlaygroundApi};
use crate::llm::{ChatMessage, ChatOptions, Role};

/// History messages resent with each turn.
pub const MAX_HISTORY: usize = 20;

/// Characters of the system prompt shown in the context summary.
const SYSTEM_PREVIEW_CHARS: usize = 30;

/// A message as kept in the session transcript.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptMessage {
    pub id: Uuid,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl TranscriptMessage {
    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// `HH:MM` in UTC.
    pub fn time_label(&self) -> String {
        self.timestamp.format("%H:%M").to_string()
    }
}

/// Summary shown above the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextSummary {
    /// User/assistant messages in the transcript.
    pub message_count: usize,
    /// How many of them the next turn resends.
    pub sent_count: usize,
    /// Truncated system prompt, if one is set.
    pub system_preview: Option<String>,
}

/// Outcome of [`ChatSession::send`].
#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    /// The backend answered; the reply was appended.
    Replied(TranscriptMessage),
    /// The request failed; the error text was appended as an assistant message.
    Failed(TranscriptMessage),
    /// Nothing was sent (blank text or no provider).
    Skipped,
}

/// Chat session state.
pub struct ChatSession {
    api: Arc<dyn PlaygroundApi>,
    provider: Option<String>,
    system: String,
    options: ChatOptions,
    messages: Vec<TranscriptMessage>,
}

impl ChatSession {
    pub fn new(api: Arc<dyn PlaygroundApi>) -> Self {
        Self {
            api,
            provider: None,
            system: String::new(),
            options: ChatOptions::default(),
            messages: Vec::new(),
        }
    }

    pub fn provider(&self) -> Option<&str> {
        self.provider.as_deref()
    }

    pub fn set_provider(&mut self, provider: impl Into<String>) {
        let provider = provider.into();
        self.provider = (!provider.trim().is_empty()).then_some(provider);
    }

    /// Change the system prompt.
    ///
    /// Takes effect only for a fresh conversation; mid-conversation the
    /// model keeps the context it already has.
    pub fn set_system(&mut self, system: impl Into<String>) {
        let system = system.into();
        if system != self.system && self.has_history() {
            tracing::info!("system prompt changed mid-conversation; earlier context may disagree");
        }
        self.system = system;
    }

    pub fn set_options(&mut self, options: ChatOptions) {
        self.options = options;
    }

    pub fn messages(&self) -> &[TranscriptMessage] {
        &self.messages
    }

    /// Load providers and select the backend default when none is chosen.
    ///
    /// Returns the available provider names.
    pub async fn bootstrap_provider(&mut self) -> Result<Vec<String>, crate::api::ApiError> {
        let providers = self.api.providers().await?;
        if self.provider.is_none() && !providers.default_provider.is_empty() {
            self.provider = Some(providers.default_provider.clone());
        }
        Ok(providers.providers)
    }

    fn conversation(&self) -> impl Iterator<Item = &TranscriptMessage> {
        self.messages.iter().filter(|m| m.role != Role::System)
    }

    fn has_history(&self) -> bool {
        self.conversation().next().is_some()
    }

    /// Messages to send for a new user turn.
    pub fn build_chat_messages(&self, new_user_message: &str) -> Vec<ChatMessage> {
        let history: Vec<&TranscriptMessage> = self.conversation().collect();
        let system = self.system.trim();

        let mut out = Vec::with_capacity(history.len().min(MAX_HISTORY) + 2);
        if !system.is_empty() && history.is_empty() {
            out.push(ChatMessage::system(system));
        }
        let skip = history.len().saturating_sub(MAX_HISTORY);
        out.extend(
            history[skip..]
                .iter()
                .map(|m| ChatMessage::new(m.role, m.content.clone())),
        );
        out.push(ChatMessage::user(new_user_message));
        out
    }

    /// Send a user turn and append it with the reply (or the error) to the
    /// transcript.
    ///
    /// The transcript only changes once the request completes, so dropping
    /// the future mid-request leaves the session as it was.
    pub async fn send(&mut self, text: &str) -> SendOutcome {
        let text = text.trim();
        let provider = match self.provider.clone() {
            Some(provider) if !text.is_empty() => provider,
            _ => return SendOutcome::Skipped,
        };

        let request = MessagesRequest {
            provider,
            messages: self.build_chat_messages(text),
            temperature: self.options.temperature,
            max_tokens: self.options.max_tokens,
        };
        let user_message = TranscriptMessage::new(Role::User, text);

        tracing::debug!(
            provider = %request.provider,
            messages = request.messages.len(),
            "sending chat turn"
        );
        let result = self.api.chat_messages(&request).await;
        self.messages.push(user_message);

        match result {
            Ok(reply) => {
                let message = TranscriptMessage::new(Role::Assistant, reply);
                self.messages.push(message.clone());
                SendOutcome::Replied(message)
            }
            Err(e) => {
                tracing::warn!("chat turn failed: {}", e);
                let message = TranscriptMessage::new(Role::Assistant, e.to_string());
                self.messages.push(message.clone());
                SendOutcome::Failed(message)
            }
        }
    }

    /// Forget the conversation.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn context_summary(&self) -> ContextSummary {
        let message_count = self.conversation().count();
        let system = &self.system;
        let system_preview = (!system.trim().is_empty()).then(|| {
            if system.chars().count() > SYSTEM_PREVIEW_CHARS {
                let head: String = system.chars().take(SYSTEM_PREVIEW_CHARS).collect();
                format!("{}...", head)
            } else {
                system.clone()
            }
        });
        ContextSummary {
            message_count,
            sent_count: message_count.min(MAX_HISTORY),
            system_preview,
        }
    }
}
