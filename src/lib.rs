//! Client for an LLM playground and story workshop backend.
//!
//! # Modules
//! - [`pagination`]: pager window (page buttons and ellipses) and pager state
//! - [`api`]: typed HTTP client for the backend JSON contract
//! - [`conversation`]: multi-turn chat with client-side memory
//! - [`prompt`]: single-shot prompt form
//! - [`story`]: story form, narrative arcs and experiment playback
//! - [`evaluation`]: Likert rating panel

pub mod api;
pub mod config;
pub mod conversation;
pub mod evaluation;
pub mod llm;
pub mod pagination;
pub mod prompt;
pub mod story;
pub mod telemetry;

pub use config::Config;
