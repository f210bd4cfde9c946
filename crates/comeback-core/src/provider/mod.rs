//! Completion provider adapter interface.
//!
//! The plan service talks to the language model only through
//! [`CompletionProvider`], so validation and repair can be exercised
//! against scripted responses without a network.
//!
//! ```text
//! PlanService
//!     |
//!     |  complete(CompletionRequest { system, prompt, max_tokens, temperature })
//!     v
//! dyn CompletionProvider ----> OpenAiProvider ----> POST /chat/completions
//!     |
//!     v
//! Completion { content, truncated }
//! ```

pub mod config;
pub mod openai;

use async_trait::async_trait;

use crate::error::GenerationError;

pub use config::{API_KEY_ENV_VARS, ProviderConfig, api_key_from_env};
pub use openai::OpenAiProvider;

/// One prompt submitted to a completion provider.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// System-level instruction.
    pub system: String,
    /// User prompt.
    pub prompt: String,
    /// Output token budget.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
}

/// Raw text returned by a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// The generated text, unmodified.
    pub content: String,
    /// `true` when generation stopped because the token budget ran out.
    pub truncated: bool,
}

impl Completion {
    pub fn finished(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            truncated: false,
        }
    }

    pub fn truncated(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            truncated: true,
        }
    }
}

/// Adapter interface for text-completion backends.
///
/// Implementations report non-success HTTP statuses as
/// [`GenerationError::Provider`] and connection problems as
/// [`GenerationError::Transport`]. They never retry.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Human-readable name for logs (e.g. the model identifier).
    fn name(&self) -> &str;

    /// Submit one prompt and return the raw completion.
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, GenerationError>;
}

// Compile-time assertion: CompletionProvider must be object-safe.
const _: () = {
    fn _assert_object_safe(_: &dyn CompletionProvider) {}
};
