//! Language model contract

use async_trait::async_trait;

use crate::llm_types::{GenerationResult, Message};
use crate::Result;

/// Pluggable chat-completion backend
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Run one chat completion over the given messages
    async fn generate(&self, messages: &[Message]) -> Result<GenerationResult>;

    /// Lazy connectivity probe; false means degraded, not fatal
    async fn is_available(&self) -> bool;

    /// Configured model name
    fn model_name(&self) -> &str;

    /// Provider tag this handle was built from
    fn provider_name(&self) -> &str;
}
