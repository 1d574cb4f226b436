use async_trait::async_trait;

use crate::domain::{GenerationError, GenerationResult, ModelInfo};

/// Turns a prompt into generated text through some provider.
///
/// Implementors own transport, serialization, and provider-specific response
/// validation. Each call is independent; no conversation state is kept.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a reply for `prompt`, capping output at `max_tokens`.
    async fn generate(&self, prompt: &str, max_tokens: u32) -> GenerationResult;

    /// List the models the provider exposes to this credential.
    async fn list_models(&self) -> Result<Vec<ModelInfo>, GenerationError>;

    /// Model id requests are sent to.
    fn model(&self) -> &str;
}
