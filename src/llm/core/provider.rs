//! Generation client trait and factory

use async_trait::async_trait;

use super::{
    error::LlmError,
    types::{GenerateRequest, TextStream},
};
use crate::llm::gemini::{GeminiClient, ProviderSettings};

/// Interface every text-generation backend satisfies
///
/// The relays only ever see this trait, so tests can substitute a scripted
/// implementation for the real provider.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Start a generation call and return its fragment stream
    ///
    /// # Arguments
    /// * `request` - system instruction, prompt, model and parameters
    ///
    /// # Returns
    /// The lazy fragment stream, or an error if the call could not be started.
    /// Failures after the stream is returned surface as `Err` items.
    async fn stream_text(&self, request: GenerateRequest) -> Result<TextStream, LlmError>;
}

/// Create a generation client from provider settings
///
/// # Example
///
/// ```rust,no_run
/// use chat_relay::llm::{create_client, ProviderSettings};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = create_client(&ProviderSettings::generative_language("my-api-key")).await?;
/// # Ok(())
/// # }
/// ```
pub async fn create_client(
    settings: &ProviderSettings,
) -> Result<Box<dyn GenerationClient>, LlmError> {
    let client = GeminiClient::new(settings.clone()).await?;
    Ok(Box::new(client))
}
