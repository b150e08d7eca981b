//! Core types for the LLM abstraction layer

use futures::stream::Stream;
use serde::{Deserialize, Serialize};
use std::pin::Pin;

use super::config::GenerationConfig;
use super::error::LlmError;

/// Model used when the caller does not pick one
pub const DEFAULT_MODEL: &str = "models/gemini-2.5-flash";

/// Lazy, ordered sequence of generated text fragments.
///
/// An `Err` item means the transport failed after generation started; no further
/// items follow it.
pub type TextStream = Pin<Box<dyn Stream<Item = Result<String, LlmError>> + Send>>;

/// A single generation call: system instruction, user prompt and model id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// System prompt/instructions
    pub system: String,
    /// User prompt
    pub prompt: String,
    /// Provider model identifier, with or without the `models/` prefix
    pub model: String,
    /// Generation parameters
    #[serde(default)]
    pub config: GenerationConfig,
}

impl GenerateRequest {
    /// Create a request for the default model
    pub fn new(system: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            prompt: prompt.into(),
            model: DEFAULT_MODEL.to_string(),
            config: GenerationConfig::default(),
        }
    }

    /// Use a different model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Use explicit generation parameters
    pub fn with_config(mut self, config: GenerationConfig) -> Self {
        self.config = config;
        self
    }
}

/// Reason why generation finished
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Natural completion
    Stop,
    /// Hit token limit
    MaxTokens,
    /// Blocked by safety filters
    Safety,
    /// Provider-specific reason
    Other(String),
}

/// Token usage information
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageMetadata {
    /// Prompt tokens consumed
    pub input_tokens: u32,
    /// Response tokens generated
    pub output_tokens: u32,
    /// Sum of input and output
    pub total_tokens: u32,
}

/// Strip the `models/` resource prefix from a model id
pub fn model_resource_id(model: &str) -> &str {
    model.strip_prefix("models/").unwrap_or(model)
}
