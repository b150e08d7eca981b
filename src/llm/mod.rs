//! LLM Abstraction Layer
//!
//! This module provides the `GenerationClient` interface the relays depend on,
//! a Gemini implementation of it, and a scripted implementation for tests.

pub mod auth;
pub mod core;
pub mod gemini;
pub mod scripted;

// Re-export commonly used types
pub use core::{
    config::GenerationConfig,
    error::LlmError,
    provider::{create_client, GenerationClient},
    types::{FinishReason, GenerateRequest, TextStream, UsageMetadata, DEFAULT_MODEL},
};

pub use gemini::{GeminiClient, ProviderSettings};
pub use scripted::ScriptedClient;
