//! Gemini provider implementation
//!
//! This module provides a streaming client for Google's Gemini models, reached
//! through either the Generative Language API or Vertex AI, implementing the
//! GenerationClient trait.

pub mod client;
pub mod mapper;
pub mod sse;
pub mod types;

// Re-export main types for convenience
pub use client::{GeminiClient, ProviderSettings, GENERATIVE_LANGUAGE_BASE_URL};
