//! Gemini client implementation

use async_stream::stream;
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use std::fmt;
use tracing::debug;

use crate::llm::auth::adc::AdcTokenSource;
use crate::llm::core::{
    error::LlmError,
    provider::GenerationClient,
    types::{model_resource_id, GenerateRequest, TextStream},
};

use super::mapper::{from_gemini_response, to_gemini_request};
use super::sse::parse_sse_stream;

/// Public Generative Language API endpoint
pub const GENERATIVE_LANGUAGE_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Where Gemini is reached and how requests are authenticated
#[derive(Clone, PartialEq)]
pub enum ProviderSettings {
    /// Generative Language API with an API key
    GenerativeLanguage { api_key: String, base_url: String },
    /// Vertex AI with Application Default Credentials
    Vertex { project_id: String, location: String },
}

impl ProviderSettings {
    /// Generative Language API settings for the public endpoint
    pub fn generative_language(api_key: impl Into<String>) -> Self {
        ProviderSettings::GenerativeLanguage {
            api_key: api_key.into(),
            base_url: GENERATIVE_LANGUAGE_BASE_URL.to_string(),
        }
    }
}

// Keeps the API key out of logs
impl fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderSettings::GenerativeLanguage { base_url, .. } => f
                .debug_struct("GenerativeLanguage")
                .field("api_key", &"<redacted>")
                .field("base_url", base_url)
                .finish(),
            ProviderSettings::Vertex {
                project_id,
                location,
            } => f
                .debug_struct("Vertex")
                .field("project_id", project_id)
                .field("location", location)
                .finish(),
        }
    }
}

enum Backend {
    ApiKey {
        api_key: String,
        base_url: String,
    },
    Vertex {
        tokens: AdcTokenSource,
        project_id: String,
        location: String,
    },
}

/// Streaming client for Gemini models
pub struct GeminiClient {
    http_client: Client,
    backend: Backend,
}

impl GeminiClient {
    /// Create a new Gemini client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or, for Vertex AI, if no
    /// Application Default Credentials are available.
    pub async fn new(settings: ProviderSettings) -> Result<Self, LlmError> {
        let http_client = Client::builder()
            .connect_timeout(std::time::Duration::from_secs(5))
            .build()
            .map_err(|e| LlmError::HttpError {
                status: 0,
                body: format!("Failed to create HTTP client: {}", e),
            })?;

        let backend = match settings {
            ProviderSettings::GenerativeLanguage { api_key, base_url } => {
                if api_key.trim().is_empty() {
                    return Err(LlmError::AuthenticationError(
                        "Gemini API key is empty".to_string(),
                    ));
                }
                Backend::ApiKey {
                    api_key,
                    base_url: base_url.trim_end_matches('/').to_string(),
                }
            }
            ProviderSettings::Vertex {
                project_id,
                location,
            } => Backend::Vertex {
                tokens: AdcTokenSource::discover().await?,
                project_id,
                location,
            },
        };

        Ok(Self {
            http_client,
            backend,
        })
    }

    /// Build the streaming endpoint URL for a model
    fn build_endpoint_url(&self, model: &str) -> String {
        match &self.backend {
            Backend::ApiKey { base_url, .. } => format!(
                "{}/v1beta/models/{}:streamGenerateContent?alt=sse",
                base_url, model
            ),
            Backend::Vertex {
                project_id,
                location,
                ..
            } => vertex_endpoint_url(project_id, location, model),
        }
    }
}

fn vertex_endpoint_url(project_id: &str, location: &str, model: &str) -> String {
    let host = if location == "global" {
        "aiplatform.googleapis.com".to_string()
    } else {
        format!("{}-aiplatform.googleapis.com", location)
    };
    format!(
        "https://{}/v1/projects/{}/locations/{}/publishers/google/models/{}:streamGenerateContent?alt=sse",
        host, project_id, location, model
    )
}

#[async_trait]
impl GenerationClient for GeminiClient {
    async fn stream_text(&self, request: GenerateRequest) -> Result<TextStream, LlmError> {
        let model = model_resource_id(&request.model).to_string();
        if model.is_empty() {
            return Err(LlmError::InvalidRequest("model id is empty".to_string()));
        }

        let url = self.build_endpoint_url(&model);
        let body = to_gemini_request(request);

        let builder = self.http_client.post(&url).json(&body);
        let builder = match &self.backend {
            Backend::ApiKey { api_key, .. } => builder.header("x-goog-api-key", api_key),
            Backend::Vertex { tokens, .. } => {
                builder.bearer_auth(tokens.bearer_token().await?)
            }
        };

        let response = builder.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::HttpError {
                status: status.as_u16(),
                body,
            });
        }

        let mut events = parse_sse_stream(response.bytes_stream());
        let fragments = stream! {
            while let Some(event) = events.next().await {
                match event.and_then(from_gemini_response) {
                    Ok(chunk) => {
                        if let Some(finish_reason) = &chunk.finish_reason {
                            debug!(
                                model = %model,
                                ?finish_reason,
                                usage = ?chunk.usage,
                                "Generation finished"
                            );
                        }
                        for fragment in chunk.fragments {
                            yield Ok(fragment);
                        }
                    }
                    // Nothing after an error is relayed
                    Err(e) => {
                        yield Err(e);
                        return;
                    }
                }
            }
        };

        Ok(Box::pin(fragments))
    }
}
