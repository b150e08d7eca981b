//! One-shot relay from a prompt to a writer, used by the `chatbot` binary

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::debug;

use super::error::RelayError;
use super::stream::{relay_fragments, WriterSink};
use crate::llm::core::{
    config::GenerationConfig,
    provider::GenerationClient,
    types::{GenerateRequest, DEFAULT_MODEL},
};
use crate::prompts::CHATBOT_SYSTEM_PROMPT;

pub const USAGE: &str = "Usage: chatbot \"your message here\"";
pub const USAGE_EXAMPLE: &str = "Example: chatbot \"What is TypeScript?\"";

/// Per-invocation overrides
#[derive(Debug, Clone, Default)]
pub struct AgentOptions {
    /// Defaults to `CHATBOT_SYSTEM_PROMPT`
    pub system: Option<String>,
    /// Defaults to `DEFAULT_MODEL`
    pub model: Option<String>,
    pub config: GenerationConfig,
}

impl AgentOptions {
    fn to_request(&self, message: &str) -> GenerateRequest {
        GenerateRequest::new(
            self.system.as_deref().unwrap_or(CHATBOT_SYSTEM_PROMPT),
            message,
        )
        .with_model(self.model.as_deref().unwrap_or(DEFAULT_MODEL))
        .with_config(self.config.clone())
    }
}

/// Stream the reply to `message` into `out`, fragment by fragment.
///
/// Writes nothing but the fragments themselves. Returns the fragment count.
pub async fn chatbot_agent<W>(
    client: &dyn GenerationClient,
    message: &str,
    options: &AgentOptions,
    out: W,
) -> Result<usize, RelayError>
where
    W: AsyncWrite + Unpin + Send,
{
    let stream = client
        .stream_text(options.to_request(message))
        .await
        .map_err(RelayError::Internal)?;

    let mut sink = WriterSink::new(out);
    let report = relay_fragments(stream, &mut sink).await;
    debug!(fragments = report.fragments, "Relay finished");

    match report.failure {
        Some(e) => Err(e),
        None => Ok(report.fragments),
    }
}

/// `chatbot_agent` followed by a single trailing newline on success
pub async fn chatbot_agent_line<W>(
    client: &dyn GenerationClient,
    message: &str,
    options: &AgentOptions,
    mut out: W,
) -> Result<usize, RelayError>
where
    W: AsyncWrite + Unpin + Send,
{
    let fragments = chatbot_agent(client, message, options, &mut out).await?;
    out.write_all(b"\n").await?;
    out.flush().await?;
    Ok(fragments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::scripted::ScriptedClient;

    #[tokio::test]
    async fn test_default_options_use_system_prompt_and_model() {
        let client = ScriptedClient::new(["ok"]);
        let mut out = Vec::new();
        chatbot_agent(&client, "hi", &AgentOptions::default(), &mut out)
            .await
            .unwrap();

        let request = client.last_request().unwrap();
        assert_eq!(request.system, CHATBOT_SYSTEM_PROMPT);
        assert_eq!(request.model, DEFAULT_MODEL);
        assert_eq!(request.prompt, "hi");
    }

    #[tokio::test]
    async fn test_overrides_reach_the_client() {
        let client = ScriptedClient::new(["ok"]);
        let options = AgentOptions {
            system: Some("Answer in French".to_string()),
            model: Some("gemini-2.5-pro".to_string()),
            config: GenerationConfig::default().with_temperature(0.1),
        };
        let mut out = Vec::new();
        chatbot_agent(&client, "hi", &options, &mut out).await.unwrap();

        let request = client.last_request().unwrap();
        assert_eq!(request.system, "Answer in French");
        assert_eq!(request.model, "gemini-2.5-pro");
        assert_eq!(request.config.temperature, Some(0.1));
    }

    #[tokio::test]
    async fn test_minimal_variant_has_no_trailing_newline() {
        let client = ScriptedClient::new(["Hello", " ", "World"]);
        let mut out = Vec::new();
        let fragments = chatbot_agent(&client, "hi", &AgentOptions::default(), &mut out)
            .await
            .unwrap();

        assert_eq!(fragments, 3);
        assert_eq!(out, b"Hello World".to_vec());
    }

    #[tokio::test]
    async fn test_line_variant_writes_fragments_then_newline() {
        let client = ScriptedClient::new(["Type", "Script", " is ", "a language."]);
        let out = tokio_test::io::Builder::new()
            .write(b"Type")
            .write(b"Script")
            .write(b" is ")
            .write(b"a language.")
            .write(b"\n")
            .build();

        let fragments = chatbot_agent_line(&client, "What is TypeScript?", &AgentOptions::default(), out)
            .await
            .unwrap();
        assert_eq!(fragments, 4);
    }

    #[tokio::test]
    async fn test_failure_before_stream_is_internal() {
        let client = ScriptedClient::new(["never"]).failing_on_start();
        let mut out = Vec::new();
        let result = chatbot_agent_line(&client, "hi", &AgentOptions::default(), &mut out).await;

        assert!(matches!(result, Err(RelayError::Internal(_))));
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_interrupted_stream_skips_newline() {
        let client = ScriptedClient::new(["par", "tial"]).interrupted_after(1);
        let mut out = Vec::new();
        let result = chatbot_agent_line(&client, "hi", &AgentOptions::default(), &mut out).await;

        assert!(matches!(result, Err(RelayError::StreamInterrupted(_))));
        assert_eq!(out, b"par".to_vec());
    }
}
