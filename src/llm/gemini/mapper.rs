//! Mapping between abstraction types and Gemini types

use crate::llm::core::{
    config::GenerationConfig,
    error::LlmError,
    types::{FinishReason, GenerateRequest, UsageMetadata},
};

use super::types::{
    Content, GeminiGenerationConfig, GenerateContentRequest, GenerateContentResponse, Part,
    SystemInstruction,
};

/// What one SSE payload contributes to the relay
#[derive(Debug, Default, PartialEq)]
pub struct ResponseChunk {
    /// Non-empty answer text, in part order
    pub fragments: Vec<String>,
    pub finish_reason: Option<FinishReason>,
    pub usage: Option<UsageMetadata>,
}

/// Convert our abstraction request to Gemini's request format
pub fn to_gemini_request(request: GenerateRequest) -> GenerateContentRequest {
    let system_instruction = if request.system.is_empty() {
        None
    } else {
        Some(SystemInstruction {
            parts: vec![Part::text(request.system)],
        })
    };

    GenerateContentRequest {
        contents: vec![Content {
            role: "user".to_string(),
            parts: vec![Part::text(request.prompt)],
        }],
        system_instruction,
        generation_config: to_gemini_generation_config(request.config),
    }
}

fn to_gemini_generation_config(config: GenerationConfig) -> Option<GeminiGenerationConfig> {
    if config.is_empty() {
        return None;
    }
    Some(GeminiGenerationConfig {
        max_output_tokens: config.max_tokens,
        temperature: config.temperature,
    })
}

/// Extract fragments and completion metadata from a Gemini response chunk
///
/// Only the first candidate is relayed. Thought parts and empty text are dropped.
pub fn from_gemini_response(response: GenerateContentResponse) -> Result<ResponseChunk, LlmError> {
    if let Some(error) = response.error {
        let code = if error.status.is_empty() {
            error.code.to_string()
        } else {
            error.status
        };
        return Err(LlmError::ProviderError {
            code,
            message: error.message,
        });
    }

    let mut chunk = ResponseChunk {
        usage: response.usage_metadata.map(|usage| UsageMetadata {
            input_tokens: usage.prompt_token_count,
            output_tokens: usage.candidates_token_count,
            total_tokens: usage.total_token_count,
        }),
        ..ResponseChunk::default()
    };

    if let Some(candidate) = response.candidates.into_iter().next() {
        chunk.fragments = candidate
            .content
            .parts
            .into_iter()
            .filter(|part| part.thought != Some(true))
            .filter_map(|part| part.text)
            .filter(|text| !text.is_empty())
            .collect();
        chunk.finish_reason = candidate.finish_reason.as_deref().map(map_finish_reason);
    }

    Ok(chunk)
}

/// Map Gemini's finish reason to our abstraction
fn map_finish_reason(reason: &str) -> FinishReason {
    match reason {
        "STOP" => FinishReason::Stop,
        "MAX_TOKENS" => FinishReason::MaxTokens,
        "SAFETY" => FinishReason::Safety,
        other => FinishReason::Other(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::gemini::types::{ApiError, Candidate};

    fn text_response(parts: Vec<Part>, finish_reason: Option<&str>) -> GenerateContentResponse {
        GenerateContentResponse {
            candidates: vec![Candidate {
                content: Content {
                    role: "model".to_string(),
                    parts,
                },
                finish_reason: finish_reason.map(str::to_string),
            }],
            usage_metadata: None,
            error: None,
        }
    }

    #[test]
    fn test_to_gemini_request() {
        let request = GenerateRequest::new("You are helpful", "What's up?");
        let gemini_request = to_gemini_request(request);

        assert_eq!(gemini_request.contents.len(), 1);
        assert_eq!(gemini_request.contents[0].role, "user");
        assert_eq!(
            gemini_request.contents[0].parts[0].text.as_deref(),
            Some("What's up?")
        );
        let system = gemini_request.system_instruction.unwrap();
        assert_eq!(system.parts[0].text.as_deref(), Some("You are helpful"));
        assert!(gemini_request.generation_config.is_none());
    }

    #[test]
    fn test_to_gemini_request_without_system() {
        let gemini_request = to_gemini_request(GenerateRequest::new("", "hi"));
        assert!(gemini_request.system_instruction.is_none());
    }

    #[test]
    fn test_to_gemini_generation_config() {
        let request = GenerateRequest::new("sys", "hi")
            .with_config(GenerationConfig::default().with_max_tokens(256).with_temperature(0.2));
        let config = to_gemini_request(request).generation_config.unwrap();
        assert_eq!(config.max_output_tokens, Some(256));
        assert_eq!(config.temperature, Some(0.2));
    }

    #[test]
    fn test_map_finish_reason() {
        assert_eq!(map_finish_reason("STOP"), FinishReason::Stop);
        assert_eq!(map_finish_reason("MAX_TOKENS"), FinishReason::MaxTokens);
        assert_eq!(map_finish_reason("SAFETY"), FinishReason::Safety);
        assert_eq!(
            map_finish_reason("RECITATION"),
            FinishReason::Other("RECITATION".to_string())
        );
    }

    #[test]
    fn test_from_gemini_response_text() {
        let response = text_response(vec![Part::text("Hel"), Part::text("lo")], None);
        let chunk = from_gemini_response(response).unwrap();
        assert_eq!(chunk.fragments, vec!["Hel".to_string(), "lo".to_string()]);
        assert!(chunk.finish_reason.is_none());
    }

    #[test]
    fn test_from_gemini_response_skips_thoughts_and_empty_text() {
        let thought = Part {
            text: Some("thinking...".to_string()),
            thought: Some(true),
        };
        let response = text_response(vec![thought, Part::text(""), Part::text("answer")], None);
        let chunk = from_gemini_response(response).unwrap();
        assert_eq!(chunk.fragments, vec!["answer".to_string()]);
    }

    #[test]
    fn test_from_gemini_response_with_finish() {
        let mut response = text_response(vec![Part::text("Done")], Some("STOP"));
        response.usage_metadata = Some(super::super::types::UsageMetadata {
            prompt_token_count: 10,
            candidates_token_count: 5,
            total_token_count: 15,
        });

        let chunk = from_gemini_response(response).unwrap();
        assert_eq!(chunk.finish_reason, Some(FinishReason::Stop));
        assert_eq!(chunk.usage.unwrap().total_tokens, 15);
    }

    #[test]
    fn test_from_gemini_response_error_payload() {
        let response = GenerateContentResponse {
            error: Some(ApiError {
                code: 503,
                message: "The model is overloaded".to_string(),
                status: "UNAVAILABLE".to_string(),
            }),
            ..GenerateContentResponse::default()
        };

        match from_gemini_response(response) {
            Err(LlmError::ProviderError { code, message }) => {
                assert_eq!(code, "UNAVAILABLE");
                assert_eq!(message, "The model is overloaded");
            }
            other => panic!("Expected provider error, got {:?}", other),
        }
    }
}
