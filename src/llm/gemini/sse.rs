//! Server-Sent Events (SSE) parser for Gemini responses

use async_stream::stream;
use bytes::Bytes;
use futures::stream::Stream;
use futures::StreamExt;
use std::fmt::Display;
use std::pin::Pin;

use crate::llm::core::error::LlmError;

use super::types::GenerateContentResponse;

/// Parse a stream of bytes as Gemini SSE events
///
/// Gemini's SSE format uses `data: <json>` lines separated by blank lines. This parser:
/// 1. Buffers raw bytes until a full line is available, so lines and multi-byte
///    characters split across network chunks are reassembled
/// 2. Keeps only `data:` lines and decodes their JSON payload
/// 3. Ends the stream after the first error
pub fn parse_sse_stream<S, E>(
    byte_stream: S,
) -> Pin<Box<dyn Stream<Item = Result<GenerateContentResponse, LlmError>> + Send>>
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: Display + Send + 'static,
{
    Box::pin(stream! {
        let mut byte_stream = Box::pin(byte_stream);
        let mut buffer: Vec<u8> = Vec::new();

        while let Some(chunk_result) = byte_stream.next().await {
            let chunk = match chunk_result {
                Ok(bytes) => bytes,
                Err(e) => {
                    yield Err(LlmError::StreamError(e.to_string()));
                    return;
                }
            };
            buffer.extend_from_slice(&chunk);

            while let Some(newline_pos) = buffer.iter().position(|b| *b == b'\n') {
                let line: Vec<u8> = buffer.drain(..=newline_pos).collect();
                if let Some(event) = parse_line(&line) {
                    let failed = event.is_err();
                    yield event;
                    if failed {
                        return;
                    }
                }
            }
        }

        // Final event without a trailing newline
        if let Some(event) = parse_line(&buffer) {
            yield event;
        }
    })
}

fn parse_line(raw: &[u8]) -> Option<Result<GenerateContentResponse, LlmError>> {
    let line = match std::str::from_utf8(raw) {
        Ok(line) => line.trim(),
        Err(e) => {
            return Some(Err(LlmError::StreamError(format!(
                "Invalid UTF-8 in stream: {}",
                e
            ))))
        }
    };

    // Ignore other line types (event:, id:, comments) and blank separators
    let data = line.strip_prefix("data:")?.trim_start();
    if data.is_empty() {
        return None;
    }

    Some(
        serde_json::from_str::<GenerateContentResponse>(data).map_err(|e| {
            LlmError::SerializationError(format!("Failed to parse SSE data: {}. Data: {}", e, data))
        }),
    )
}
