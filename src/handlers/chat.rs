// POST /chat handler

use bytes::Bytes;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;
use warp::http::{Response, StatusCode};
use warp::hyper::Body;

use super::{internal_error, json_response, AppState};
use crate::config::ChatSettings;
use crate::llm::core::types::{GenerateRequest, TextStream};
use crate::models::{ChatRequest, ErrorResponse};
use crate::relay::{
    relay_fragments, require_json_content_type, validate_message, ChannelSink, FragmentSink,
    OnStreamError, RelayError, ValidationError, INTERRUPTED_MARKER,
};

/// Body chunks buffered between the generation stream and the connection
const BODY_CHANNEL_CAPACITY: usize = 16;

pub async fn chat_handler(
    content_type: Option<String>,
    body: Bytes,
    state: Arc<AppState>,
) -> Result<warp::reply::Response, Infallible> {
    let span = info_span!("chat", request_id = %Uuid::new_v4());
    Ok(handle_chat(content_type, body, state).instrument(span).await)
}

/// Validate the caller's input and return the trimmed message
pub fn validate_chat_request(
    content_type: Option<&str>,
    body: &[u8],
    settings: &ChatSettings,
) -> Result<String, ValidationError> {
    require_json_content_type(content_type)?;
    let request = ChatRequest::from_body(body);
    let message = validate_message(request.message_text(), settings.max_message_chars)?;
    Ok(message.to_string())
}

async fn handle_chat(
    content_type: Option<String>,
    body: Bytes,
    state: Arc<AppState>,
) -> warp::reply::Response {
    let started = Instant::now();

    let message = match validate_chat_request(content_type.as_deref(), &body, &state.chat) {
        Ok(message) => message,
        Err(e) => {
            warn!(reason = %e, content_type = ?content_type, "Rejected chat request");
            return json_response(StatusCode::BAD_REQUEST, &ErrorResponse::new(e.to_string()));
        }
    };

    info!(
        message_chars = message.chars().count(),
        "Processing chat request"
    );

    let request =
        GenerateRequest::new(state.chat.system.as_str(), message).with_model(state.chat.model.as_str());
    let stream = match state.client.stream_text(request).await {
        Ok(stream) => stream,
        Err(e) => {
            error!(error = %e, "/chat error");
            return internal_error();
        }
    };

    let (tx, rx) = mpsc::channel(BODY_CHANNEL_CAPACITY);
    let response = Response::builder()
        .status(StatusCode::OK)
        .header("content-type", "text/plain; charset=utf-8")
        .header("cache-control", "no-store")
        .body(Body::wrap_stream(ReceiverStream::new(rx)));

    match response {
        Ok(response) => {
            // The body keeps filling after this handler has returned
            tokio::spawn(
                stream_body(stream, ChannelSink::new(tx), state.chat.on_stream_error, started)
                    .in_current_span(),
            );
            response
        }
        Err(e) => {
            error!(error = %e, "Failed to build streaming response");
            internal_error()
        }
    }
}

/// Pump fragments into the response body, then close it by dropping the sink
async fn stream_body(
    stream: TextStream,
    mut sink: ChannelSink,
    on_error: OnStreamError,
    started: Instant,
) {
    let report = relay_fragments(stream, &mut sink).await;
    let elapsed_ms = started.elapsed().as_millis() as u64;

    match report.failure {
        None => info!(
            elapsed_ms,
            fragments = report.fragments,
            "Chat response completed"
        ),
        Some(RelayError::StreamInterrupted(e)) => {
            error!(error = %e, elapsed_ms, fragments = report.fragments, "Streaming error");
            if on_error == OnStreamError::Mark {
                if let Err(e) = sink.send(INTERRUPTED_MARKER).await {
                    debug!(error = %e, "Could not deliver interruption marker");
                }
            }
        }
        Some(e) => debug!(
            error = %e,
            elapsed_ms,
            fragments = report.fragments,
            "Client disconnected before the response finished"
        ),
    }
}
