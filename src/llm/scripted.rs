//! A scripted generation client for tests and offline runs.

use async_stream::stream;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::llm::core::{
    error::LlmError,
    provider::GenerationClient,
    types::{GenerateRequest, TextStream},
};

/// Replays a fixed list of fragments for every call.
///
/// It can also fail before streaming (`failing_on_start`) or after yielding a
/// number of fragments (`interrupted_after`), and records how often it was called
/// and with which request.
#[derive(Debug, Default)]
pub struct ScriptedClient {
    fragments: Vec<String>,
    interrupt_after: Option<usize>,
    fail_on_start: bool,
    calls: AtomicUsize,
    last_request: Mutex<Option<GenerateRequest>>,
}

impl ScriptedClient {
    pub fn new<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fragments: fragments.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Fail the stream with `LlmError::StreamError` after `count` fragments
    pub fn interrupted_after(mut self, count: usize) -> Self {
        self.interrupt_after = Some(count);
        self
    }

    /// Fail the call itself, before any fragment is produced
    pub fn failing_on_start(mut self) -> Self {
        self.fail_on_start = true;
        self
    }

    /// Number of `stream_text` calls so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The most recent request, if any
    pub fn last_request(&self) -> Option<GenerateRequest> {
        self.last_request
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or(None)
    }
}

#[async_trait]
impl GenerationClient for ScriptedClient {
    async fn stream_text(&self, request: GenerateRequest) -> Result<TextStream, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_request.lock() {
            *last = Some(request);
        }

        if self.fail_on_start {
            return Err(LlmError::HttpError {
                status: 503,
                body: "scripted failure".to_string(),
            });
        }

        let fragments = self.fragments.clone();
        let interrupt_after = self.interrupt_after;

        Ok(Box::pin(stream! {
            for (index, fragment) in fragments.into_iter().enumerate() {
                if interrupt_after == Some(index) {
                    yield Err(LlmError::StreamError("connection reset".to_string()));
                    return;
                }
                yield Ok(fragment);
            }
            if interrupt_after.is_some() {
                yield Err(LlmError::StreamError("connection reset".to_string()));
            }
        }))
    }
}
