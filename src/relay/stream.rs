//! Forwarding a fragment stream into an output sink

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use std::convert::Infallible;
use std::io;
use std::str::FromStr;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;

use super::error::RelayError;
use crate::llm::core::types::TextStream;

/// In-band marker appended to an HTTP body whose stream failed midway
pub const INTERRUPTED_MARKER: &str = "\n\n[Error: Response stream interrupted]";

/// What to do with an already-committed response when the stream fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OnStreamError {
    /// Append `INTERRUPTED_MARKER`, then close
    #[default]
    Mark,
    /// Close the body as is
    Truncate,
}

impl FromStr for OnStreamError {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mark" => Ok(OnStreamError::Mark),
            "truncate" => Ok(OnStreamError::Truncate),
            other => Err(format!("expected 'mark' or 'truncate', got '{}'", other)),
        }
    }
}

/// Destination for relayed fragments
#[async_trait]
pub trait FragmentSink: Send {
    /// Deliver one fragment; returns once the transport has accepted it
    async fn send(&mut self, fragment: &str) -> io::Result<()>;
}

/// Sink writing to an async writer, flushing after every fragment
pub struct WriterSink<W> {
    writer: W,
}

impl<W> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[async_trait]
impl<W: AsyncWrite + Unpin + Send> FragmentSink for WriterSink<W> {
    async fn send(&mut self, fragment: &str) -> io::Result<()> {
        self.writer.write_all(fragment.as_bytes()).await?;
        self.writer.flush().await
    }
}

/// Sink feeding the body channel of a streaming HTTP response.
///
/// Dropping the sink closes the channel, which ends the response body.
pub struct ChannelSink {
    tx: mpsc::Sender<Result<Bytes, Infallible>>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<Result<Bytes, Infallible>>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl FragmentSink for ChannelSink {
    async fn send(&mut self, fragment: &str) -> io::Result<()> {
        self.tx
            .send(Ok(Bytes::copy_from_slice(fragment.as_bytes())))
            .await
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "response body closed"))
    }
}

/// Outcome of a relay run
#[derive(Debug)]
pub struct RelayReport {
    /// Fragments the sink accepted
    pub fragments: usize,
    /// Why the run stopped early, if it did
    pub failure: Option<RelayError>,
}

/// Forward every fragment to `sink`, in order, until the stream ends or fails.
///
/// A stream error becomes `RelayError::StreamInterrupted`; a sink error becomes
/// `RelayError::Output` and stops consumption, which drops the upstream stream.
pub async fn relay_fragments<S: FragmentSink + ?Sized>(
    mut stream: TextStream,
    sink: &mut S,
) -> RelayReport {
    let mut fragments = 0;

    while let Some(item) = stream.next().await {
        let fragment = match item {
            Ok(fragment) => fragment,
            Err(e) => {
                return RelayReport {
                    fragments,
                    failure: Some(RelayError::StreamInterrupted(e)),
                }
            }
        };

        if let Err(e) = sink.send(&fragment).await {
            return RelayReport {
                fragments,
                failure: Some(RelayError::Output(e)),
            };
        }
        fragments += 1;
    }

    RelayReport {
        fragments,
        failure: None,
    }
}
