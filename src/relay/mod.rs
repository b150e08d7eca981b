//! Relay core shared by the HTTP server and the CLI
//!
//! Validates caller input and forwards a generation client's fragment stream,
//! in order, into an output sink.

pub mod cli;
pub mod error;
pub mod stream;
pub mod validate;

pub use error::{RelayError, ValidationError};
pub use stream::{
    relay_fragments, ChannelSink, FragmentSink, OnStreamError, RelayReport, WriterSink,
    INTERRUPTED_MARKER,
};
pub use validate::{
    message_from_args, require_json_content_type, trim_message, validate_message, MAX_MESSAGE_CHARS,
};
