//! Transcripts of HTTP exchanges for test logs and generated documentation.
//!
//! A transcript is made of a request block, rendered as the `curl` command reproducing the
//! request, followed by a response block: the status line, the headers and the body in one of
//! several renderings. Both blocks are written to a [`TranscriptSink`], which receives command
//! text, plain text and structured payload text on separate channels so the caller can style
//! them independently.

pub use error::TranscriptError;
mod error;

pub use request::{RequestBody, TranscriptRecorder, DEFAULT_ADMIN_PORT};
mod request;

pub use response::{render_headers, ResponseFormat, ResponseRenderer};
mod response;

pub use sink::{BufferSink, ConsoleSink, RecordingSink, SinkEvent, TranscriptSink};
mod sink;
