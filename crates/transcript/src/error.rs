use harness_primitives::HttpResponse;
use harness_transport::TransportError;

/// An error that occurred while recording a transcript.
#[derive(Debug, thiserror::Error)]
pub enum TranscriptError {
    /// The response lacks the synthetic status line header the transport must provide.
    #[error("header field 'http/1.1' is missing")]
    MissingStatusLine,
    /// The response body is not valid JSON.
    #[error("failed to decode response body: {source}: {}", .response.snapshot())]
    ResponseBodyDecode {
        /// The decoding error.
        source: serde_json::Error,
        /// The response being rendered.
        response: Box<HttpResponse>,
    },
    /// A line of a JSON lines body is not valid JSON.
    #[error("failed to decode line {index} of response body: {source}: ({line})\n{}", .response.snapshot())]
    JsonLineDecode {
        /// The zero-based index of the offending line.
        index: usize,
        /// The offending line.
        line: String,
        /// The decoding error.
        source: serde_json::Error,
        /// The response being rendered.
        response: Box<HttpResponse>,
    },
    /// The request could not be issued.
    #[error(transparent)]
    Transport(#[from] TransportError),
}
