use harness_primitives::HttpResponse;
use harness_transport::TransportError;

/// An error that occurred during an administrative call.
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    /// The server answered with a non-success status.
    #[error("request failed with HTTP status {status}: {}", .response.snapshot())]
    Request {
        /// The status of the response.
        status: u16,
        /// The rejected response.
        response: Box<HttpResponse>,
    },
    /// The response body of the call to the path is not the expected JSON.
    #[error("failed to decode response of {path}: {source}")]
    Decode {
        /// The requested path.
        path: String,
        /// The decoding error.
        source: serde_json::Error,
    },
    /// The response body of the call to the path lacks the extracted field.
    #[error("response of {path} has no field {field:?}")]
    MissingField {
        /// The requested path.
        path: String,
        /// The missing field.
        field: &'static str,
    },
    /// The request could not be issued.
    #[error(transparent)]
    Transport(#[from] TransportError),
}
