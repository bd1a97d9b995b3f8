/// An error that occurred while issuing a request.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The request could not be built, sent or its body read.
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
}
