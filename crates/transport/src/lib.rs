//! The transport used by the harness to talk to the nodes of a deployment.
//!
//! The [`Transport`] trait dispatches a [`Verb`](harness_primitives::Verb) to an HTTP call and
//! returns the response with the synthetic status line header set. [`HttpTransport`] implements
//! it on top of `reqwest`.

pub use error::TransportError;
mod error;

pub use http::HttpTransport;
mod http;

pub use transport::Transport;
mod transport;

#[cfg(any(test, feature = "test-utils"))]
/// Test utilities for the transport.
pub mod test_utils;
