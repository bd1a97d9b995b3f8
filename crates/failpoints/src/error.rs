use crate::FailurePointOperation;
use harness_transport::TransportError;

/// An error that aborted a debug operation.
///
/// Fleet operations stop at the first failing instance: instances earlier in the deployment
/// order have already applied the operation when this error is returned.
#[derive(Debug, thiserror::Error)]
pub enum FailurePointError {
    /// An instance answered a failure point request with a status other than 200.
    #[error("failed to {operation} {} on {endpoint}: HTTP status {status}", describe(.name.as_deref()))]
    Control {
        /// The attempted operation.
        operation: FailurePointOperation,
        /// The failure point name, `None` when clearing all failure points.
        name: Option<String>,
        /// The endpoint of the failing instance.
        endpoint: String,
        /// The observed status code.
        status: u16,
    },
    /// The request to an instance could not be completed.
    #[error("{operation} request to {endpoint} failed: {source}")]
    Transport {
        /// The attempted operation.
        operation: FailurePointOperation,
        /// The endpoint of the failing instance.
        endpoint: String,
        /// The transport error.
        #[source]
        source: TransportError,
    },
    /// The deployment has no instance to send the request to.
    #[error("the deployment has no instances")]
    EmptyDeployment,
}

fn describe(name: Option<&str>) -> String {
    match name {
        Some(name) => format!("failure point {name:?}"),
        None => "all failure points".to_string(),
    }
}
