//! Fleet-wide control of the failure points exposed by debug builds of the nodes under test.
//!
//! A failure point is a named hook inside a node that, once activated, deterministically injects
//! a fault on a specific code path. The [`FailurePointClient`] activates and clears them on every
//! instance of a deployment, probes whether the build supports them and triggers crashes.

use harness_primitives::{resolve_base_url, Deployment, HeaderList, Instance, Verb};
use harness_transport::Transport;
use std::fmt;

mod error;
pub use error::FailurePointError;

/// The failure point resource of the debug API.
const FAILURE_POINT_PATH: &str = "/_admin/debug/failat";

/// The crash trigger resource of the debug API.
const CRASH_PATH: &str = "/_admin/debug/crash";

/// The body the capability probe returns when failure points are available.
const CAPABILITY_ENABLED: &str = "true";

/// An operation on failure points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePointOperation {
    /// Activation of a failure point.
    Set,
    /// Removal of one or all failure points.
    Clear,
    /// Query of the failure point capability.
    Probe,
}

impl fmt::Display for FailurePointOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Set => "set",
            Self::Clear => "clear",
            Self::Probe => "probe",
        })
    }
}

/// Controls failure points across the instances of a deployment.
///
/// The deployment is read once per operation. Fleet operations visit the instances in order, one
/// request at a time, and stop at the first instance that does not answer with `200`.
#[derive(Debug, Clone)]
pub struct FailurePointClient<T, D> {
    transport: T,
    deployment: D,
}

impl<T: Transport, D: Deployment> FailurePointClient<T, D> {
    /// Returns a new [`FailurePointClient`] issuing requests through the transport to the
    /// instances of the deployment.
    pub const fn new(transport: T, deployment: D) -> Self {
        Self { transport, deployment }
    }

    /// Activates the failure point on every instance.
    pub async fn set_failure_point(&self, name: &str) -> Result<(), FailurePointError> {
        let path = format!("{FAILURE_POINT_PATH}/{name}");
        self.on_every_instance(FailurePointOperation::Set, Verb::Put, Some(name), &path).await
    }

    /// Clears the failure point on every instance, or all failure points if `name` is `None`.
    pub async fn clear_failure_point(&self, name: Option<&str>) -> Result<(), FailurePointError> {
        let path = match name {
            Some(name) => format!("{FAILURE_POINT_PATH}/{name}"),
            None => FAILURE_POINT_PATH.to_string(),
        };
        self.on_every_instance(FailurePointOperation::Clear, Verb::Delete, name, &path).await
    }

    /// Returns whether the nodes were built with failure point support.
    ///
    /// Only the first instance is asked: a single node is taken to represent the build of the
    /// whole fleet. A status other than `200` yields `false`, as does any body other than the
    /// exact text `true`.
    ///
    /// An instance that cannot be reached yields [`FailurePointError::Transport`] rather than
    /// `false`, so an unreachable node is not mistaken for a build without failure points.
    pub async fn can_use_failure_points(&self) -> Result<bool, FailurePointError> {
        let instances = self.deployment.instances();
        let instance = instances.first().ok_or(FailurePointError::EmptyDeployment)?;
        let url = format!("{}{FAILURE_POINT_PATH}", instance.base_url());

        let response =
            self.transport.get(&url, &HeaderList::new()).await.map_err(|source| {
                FailurePointError::Transport {
                    operation: FailurePointOperation::Probe,
                    endpoint: instance.endpoint.clone(),
                    source,
                }
            })?;

        if response.status != 200 {
            tracing::debug!(target: "harness::failpoints", endpoint = %instance.endpoint, status = response.status, "failure point probe rejected");
            return Ok(false)
        }
        Ok(response.text() == CAPABILITY_ENABLED)
    }

    /// Asks the node at the endpoint to crash.
    ///
    /// The response is not checked: a node that honours the request usually drops the
    /// connection before answering, so neither the status nor a transport error is reported.
    pub async fn terminate_instance(&self, endpoint: &str) {
        let url = format!("{}{CRASH_PATH}", resolve_base_url(endpoint));
        tracing::debug!(target: "harness::failpoints", %endpoint, "requesting crash");

        match self.transport.put(&url, Some(""), &HeaderList::new()).await {
            Ok(response) => {
                tracing::debug!(target: "harness::failpoints", %endpoint, status = response.status, "crash request answered")
            }
            Err(err) => {
                tracing::debug!(target: "harness::failpoints", %endpoint, %err, "crash request interrupted")
            }
        }
    }

    /// Issues the operation's request to every instance in order, stopping at the first failure.
    async fn on_every_instance(
        &self,
        operation: FailurePointOperation,
        verb: Verb,
        name: Option<&str>,
        path: &str,
    ) -> Result<(), FailurePointError> {
        for Instance { endpoint, .. } in self.deployment.instances() {
            let url = format!("{}{path}", resolve_base_url(&endpoint));
            tracing::debug!(target: "harness::failpoints", %operation, ?name, %url, "sending failure point request");

            let response =
                match self.transport.request(verb, &url, Some(""), &HeaderList::new()).await {
                    Ok(response) => response,
                    Err(source) => {
                        return Err(FailurePointError::Transport { operation, endpoint, source })
                    }
                };

            if response.status != 200 {
                tracing::warn!(target: "harness::failpoints", %operation, ?name, %endpoint, status = response.status, "failure point request failed");
                return Err(FailurePointError::Control {
                    operation,
                    name: name.map(ToString::to_string),
                    endpoint,
                    status: response.status,
                })
            }
        }

        Ok(())
    }
}
