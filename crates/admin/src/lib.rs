//! Administrative queries against a single node under test.
//!
//! Every call issues exactly one request, rejects non-success responses through [`validate`] and
//! extracts one field of the JSON body.

use harness_primitives::{resolve_base_url, HeaderList, HttpResponse, Verb};
use harness_transport::{HttpTransport, Transport};
use serde_json::{Map, Value};

mod error;
pub use error::AdminError;

/// The server role method.
const ROLE_METHOD: &str = "/_admin/server/role";

/// The cluster health method.
const HEALTH_METHOD: &str = "/_admin/cluster/health";

/// The statistics method.
const STATISTICS_METHOD: &str = "/_admin/statistics";

/// The TTL statistics method.
const TTL_STATISTICS_METHOD: &str = "/_api/ttl/statistics";

/// The TTL properties method.
const TTL_PROPERTIES_METHOD: &str = "/_api/ttl/properties";

/// The routing reload method.
const ROUTING_RELOAD_METHOD: &str = "/_admin/routing/reload";

/// The write-ahead log flush method prefix.
const WAL_FLUSH_METHOD: &str = "/_admin/wal/flush";

/// The write-ahead log properties method.
const WAL_PROPERTIES_METHOD: &str = "/_admin/wal/properties";

/// The write-ahead log transactions method.
const WAL_TRANSACTIONS_METHOD: &str = "/_admin/wal/transactions";

/// The role reported by coordinators.
const COORDINATOR_ROLE: &str = "COORDINATOR";

/// Returns the response if its status is a success, an [`AdminError::Request`] otherwise.
pub fn validate(response: HttpResponse) -> Result<HttpResponse, AdminError> {
    if !response.is_success() {
        return Err(AdminError::Request { status: response.status, response: Box::new(response) })
    }
    Ok(response)
}

/// Issues administrative calls to the node the transport is connected to.
///
/// Paths are passed to the transport as is, so the transport must resolve them against the node.
#[derive(Debug, Clone)]
pub struct AdminClient<T> {
    transport: T,
}

impl AdminClient<HttpTransport> {
    /// Returns an [`AdminClient`] connected to the node at the endpoint.
    pub fn from_endpoint(endpoint: &str) -> Self {
        Self::new(HttpTransport::with_base(resolve_base_url(endpoint)))
    }
}

impl<T: Transport> AdminClient<T> {
    /// Returns a new [`AdminClient`] issuing requests through the transport.
    pub const fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Returns whether the node is a cluster coordinator.
    ///
    /// A response without a role is taken to come from a single server.
    pub async fn is_cluster(&self) -> Result<bool, AdminError> {
        let body = self.call(Verb::Get, ROLE_METHOD, None).await?;
        Ok(body.get("role").and_then(Value::as_str) == Some(COORDINATOR_ROLE))
    }

    /// Returns the health of every server of the cluster, keyed by server id.
    pub async fn cluster_health(&self) -> Result<Map<String, Value>, AdminError> {
        let body = self.call(Verb::Get, HEALTH_METHOD, None).await?;
        let health = extract(body, HEALTH_METHOD, "Health")?;
        serde_json::from_value(health)
            .map_err(|source| AdminError::Decode { path: HEALTH_METHOD.to_string(), source })
    }

    /// Returns the statistics of the node's process.
    pub async fn process_statistics(&self) -> Result<Value, AdminError> {
        let body = self.call(Verb::Get, STATISTICS_METHOD, None).await?;
        extract(body, STATISTICS_METHOD, "system")
    }

    /// Returns the statistics of the server.
    pub async fn server_statistics(&self) -> Result<Value, AdminError> {
        let body = self.call(Verb::Get, STATISTICS_METHOD, None).await?;
        extract(body, STATISTICS_METHOD, "server")
    }

    /// Returns the statistics of the TTL background thread.
    pub async fn ttl_statistics(&self) -> Result<Value, AdminError> {
        let body = self.call(Verb::Get, TTL_STATISTICS_METHOD, None).await?;
        extract(body, TTL_STATISTICS_METHOD, "result")
    }

    /// Returns the TTL properties, after replacing them with `properties` if provided.
    pub async fn ttl_properties(&self, properties: Option<&Value>) -> Result<Value, AdminError> {
        let body = match properties {
            Some(properties) => {
                let properties = properties.to_string();
                self.call(Verb::Put, TTL_PROPERTIES_METHOD, Some(&properties)).await?
            }
            None => self.call(Verb::Get, TTL_PROPERTIES_METHOD, None).await?,
        };
        extract(body, TTL_PROPERTIES_METHOD, "result")
    }

    /// Rebuilds the routing of the node and returns the whole response body.
    pub async fn reload_routing(&self) -> Result<Value, AdminError> {
        self.call(Verb::Post, ROUTING_RELOAD_METHOD, Some("")).await
    }

    /// Flushes the write-ahead log.
    pub async fn wal_flush(
        &self,
        wait_for_sync: bool,
        wait_for_collector: bool,
    ) -> Result<(), AdminError> {
        let path = format!(
            "{WAL_FLUSH_METHOD}?waitForSync={wait_for_sync}&waitForCollector={wait_for_collector}"
        );
        self.send(Verb::Put, &path, Some("")).await?;
        Ok(())
    }

    /// Returns the write-ahead log properties, after replacing them with `properties` if
    /// provided.
    pub async fn wal_properties(&self, properties: Option<&Value>) -> Result<Value, AdminError> {
        match properties {
            Some(properties) => {
                let properties = properties.to_string();
                self.call(Verb::Put, WAL_PROPERTIES_METHOD, Some(&properties)).await
            }
            None => self.call(Verb::Get, WAL_PROPERTIES_METHOD, None).await,
        }
    }

    /// Returns the transactions currently holding on to write-ahead log files.
    pub async fn wal_transactions(&self) -> Result<Value, AdminError> {
        self.call(Verb::Get, WAL_TRANSACTIONS_METHOD, None).await
    }

    /// Issues the request and validates the response.
    async fn send(
        &self,
        verb: Verb,
        path: &str,
        body: Option<&str>,
    ) -> Result<HttpResponse, AdminError> {
        tracing::debug!(target: "harness::admin", %verb, path, "sending administrative request");
        let response = self.transport.request(verb, path, body, &HeaderList::new()).await?;

        validate(response).inspect_err(|err| {
            tracing::warn!(target: "harness::admin", %verb, path, %err, "administrative request rejected");
        })
    }

    /// Issues the request, validates the response and decodes its body.
    async fn call(&self, verb: Verb, path: &str, body: Option<&str>) -> Result<Value, AdminError> {
        let response = self.send(verb, path, body).await?;
        response
            .json()
            .map_err(|source| AdminError::Decode { path: path.to_string(), source })
    }
}

/// Takes the field out of the response body of the call to the path.
fn extract(mut body: Value, path: &str, field: &'static str) -> Result<Value, AdminError> {
    body.get_mut(field)
        .map(Value::take)
        .ok_or_else(|| AdminError::MissingField { path: path.to_string(), field })
}
