use crate::resolve_base_url;
use serde::{Deserialize, Serialize};

/// A single node of a deployment under test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    /// The connection endpoint of the node, e.g. `tcp://127.0.0.1:8529` or `ssl://host:8530`.
    pub endpoint: String,
    /// The role of the node in the deployment, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl Instance {
    /// Returns a new [`Instance`] for the provided endpoint without a role.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self { endpoint: endpoint.into(), role: None }
    }

    /// Sets the role of the instance.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Returns the base URL for plain HTTP calls to the instance.
    pub fn base_url(&self) -> String {
        resolve_base_url(&self.endpoint)
    }
}

/// A point-in-time view of the instances composing a deployment.
///
/// Deserializes from the instance info published by the test environment, e.g.
/// `{"arangods": [{"endpoint": "tcp://127.0.0.1:8529", "role": "single"}]}`. The key `instances`
/// is accepted as well.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentSnapshot {
    /// The instances, in the order published by the test environment.
    #[serde(rename = "arangods", alias = "instances", default)]
    pub instances: Vec<Instance>,
}

impl DeploymentSnapshot {
    /// Parses a snapshot from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl From<Vec<Instance>> for DeploymentSnapshot {
    fn from(instances: Vec<Instance>) -> Self {
        Self { instances }
    }
}

/// A provider of deployment metadata.
///
/// Implementations are queried once per fleet operation, so the returned snapshot may change
/// between operations as the environment under test starts or stops nodes.
#[auto_impl::auto_impl(&, Arc, Box)]
pub trait Deployment {
    /// Returns the instances of the deployment, in order.
    fn instances(&self) -> Vec<Instance>;
}

impl Deployment for DeploymentSnapshot {
    fn instances(&self) -> Vec<Instance> {
        self.instances.clone()
    }
}

impl Deployment for Vec<Instance> {
    fn instances(&self) -> Vec<Instance> {
        self.clone()
    }
}

impl Deployment for [Instance] {
    fn instances(&self) -> Vec<Instance> {
        self.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_parse_instance_info() -> Result<(), serde_json::Error> {
        let json = r#"{
            "arangods": [
                {"endpoint": "tcp://127.0.0.1:8529", "role": "coordinator", "pid": 42},
                {"endpoint": "ssl://127.0.0.1:8530"}
            ],
            "agencyConfig": {}
        }"#;
        let snapshot = DeploymentSnapshot::from_json(json)?;

        assert_eq!(
            snapshot.instances(),
            vec![
                Instance::new("tcp://127.0.0.1:8529").with_role("coordinator"),
                Instance::new("ssl://127.0.0.1:8530"),
            ]
        );
        assert_eq!(snapshot.instances[1].base_url(), "https://127.0.0.1:8530");

        Ok(())
    }

    #[test]
    fn test_should_accept_instances_key() -> Result<(), serde_json::Error> {
        let snapshot =
            DeploymentSnapshot::from_json(r#"{"instances": [{"endpoint": "127.0.0.1:8529"}]}"#)?;
        assert_eq!(snapshot.instances.len(), 1);

        let empty = DeploymentSnapshot::from_json("{}")?;
        assert!(empty.instances.is_empty());

        Ok(())
    }
}
