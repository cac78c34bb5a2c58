use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Generic, engine-agnostic description of a long-running service.
///
/// This is what callers send to `create`. It is translated into the engine's
/// native spec by [`crate::translate::SpecTranslator`] and dropped afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceDescription {
    /// Service name. Also used as the service's network alias.
    pub name: String,

    /// Container image reference, e.g. `nginx:latest`.
    pub image: String,

    /// Environment, `KEY=value` entries in order.
    #[serde(default)]
    pub env: Vec<String>,

    /// Service labels. Absent and empty are treated the same.
    #[serde(default)]
    pub labels: Option<HashMap<String, String>>,

    /// Labels applied to every task container.
    #[serde(default)]
    pub container_labels: HashMap<String, String>,

    /// Scaling mode.
    pub mode: ServiceMode,

    /// Ports published through the engine's routing mesh, in order.
    #[serde(default)]
    pub publish_specs: Vec<PortPublishSpec>,

    /// Engine features this description reserves but does not support yet.
    #[serde(flatten)]
    pub reserved: ReservedFields,
}

/// How many tasks the engine keeps running.
///
/// The set of modes is closed: a description either pins a replica count or
/// asks for one task per eligible node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceMode {
    /// A fixed number of identical tasks.
    Replicated { replicas: u64 },
    /// Exactly one task per eligible node.
    Global {},
}

impl std::fmt::Display for ServiceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceMode::Replicated { replicas } => write!(f, "replicated({replicas})"),
            ServiceMode::Global {} => f.write_str("global"),
        }
    }
}

/// A port published by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortPublishSpec {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub protocol: Protocol,
    /// Port the container listens on.
    pub internal_port: u16,
    /// Port exposed on every node of the cluster.
    pub publish_port: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    #[default]
    Tcp,
    Udp,
    Sctp,
}

/// Slots for engine features the description format does not carry yet.
///
/// Values are accepted on the wire so that older and newer callers can share
/// one request shape, but they are never forwarded to the engine: the
/// translated spec always leaves the matching engine fields absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReservedFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mounts: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restart_policy: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placement_constraints: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_grace_period: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_driver: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_config: Option<serde_json::Value>,
}

impl ReservedFields {
    /// Names of the reserved fields the caller filled in.
    pub fn supplied(&self) -> Vec<&'static str> {
        [
            ("mounts", self.mounts.is_some()),
            ("resources", self.resources.is_some()),
            ("restart_policy", self.restart_policy.is_some()),
            ("placement_constraints", self.placement_constraints.is_some()),
            ("stop_grace_period", self.stop_grace_period.is_some()),
            ("log_driver", self.log_driver.is_some()),
            ("update_config", self.update_config.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, set)| set.then_some(name))
        .collect()
    }
}
