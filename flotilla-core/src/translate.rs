use crate::config::ServiceConfig;
use crate::description::{ServiceDescription, ServiceMode};
use crate::spec::{
    Annotations, ContainerSpec, EndpointSpec, EngineServiceMode, EngineServiceSpec, GlobalService,
    NetworkAttachmentConfig, Placement, PortConfig, ReplicatedService, ResolutionMode, TaskSpec,
    UpdateConfig,
};
use std::collections::HashMap;

/// Value of the role label stamped on every service created through Flotilla.
pub const ROLE_LABEL_VALUE: &str = "user";

/// Deployment-wide settings applied to every translated service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationPolicy {
    /// Pre-existing network every service is attached to.
    pub default_network: String,
    /// Label key that receives [`ROLE_LABEL_VALUE`].
    pub role_label_key: String,
}

impl Default for TranslationPolicy {
    fn default() -> Self {
        Self::from(&ServiceConfig::default())
    }
}

impl From<&ServiceConfig> for TranslationPolicy {
    fn from(config: &ServiceConfig) -> Self {
        Self {
            default_network: config.default_network.clone(),
            role_label_key: config.role_label_key.clone(),
        }
    }
}

/// Maps a [`ServiceDescription`] to the engine's [`EngineServiceSpec`].
///
/// Translation is total: every description the type system admits produces a
/// spec. Engine features the description does not model are left absent.
#[derive(Debug, Clone, Default)]
pub struct SpecTranslator {
    policy: TranslationPolicy,
}

impl SpecTranslator {
    pub fn new(policy: TranslationPolicy) -> Self {
        Self { policy }
    }

    pub fn translate(&self, desc: &ServiceDescription) -> EngineServiceSpec {
        let mode = match desc.mode {
            ServiceMode::Replicated { replicas } => EngineServiceMode::Replicated(ReplicatedService {
                replicas: Some(replicas),
            }),
            ServiceMode::Global {} => EngineServiceMode::Global(GlobalService {}),
        };

        EngineServiceSpec {
            annotations: Annotations {
                name: desc.name.clone(),
                labels: self.service_labels(desc.labels.as_ref()),
            },
            task_template: TaskSpec {
                container_spec: ContainerSpec {
                    image: desc.image.clone(),
                    labels: desc.container_labels.clone(),
                    env: desc.env.clone(),
                    ..ContainerSpec::default()
                },
                networks: vec![NetworkAttachmentConfig {
                    target: self.policy.default_network.clone(),
                    aliases: vec![desc.name.clone()],
                }],
                placement: Some(Placement::default()),
                resources: None,
                restart_policy: None,
                log_driver: None,
            },
            mode,
            update_config: Some(UpdateConfig::default()),
            networks: Vec::new(),
            endpoint_spec: self.endpoint_spec(desc),
        }
    }

    // Role label goes in last so caller input cannot override it.
    fn service_labels(&self, supplied: Option<&HashMap<String, String>>) -> HashMap<String, String> {
        let mut labels = supplied.cloned().unwrap_or_default();
        labels.insert(self.policy.role_label_key.clone(), ROLE_LABEL_VALUE.to_string());
        labels
    }

    fn endpoint_spec(&self, desc: &ServiceDescription) -> Option<EndpointSpec> {
        if desc.publish_specs.is_empty() {
            return None;
        }
        let ports = desc
            .publish_specs
            .iter()
            .map(|publish| PortConfig {
                name: publish.name.clone(),
                protocol: publish.protocol.into(),
                target_port: publish.internal_port,
                published_port: publish.publish_port,
            })
            .collect();
        Some(EndpointSpec {
            mode: ResolutionMode::Vip,
            ports,
        })
    }
}
