use crate::error::EngineError;
use async_trait::async_trait;
use flotilla_core::spec::EngineServiceSpec;

/// Per-call options for [`EngineClient::service_create`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceCreateOptions {
    /// Base64 registry credentials, sent as `X-Registry-Auth`.
    pub registry_auth: Option<String>,
}

/// The orchestration engine's remote API, as far as Flotilla needs it.
///
/// Implementations must be safe to share between concurrent requests.
/// Retries and connection reuse, if any, belong to the implementation.
#[async_trait]
pub trait EngineClient: Send + Sync {
    /// Create a service and return the identifier the engine assigned.
    async fn service_create(
        &self,
        spec: &EngineServiceSpec,
        options: &ServiceCreateOptions,
    ) -> Result<String, EngineError>;

    /// Remove the service with the given id or name.
    async fn service_remove(&self, ident: &str) -> Result<(), EngineError>;

    /// Check that the engine answers.
    async fn ping(&self) -> Result<(), EngineError>;
}
