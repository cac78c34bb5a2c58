use flotilla_core::description::ServiceDescription;
use flotilla_core::messages::{CreateServiceResponse, RemoveServiceRequest, RemoveServiceResponse};
use flotilla_core::translate::{SpecTranslator, TranslationPolicy};
use flotilla_engine::{EngineClient, EngineError, ServiceCreateOptions};
use std::sync::Arc;
use tracing::{info, warn};

/// Handles `create` and `remove` against one engine connection.
///
/// Engine failures are returned exactly as the engine client produced them:
/// no wrapping, no retries, no cleanup of partially created services.
pub struct ServiceHandler {
    engine: Arc<dyn EngineClient>,
    translator: SpecTranslator,
}

impl ServiceHandler {
    pub fn new(engine: Arc<dyn EngineClient>, policy: TranslationPolicy) -> Self {
        Self {
            engine,
            translator: SpecTranslator::new(policy),
        }
    }

    pub fn engine(&self) -> &Arc<dyn EngineClient> {
        &self.engine
    }

    pub async fn create(&self, desc: ServiceDescription) -> Result<CreateServiceResponse, EngineError> {
        let ignored = desc.reserved.supplied();
        if !ignored.is_empty() {
            warn!(service = %desc.name, fields = ?ignored, "Ignoring unsupported service fields");
        }

        let spec = self.translator.translate(&desc);
        let id = self
            .engine
            .service_create(&spec, &ServiceCreateOptions::default())
            .await
            .inspect_err(|e| warn!(service = %desc.name, error = %e, "Service create failed"))?;

        info!(service = %desc.name, id = %id, mode = %desc.mode, "Service created");
        Ok(CreateServiceResponse { id })
    }

    pub async fn remove(&self, req: RemoveServiceRequest) -> Result<RemoveServiceResponse, EngineError> {
        self.engine
            .service_remove(&req.ident)
            .await
            .inspect_err(|e| warn!(ident = %req.ident, error = %e, "Service remove failed"))?;

        info!(ident = %req.ident, "Service removed");
        Ok(RemoveServiceResponse { ident: req.ident })
    }
}
