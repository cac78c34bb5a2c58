pub mod config;
pub mod description;
pub mod error;
pub mod messages;
pub mod spec;
pub mod translate;

pub use config::FlotillaConfig;
pub use description::{PortPublishSpec, Protocol, ServiceDescription, ServiceMode};
pub use error::FlotillaError;
pub use messages::{CreateServiceResponse, RemoveServiceRequest, RemoveServiceResponse};
pub use spec::EngineServiceSpec;
pub use translate::{SpecTranslator, TranslationPolicy};
