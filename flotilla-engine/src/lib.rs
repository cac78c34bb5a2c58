pub mod client;
pub mod docker;
pub mod error;

pub use client::{EngineClient, ServiceCreateOptions};
pub use docker::DockerEngine;
pub use error::EngineError;
