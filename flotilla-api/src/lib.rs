pub mod error;
pub mod handlers;
pub mod server;
pub mod service;

pub use error::ApiError;
pub use server::{ApiState, build_api_router, serve_api};
pub use service::ServiceHandler;
