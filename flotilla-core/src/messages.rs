use serde::{Deserialize, Serialize};

/// Result of a successful `create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateServiceResponse {
    /// Identifier assigned by the engine.
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveServiceRequest {
    /// Service id or name, forwarded to the engine as is.
    pub ident: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveServiceResponse {
    pub ident: String,
}
