use thiserror::Error;

/// Failure reported by, or while talking to, the orchestration engine.
///
/// `Api` carries the engine's own status and message untouched; callers see
/// exactly what the engine said.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Cannot connect to engine at {path}: {source}")]
    Connect {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] hyper::Error),

    #[error("Invalid request: {0}")]
    Request(#[from] http::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid engine response: {0}")]
    InvalidResponse(String),
}

impl EngineError {
    /// Status the engine answered with, if the request got that far.
    pub fn engine_status(&self) -> Option<u16> {
        match self {
            EngineError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
