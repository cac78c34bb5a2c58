use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use flotilla_engine::EngineError;
use serde_json::json;

/// HTTP rendering of an engine failure.
///
/// Engine API errors keep the engine's status and message; failures to reach
/// the engine at all become `502 Bad Gateway`.
#[derive(Debug)]
pub struct ApiError(pub EngineError);

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        self.0
            .engine_status()
            .and_then(|s| StatusCode::from_u16(s).ok())
            .unwrap_or(StatusCode::BAD_GATEWAY)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = json!({"error": self.0.to_string(), "status": status.as_u16()});
        (status, Json(body)).into_response()
    }
}
