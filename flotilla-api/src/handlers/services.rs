use crate::error::ApiError;
use crate::server::ApiState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use flotilla_core::description::ServiceDescription;
use flotilla_core::messages::{CreateServiceResponse, RemoveServiceRequest, RemoveServiceResponse};
use std::sync::Arc;

/// POST /v1/services
pub async fn create_service(
    State(state): State<Arc<ApiState>>,
    Json(desc): Json<ServiceDescription>,
) -> Result<(StatusCode, Json<CreateServiceResponse>), ApiError> {
    let created = state.handler.create(desc).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// DELETE /v1/services/{ident}
pub async fn remove_service(
    State(state): State<Arc<ApiState>>,
    Path(ident): Path<String>,
) -> Result<Json<RemoveServiceResponse>, ApiError> {
    let removed = state.handler.remove(RemoveServiceRequest { ident }).await?;
    Ok(Json(removed))
}
