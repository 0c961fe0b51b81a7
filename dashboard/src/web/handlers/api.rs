//! REST API handlers
//!
//! Audience CRUD, statistics, CSV validation and templates

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::{Value, json};
use std::sync::Arc;

use shared::{AudienceId, AudiencePatch};

use crate::core::templates::template_artifact;
use crate::core::validate_csv_bytes;
use crate::error::{DashboardError, DashboardResult};
use crate::traits::AudienceService;
use crate::types::{AudienceFilter, CreateAudienceRequest, TemplateType};
use crate::web::handlers::download_response;

/// GET /api/audiences
pub async fn list_audiences<A>(State(service): State<Arc<A>>, Query(filter): Query<AudienceFilter>) -> Json<Value>
where
    A: AudienceService,
{
    let audiences = service.list_filtered(&filter).await;
    Json(json!({
        "status": "ok",
        "data": audiences,
    }))
}

/// POST /api/audiences
pub async fn create_audience<A>(
    State(service): State<Arc<A>>,
    Json(request): Json<CreateAudienceRequest>,
) -> DashboardResult<(StatusCode, Json<Value>)>
where
    A: AudienceService,
{
    let audience = service.create(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "success",
            "message": format!("Audience '{}' is being processed", audience.name),
            "data": audience,
        })),
    ))
}

/// GET /api/audiences/:id
pub async fn get_audience<A>(State(service): State<Arc<A>>, Path(id): Path<AudienceId>) -> DashboardResult<Json<Value>>
where
    A: AudienceService,
{
    let audience = service.get(id).await.ok_or(DashboardError::AudienceNotFound { id })?;
    Ok(Json(json!({
        "status": "ok",
        "data": audience,
    })))
}

/// PATCH /api/audiences/:id
pub async fn patch_audience<A>(
    State(service): State<Arc<A>>,
    Path(id): Path<AudienceId>,
    Json(patch): Json<AudiencePatch>,
) -> DashboardResult<Json<Value>>
where
    A: AudienceService,
{
    if patch.is_empty() {
        return Err(DashboardError::invalid_request("Patch must set name, status or reach"));
    }
    let audience = service.patch(id, patch).await.ok_or(DashboardError::AudienceNotFound { id })?;
    Ok(Json(json!({
        "status": "ok",
        "data": audience,
    })))
}

/// DELETE /api/audiences/:id; absent ids are not an error
pub async fn delete_audience<A>(State(service): State<Arc<A>>, Path(id): Path<AudienceId>) -> StatusCode
where
    A: AudienceService,
{
    service.delete(id).await;
    StatusCode::NO_CONTENT
}

/// GET /api/stats
pub async fn get_stats<A>(State(service): State<Arc<A>>) -> Json<Value>
where
    A: AudienceService,
{
    let stats = service.stats().await;
    Json(json!({
        "status": "ok",
        "data": stats,
    }))
}

/// POST /api/audiences/validate-csv with the raw file as body
pub async fn validate_csv(body: Bytes) -> Json<Value> {
    let validation = validate_csv_bytes(&body);
    Json(json!({
        "status": "ok",
        "data": validation,
    }))
}

/// GET /api/templates/:kind
pub async fn download_template(Path(kind): Path<String>) -> DashboardResult<Response> {
    let kind: TemplateType = kind.parse()?;
    Ok(download_response(template_artifact(kind)))
}

/// POST /api/updates/force
pub async fn force_update<A>(State(service): State<Arc<A>>) -> Json<Value>
where
    A: AudienceService,
{
    let event = service.force_update().await;
    Json(json!({
        "status": "ok",
        "data": event,
    }))
}

/// GET /health
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "dashboard",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
