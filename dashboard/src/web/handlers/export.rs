//! Export download handlers

use axum::{
    extract::{Path, Query, State},
    response::Response,
};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;

use shared::AudienceId;

use crate::core::export::{export_audience_report, export_audiences, export_comparison};
use crate::error::DashboardResult;
use crate::traits::AudienceService;
use crate::types::{ComparisonSelection, ExportFormat};
use crate::web::handlers::download_response;

#[derive(Debug, Default, Deserialize)]
pub struct AudiencesExportQuery {
    #[serde(default)]
    pub include_performance: bool,
}

/// GET /api/export/audiences.csv
pub async fn export_audiences_csv<A>(
    State(service): State<Arc<A>>,
    Query(query): Query<AudiencesExportQuery>,
) -> DashboardResult<Response>
where
    A: AudienceService,
{
    let audiences = service.list().await;
    let artifact = export_audiences(
        &audiences,
        query.include_performance,
        ExportFormat::Csv,
        Utc::now().date_naive(),
    )?;
    Ok(download_response(artifact))
}

/// GET /api/export/audiences/:id/report
pub async fn export_report<A>(State(service): State<Arc<A>>, Path(id): Path<AudienceId>) -> DashboardResult<Response>
where
    A: AudienceService,
{
    let audience = service.get(id).await;
    let artifact = export_audience_report(audience.as_ref(), Utc::now().date_naive())?;
    Ok(download_response(artifact))
}

async fn comparison_download<A>(service: &A, selection: ComparisonSelection, format: ExportFormat) -> DashboardResult<Response>
where
    A: AudienceService,
{
    let first = match selection.first {
        Some(id) => service.get(id).await,
        None => None,
    };
    let second = match selection.second {
        Some(id) => service.get(id).await,
        None => None,
    };

    let artifact = export_comparison(first.as_ref(), second.as_ref(), format, Utc::now().date_naive())?;
    Ok(download_response(artifact))
}

/// GET /api/export/comparison.csv?first=&second=
pub async fn export_comparison_csv<A>(
    State(service): State<Arc<A>>,
    Query(selection): Query<ComparisonSelection>,
) -> DashboardResult<Response>
where
    A: AudienceService,
{
    comparison_download(service.as_ref(), selection, ExportFormat::Csv).await
}

/// GET /api/export/comparison/report?first=&second=
pub async fn export_comparison_report<A>(
    State(service): State<Arc<A>>,
    Query(selection): Query<ComparisonSelection>,
) -> DashboardResult<Response>
where
    A: AudienceService,
{
    comparison_download(service.as_ref(), selection, ExportFormat::Pdf).await
}
