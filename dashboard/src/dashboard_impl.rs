//! Main dashboard implementation
//!
//! Wires the audience service into the HTTP router using dependency
//! injection and runs the server until shutdown.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::future::Future;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use shared::{ProcessId, logging, process_info};

use crate::config::DashboardConfig;
use crate::error::{DashboardError, DashboardResult};
use crate::traits::AudienceService;
use crate::web::handlers::{api, export, websocket};

/// Main dashboard struct with dependency injection
pub struct Dashboard<A>
where
    A: AudienceService,
{
    service: Arc<A>,
    config: DashboardConfig,
}

impl<A> Dashboard<A>
where
    A: AudienceService + 'static,
{
    /// Create a dashboard around an already shared service
    pub fn from_shared(service: Arc<A>, config: DashboardConfig) -> Self {
        Self { service, config }
    }

    /// Build the Axum router with all routes
    pub fn build_router(&self) -> Router {
        // JSON-wrapped uploads are larger than the raw file; leave room so
        // oversize files reach form validation instead of a bare 413
        let body_limit = self.config.max_upload_bytes.saturating_mul(2);

        Router::new()
            // Audience API
            .route(
                "/api/audiences",
                get(api::list_audiences::<A>).post(api::create_audience::<A>),
            )
            .route("/api/audiences/validate-csv", post(api::validate_csv))
            .route(
                "/api/audiences/:id",
                get(api::get_audience::<A>)
                    .patch(api::patch_audience::<A>)
                    .delete(api::delete_audience::<A>),
            )
            .route("/api/stats", get(api::get_stats::<A>))
            .route("/api/templates/:kind", get(api::download_template))
            .route("/api/updates/force", post(api::force_update::<A>))
            // Export downloads
            .route("/api/export/audiences.csv", get(export::export_audiences_csv::<A>))
            .route("/api/export/audiences/:id/report", get(export::export_report::<A>))
            .route("/api/export/comparison.csv", get(export::export_comparison_csv::<A>))
            .route("/api/export/comparison/report", get(export::export_comparison_report::<A>))
            // Live updates
            .route("/ws", get(websocket::websocket_handler::<A>))
            // Health check
            .route("/health", get(api::health_check))
            .layer(DefaultBodyLimit::max(body_limit))
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(CorsLayer::permissive())
                    .into_inner(),
            )
            .with_state(self.service.clone())
    }

    /// Serve until `shutdown` resolves, then tear down the service timers
    pub async fn run<F>(&self, shutdown: F) -> DashboardResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let router = self.build_router();
        let bind_address = self.config.bind_address;

        let listener = tokio::net::TcpListener::bind(bind_address)
            .await
            .map_err(|e| DashboardError::ServerStartup(format!("Failed to bind to {}: {}", bind_address, e)))?;

        logging::log_startup(ProcessId::current(), &format!("listening on http://{}", bind_address));

        let served = axum::serve(listener, router).with_graceful_shutdown(shutdown).await;

        self.service.shutdown().await;
        served.map_err(|e| DashboardError::ServerStartup(format!("Server error: {}", e)))?;

        process_info!(ProcessId::current(), "HTTP server on {} stopped", bind_address);
        Ok(())
    }
}
