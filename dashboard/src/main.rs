//! Dashboard entry point
//!
//! `dashboard` with no subcommand serves the HTTP dashboard until Ctrl+C.

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use shared::{ProcessId, logging, process_error, process_info};
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;

use dashboard::{
    Dashboard, DashboardConfig, RealAudienceService, RealExportWriter, SimulatedUploadStore,
    cli::{self, Cli, Command, ServeArgs},
    core::fixtures::seed_audiences,
};

/// Artificial latency of the simulated upload step
const UPLOAD_LATENCY: Duration = Duration::from_millis(500);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    let command = args.command.unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    // Initialize process ID singleton before any logging
    let process_id = command.process_id();
    logging::init_tracing_with_level(Some(&args.log_level));

    match command {
        Command::Serve(serve_args) => serve(&serve_args).await,
        Command::Validate { file } => {
            let result = cli::run_validate(&file).await;
            let valid = result.valid;
            println!("{}", serde_json::to_string_pretty(&cli::preview_for_display(result))?);
            if !valid {
                std::process::exit(1);
            }
            Ok(())
        }
        Command::Template { kind, output } => {
            let path = cli::run_template(kind, &RealExportWriter::new(output)).await?;
            logging::log_success(process_id, &format!("Template written to {}", path.display()));
            Ok(())
        }
        Command::Export(export_args) => {
            let writer = RealExportWriter::new(export_args.output.clone());
            let path = cli::run_export(&export_args, &seed_audiences(), &writer, Utc::now().date_naive()).await?;
            logging::log_success(process_id, &format!("Export written to {}", path.display()));
            Ok(())
        }
    }
}

async fn serve(args: &ServeArgs) -> anyhow::Result<()> {
    let config = DashboardConfig::from(args);
    config.validate().context("invalid dashboard configuration")?;

    process_info!(
        ProcessId::current(),
        "🌐 Dashboard starting on http://{} (fixture audiences: {})",
        config.bind_address,
        config.seed_fixtures
    );

    // Initialize services with dependency injection
    let uploads = SimulatedUploadStore::with_latency(UPLOAD_LATENCY);
    let service = Arc::new(RealAudienceService::from_config(&config, uploads));
    service.start().await;

    let dashboard = Dashboard::from_shared(service, config);
    if let Err(e) = dashboard.run(shutdown_signal()).await {
        process_error!(ProcessId::current(), "Dashboard server failed: {}", e);
        return Err(e.into());
    }

    logging::log_success(ProcessId::current(), "Dashboard stopped gracefully");
    Ok(())
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => logging::log_shutdown(ProcessId::current(), "Received Ctrl+C signal"),
        Err(err) => logging::log_error(ProcessId::current(), "Signal handling", &err),
    }
}
