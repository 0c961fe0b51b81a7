//! Export file writer
//!
//! Writes generated artifacts into the output directory. This is the
//! headless stand-in for a browser download or print dialog.

use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;

use shared::{ProcessId, process_info};

use crate::error::DashboardResult;
use crate::traits::ExportWriter;
use crate::types::ExportArtifact;

/// Real export writer targeting a directory
#[derive(Debug, Clone)]
pub struct RealExportWriter {
    output_dir: PathBuf,
}

impl RealExportWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &PathBuf {
        &self.output_dir
    }
}

#[async_trait]
impl ExportWriter for RealExportWriter {
    async fn write_artifact(&self, artifact: &ExportArtifact) -> DashboardResult<PathBuf> {
        fs::create_dir_all(&self.output_dir).await?;

        let path = self.output_dir.join(&artifact.filename);
        fs::write(&path, artifact.body.as_bytes()).await?;

        process_info!(
            ProcessId::current(),
            "💾 Wrote {} ({} bytes)",
            path.display(),
            artifact.body.len()
        );
        Ok(path)
    }
}
