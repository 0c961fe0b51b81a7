//! Simulated upload collaborator
//!
//! Accepts customer-list files after a short artificial latency and keeps
//! the receipts in memory. A real deployment would hand the file to object
//! storage here.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use shared::{ProcessId, process_debug};

use crate::error::{DashboardError, DashboardResult};
use crate::traits::UploadStore;
use crate::types::{UploadReceipt, UploadedFile};

/// In-memory upload store with configurable latency
#[derive(Clone, Default)]
pub struct SimulatedUploadStore {
    latency: Duration,
    receipts: Arc<RwLock<Vec<UploadReceipt>>>,
}

impl SimulatedUploadStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency,
            ..Self::default()
        }
    }

    /// Receipts of every accepted upload, oldest first
    pub async fn receipts(&self) -> Vec<UploadReceipt> {
        self.receipts.read().await.clone()
    }
}

#[async_trait]
impl UploadStore for SimulatedUploadStore {
    async fn store_upload(&self, audience_name: &str, file: &UploadedFile) -> DashboardResult<UploadReceipt> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        if file.content.is_empty() {
            return Err(DashboardError::UploadFailed {
                message: format!("{} is empty", file.file_name),
            });
        }

        let receipt = UploadReceipt {
            file_name: file.file_name.clone(),
            size_bytes: file.size_bytes(),
            stored_at: Utc::now(),
        };
        self.receipts.write().await.push(receipt.clone());

        process_debug!(
            ProcessId::current(),
            "📁 Stored {} ({} bytes) for audience '{}'",
            file.file_name,
            file.size_bytes(),
            audience_name
        );
        Ok(receipt)
    }
}
