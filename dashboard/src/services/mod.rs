//! Service implementations
//!
//! Real implementations of all service traits for production use

pub mod audience_service;
pub mod export_writer;
pub mod lifecycle;
pub mod upload_store;

#[cfg(test)]
mod tests;

// Re-export service implementations
pub use audience_service::RealAudienceService;
pub use export_writer::RealExportWriter;
pub use lifecycle::LifecycleDriver;
pub use upload_store::SimulatedUploadStore;
