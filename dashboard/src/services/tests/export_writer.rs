//! Tests for the RealExportWriter

use super::fixtures::test_artifact;
use crate::services::RealExportWriter;
use crate::traits::ExportWriter;
use tempfile::TempDir;

#[tokio::test]
async fn test_write_artifact_creates_directory() {
    let temp_dir = TempDir::new().unwrap();
    let output_dir = temp_dir.path().join("nested").join("exports");
    let writer = RealExportWriter::new(&output_dir);

    let artifact = test_artifact();
    let path = writer.write_artifact(&artifact).await.unwrap();

    assert_eq!(path, output_dir.join("audiences-export-2026-10-18.csv"));
    let written = tokio::fs::read_to_string(&path).await.unwrap();
    assert_eq!(written, artifact.body);
}

#[tokio::test]
async fn test_write_artifact_overwrites() {
    let temp_dir = TempDir::new().unwrap();
    let writer = RealExportWriter::new(temp_dir.path());

    let mut artifact = test_artifact();
    writer.write_artifact(&artifact).await.unwrap();
    artifact.body = "ID,Name".to_string();
    let path = writer.write_artifact(&artifact).await.unwrap();

    assert_eq!(tokio::fs::read_to_string(path).await.unwrap(), "ID,Name");
}
