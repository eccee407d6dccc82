/*!
 * Common test utilities for the vernacular test suite
 */

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tempfile::TempDir;

use vernacular::enrichment::client::EnrichmentClient;
use vernacular::enrichment::sink::RecordSink;
use vernacular::enrichment::EnrichmentRecord;
use vernacular::providers::Provider;

/// English prompt template used across tests
pub const EN_TEMPLATE: &str = "What is the English common name of [species]?";

/// Japanese prompt template used across tests
pub const JA_TEMPLATE: &str = "[species]の日本語の呼称は何ですか？";

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &PathBuf, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Builds a numbered species list for scheduler tests
pub fn species_list(count: usize) -> Vec<String> {
    (1..=count).map(|i| format!("Species {}", i)).collect()
}

/// Wraps a provider in a client with a test-friendly retry policy
pub fn fast_client(provider: Arc<dyn Provider>) -> EnrichmentClient {
    EnrichmentClient::new(provider, "mock-model")
        .with_max_retries(3)
        .with_backoff_base(Duration::from_millis(1))
}

/// Reads all records back from a CSV output file
pub fn read_records(path: &PathBuf) -> Result<Vec<EnrichmentRecord>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for result in reader.deserialize() {
        records.push(result?);
    }
    Ok(records)
}

/// In-memory sink capturing every batch the scheduler writes
#[derive(Debug, Default)]
pub struct MemorySink {
    /// Batches in the order they were written
    pub batches: Vec<Vec<EnrichmentRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All rows across all batches, in write order
    pub fn rows(&self) -> Vec<&EnrichmentRecord> {
        self.batches.iter().flatten().collect()
    }
}

impl RecordSink for MemorySink {
    fn write_batch(&mut self, records: &[EnrichmentRecord]) -> Result<()> {
        self.batches.push(records.to_vec());
        Ok(())
    }
}

/// Sink that fails on every write, for abort-path tests
#[derive(Debug, Default)]
pub struct FailingSink {
    /// Number of write attempts observed
    pub attempts: usize,
}

impl RecordSink for FailingSink {
    fn write_batch(&mut self, _records: &[EnrichmentRecord]) -> Result<()> {
        self.attempts += 1;
        Err(anyhow::anyhow!("simulated storage failure"))
    }
}
