/*!
 * Durable CSV persistence for enrichment results.
 *
 * The output table is the checkpoint of a run: every batch is flushed before
 * the scheduler moves on, so at most one batch of work is lost on abrupt
 * termination. The sink never reads existing content back; picking a
 * non-overlapping resume point is the caller's responsibility.
 */

use anyhow::{Context, Result};
use std::fs::{File, OpenOptions};
use std::path::Path;

use super::EnrichmentRecord;

/// Column headers of the output table, written only on file creation
const HEADERS: [&str; 4] = [
    "number",
    "scientific_name",
    "english_common_name",
    "japanese_common_name",
];

/// How to open the output table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Truncate and write a header row
    Create,
    /// Append rows to a compatible existing file, no header
    Append,
}

/// Destination for completed batches of enrichment records
///
/// The batch scheduler only writes through this trait, which keeps the
/// persistence format swappable and lets tests capture batches in memory.
pub trait RecordSink {
    /// Write one completed batch, already sorted by ordinal, and make it durable
    fn write_batch(&mut self, records: &[EnrichmentRecord]) -> Result<()>;
}

/// CSV-backed record sink
pub struct CsvSink {
    writer: csv::Writer<File>,
}

impl CsvSink {
    /// Open the output table at `path` in the given mode
    ///
    /// Failure to open is fatal to the run; the scheduler never starts.
    pub fn open<P: AsRef<Path>>(path: P, mode: WriteMode) -> Result<Self> {
        let file = match mode {
            WriteMode::Create => OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&path),
            WriteMode::Append => OpenOptions::new().append(true).create(true).open(&path),
        }
        .with_context(|| format!("Failed to open output file: {:?}", path.as_ref()))?;

        // Headers are written explicitly in Create mode only, so the
        // serializer itself must never emit them
        let writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
        let mut sink = Self { writer };

        if mode == WriteMode::Create {
            sink.writer
                .write_record(HEADERS)
                .context("Failed to write CSV header")?;
            sink.writer.flush().context("Failed to flush CSV header")?;
        }

        Ok(sink)
    }
}

impl RecordSink for CsvSink {
    fn write_batch(&mut self, records: &[EnrichmentRecord]) -> Result<()> {
        for record in records {
            self.writer
                .serialize(record)
                .with_context(|| format!("Failed to write row {}", record.number))?;
        }
        self.writer.flush().context("Failed to flush CSV batch")?;
        Ok(())
    }
}
