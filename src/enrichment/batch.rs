/*!
 * Batch scheduling for the enrichment pipeline.
 *
 * The scheduler is the sole coordinator: it partitions the requested range
 * into fixed-size batches, drives the per-species lookups of one batch
 * concurrently, restores ordinal order, and hands each completed batch to
 * the sink before pausing and moving on. All concurrency in the system is
 * confined to within a batch.
 */

use anyhow::{anyhow, Result};
use futures::stream::{self, StreamExt};
use log::info;
use std::time::Duration;

use super::client::EnrichmentClient;
use super::sink::RecordSink;
use super::RunRange;

/// Drives enrichment of a range of species in persisted batches
pub struct BatchScheduler {
    /// The enrichment client, shared across all lookups
    client: EnrichmentClient,

    /// Batch size, which is also the concurrency bound
    batch_size: usize,

    /// Pause between batches, a global throttle independent of per-request backoff
    batch_delay: Duration,
}

impl BatchScheduler {
    /// Create a new scheduler with the default inter-batch delay
    pub fn new(client: EnrichmentClient, batch_size: usize) -> Self {
        Self {
            client,
            batch_size: batch_size.max(1),
            batch_delay: Duration::from_secs(2),
        }
    }

    /// Set the pause between batches
    pub fn with_batch_delay(mut self, batch_delay: Duration) -> Self {
        self.batch_delay = batch_delay;
        self
    }

    /// Enrich every species in `range` and persist results batch by batch
    ///
    /// `species` is the full input list; ordinal N is `species[N - 1]`.
    /// Rows reach the sink in strictly increasing ordinal order regardless
    /// of completion order. Label failures never abort the run; only sink
    /// errors do, without persisting the in-flight batch.
    pub async fn run<S: RecordSink>(
        &self,
        species: &[String],
        range: RunRange,
        en_template: &str,
        ja_template: &str,
        sink: &mut S,
    ) -> Result<()> {
        if range.end > species.len() {
            return Err(anyhow!(
                "Range end ({}) exceeds species list length ({})",
                range.end,
                species.len()
            ));
        }

        let ordinals: Vec<usize> = (range.start..=range.end).collect();
        let total = ordinals.len();
        let batch_count = total.div_ceil(self.batch_size);

        for (batch_index, chunk) in ordinals.chunks(self.batch_size).enumerate() {
            info!(
                "Processing batch {} of {} (ordinals {} - {})",
                batch_index + 1,
                batch_count,
                chunk[0],
                chunk[chunk.len() - 1]
            );

            // One task per ordinal; parallelism is bounded by the batch size
            let mut records = stream::iter(chunk.iter().copied())
                .map(|ordinal| {
                    let client = &self.client;
                    let name = &species[ordinal - 1];
                    async move { client.enrich(ordinal, name, en_template, ja_template).await }
                })
                .buffer_unordered(chunk.len())
                .collect::<Vec<_>>()
                .await;

            // Concurrent completion order is non-deterministic
            records.sort_by_key(|record| record.number);

            sink.write_batch(&records)?;
            info!("Batch {} persisted: {} rows", batch_index + 1, records.len());

            if batch_index + 1 < batch_count {
                tokio::time::sleep(self.batch_delay).await;
            }
        }

        Ok(())
    }
}
