/*!
 * Tests for batch scheduling, ordering, and atomicity
 */

use std::sync::Arc;
use std::time::Duration;

use vernacular::enrichment::batch::BatchScheduler;
use vernacular::enrichment::RunRange;
use vernacular::providers::mock::MockProvider;

use crate::common::{fast_client, species_list, FailingSink, MemorySink, EN_TEMPLATE, JA_TEMPLATE};

#[tokio::test]
async fn test_run_withJitteredCompletionOrder_shouldPersistStrictlyIncreasingOrdinals() {
    // Random per-request delays scramble completion order within a batch
    let provider = MockProvider::jitter(20);
    let scheduler = BatchScheduler::new(fast_client(Arc::new(provider)), 7)
        .with_batch_delay(Duration::ZERO);

    let species = species_list(20);
    let mut sink = MemorySink::new();
    scheduler
        .run(
            &species,
            RunRange::new(1, 20).unwrap(),
            EN_TEMPLATE,
            JA_TEMPLATE,
            &mut sink,
        )
        .await
        .unwrap();

    let numbers: Vec<usize> = sink.rows().iter().map(|r| r.number).collect();
    assert_eq!(numbers, (1..=20).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_run_withBatchSizeSeven_shouldSplitTwentyItemsIntoThreeBatches() {
    let provider = MockProvider::working();
    let scheduler = BatchScheduler::new(fast_client(Arc::new(provider)), 7)
        .with_batch_delay(Duration::ZERO);

    let species = species_list(20);
    let mut sink = MemorySink::new();
    scheduler
        .run(
            &species,
            RunRange::new(1, 20).unwrap(),
            EN_TEMPLATE,
            JA_TEMPLATE,
            &mut sink,
        )
        .await
        .unwrap();

    let sizes: Vec<usize> = sink.batches.iter().map(|b| b.len()).collect();
    assert_eq!(sizes, vec![7, 7, 6]);
}

#[tokio::test]
async fn test_run_withSingleOrdinalRange_shouldProduceOneBatchOfOne() {
    let provider = MockProvider::working();
    let scheduler = BatchScheduler::new(fast_client(Arc::new(provider)), 10)
        .with_batch_delay(Duration::ZERO);

    let species = species_list(5);
    let mut sink = MemorySink::new();
    scheduler
        .run(
            &species,
            RunRange::single(3).unwrap(),
            EN_TEMPLATE,
            JA_TEMPLATE,
            &mut sink,
        )
        .await
        .unwrap();

    assert_eq!(sink.batches.len(), 1);
    assert_eq!(sink.batches[0].len(), 1);
    assert_eq!(sink.batches[0][0].number, 3);
    assert_eq!(sink.batches[0][0].scientific_name, "Species 3");
}

#[tokio::test]
async fn test_run_withPartialRange_shouldCoverExactlyThatRange() {
    let provider = MockProvider::working();
    let scheduler = BatchScheduler::new(fast_client(Arc::new(provider)), 4)
        .with_batch_delay(Duration::ZERO);

    let species = species_list(12);
    let mut sink = MemorySink::new();
    scheduler
        .run(
            &species,
            RunRange::new(6, 12).unwrap(),
            EN_TEMPLATE,
            JA_TEMPLATE,
            &mut sink,
        )
        .await
        .unwrap();

    let numbers: Vec<usize> = sink.rows().iter().map(|r| r.number).collect();
    assert_eq!(numbers, (6..=12).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_run_withRangeBeyondList_shouldFailBeforeAnyWrite() {
    let provider = MockProvider::working();
    let scheduler = BatchScheduler::new(fast_client(Arc::new(provider)), 4)
        .with_batch_delay(Duration::ZERO);

    let species = species_list(3);
    let mut sink = MemorySink::new();
    let result = scheduler
        .run(
            &species,
            RunRange::new(1, 10).unwrap(),
            EN_TEMPLATE,
            JA_TEMPLATE,
            &mut sink,
        )
        .await;

    assert!(result.is_err());
    assert!(sink.batches.is_empty());
}

#[tokio::test]
async fn test_run_withLateFailingItem_shouldStillWriteWholeBatchAtOnce() {
    // The last ordinal of the batch is slow and fails; the sink must still
    // see a single write of all five rows, never a partial batch
    let provider = MockProvider::scripted(|request| {
        if request.prompt.contains("Species 5") {
            std::thread::sleep(Duration::from_millis(10));
            Err(vernacular::errors::ProviderError::ApiError {
                status_code: 500,
                message: "late failure".to_string(),
            })
        } else {
            Ok(vernacular::providers::CompletionResponse {
                field_value: Some("Label".to_string()),
                prompt_tokens: None,
                completion_tokens: None,
            })
        }
    });
    let scheduler = BatchScheduler::new(fast_client(Arc::new(provider)), 5)
        .with_batch_delay(Duration::ZERO);

    let species = species_list(5);
    let mut sink = MemorySink::new();
    scheduler
        .run(
            &species,
            RunRange::new(1, 5).unwrap(),
            EN_TEMPLATE,
            JA_TEMPLATE,
            &mut sink,
        )
        .await
        .unwrap();

    assert_eq!(sink.batches.len(), 1);
    assert_eq!(sink.batches[0].len(), 5);
    assert_eq!(
        sink.batches[0][4].english_common_name,
        vernacular::enrichment::FAILURE_LABEL
    );
}

#[tokio::test]
async fn test_run_withFailingSink_shouldAbortOnFirstBatch() {
    let provider = MockProvider::working();
    let scheduler = BatchScheduler::new(fast_client(Arc::new(provider)), 2)
        .with_batch_delay(Duration::ZERO);

    let species = species_list(6);
    let mut sink = FailingSink::default();
    let result = scheduler
        .run(
            &species,
            RunRange::new(1, 6).unwrap(),
            EN_TEMPLATE,
            JA_TEMPLATE,
            &mut sink,
        )
        .await;

    assert!(result.is_err());
    // The run halts on the first storage failure
    assert_eq!(sink.attempts, 1);
}
