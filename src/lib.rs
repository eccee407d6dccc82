/*!
 * # vernacular - Common name enrichment for scientific species lists
 *
 * A Rust library for enriching an ordered list of scientific species names
 * with English and Japanese common (vernacular) names fetched from an
 * OpenAI-compatible completion service.
 *
 * ## Features
 *
 * - Concurrent per-species lookups with bounded parallelism
 * - Rate-limit-aware retry with linear backoff
 * - Batched, flush-on-write CSV checkpointing for interruptible runs
 * - Resume from an arbitrary line of the input list
 * - Grouped JSONL export of the finished table
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `enrichment`: The enrichment pipeline:
 *   - `enrichment::normalizer`: Post-processing of generated labels
 *   - `enrichment::client`: Per-label completion calls with retry
 *   - `enrichment::batch`: Batch scheduling and ordering
 *   - `enrichment::sink`: Durable CSV persistence
 * - `grouping`: Common-name grouped JSONL export
 * - `file_utils`: Input list and prompt template loading
 * - `app_controller`: Main application controller
 * - `providers`: Client implementations for completion services:
 *   - `providers::openai`: OpenAI API client
 *   - `providers::mock`: Scripted provider for tests
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod enrichment;
pub mod errors;
pub mod file_utils;
pub mod grouping;
pub mod providers;

// Re-export main types for easier usage
pub use app_config::Config;
pub use enrichment::{EnrichmentRecord, Language, RunRange, FAILURE_LABEL};
pub use enrichment::batch::BatchScheduler;
pub use enrichment::client::EnrichmentClient;
pub use enrichment::sink::{CsvSink, RecordSink, WriteMode};
pub use errors::{AppError, ProviderError};
