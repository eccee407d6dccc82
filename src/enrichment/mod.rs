/*!
 * The common-name enrichment pipeline.
 *
 * This module contains the core of the application:
 * - `normalizer`: Post-processing of raw generated labels
 * - `client`: Per-label completion calls with retry and backoff
 * - `batch`: Batch scheduling, ordering, and inter-batch throttling
 * - `sink`: Durable CSV persistence with batch-level flushing
 */

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

pub mod batch;
pub mod client;
pub mod normalizer;
pub mod sink;

/// Label recorded when a lookup fails irrecoverably or exhausts its retries
///
/// Failures are data, not errors: a failed label never aborts its batch.
pub const FAILURE_LABEL: &str = "エラー";

/// Placeholder token substituted with the scientific name in prompt templates
pub const SPECIES_PLACEHOLDER: &str = "[species]";

/// Target language of a common-name lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English common name
    English,
    /// Japanese common name
    Japanese,
}

impl Language {
    /// Name of the structured field requested from the completion service
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::English => "common_name",
            Self::Japanese => "呼称",
        }
    }

    /// Two-letter code used in CLI flags and log output
    pub fn code(&self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Japanese => "ja",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl std::str::FromStr for Language {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "en" | "english" => Ok(Self::English),
            "ja" | "jp" | "japanese" => Ok(Self::Japanese),
            _ => Err(anyhow!("Invalid language code: {}", s)),
        }
    }
}

/// One enriched species, the unit persisted to the output table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichmentRecord {
    /// 1-based position in the species list, the resumption key
    pub number: usize,

    /// The scientific name as read from the input list
    pub scientific_name: String,

    /// English common name, or the failure label
    pub english_common_name: String,

    /// Japanese common name, or the failure label
    pub japanese_common_name: String,
}

/// Inclusive span of 1-based ordinals processed in one invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunRange {
    /// First ordinal to process
    pub start: usize,

    /// Last ordinal to process
    pub end: usize,
}

impl RunRange {
    /// Create a range spanning `start..=end`
    pub fn new(start: usize, end: usize) -> Result<Self> {
        if start == 0 {
            return Err(anyhow!("Ordinals are 1-based; start must be at least 1"));
        }
        if end < start {
            return Err(anyhow!(
                "Invalid range: end ({}) is before start ({})",
                end,
                start
            ));
        }
        Ok(Self { start, end })
    }

    /// Create a degenerate range covering exactly one ordinal
    pub fn single(ordinal: usize) -> Result<Self> {
        Self::new(ordinal, ordinal)
    }

    /// Number of ordinals in the range
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// Whether the range is empty; always false for a constructed range
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
