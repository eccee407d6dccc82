/*!
 * Per-label completion calls with retry and backoff.
 *
 * The client turns one (species, language) pair into a normalized label.
 * Throttling is retried with a linearly growing pause; every other failure
 * is downgraded immediately to the failure label. From here up, failures
 * are data: the caller always gets a string back.
 */

use std::sync::Arc;
use std::time::Duration;

use log::{error, info, warn};

use crate::providers::{CompletionRequest, Provider};

use super::normalizer::normalize;
use super::{EnrichmentRecord, Language, FAILURE_LABEL, SPECIES_PLACEHOLDER};

/// Client driving per-label lookups against a completion provider
///
/// Stateless after construction; shared by reference across all concurrent
/// lookups within a batch.
#[derive(Debug, Clone)]
pub struct EnrichmentClient {
    /// The completion provider to use
    provider: Arc<dyn Provider>,
    /// Model name sent with every request
    model: String,
    /// Maximum attempts per label when the service throttles
    max_retries: u32,
    /// Base backoff; attempt N waits N times this duration
    backoff_base: Duration,
    /// Response length cap per label
    max_tokens: u32,
    /// Generation temperature (0.0 for determinism)
    temperature: f32,
}

impl EnrichmentClient {
    /// Create a new client with default retry policy
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            max_retries: 10,
            backoff_base: Duration::from_secs(10),
            max_tokens: 200,
            temperature: 0.0,
        }
    }

    /// Set the maximum attempt count
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    /// Set the base backoff duration
    pub fn with_backoff_base(mut self, backoff_base: Duration) -> Self {
        self.backoff_base = backoff_base;
        self
    }

    /// Set the response length cap
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the generation temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Fetch one normalized common name, retrying on throttling
    ///
    /// Never fails: exhausted retries and non-retryable errors both yield
    /// the failure label.
    pub async fn fetch_label(
        &self,
        scientific_name: &str,
        language: Language,
        template: &str,
    ) -> String {
        let prompt = template.replace(SPECIES_PLACEHOLDER, scientific_name);

        for attempt in 1..=self.max_retries {
            let request = CompletionRequest {
                model: self.model.clone(),
                prompt: prompt.clone(),
                field: language.field_name().to_string(),
                max_tokens: self.max_tokens,
                temperature: self.temperature,
            };

            match self.provider.complete(request).await {
                Ok(response) => {
                    return match response.field_value {
                        Some(raw) => normalize(&raw, language),
                        // No parsable structured field: soft failure, no retry
                        None => {
                            warn!(
                                "No structured field in response for {} ({})",
                                scientific_name, language
                            );
                            FAILURE_LABEL.to_string()
                        }
                    };
                }
                Err(e) if e.is_rate_limit() => {
                    if attempt == self.max_retries {
                        error!(
                            "Rate limited on final attempt for {} ({}): {}",
                            scientific_name, language, e
                        );
                        return FAILURE_LABEL.to_string();
                    }
                    let wait = self.backoff_base * attempt;
                    warn!(
                        "Rate limit error for {} ({}). Waiting {:?} before retry (attempt {}/{})",
                        scientific_name, language, wait, attempt, self.max_retries
                    );
                    tokio::time::sleep(wait).await;
                }
                Err(e) => {
                    error!("Error processing {} ({}): {}", scientific_name, language, e);
                    return FAILURE_LABEL.to_string();
                }
            }
        }

        FAILURE_LABEL.to_string()
    }

    /// Enrich one species with both common names, fetched concurrently
    ///
    /// Never fails as a unit; per-label failures are carried inside the
    /// record as the failure label.
    pub async fn enrich(
        &self,
        number: usize,
        scientific_name: &str,
        en_template: &str,
        ja_template: &str,
    ) -> EnrichmentRecord {
        info!("Processing ({}): {}", number, scientific_name);

        let (english_common_name, japanese_common_name) = tokio::join!(
            self.fetch_label(scientific_name, Language::English, en_template),
            self.fetch_label(scientific_name, Language::Japanese, ja_template),
        );

        info!(
            "Done ({}): EN={}, JA={}",
            number, english_common_name, japanese_common_name
        );

        EnrichmentRecord {
            number,
            scientific_name: scientific_name.to_string(),
            english_common_name,
            japanese_common_name,
        }
    }
}
