/*!
 * Mock provider implementations for testing.
 *
 * This module provides mock providers that simulate different behaviors:
 * - `MockProvider::working()` - Always succeeds with a generated label
 * - `MockProvider::rate_limited()` - Always reports throttling
 * - `MockProvider::failing()` - Always fails with a server error
 * - `MockProvider::missing_field()` - Succeeds but without a structured field
 */

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::errors::ProviderError;
use crate::providers::{CompletionRequest, CompletionResponse, Provider};

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with a label for the requested field
    Working,
    /// Always fails with a rate-limit error
    RateLimited,
    /// Always fails with a non-retryable server error
    Failing,
    /// Succeeds but the response carries no parsable structured field
    MissingField,
    /// Succeeds after a random delay (for completion-order scrambling)
    Jitter { max_delay_ms: u64 },
    /// Fully scripted result per request
    Custom(fn(&CompletionRequest) -> Result<CompletionResponse, ProviderError>),
}

/// Mock provider for testing enrichment behavior
#[derive(Debug)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Request counter, shared across clones
    request_count: Arc<AtomicUsize>,
    /// Custom label generator for successful responses (optional)
    custom_label: Option<fn(&CompletionRequest) -> String>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            custom_label: None,
        }
    }

    /// Create a working mock provider that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a mock provider that reports throttling on every attempt
    pub fn rate_limited() -> Self {
        Self::new(MockBehavior::RateLimited)
    }

    /// Create a failing mock provider that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock whose responses carry no structured field
    pub fn missing_field() -> Self {
        Self::new(MockBehavior::MissingField)
    }

    /// Create a mock that succeeds after a random delay up to `max_delay_ms`
    pub fn jitter(max_delay_ms: u64) -> Self {
        Self::new(MockBehavior::Jitter { max_delay_ms })
    }

    /// Create a fully scripted mock
    pub fn scripted(script: fn(&CompletionRequest) -> Result<CompletionResponse, ProviderError>) -> Self {
        Self::new(MockBehavior::Custom(script))
    }

    /// Set a custom label generator for successful responses
    pub fn with_custom_label(mut self, generator: fn(&CompletionRequest) -> String) -> Self {
        self.custom_label = Some(generator);
        self
    }

    /// Number of requests issued so far across all clones
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    fn success_response(&self, request: &CompletionRequest) -> CompletionResponse {
        let label = if let Some(generator) = self.custom_label {
            generator(request)
        } else {
            format!("Mock {}", request.field)
        };
        CompletionResponse {
            field_value: Some(label),
            prompt_tokens: Some(request.prompt.len() as u64),
            completion_tokens: Some(10),
        }
    }
}

impl Clone for MockProvider {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior,
            request_count: Arc::clone(&self.request_count),
            custom_label: self.custom_label,
        }
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, ProviderError> {
        self.request_count.fetch_add(1, Ordering::SeqCst);

        match self.behavior {
            MockBehavior::Working => Ok(self.success_response(&request)),

            MockBehavior::RateLimited => Err(ProviderError::RateLimitExceeded(
                "429: simulated rate limit".to_string(),
            )),

            MockBehavior::Failing => Err(ProviderError::ApiError {
                status_code: 500,
                message: "Simulated provider failure".to_string(),
            }),

            MockBehavior::MissingField => Ok(CompletionResponse {
                field_value: None,
                prompt_tokens: Some(10),
                completion_tokens: Some(0),
            }),

            MockBehavior::Jitter { max_delay_ms } => {
                let delay = rand::random::<u64>() % max_delay_ms.max(1);
                tokio::time::sleep(tokio::time::Duration::from_millis(delay)).await;
                Ok(self.success_response(&request))
            }

            MockBehavior::Custom(script) => script(&request),
        }
    }
}
