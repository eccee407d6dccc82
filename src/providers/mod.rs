/*!
 * Provider implementations for completion services.
 *
 * This module contains client implementations for the services that
 * generate common-name labels:
 * - OpenAI: OpenAI API integration (structured outputs)
 * - Mock: Scripted provider for testing
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// A single structured-output completion request
///
/// Every label lookup asks the model for exactly one named field, so the
/// request carries the field name alongside the prompt.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// The model to use
    pub model: String,

    /// The fully substituted user prompt
    pub prompt: String,

    /// Name of the single structured field requested from the model
    pub field: String,

    /// Maximum number of tokens to generate
    pub max_tokens: u32,

    /// Temperature for generation
    pub temperature: f32,
}

/// Response from a completion provider
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Value of the requested structured field, or None if the service
    /// returned no parsable field
    pub field_value: Option<String>,

    /// Number of prompt tokens consumed, if reported
    pub prompt_tokens: Option<u64>,

    /// Number of completion tokens generated, if reported
    pub completion_tokens: Option<u64>,
}

/// Common trait for all completion providers
///
/// This trait defines the interface that all provider implementations must
/// follow, allowing them to be used interchangeably by the enrichment client.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Complete a request using this provider
    ///
    /// # Arguments
    /// * `request` - The request to complete
    ///
    /// # Returns
    /// * `Result<CompletionResponse, ProviderError>` - The response from the provider or an error
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, ProviderError>;
}

pub mod mock;
pub mod openai;
