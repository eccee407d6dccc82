/*!
 * Tests for the completion client retry and failure-downgrade behavior
 */

use std::sync::Arc;
use std::time::Duration;

use vernacular::enrichment::client::EnrichmentClient;
use vernacular::enrichment::{Language, FAILURE_LABEL};
use vernacular::errors::ProviderError;
use vernacular::providers::mock::MockProvider;
use vernacular::providers::CompletionResponse;

use crate::common::{fast_client, EN_TEMPLATE, JA_TEMPLATE};

#[tokio::test]
async fn test_fetchLabel_withAlwaysThrottlingProvider_shouldExhaustRetriesAndReturnSentinel() {
    let provider = MockProvider::rate_limited();
    let client = EnrichmentClient::new(Arc::new(provider.clone()), "mock-model")
        .with_max_retries(4)
        .with_backoff_base(Duration::from_millis(1));

    let label = client
        .fetch_label("Panthera leo", Language::English, EN_TEMPLATE)
        .await;

    assert_eq!(label, FAILURE_LABEL);
    // Exactly max_retries attempts, no more
    assert_eq!(provider.request_count(), 4);
}

#[tokio::test]
async fn test_fetchLabel_withNonRetryableError_shouldFailAfterSingleAttempt() {
    let provider = MockProvider::failing();
    let client = fast_client(Arc::new(provider.clone()));

    let label = client
        .fetch_label("Panthera leo", Language::English, EN_TEMPLATE)
        .await;

    assert_eq!(label, FAILURE_LABEL);
    assert_eq!(provider.request_count(), 1);
}

#[tokio::test]
async fn test_fetchLabel_withMissingStructuredField_shouldReturnSentinelWithoutRetry() {
    let provider = MockProvider::missing_field();
    let client = fast_client(Arc::new(provider.clone()));

    let label = client
        .fetch_label("Panthera leo", Language::Japanese, JA_TEMPLATE)
        .await;

    assert_eq!(label, FAILURE_LABEL);
    assert_eq!(provider.request_count(), 1);
}

#[tokio::test]
async fn test_fetchLabel_withSuccessfulResponse_shouldNormalizeLabel() {
    let provider =
        MockProvider::working().with_custom_label(|_| "Common Name: \"Lion\"\nA big cat.".to_string());
    let client = fast_client(Arc::new(provider));

    let label = client
        .fetch_label("Panthera leo", Language::English, EN_TEMPLATE)
        .await;

    assert_eq!(label, "Lion");
}

#[tokio::test]
async fn test_fetchLabel_shouldSubstituteSpeciesIntoTemplate() {
    let provider = MockProvider::scripted(|request| {
        assert!(request.prompt.contains("Panthera leo"));
        assert!(!request.prompt.contains("[species]"));
        Ok(CompletionResponse {
            field_value: Some("Lion".to_string()),
            prompt_tokens: None,
            completion_tokens: None,
        })
    });
    let client = fast_client(Arc::new(provider));

    let label = client
        .fetch_label("Panthera leo", Language::English, EN_TEMPLATE)
        .await;

    assert_eq!(label, "Lion");
}

#[tokio::test]
async fn test_fetchLabel_shouldRequestLanguageSpecificField() {
    let provider = MockProvider::scripted(|request| {
        Ok(CompletionResponse {
            field_value: Some(format!("field={}", request.field)),
            prompt_tokens: None,
            completion_tokens: None,
        })
    });
    let client = fast_client(Arc::new(provider));

    let en = client
        .fetch_label("Canis lupus", Language::English, EN_TEMPLATE)
        .await;
    let ja = client
        .fetch_label("Canis lupus", Language::Japanese, JA_TEMPLATE)
        .await;

    assert_eq!(en, "field=common_name");
    assert_eq!(ja, "field=呼称");
}

#[tokio::test]
async fn test_enrich_withWorkingProvider_shouldFillBothLabels() {
    let provider = MockProvider::working().with_custom_label(|request| {
        if request.field == "common_name" {
            "Lion".to_string()
        } else {
            "ライオン".to_string()
        }
    });
    let client = fast_client(Arc::new(provider.clone()));

    let record = client
        .enrich(1, "Panthera leo", EN_TEMPLATE, JA_TEMPLATE)
        .await;

    assert_eq!(record.number, 1);
    assert_eq!(record.scientific_name, "Panthera leo");
    assert_eq!(record.english_common_name, "Lion");
    assert_eq!(record.japanese_common_name, "ライオン");
    // One request per language
    assert_eq!(provider.request_count(), 2);
}

#[tokio::test]
async fn test_enrich_withOneFailingLanguage_shouldCarrySentinelInRecord() {
    let provider = MockProvider::scripted(|request| {
        if request.field == "呼称" {
            Err(ProviderError::ApiError {
                status_code: 500,
                message: "boom".to_string(),
            })
        } else {
            Ok(CompletionResponse {
                field_value: Some("Wolf".to_string()),
                prompt_tokens: None,
                completion_tokens: None,
            })
        }
    });
    let client = fast_client(Arc::new(provider));

    let record = client
        .enrich(2, "Canis lupus", EN_TEMPLATE, JA_TEMPLATE)
        .await;

    assert_eq!(record.english_common_name, "Wolf");
    assert_eq!(record.japanese_common_name, FAILURE_LABEL);
}
