//! LLM provider factory.
//!
//! Builds the generation collaborator from application configuration:
//! resolves the provider, checks the credential and applies the timeout.

use crate::client::LlmClient;
use crate::providers::{gemini, GeminiClient, OllamaClient};
use crate::types::ProviderType;
use docqa_core::{AppConfig, AppError, AppResult};
use std::sync::Arc;

/// Create an LLM client for a provider.
///
/// # Arguments
/// * `provider` - Provider identifier ("gemini", "ollama")
/// * `model` - Default model for the client
/// * `endpoint` - Optional custom endpoint URL
/// * `api_key` - API key (required by gemini)
/// * `timeout_secs` - Per-request deadline
///
/// # Errors
/// Returns a configuration error if the provider is unknown or its
/// credential is missing.
pub fn create_client(
    provider: &str,
    model: &str,
    endpoint: Option<&str>,
    api_key: Option<&str>,
    timeout_secs: u64,
) -> AppResult<Arc<dyn LlmClient>> {
    let provider_type = ProviderType::parse(provider)
        .ok_or_else(|| AppError::Config(format!("Unknown provider: {}", provider)))?;

    match provider_type {
        ProviderType::Gemini => {
            let api_key = api_key.ok_or_else(|| {
                AppError::Config("Gemini provider requires API key".to_string())
            })?;
            let base_url = endpoint.unwrap_or(gemini::DEFAULT_BASE_URL);
            let client = GeminiClient::with_options(api_key, model, base_url, timeout_secs)?;
            Ok(Arc::new(client))
        }
        ProviderType::Ollama => {
            let base_url = endpoint.unwrap_or("http://localhost:11434");
            let client = OllamaClient::with_options(base_url, model, timeout_secs)?;
            Ok(Arc::new(client))
        }
    }
}

/// Build the collaborator for the active provider, or `None` when it is
/// disabled because its credential is missing.
///
/// Unknown providers are still an error: that is a configuration mistake,
/// not an absent credential.
pub fn client_from_config(config: &AppConfig) -> AppResult<Option<Arc<dyn LlmClient>>> {
    let provider_type = ProviderType::parse(&config.provider)
        .ok_or_else(|| AppError::Config(format!("Unknown provider: {}", config.provider)))?;

    let api_key = config.resolve_api_key(&config.provider);
    if provider_type.requires_api_key() && api_key.is_none() {
        tracing::warn!(
            "No API key found for provider '{}'; refinement and recursive mode are disabled",
            config.provider
        );
        return Ok(None);
    }

    let endpoint = config.provider_endpoint();
    let client = create_client(
        &config.provider,
        &config.model,
        endpoint.as_deref(),
        api_key.as_deref(),
        config.timeout_secs,
    )?;

    tracing::info!(
        "Generation collaborator ready: {} ({})",
        client.provider_name(),
        client.model_name()
    );

    Ok(Some(client))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_ollama_client() {
        let client = create_client("ollama", "llama3.2", None, None, 10).unwrap();
        assert_eq!(client.provider_name(), "ollama");
        assert_eq!(client.model_name(), "llama3.2");
    }

    #[test]
    fn test_create_gemini_client() {
        let client =
            create_client("gemini", "gemini-flash-latest", None, Some("key"), 10).unwrap();
        assert_eq!(client.provider_name(), "gemini");
    }

    #[test]
    fn test_gemini_requires_api_key() {
        match create_client("gemini", "gemini-flash-latest", None, None, 10) {
            Err(err) => assert!(err.to_string().contains("requires API key")),
            Ok(_) => panic!("Expected error for Gemini without API key"),
        }
    }

    #[test]
    fn test_unknown_provider() {
        match create_client("unknown", "m", None, None, 10) {
            Err(err) => assert!(err.to_string().contains("Unknown provider")),
            Ok(_) => panic!("Expected error for unknown provider"),
        }
    }

    #[test]
    fn test_client_from_config_without_key_is_disabled() {
        let mut config = AppConfig::default();
        config.api_key = None;
        config.llm = Some(docqa_core::config::LlmConfig {
            active_provider: "gemini".to_string(),
            providers: [(
                "gemini".to_string(),
                docqa_core::config::ProviderConfig::Gemini {
                    api_key_env: "DOCQA_TEST_NEVER_SET_KEY".to_string(),
                    model: "gemini-flash-latest".to_string(),
                    endpoint: None,
                    timeout: None,
                },
            )]
            .into_iter()
            .collect(),
        });

        assert!(client_from_config(&config).unwrap().is_none());
    }

    #[test]
    fn test_client_from_config_ollama() {
        let mut config = AppConfig::default();
        config.provider = "ollama".to_string();
        config.model = "llama3.2".to_string();

        let client = client_from_config(&config).unwrap().unwrap();
        assert_eq!(client.provider_name(), "ollama");
    }
}
