use crate::config::{AppConfig, ProviderConfig};
use crate::error::ImportError;
use crate::providers::{AnthropicProvider, LlmProvider, OpenAIProvider};
use std::sync::Arc;
use std::time::Duration;

pub struct ProviderFactory;

impl ProviderFactory {
    /// Create a provider instance from configuration
    pub fn create(
        provider_name: &str,
        config: &ProviderConfig,
        timeout: Duration,
    ) -> Result<Arc<dyn LlmProvider>, ImportError> {
        match provider_name {
            "openai" => Ok(Arc::new(OpenAIProvider::new(config, timeout)?)),
            "openrouter" => Ok(Arc::new(OpenAIProvider::openrouter(config, timeout)?)),
            "anthropic" => Ok(Arc::new(AnthropicProvider::new(config, timeout)?)),
            _ => Err(ImportError::Configuration(format!(
                "Unknown provider: {}",
                provider_name
            ))),
        }
    }

    /// Get the selected provider from configuration
    pub fn get_default_provider(config: &AppConfig) -> Result<Arc<dyn LlmProvider>, ImportError> {
        let provider_name = &config.provider;
        let provider_config = config.provider_config().ok_or_else(|| {
            ImportError::Configuration(format!(
                "Provider '{}' not found in configuration",
                provider_name
            ))
        })?;

        Self::create(provider_name, &provider_config, config.request_timeout())
    }

    /// List all available provider names
    pub fn available_providers() -> Vec<&'static str> {
        vec!["openrouter", "openai", "anthropic"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn create_test_provider_config() -> ProviderConfig {
        ProviderConfig {
            model: "test-model".to_string(),
            temperature: 0.7,
            max_tokens: 2000,
            api_key: Some("test-key".to_string()),
            base_url: None,
            supports_vision: None,
        }
    }

    #[test]
    fn test_create_openai_provider() {
        let config = create_test_provider_config();
        let provider = ProviderFactory::create("openai", &config, Duration::from_secs(5)).unwrap();
        assert_eq!(provider.provider_name(), "openai");
        assert_eq!(provider.model(), "test-model");
    }

    #[test]
    fn test_create_openrouter_provider() {
        let config = create_test_provider_config();
        let provider =
            ProviderFactory::create("openrouter", &config, Duration::from_secs(5)).unwrap();
        assert_eq!(provider.provider_name(), "openrouter");
    }

    #[test]
    fn test_create_anthropic_provider() {
        let config = create_test_provider_config();
        let provider =
            ProviderFactory::create("anthropic", &config, Duration::from_secs(5)).unwrap();
        assert_eq!(provider.provider_name(), "anthropic");
    }

    #[test]
    fn test_create_unknown_provider() {
        let config = create_test_provider_config();
        let result = ProviderFactory::create("unknown", &config, Duration::from_secs(5));
        match result {
            Err(ImportError::Configuration(msg)) => assert!(msg.contains("Unknown provider")),
            _ => panic!("expected configuration error"),
        }
    }

    #[test]
    fn test_get_default_provider() {
        let mut providers = HashMap::new();
        providers.insert("openai".to_string(), create_test_provider_config());

        let config = AppConfig {
            provider: "openai".to_string(),
            providers,
            ..AppConfig::default()
        };

        let provider = ProviderFactory::get_default_provider(&config).unwrap();
        assert_eq!(provider.provider_name(), "openai");
    }

    #[test]
    fn test_get_default_provider_not_found() {
        let config = AppConfig {
            provider: "mystery".to_string(),
            ..AppConfig::default()
        };

        match ProviderFactory::get_default_provider(&config) {
            Err(ImportError::Configuration(msg)) => assert!(msg.contains("not found")),
            _ => panic!("expected configuration error"),
        }
    }

    #[test]
    fn test_available_providers() {
        let providers = ProviderFactory::available_providers();
        assert_eq!(providers.len(), 3);
        assert!(providers.contains(&"openrouter"));
        assert!(providers.contains(&"openai"));
        assert!(providers.contains(&"anthropic"));
    }
}
