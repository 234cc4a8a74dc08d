use crate::config::TranslationConfig;
use crate::error::ImportError;
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TranslationError {
    #[error("DEEPL_AUTH_KEY not found in config or environment")]
    MissingCredential,

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("DeepL API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// Remote machine translation.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, target_lang: &str) -> Result<String, TranslationError>;
}

pub struct DeepLTranslator {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
struct Translation {
    text: String,
}

impl DeepLTranslator {
    /// A missing key is not an error here; every call then reports `MissingCredential`.
    pub fn new(config: &TranslationConfig, timeout: Duration) -> Result<Self, ImportError> {
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("DEEPL_AUTH_KEY").ok())
            .filter(|k| !k.trim().is_empty());

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| default_base_url(api_key.as_deref()).to_string());

        Ok(Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .map_err(crate::error::ProviderError::from)?,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    #[doc(hidden)]
    pub fn with_base_url(api_key: Option<String>, base_url: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url,
        }
    }
}

/// Free-tier keys carry a ":fx" suffix and live on a separate host.
fn default_base_url(api_key: Option<&str>) -> &'static str {
    match api_key {
        Some(key) if key.ends_with(":fx") => "https://api-free.deepl.com",
        _ => "https://api.deepl.com",
    }
}

#[async_trait]
impl Translator for DeepLTranslator {
    async fn translate(&self, text: &str, target_lang: &str) -> Result<String, TranslationError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(TranslationError::MissingCredential)?;

        let response = self
            .client
            .post(format!("{}/v2/translate", self.base_url))
            .header("Authorization", format!("DeepL-Auth-Key {api_key}"))
            .json(&json!({ "text": [text], "target_lang": target_lang }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TranslationError::Api {
                status: status.as_u16(),
                body: response.text().await?,
            });
        }

        let body: TranslateResponse = response.json().await?;
        let translated = body
            .translations
            .into_iter()
            .next()
            .map(|t| t.text)
            .ok_or_else(|| TranslationError::MalformedResponse("no translations".to_string()))?;

        debug!("Translated '{}' -> '{}'", text, translated);
        Ok(translated)
    }
}
