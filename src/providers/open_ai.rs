use crate::config::ProviderConfig;
use crate::error::{ImportError, ProviderError};
use crate::providers::{model_supports_vision, CompletionRequest, ContentPart, LlmProvider};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

/// Chat-completions backend for OpenAI and OpenAI-compatible gateways (OpenRouter).
pub struct OpenAIProvider {
    client: Client,
    name: &'static str,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    vision: bool,
}

impl OpenAIProvider {
    /// Create a new OpenAI provider from configuration
    pub fn new(config: &ProviderConfig, timeout: Duration) -> Result<Self, ImportError> {
        Self::build("openai", "OPENAI_API_KEY", "https://api.openai.com", config, timeout)
    }

    /// Same wire protocol, routed through OpenRouter
    pub fn openrouter(config: &ProviderConfig, timeout: Duration) -> Result<Self, ImportError> {
        Self::build(
            "openrouter",
            "OPENROUTER_API_KEY",
            "https://openrouter.ai/api",
            config,
            timeout,
        )
    }

    fn build(
        name: &'static str,
        key_var: &str,
        default_base_url: &str,
        config: &ProviderConfig,
        timeout: Duration,
    ) -> Result<Self, ImportError> {
        // Try config first, then fall back to environment variable
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var(key_var).ok())
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                ImportError::Configuration(format!("{key_var} not found in config or environment"))
            })?;

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| default_base_url.to_string());

        Ok(OpenAIProvider {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .map_err(ProviderError::from)?,
            name,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            vision: config
                .supports_vision
                .unwrap_or_else(|| model_supports_vision(&config.model)),
        })
    }

    #[doc(hidden)]
    pub fn with_base_url(api_key: String, base_url: String, model: String) -> Self {
        let vision = model_supports_vision(&model);
        OpenAIProvider {
            client: Client::new(),
            name: "openai",
            api_key,
            base_url,
            model,
            temperature: 0.2,
            max_tokens: 4000,
            vision,
        }
    }

    fn request_body(&self, request: &CompletionRequest) -> Value {
        let messages: Vec<Value> = request
            .messages
            .iter()
            .map(|message| {
                let content = match message.parts.as_slice() {
                    [ContentPart::Text(text)] => json!(text),
                    parts => Value::Array(parts.iter().map(content_part).collect()),
                };
                json!({ "role": message.role.as_str(), "content": content })
            })
            .collect();

        let mut body = json!({
            "model": self.model,
            "messages": messages,
            "temperature": self.temperature,
            "max_tokens": self.max_tokens
        });

        if let Some(schema) = &request.response_schema {
            body["response_format"] = json!({
                "type": "json_schema",
                "json_schema": {
                    "name": schema.name,
                    "strict": true,
                    "schema": schema.schema
                }
            });
        }

        body
    }
}

fn content_part(part: &ContentPart) -> Value {
    match part {
        ContentPart::Text(text) => json!({ "type": "text", "text": text }),
        ContentPart::Image { mime_type, base64 } => json!({
            "type": "image_url",
            "image_url": { "url": format!("data:{mime_type};base64,{base64}") }
        }),
    }
}

#[async_trait]
impl LlmProvider for OpenAIProvider {
    fn provider_name(&self) -> &str {
        self.name
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn supports_vision(&self) -> bool {
        self.vision
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError> {
        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&self.request_body(request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Api {
                provider: self.name,
                status: status.as_u16(),
                body: response.text().await?,
            });
        }

        let response_body: Value = response.json().await?;
        debug!("{:?}", response_body);
        let content = response_body["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                ProviderError::MalformedResponse(
                    "Failed to extract content from response".to_string(),
                )
            })?
            .to_string();

        Ok(content)
    }
}
