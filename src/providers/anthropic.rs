use crate::config::ProviderConfig;
use crate::error::{ImportError, ProviderError};
use crate::providers::{model_supports_vision, CompletionRequest, ContentPart, LlmProvider, Role};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

pub struct AnthropicProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    vision: bool,
}

impl AnthropicProvider {
    /// Create a new Anthropic provider from configuration
    pub fn new(config: &ProviderConfig, timeout: Duration) -> Result<Self, ImportError> {
        // Try config first, then fall back to environment variable
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("ANTHROPIC_API_KEY").ok())
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                ImportError::Configuration(
                    "ANTHROPIC_API_KEY not found in config or environment".to_string(),
                )
            })?;

        Ok(AnthropicProvider {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .map_err(ProviderError::from)?,
            api_key,
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| "https://api.anthropic.com".to_string()),
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
        AnthropicProvider {
            client: Client::new(),
            api_key,
            base_url,
            model,
            temperature: 0.2,
            max_tokens: 4000,
            vision,
        }
    }

    fn request_body(&self, request: &CompletionRequest) -> Value {
        let mut system = request
            .messages
            .iter()
            .filter(|m| m.role == Role::System)
            .map(|m| m.text())
            .collect::<Vec<_>>()
            .join("\n\n");

        // No native structured output: pin the shape in the system prompt
        if let Some(schema) = &request.response_schema {
            system.push_str(&format!(
                "\n\nRespond with only a JSON object, without any other text, that validates against this JSON schema ({}):\n{}",
                schema.name, schema.schema
            ));
        }

        let messages: Vec<Value> = request
            .messages
            .iter()
            .filter(|m| m.role != Role::System)
            .map(|m| {
                let content: Vec<Value> = m.parts.iter().map(content_block).collect();
                json!({ "role": m.role.as_str(), "content": content })
            })
            .collect();

        json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
            "system": system.trim(),
            "messages": messages
        })
    }
}

fn content_block(part: &ContentPart) -> Value {
    match part {
        ContentPart::Text(text) => json!({ "type": "text", "text": text }),
        ContentPart::Image { mime_type, base64 } => json!({
            "type": "image",
            "source": { "type": "base64", "media_type": mime_type, "data": base64 }
        }),
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    fn provider_name(&self) -> &str {
        "anthropic"
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
            .post(format!("{}/v1/messages", self.base_url.trim_end_matches('/')))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&self.request_body(request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Api {
                provider: "anthropic",
                status: status.as_u16(),
                body: response.text().await?,
            });
        }

        let response_body: Value = response.json().await?;
        debug!("{:?}", response_body);

        let text = response_body["content"][0]["text"]
            .as_str()
            .ok_or_else(|| {
                ProviderError::MalformedResponse(
                    "Failed to extract content from Anthropic response".to_string(),
                )
            })?
            .to_string();

        Ok(text)
    }
}
