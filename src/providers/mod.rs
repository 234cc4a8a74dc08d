mod anthropic;
mod factory;
mod open_ai;

pub use anthropic::AnthropicProvider;
pub use factory::ProviderFactory;
pub use open_ai::OpenAIProvider;

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::model::ResponseSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    System,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
        }
    }
}

/// A piece of a message: plain text or an inline base64 image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentPart {
    Text(String),
    Image { mime_type: String, base64: String },
}

#[derive(Debug, Clone)]
pub struct Message {
    pub role: Role,
    pub parts: Vec<ContentPart>,
}

impl Message {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            parts: vec![ContentPart::Text(text.into())],
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            parts: vec![ContentPart::Text(text.into())],
        }
    }

    /// A user turn pairing an instruction with an image attachment.
    pub fn user_with_image(
        text: impl Into<String>,
        mime_type: impl Into<String>,
        base64: impl Into<String>,
    ) -> Self {
        Self {
            role: Role::User,
            parts: vec![
                ContentPart::Text(text.into()),
                ContentPart::Image {
                    mime_type: mime_type.into(),
                    base64: base64.into(),
                },
            ],
        }
    }

    /// Concatenated text parts, ignoring images.
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|p| match p {
                ContentPart::Text(t) => Some(t.as_str()),
                ContentPart::Image { .. } => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn has_image(&self) -> bool {
        self.parts
            .iter()
            .any(|p| matches!(p, ContentPart::Image { .. }))
    }
}

/// A conversation plus an optional output schema.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub messages: Vec<Message>,
    pub response_schema: Option<ResponseSchema>,
}

impl CompletionRequest {
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            response_schema: None,
        }
    }

    pub fn with_schema(mut self, schema: ResponseSchema) -> Self {
        self.response_schema = Some(schema);
        self
    }
}

/// Unified trait for all LLM providers
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Get the provider name (e.g., "openai", "anthropic")
    fn provider_name(&self) -> &str;

    fn model(&self) -> &str;

    /// Whether the configured model accepts image input
    fn supports_vision(&self) -> bool;

    /// Run the conversation and return the model's text output.
    ///
    /// With a response schema the text is JSON the caller still has to validate.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError>;
}

/// Model families known to accept image input.
const VISION_MODEL_MARKERS: &[&str] = &[
    "gpt-4o",
    "gpt-4.1",
    "gpt-4-turbo",
    "gpt-5",
    "o1",
    "o3",
    "o4",
    "claude-3",
    "claude-sonnet-4",
    "claude-opus-4",
    "claude-haiku-4",
    "gemini",
    "pixtral",
    "llava",
    "vision",
    "qwen2.5-vl",
];

/// Text-only members of the families above.
const TEXT_ONLY_MODELS: &[&str] = &["o1-mini", "o1-preview", "o3-mini"];

/// Best-effort lookup of image support from the model identifier.
pub fn model_supports_vision(model: &str) -> bool {
    let model = model.to_lowercase();
    // "openrouter/google/gemini-2.5-flash" -> "gemini-2.5-flash"
    let name = model.rsplit('/').next().unwrap_or(&model);
    if TEXT_ONLY_MODELS.iter().any(|text_only| name.starts_with(text_only)) {
        return false;
    }
    VISION_MODEL_MARKERS
        .iter()
        .any(|marker| name.starts_with(marker) || name.contains(&format!("-{marker}")))
        || name.contains("vision")
}
