use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::{debug, warn};
use std::path::Path;
use std::sync::Arc;

use crate::error::ImportError;
use crate::model::Recipe;
use crate::prompt;
use crate::providers::{CompletionRequest, LlmProvider, Message};

/// MIME type inferred from the file extension; anything unknown is sent as JPEG.
pub fn mime_type_for_path(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        _ => "image/jpeg",
    }
}

/// Reads a full recipe straight off a photo with a vision-capable model.
pub struct ImageRecipeExtractor {
    provider: Arc<dyn LlmProvider>,
}

impl ImageRecipeExtractor {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    /// Extract a recipe from raw image bytes.
    ///
    /// # Errors
    /// - `Configuration` before any request when the model has no image input
    /// - `Provider` when the model call fails
    /// - `Validation` when the output does not match the recipe schema
    pub async fn extract_from_image(
        &self,
        image_bytes: &[u8],
        mime_type: &str,
    ) -> Result<Recipe, ImportError> {
        if !self.provider.supports_vision() {
            return Err(ImportError::Configuration(format!(
                "model '{}' ({}) does not accept image input",
                self.provider.model(),
                self.provider.provider_name()
            )));
        }

        let base64_image = STANDARD.encode(image_bytes);
        debug!(
            "Encoded {} byte {} image to base64",
            image_bytes.len(),
            mime_type
        );

        let request = CompletionRequest::new(vec![
            Message::system(prompt::IMAGE_EXTRACTION_SYSTEM),
            Message::user_with_image(prompt::IMAGE_EXTRACTION_USER, mime_type, base64_image),
        ])
        .with_schema(Recipe::response_schema());

        let output = self.provider.complete(&request).await?;
        Recipe::from_model_output(&output).map_err(|e| {
            warn!("Recipe extracted from image failed validation: {}", e);
            ImportError::Validation(e)
        })
    }

    /// Read an image from disk and extract the recipe on it.
    pub async fn extract_from_file(&self, path: impl AsRef<Path>) -> Result<Recipe, ImportError> {
        let path = path.as_ref();
        let image_data = tokio::fs::read(path).await?;
        self.extract_from_image(&image_data, mime_type_for_path(path))
            .await
    }
}
