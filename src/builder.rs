use serde::Serialize;
use std::path::PathBuf;

use crate::{AppConfig, ImportError, Recipe, RecipePipeline};

/// Represents the input source for a recipe
#[derive(Debug, Clone)]
pub enum InputSource {
    /// Scrape a supported recipe site
    Url(String),
    /// Read an image from disk; MIME type from the extension
    ImageFile(PathBuf),
    /// Image already in memory
    ImageBytes { bytes: Vec<u8>, mime_type: String },
}

/// Result of a recipe import operation
#[derive(Debug, Clone, Serialize)]
pub struct ImportResult {
    pub recipe: Recipe,
    /// URL of the generated illustration, when one was requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub illustration: Option<String>,
}

/// Builder for configuring and executing recipe imports
#[derive(Debug, Default)]
pub struct RecipeImporterBuilder {
    source: Option<InputSource>,
    illustrate: bool,
    config: Option<AppConfig>,
}

impl RecipeImporterBuilder {
    /// Set the input source to a URL
    ///
    /// # Example
    /// ```
    /// use recipe_extract::RecipeImporter;
    ///
    /// let builder = RecipeImporter::builder()
    ///     .url("https://www.chefkoch.de/rezepte/1943071316420669/Kohlrabigemuese-mit-heller-Sauce.html");
    /// ```
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.source = Some(InputSource::Url(url.into()));
        self
    }

    /// Set the input source to a photo of a recipe
    ///
    /// The configured model must accept image input.
    pub fn image_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(InputSource::ImageFile(path.into()));
        self
    }

    pub fn image_bytes(mut self, bytes: impl Into<Vec<u8>>, mime_type: impl Into<String>) -> Self {
        self.source = Some(InputSource::ImageBytes {
            bytes: bytes.into(),
            mime_type: mime_type.into(),
        });
        self
    }

    /// Also generate an illustration for the extracted recipe
    ///
    /// # Example
    /// ```
    /// use recipe_extract::RecipeImporter;
    ///
    /// let builder = RecipeImporter::builder()
    ///     .image_file("recipe.jpg")
    ///     .illustrate();
    /// ```
    pub fn illustrate(mut self) -> Self {
        self.illustrate = true;
        self
    }

    /// Use this configuration instead of loading `config.toml` and the environment
    pub fn config(mut self, config: AppConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Build and execute the recipe import operation
    ///
    /// # Errors
    /// Returns `ImportError` if:
    /// - No input source was specified
    /// - Configuration cannot be loaded or a credential is missing
    /// - Extraction fails (unsupported site, validation, provider)
    /// - An illustration was requested and generation fails
    ///
    /// # Example
    /// ```no_run
    /// # use recipe_extract::RecipeImporter;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let result = RecipeImporter::builder()
    ///     .url("https://www.bbcgoodfood.com/recipes/cottage-pie")
    ///     .illustrate()
    ///     .build()
    ///     .await?;
    /// println!("{}", result.recipe.title);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn build(self) -> Result<ImportResult, ImportError> {
        // Validate that source is set
        let source = self.source.ok_or_else(|| {
            ImportError::BuilderError(
                "No input source specified. Use .url(), .image_file() or .image_bytes()"
                    .to_string(),
            )
        })?;

        let config = match self.config {
            Some(config) => config,
            None => AppConfig::load()?,
        };
        let pipeline = RecipePipeline::from_config(&config)?;

        let recipe = match source {
            InputSource::Url(url) => pipeline.extract_from_url(&url).await?,
            InputSource::ImageFile(path) => pipeline.extract_from_image_file(&path).await?,
            InputSource::ImageBytes { bytes, mime_type } => {
                if bytes.is_empty() {
                    return Err(ImportError::BuilderError("Image data is empty".to_string()));
                }
                pipeline.extract_from_image(&bytes, &mime_type).await?
            }
        };

        let illustration = if self.illustrate {
            Some(pipeline.generate_illustration(&recipe).await?)
        } else {
            None
        };

        Ok(ImportResult {
            recipe,
            illustration,
        })
    }
}

/// Main entry point for the builder API
pub struct RecipeImporter;

impl RecipeImporter {
    /// Creates a new builder for importing recipes
    ///
    /// # Example
    /// ```
    /// use recipe_extract::RecipeImporter;
    ///
    /// let builder = RecipeImporter::builder();
    /// ```
    pub fn builder() -> RecipeImporterBuilder {
        RecipeImporterBuilder::default()
    }
}
