//! Extract structured recipes from recipe web pages and photos, and
//! optionally illustrate them.
//!
//! ```no_run
//! # #[tokio::main]
//! # async fn main() -> Result<(), recipe_extract::ImportError> {
//! let recipe = recipe_extract::url_to_recipe(
//!     "https://www.chefkoch.de/rezepte/1943071316420669/Kohlrabigemuese-mit-heller-Sauce.html",
//! )
//! .await?;
//! println!("{}", serde_json::to_string_pretty(&recipe).unwrap());
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod illustration;
pub mod image;
pub mod ingredients;
pub mod model;
pub mod pipeline;
pub mod prompt;
pub mod providers;
pub mod scrapers;
pub mod segmenter;
pub mod url;

#[cfg(test)]
mod test_support;

use std::path::Path;

// Re-export commonly used types
pub use builder::{ImportResult, InputSource, RecipeImporter, RecipeImporterBuilder};
pub use config::AppConfig;
pub use error::{GenerationError, ImportError, ProviderError, ValidationError};
pub use model::{Recipe, RecipeIngredient, RecipeInstruction};
pub use pipeline::RecipePipeline;

/// Scrape and normalize a recipe from a supported site.
///
/// Configuration is loaded from `config.toml` and the environment.
pub async fn url_to_recipe(url: &str) -> Result<Recipe, ImportError> {
    let config = AppConfig::load()?;
    RecipePipeline::from_config(&config)?
        .extract_from_url(url)
        .await
}

/// Extract a recipe from a photo on disk.
pub async fn image_to_recipe(path: impl AsRef<Path>) -> Result<Recipe, ImportError> {
    let config = AppConfig::load()?;
    RecipePipeline::from_config(&config)?
        .extract_from_image_file(path)
        .await
}
