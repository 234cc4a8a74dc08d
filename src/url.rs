use log::{debug, info};
use std::sync::Arc;

use crate::error::{ImportError, ValidationError};
use crate::ingredients::IngredientNormalizer;
use crate::model::Recipe;
use crate::scrapers::RecipeScraper;
use crate::segmenter::InstructionSegmenter;

/// Host of `url` with a leading "www." label removed.
pub fn host_of(url: &str) -> Result<String, ImportError> {
    let parsed = ::url::Url::parse(url).map_err(|e| ImportError::InvalidUrl(format!("{url}: {e}")))?;
    let host = parsed
        .host_str()
        .ok_or_else(|| ImportError::InvalidUrl(format!("{url}: no host")))?
        .to_ascii_lowercase();

    Ok(match host.strip_prefix("www.") {
        Some(stripped) => stripped.to_string(),
        None => host,
    })
}

/// Builds a [`Recipe`] from a web page: scrape, then segment the method and
/// normalize every ingredient.
pub struct UrlRecipeAssembler {
    scraper: Arc<dyn RecipeScraper>,
    segmenter: InstructionSegmenter,
    normalizer: IngredientNormalizer,
}

impl UrlRecipeAssembler {
    pub fn new(
        scraper: Arc<dyn RecipeScraper>,
        segmenter: InstructionSegmenter,
        normalizer: IngredientNormalizer,
    ) -> Self {
        Self {
            scraper,
            segmenter,
            normalizer,
        }
    }

    /// Unsupported hosts are rejected before any request is made.
    pub async fn extract_from_url(&self, url: &str) -> Result<Recipe, ImportError> {
        let host = host_of(url)?;
        if !self.scraper.supports(&host) {
            return Err(ImportError::UnsupportedSource {
                host,
                supported: self.scraper.supported_domains().iter().cloned().collect(),
            });
        }

        let scraped = self.scraper.scrape(url).await?;
        if scraped.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle.into());
        }
        debug!(
            "Scraped '{}' from {}: {} ingredients",
            scraped.title,
            host,
            scraped.ingredients.len()
        );

        let (instructions, ingredients) = tokio::try_join!(
            self.segmenter.segment(&scraped.instructions_text),
            async {
                self.normalizer
                    .normalize_all(&scraped.ingredients)
                    .await
                    .map_err(ImportError::from)
            },
        )?;

        info!(
            "Assembled '{}' with {} ingredients and {} steps",
            scraped.title,
            ingredients.len(),
            instructions.len()
        );

        Ok(Recipe {
            title: scraped.title,
            description: scraped.description,
            ingredients,
            instructions,
        })
    }
}
