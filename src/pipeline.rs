use log::{info, warn};
use std::path::Path;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::ImportError;
use crate::illustration::{BflClient, IllustrationGenerator, PollPolicy};
use crate::image::ImageRecipeExtractor;
use crate::ingredients::{DeepLTranslator, IngredientNormalizer, RuleBasedParser, WhatlangDetector};
use crate::model::Recipe;
use crate::providers::{LlmProvider, ProviderFactory};
use crate::scrapers::{JsonLdScraper, RecipeScraper, RequestFetcher};
use crate::segmenter::InstructionSegmenter;
use crate::url::UrlRecipeAssembler;

/// Every component wired from one [`AppConfig`].
pub struct RecipePipeline {
    image: ImageRecipeExtractor,
    url: UrlRecipeAssembler,
    illustrator: Option<IllustrationGenerator>,
}

impl RecipePipeline {
    /// Build all components once.
    ///
    /// A missing language-model credential fails here. A missing image-service
    /// credential only fails [`generate_illustration`](Self::generate_illustration).
    pub fn from_config(config: &AppConfig) -> Result<Self, ImportError> {
        let timeout = config.request_timeout();
        let provider = ProviderFactory::get_default_provider(config)?;
        info!(
            "Using {} model {} (vision: {})",
            provider.provider_name(),
            provider.model(),
            provider.supports_vision()
        );

        let fetcher = RequestFetcher::new(timeout, &config.scraper.user_agent)?;
        let scraper = Arc::new(JsonLdScraper::new(
            fetcher,
            config.scraper.supported_domains.clone(),
        ));

        let normalizer = IngredientNormalizer::new(
            Arc::new(WhatlangDetector::new(config.translation.min_confidence)),
            Arc::new(DeepLTranslator::new(&config.translation, timeout)?),
            Arc::new(RuleBasedParser),
        )
        .with_target_lang(config.translation.target_lang.clone())
        .with_concurrency(config.normalizer.concurrency);

        let illustrator = match BflClient::new(&config.image_generation, timeout) {
            Ok(client) => Some(
                IllustrationGenerator::new(provider.clone(), Arc::new(client))
                    .with_policy(PollPolicy::from_config(&config.image_generation)),
            ),
            Err(e) => {
                warn!("Illustrations unavailable: {}", e);
                None
            }
        };

        Ok(Self::from_parts(provider, scraper, normalizer, illustrator))
    }

    /// Assemble a pipeline from already-built components.
    pub fn from_parts(
        provider: Arc<dyn LlmProvider>,
        scraper: Arc<dyn RecipeScraper>,
        normalizer: IngredientNormalizer,
        illustrator: Option<IllustrationGenerator>,
    ) -> Self {
        Self {
            image: ImageRecipeExtractor::new(provider.clone()),
            url: UrlRecipeAssembler::new(scraper, InstructionSegmenter::new(provider), normalizer),
            illustrator,
        }
    }

    pub async fn extract_from_url(&self, url: &str) -> Result<Recipe, ImportError> {
        self.url.extract_from_url(url).await
    }

    pub async fn extract_from_image(
        &self,
        image_bytes: &[u8],
        mime_type: &str,
    ) -> Result<Recipe, ImportError> {
        self.image.extract_from_image(image_bytes, mime_type).await
    }

    /// MIME type is inferred from the extension.
    pub async fn extract_from_image_file(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<Recipe, ImportError> {
        self.image.extract_from_file(path).await
    }

    pub async fn generate_illustration(&self, recipe: &Recipe) -> Result<String, ImportError> {
        let illustrator = self.illustrator.as_ref().ok_or_else(|| {
            ImportError::Configuration("BFL_API_KEY not found in config or environment".to_string())
        })?;
        illustrator.generate_illustration(recipe).await
    }
}
