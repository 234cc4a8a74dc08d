mod fetcher;
mod json_ld;

pub use fetcher::RequestFetcher;
pub use json_ld::{parse_recipe_page, JsonLdScraper};

use async_trait::async_trait;
use std::collections::BTreeSet;
use thiserror::Error;

/// Raw fields read from a recipe page, before any normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapedRecipe {
    pub title: String,
    pub description: String,
    pub ingredients: Vec<String>,
    pub instructions_text: String,
}

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("failed to fetch page: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("page returned HTTP {0}")]
    Status(u16),

    #[error("no recipe found in page")]
    NoRecipe,
}

/// Site-aware recipe scraping.
#[async_trait]
pub trait RecipeScraper: Send + Sync {
    /// Hosts, without a leading "www.", this scraper accepts
    fn supported_domains(&self) -> &BTreeSet<String>;

    fn supports(&self, host: &str) -> bool {
        self.supported_domains().contains(host)
    }

    async fn scrape(&self, url: &str) -> Result<ScrapedRecipe, ScrapeError>;
}
