use std::time::Duration;

use thiserror::Error;

use crate::ingredients::IngredientFault;
use crate::scrapers::ScrapeError;

/// Errors that can occur during recipe import operations
#[derive(Error, Debug)]
pub enum ImportError {
    /// Structured model output did not match the expected schema
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The URL host has no scraper
    #[error("Unsupported URL: {host}. Supported domains are: {}", supported.join(", "))]
    UnsupportedSource { host: String, supported: Vec<String> },

    /// Illustration could not be produced
    #[error("Image generation failed: {0}")]
    Generation(#[from] GenerationError),

    /// A required capability or credential is missing
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The language model call failed
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The recipe page could not be scraped
    #[error("Failed to scrape recipe: {0}")]
    Scrape(#[from] ScrapeError),

    /// An ingredient capability failed in a way that is not a parse failure
    #[error("Ingredient normalization failed: {0}")]
    Ingredient(#[from] IngredientFault),

    /// The input is not an absolute URL with a host
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Reading an image from disk failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Loading configuration failed
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),

    /// Builder configuration error
    #[error("Builder error: {0}")]
    BuilderError(String),
}

/// Structured output from the extraction capability was unusable.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("response is not valid {schema} JSON: {source}")]
    Schema {
        schema: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("recipe title is empty")]
    EmptyTitle,

    #[error("instruction {index} has an empty description")]
    EmptyInstruction { index: usize },
}

/// Failures talking to a language model backend.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{provider} API error ({status}): {body}")]
    Api {
        provider: &'static str,
        status: u16,
        body: String,
    },

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// Outcomes of the image-generation protocol other than a ready image.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("submission rejected ({status}): {body}")]
    Submission { status: u16, body: String },

    #[error("generation ended with status {status}: {body}")]
    Failed { status: String, body: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("timed out after {elapsed:?}")]
    Timeout { elapsed: Duration },

    #[error("no result after {attempts} polls")]
    AttemptsExhausted { attempts: u32 },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("prompt synthesis failed: {0}")]
    Prompt(#[from] ProviderError),
}

impl ImportError {
    /// True when the failure is a timeout or attempt limit of the polling loop.
    pub fn is_generation_timeout(&self) -> bool {
        matches!(
            self,
            ImportError::Generation(
                GenerationError::Timeout { .. } | GenerationError::AttemptsExhausted { .. }
            )
        )
    }
}
