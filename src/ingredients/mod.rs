//! Per-ingredient normalization: detect language, translate to English when
//! needed, then split into quantity, unit and food.
//!
//! Only a parse failure of the ingredient text is absorbed into a fallback
//! record. A parser fault propagates.

mod language;
mod parser;
mod translate;

pub use language::{is_english, LanguageDetector, WhatlangDetector};
pub use parser::{IngredientParser, ParseError, ParsedIngredient, RuleBasedParser};
pub use translate::{DeepLTranslator, TranslationError, Translator};

use futures::stream::{self, StreamExt, TryStreamExt};
use log::{debug, warn};
use std::sync::Arc;
use thiserror::Error;

use crate::model::RecipeIngredient;

/// Fallback name for a zero-length ingredient line, which has no text to keep.
const BLANK_INGREDIENT_NAME: &str = "(empty ingredient)";

/// The ingredient parser failed for a reason other than the input text.
#[derive(Error, Debug)]
#[error("ingredient parser fault on '{text}': {message}")]
pub struct IngredientFault {
    pub text: String,
    pub message: String,
}

pub struct IngredientNormalizer {
    detector: Arc<dyn LanguageDetector>,
    translator: Arc<dyn Translator>,
    parser: Arc<dyn IngredientParser>,
    target_lang: String,
    concurrency: usize,
}

impl IngredientNormalizer {
    pub fn new(
        detector: Arc<dyn LanguageDetector>,
        translator: Arc<dyn Translator>,
        parser: Arc<dyn IngredientParser>,
    ) -> Self {
        Self {
            detector,
            translator,
            parser,
            target_lang: "EN-US".to_string(),
            concurrency: 4,
        }
    }

    pub fn with_target_lang(mut self, target_lang: impl Into<String>) -> Self {
        self.target_lang = target_lang.into();
        self
    }

    /// Upper bound on ingredients in flight in [`normalize_all`](Self::normalize_all).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Normalize one ingredient line.
    ///
    /// Unparseable text, and text that could not be translated, come back as
    /// a fallback record (`quantity` and `unit` empty strings) instead of an error.
    pub async fn normalize(&self, ingredient_text: &str) -> Result<RecipeIngredient, IngredientFault> {
        let text = ingredient_text.trim();
        if text.is_empty() {
            let name = if ingredient_text.is_empty() {
                BLANK_INGREDIENT_NAME
            } else {
                ingredient_text
            };
            return Ok(RecipeIngredient::fallback(name));
        }

        let english = match self.to_english(text).await {
            Some(english) => english,
            None => return Ok(RecipeIngredient::fallback(text)),
        };

        match self.parser.parse(&english) {
            Ok(parsed) => Ok(RecipeIngredient {
                name: parsed.food,
                quantity: Some(parsed.quantity),
                unit: parsed.unit,
            }),
            Err(ParseError::Unparseable { reason, .. }) => {
                debug!("Falling back for '{}': {}", english, reason);
                Ok(RecipeIngredient::fallback(english))
            }
            Err(ParseError::Fault(message)) => Err(IngredientFault {
                text: text.to_string(),
                message,
            }),
        }
    }

    /// Normalize every line with bounded concurrency, keeping source order.
    pub async fn normalize_all(
        &self,
        ingredients: &[String],
    ) -> Result<Vec<RecipeIngredient>, IngredientFault> {
        stream::iter(ingredients)
            .map(|text| self.normalize(text))
            .buffered(self.concurrency)
            .try_collect()
            .await
    }

    /// The text to parse, or `None` when translation was needed but failed.
    async fn to_english(&self, text: &str) -> Option<String> {
        match self.detector.detect(text) {
            Some(code) if !is_english(&code) => {
                match self.translator.translate(text, &self.target_lang).await {
                    Ok(translated) => Some(translated),
                    Err(e) => {
                        warn!("Translation of '{}' ({}) failed: {}", text, code, e);
                        None
                    }
                }
            }
            // English, or inconclusive: parse as-is
            _ => Some(text.to_string()),
        }
    }
}
