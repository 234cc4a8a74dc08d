use log::debug;
use std::collections::HashMap;
use std::sync::LazyLock;
use whatlang::{Detector, Lang};

/// Local, best-effort language identification.
pub trait LanguageDetector: Send + Sync {
    /// Language code of `text`, or `None` when the result is inconclusive.
    fn detect(&self, text: &str) -> Option<String>;
}

/// Languages of the recipe sites the scraper accepts.
const RECIPE_LANGUAGES: [Lang; 7] = [
    Lang::Eng,
    Lang::Deu,
    Lang::Fra,
    Lang::Spa,
    Lang::Ita,
    Lang::Nld,
    Lang::Por,
];

/// Common kitchen words that only occur in one of [`RECIPE_LANGUAGES`].
static KITCHEN_WORDS: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    let deu = [
        "mehl", "zucker", "salz", "eier", "milch", "sahne", "kartoffeln", "kartoffel", "zwiebel",
        "zwiebeln", "knoblauch", "gramm", "prise", "esslöffel", "teelöffel", "wasser", "pfeffer",
        "weizenmehl", "schlagsahne", "möhren", "karotten", "petersilie", "stück",
    ];
    let eng = [
        "tablespoon", "tablespoons", "teaspoon", "teaspoons", "cup", "cups", "flour", "sugar",
        "salt", "egg", "eggs", "onion", "onions", "cream", "water", "pepper", "garlic", "cloves",
        "chopped", "bread", "slice", "ounces", "pound", "pounds", "the", "and",
    ];
    let fra = [
        "farine", "sucre", "beurre", "oeufs", "œufs", "lait", "sel", "oignon", "oignons", "ail",
        "cuillère", "cuillères", "pincée", "crème", "eau", "poivre",
    ];
    deu.into_iter()
        .map(|w| (w, "deu"))
        .chain(eng.into_iter().map(|w| (w, "eng")))
        .chain(fra.into_iter().map(|w| (w, "fra")))
        .collect()
});

/// Words of `text` without quantities, unit abbreviations or punctuation.
fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphabetic())
        .filter(|w| w.chars().count() > 2)
        .map(str::to_lowercase)
        .collect()
}

/// The language with the most kitchen-word hits, when one language leads.
fn vocabulary_guess(words: &[String]) -> Option<&'static str> {
    let mut hits: HashMap<&'static str, usize> = HashMap::new();
    for word in words {
        if let Some(code) = KITCHEN_WORDS.get(word.as_str()) {
            *hits.entry(*code).or_default() += 1;
        }
    }

    let mut ranked: Vec<(&'static str, usize)> = hits.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    match ranked.as_slice() {
        [(code, _)] => Some(*code),
        [(code, first), (_, second), ..] if first > second => Some(*code),
        _ => None,
    }
}

/// Ingredient-line detection, reporting ISO 639-3 codes ("deu", "eng").
///
/// Lines are usually a handful of words, far too short for trigram statistics
/// alone. Known kitchen words decide first; otherwise `whatlang` makes its best
/// guess among the recipe-site languages, kept when its confidence reaches
/// `min_confidence`.
#[derive(Debug, Clone, Copy)]
pub struct WhatlangDetector {
    min_confidence: f64,
}

impl WhatlangDetector {
    pub fn new(min_confidence: f64) -> Self {
        Self { min_confidence }
    }
}

impl Default for WhatlangDetector {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl LanguageDetector for WhatlangDetector {
    fn detect(&self, text: &str) -> Option<String> {
        let words = words(text);
        if words.is_empty() {
            return None;
        }

        if let Some(code) = vocabulary_guess(&words) {
            debug!("Detected {} from kitchen vocabulary for '{}'", code, text);
            return Some(code.to_string());
        }

        let info = Detector::with_allowlist(RECIPE_LANGUAGES.to_vec()).detect(&words.join(" "))?;
        debug!(
            "Detected {} with confidence {:.2} for '{}'",
            info.lang().code(),
            info.confidence(),
            text
        );
        (info.confidence() >= self.min_confidence).then(|| info.lang().code().to_string())
    }
}

/// Accepts ISO 639-1, ISO 639-3 and regional tags.
pub fn is_english(code: &str) -> bool {
    let code = code.to_ascii_lowercase();
    code == "en" || code == "eng" || code.starts_with("en-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_english() {
        assert!(is_english("en"));
        assert!(is_english("eng"));
        assert!(is_english("EN-US"));
        assert!(!is_english("de"));
        assert!(!is_english("deu"));
    }

    #[test]
    fn test_detects_long_german_text() {
        let detector = WhatlangDetector::default();
        let code = detector
            .detect("Die Kartoffeln schälen, in Würfel schneiden und in Salzwasser weich kochen.");
        assert_eq!(code.as_deref(), Some("deu"));
    }

    #[test]
    fn test_detects_short_ingredient_lines() {
        let detector = WhatlangDetector::default();
        assert_eq!(detector.detect("200g Mehl").as_deref(), Some("deu"));
        assert_eq!(detector.detect("500 g Kartoffeln").as_deref(), Some("deu"));
        assert_eq!(detector.detect("1 Prise Salz").as_deref(), Some("deu"));
        assert_eq!(detector.detect("2 tablespoons butter").as_deref(), Some("eng"));
        assert_eq!(detector.detect("3 eggs").as_deref(), Some("eng"));
        assert_eq!(detector.detect("250 g de farine").as_deref(), Some("fra"));
    }

    #[test]
    fn test_mixed_vocabulary_uses_majority() {
        let detector = WhatlangDetector::default();
        assert_eq!(
            detector.detect("1 Prise Salz und Zucker (salt)").as_deref(),
            Some("deu")
        );
    }

    #[test]
    fn test_empty_text_is_inconclusive() {
        let detector = WhatlangDetector::default();
        assert_eq!(detector.detect(""), None);
        assert_eq!(detector.detect("200 g, 1/2"), None);
    }

    #[test]
    fn test_threshold_applies_to_trigram_guess() {
        let detector = WhatlangDetector::new(1.1);
        assert_eq!(detector.detect("Kohlrabi schälen und würfeln"), None);
        assert_eq!(detector.detect("200g Mehl").as_deref(), Some("deu"));
    }
}
