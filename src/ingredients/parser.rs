//! Quantity / unit / food extraction for English ingredient lines.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

/// Structured pieces of one ingredient line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedIngredient {
    pub food: String,
    pub quantity: String,
    /// Canonical unit abbreviation, `None` for countable items ("2 eggs")
    pub unit: Option<String>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The text is not a quantity-bearing ingredient line
    #[error("cannot parse ingredient '{text}': {reason}")]
    Unparseable { text: String, reason: &'static str },

    /// The parser itself broke; not a property of the input
    #[error("ingredient parser fault: {0}")]
    Fault(String),
}

pub trait IngredientParser: Send + Sync {
    fn parse(&self, text: &str) -> Result<ParsedIngredient, ParseError>;
}

static QUANTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
        ^\s*
        (?P<qty>
            (?: \d+\s+\d+/\d+
              | \d+/\d+
              | \d+(?:[.,]\d+)?(?:\s*[½⅓⅔¼¾⅛⅜⅝⅞])?
              | [½⅓⅔¼¾⅛⅜⅝⅞] )
            (?: \s*(?:-|–|to)\s*(?: \d+/\d+ | \d+(?:[.,]\d+)? ) )?
        )
        \s*(?P<rest>.*)$",
    )
    .expect("quantity pattern is valid")
});

static UNIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<unit>[A-Za-z]+)[.,]?(?:\s+|$)(?P<rest>.*)$").expect("unit pattern is valid")
});

static PARENTHETICAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\([^)]*\)").expect("parenthetical pattern is valid"));

static RANGE_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*(?:-|to)\s*").expect("range pattern is valid"));

/// Regex-driven parser: leading quantity, optional known unit, then the food.
#[derive(Debug, Default, Clone, Copy)]
pub struct RuleBasedParser;

impl IngredientParser for RuleBasedParser {
    fn parse(&self, text: &str) -> Result<ParsedIngredient, ParseError> {
        let unparseable = |reason| ParseError::Unparseable {
            text: text.to_string(),
            reason,
        };

        let caps = QUANTITY
            .captures(text)
            .ok_or_else(|| unparseable("no leading quantity"))?;
        let quantity = normalize_quantity(&caps["qty"]);
        let mut rest = caps["rest"].to_string();

        let mut unit = None;
        if let Some(unit_caps) = UNIT.captures(&rest) {
            if let Some(canonical) = standardize_unit(&unit_caps["unit"]) {
                unit = Some(canonical.to_string());
                rest = unit_caps["rest"].to_string();
            }
        }

        let food = clean_food(&rest);
        if food.is_empty() {
            return Err(unparseable("no food name"));
        }

        Ok(ParsedIngredient {
            food,
            quantity,
            unit,
        })
    }
}

fn vulgar_fraction(c: char) -> Option<&'static str> {
    Some(match c {
        '½' => "1/2",
        '⅓' => "1/3",
        '⅔' => "2/3",
        '¼' => "1/4",
        '¾' => "3/4",
        '⅛' => "1/8",
        '⅜' => "3/8",
        '⅝' => "5/8",
        '⅞' => "7/8",
        _ => return None,
    })
}

/// "2½" -> "2 1/2", "1,5" -> "1.5", "2 to 3" -> "2-3"
fn normalize_quantity(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.trim().chars() {
        if let Some(fraction) = vulgar_fraction(c) {
            if out.ends_with(|p: char| p.is_ascii_digit()) {
                out.push(' ');
            }
            out.push_str(fraction);
        } else {
            match c {
                ',' => out.push('.'),
                '–' => out.push('-'),
                _ => out.push(c),
            }
        }
    }
    RANGE_SEPARATOR.replace_all(&out, "-").into_owned()
}

fn standardize_unit(word: &str) -> Option<&'static str> {
    let unit = match word.to_ascii_lowercase().as_str() {
        "g" | "gr" | "gram" | "grams" | "gramme" | "grammes" => "g",
        "kg" | "kilo" | "kilos" | "kilogram" | "kilograms" => "kg",
        "mg" | "milligram" | "milligrams" => "mg",
        "ml" | "milliliter" | "milliliters" | "millilitre" | "millilitres" => "ml",
        "cl" | "centiliter" | "centiliters" => "cl",
        "dl" | "deciliter" | "deciliters" => "dl",
        "l" | "liter" | "liters" | "litre" | "litres" => "l",
        "tsp" | "tsps" | "teaspoon" | "teaspoons" => "tsp",
        "tbsp" | "tbsps" | "tbs" | "tbl" | "tablespoon" | "tablespoons" => "tbsp",
        "cup" | "cups" => "cup",
        "oz" | "ounce" | "ounces" => "oz",
        "lb" | "lbs" | "pound" | "pounds" => "lb",
        "pt" | "pint" | "pints" => "pint",
        "qt" | "quart" | "quarts" => "quart",
        "gal" | "gallon" | "gallons" => "gallon",
        "pinch" | "pinches" => "pinch",
        "dash" | "dashes" => "dash",
        "clove" | "cloves" => "clove",
        "can" | "cans" | "tin" | "tins" => "can",
        "slice" | "slices" => "slice",
        "piece" | "pieces" | "pc" | "pcs" => "piece",
        "bunch" | "bunches" => "bunch",
        "head" | "heads" => "head",
        "stick" | "sticks" => "stick",
        "sprig" | "sprigs" => "sprig",
        "package" | "packages" | "pkg" | "packet" | "packets" => "package",
        _ => return None,
    };
    Some(unit)
}

/// Drop "of", parentheticals and trailing preparation notes.
fn clean_food(rest: &str) -> String {
    let without_notes = PARENTHETICAL.replace_all(rest, " ");
    let head = without_notes.split(',').next().unwrap_or_default().trim();
    let head = head
        .strip_prefix("of ")
        .or_else(|| head.strip_prefix("Of "))
        .unwrap_or(head);
    head.split_whitespace().collect::<Vec<_>>().join(" ")
}
