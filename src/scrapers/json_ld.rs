use super::{RecipeScraper, RequestFetcher, ScrapeError, ScrapedRecipe};
use async_trait::async_trait;
use html_escape::decode_html_entities;
use log::debug;
use scraper::{Html, Selector};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeSet;

/// Scrapes the schema.org `Recipe` object most recipe sites embed as JSON-LD.
pub struct JsonLdScraper {
    fetcher: RequestFetcher,
    supported_domains: BTreeSet<String>,
}

impl JsonLdScraper {
    pub fn new(fetcher: RequestFetcher, supported_domains: BTreeSet<String>) -> Self {
        Self {
            fetcher,
            supported_domains,
        }
    }
}

#[async_trait]
impl RecipeScraper for JsonLdScraper {
    fn supported_domains(&self) -> &BTreeSet<String> {
        &self.supported_domains
    }

    async fn scrape(&self, url: &str) -> Result<ScrapedRecipe, ScrapeError> {
        let html = self.fetcher.fetch(url).await?;
        parse_recipe_page(&html)
    }
}

/// Pull the raw recipe fields out of a page's JSON-LD scripts.
pub fn parse_recipe_page(html: &str) -> Result<ScrapedRecipe, ScrapeError> {
    let document = Html::parse_document(html);
    let selector =
        Selector::parse("script[type='application/ld+json']").expect("selector is valid");

    for (index, script) in document.select(&selector).enumerate() {
        let raw_json = script.inner_html();
        let json_ld = match serde_json::from_str::<Value>(raw_json.trim()) {
            Ok(value) => value,
            Err(e) => {
                debug!("JsonLdScraper: Failed to parse JSON-LD {}: {}", index, e);
                continue;
            }
        };

        let Some(recipe_json) = find_recipe(&json_ld) else {
            debug!("JsonLdScraper: No recipe found in JSON-LD {}", index);
            continue;
        };

        match serde_json::from_value::<JsonLdRecipe>(recipe_json.clone()) {
            Ok(recipe) => return Ok(recipe.into_scraped()),
            Err(e) => debug!("JsonLdScraper: Recipe node {} did not deserialize: {}", index, e),
        }
    }

    Err(ScrapeError::NoRecipe)
}

fn find_recipe(json_ld: &Value) -> Option<&Value> {
    if let Some(items) = json_ld.as_array() {
        return items.iter().find_map(find_recipe);
    }
    if is_recipe_type(json_ld) {
        return Some(json_ld);
    }
    json_ld
        .get("@graph")
        .and_then(Value::as_array)
        .and_then(|graph| graph.iter().find(|item| is_recipe_type(item)))
}

fn is_recipe_type(value: &Value) -> bool {
    match value.get("@type") {
        Some(Value::String(t)) => t.eq_ignore_ascii_case("recipe"),
        Some(Value::Array(types)) => types
            .iter()
            .filter_map(Value::as_str)
            .any(|t| t.eq_ignore_ascii_case("recipe")),
        _ => false,
    }
}

#[derive(Debug, Deserialize)]
struct JsonLdRecipe {
    name: String,
    description: Option<DescriptionType>,
    #[serde(rename = "recipeIngredient")]
    recipe_ingredient: Option<RecipeIngredients>,
    #[serde(rename = "recipeInstructions")]
    recipe_instructions: Option<RecipeInstructions>,
}

impl JsonLdRecipe {
    fn into_scraped(self) -> ScrapedRecipe {
        let ingredients = match self.recipe_ingredient {
            Some(RecipeIngredients::Strings(lines)) => lines,
            Some(RecipeIngredients::Single(line)) => line.lines().map(String::from).collect(),
            None => Vec::new(),
        }
        .into_iter()
        .map(|line| decode_html_symbols(&line))
        .filter(|line| !line.is_empty())
        .collect();

        let steps: Vec<String> = match self.recipe_instructions {
            Some(RecipeInstructions::String(text)) => vec![text],
            Some(RecipeInstructions::Multiple(steps)) => steps,
            Some(RecipeInstructions::HowTo(items)) => items
                .into_iter()
                .flat_map(|item| match item {
                    HowTo::HowToStep(step) => step.into_text().into_iter().collect::<Vec<_>>(),
                    HowTo::HowToSection(section) => section
                        .item_list_element
                        .into_iter()
                        .filter_map(HowToStep::into_text)
                        .collect(),
                })
                .collect(),
            None => Vec::new(),
        };

        let instructions_text = steps
            .iter()
            .map(|s| decode_html_symbols(s))
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("\n");

        ScrapedRecipe {
            title: decode_html_symbols(&self.name),
            description: self
                .description
                .map(|d| match d {
                    DescriptionType::String(text) => decode_html_symbols(&text),
                    DescriptionType::Object(obj) => decode_html_symbols(&obj.text),
                })
                .unwrap_or_default(),
            ingredients,
            instructions_text,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TextObject {
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DescriptionType {
    String(String),
    Object(TextObject),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecipeIngredients {
    Strings(Vec<String>),
    Single(String),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecipeInstructions {
    String(String),
    Multiple(Vec<String>),
    HowTo(Vec<HowTo>),
}

#[derive(Debug, Deserialize)]
#[serde(tag = "@type")]
enum HowTo {
    HowToStep(HowToStep),
    HowToSection(HowToSection),
}

#[derive(Debug, Deserialize)]
struct HowToStep {
    text: Option<String>,
    name: Option<String>,
}

impl HowToStep {
    // Prefer text over name
    fn into_text(self) -> Option<String> {
        self.text.or(self.name)
    }
}

#[derive(Debug, Deserialize)]
struct HowToSection {
    #[serde(rename = "itemListElement")]
    item_list_element: Vec<HowToStep>,
}

fn decode_html_symbols(text: &str) -> String {
    // for some reason need to decode twice to get the correct string
    decode_html_entities(&decode_html_entities(text))
        .trim()
        .to_string()
}
