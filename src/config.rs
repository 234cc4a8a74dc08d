use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};
use std::time::Duration;

/// Process-wide settings, loaded once and passed by reference to every component
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Which entry of `providers` drives extraction and prompt synthesis
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Map of provider name to provider configuration
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    #[serde(default)]
    pub translation: TranslationConfig,
    #[serde(default)]
    pub image_generation: ImageGenerationConfig,
    #[serde(default)]
    pub scraper: ScraperConfig,
    #[serde(default)]
    pub normalizer: NormalizerConfig,
    /// Request timeout in seconds, applied to every outbound HTTP call
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

/// Configuration for a specific LLM provider
#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    /// Model identifier (e.g., "gpt-4o-mini", "google/gemini-2.5-flash")
    pub model: String,
    /// Temperature for generation (0.0-1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// API key for authentication (can also be set via environment variable)
    pub api_key: Option<String>,
    /// Base URL for API endpoint (for custom or proxy endpoints)
    pub base_url: Option<String>,
    /// Overrides the built-in table of vision-capable models
    pub supports_vision: Option<bool>,
}

impl ProviderConfig {
    /// Built-in settings used when `providers.<name>` is absent
    pub fn defaults_for(provider: &str) -> Option<Self> {
        let model = match provider {
            "openrouter" => "google/gemini-2.5-flash",
            "openai" => "gpt-4o-mini",
            "anthropic" => "claude-sonnet-4-20250514",
            _ => return None,
        };
        Some(Self {
            model: model.to_string(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            api_key: None,
            base_url: None,
            supports_vision: None,
        })
    }
}

/// DeepL translation settings
#[derive(Debug, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Falls back to DEEPL_AUTH_KEY; translation is skipped when neither is set
    pub api_key: Option<String>,
    /// Derived from the key type when unset
    pub base_url: Option<String>,
    #[serde(default = "default_target_lang")]
    pub target_lang: String,
    /// Statistical guesses below this confidence count as inconclusive
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f64,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            target_lang: default_target_lang(),
            min_confidence: default_min_confidence(),
        }
    }
}

/// Image-generation service and polling bounds
#[derive(Debug, Deserialize, Clone)]
pub struct ImageGenerationConfig {
    /// Falls back to BFL_API_KEY
    pub api_key: Option<String>,
    #[serde(default = "default_image_base_url")]
    pub base_url: String,
    #[serde(default = "default_image_model")]
    pub model: String,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Wall-clock limit for the whole polling phase
    #[serde(default = "default_generation_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ImageGenerationConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_image_base_url(),
            model: default_image_model(),
            poll_interval_ms: default_poll_interval_ms(),
            max_attempts: default_max_attempts(),
            timeout_secs: default_generation_timeout_secs(),
        }
    }
}

/// Recipe page scraping settings
#[derive(Debug, Deserialize, Clone)]
pub struct ScraperConfig {
    /// Hosts (without "www.") the scraper accepts
    #[serde(default = "default_supported_domains")]
    pub supported_domains: BTreeSet<String>,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            supported_domains: default_supported_domains(),
            user_agent: default_user_agent(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct NormalizerConfig {
    /// Ingredients normalized at the same time
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
        }
    }
}

// Default value functions
fn default_provider() -> String {
    "openrouter".to_string()
}

fn default_temperature() -> f32 {
    0.2
}

fn default_max_tokens() -> u32 {
    4000
}

fn default_timeout() -> u64 {
    30
}

fn default_target_lang() -> String {
    "EN-US".to_string()
}

fn default_min_confidence() -> f64 {
    0.0
}

fn default_image_base_url() -> String {
    "https://api.bfl.ai".to_string()
}

fn default_image_model() -> String {
    "flux-kontext-pro".to_string()
}

fn default_poll_interval_ms() -> u64 {
    500
}

fn default_max_attempts() -> u32 {
    240
}

fn default_generation_timeout_secs() -> u64 {
    120
}

fn default_concurrency() -> usize {
    4
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (compatible; RecipeExtract/0.1)".to_string()
}

fn default_supported_domains() -> BTreeSet<String> {
    [
        "allrecipes.com",
        "bbcgoodfood.com",
        "bonappetit.com",
        "budgetbytes.com",
        "chefkoch.de",
        "cookinglight.com",
        "delish.com",
        "eatingwell.com",
        "epicurious.com",
        "food.com",
        "foodnetwork.com",
        "jamieoliver.com",
        "kitchenstories.com",
        "lecker.de",
        "marmiton.org",
        "minimalistbaker.com",
        "natashaskitchen.com",
        "seriouseats.com",
        "simplyrecipes.com",
        "tasty.co",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl AppConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RECIPE_EXTRACT__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: RECIPE_EXTRACT__PROVIDERS__OPENAI__API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }

    /// Settings for the selected provider, falling back to built-in defaults
    pub fn provider_config(&self) -> Option<ProviderConfig> {
        self.providers
            .get(&self.provider)
            .cloned()
            .or_else(|| ProviderConfig::defaults_for(&self.provider))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            providers: HashMap::new(),
            translation: TranslationConfig::default(),
            image_generation: ImageGenerationConfig::default(),
            scraper: ScraperConfig::default(),
            normalizer: NormalizerConfig::default(),
            timeout: default_timeout(),
        }
    }
}

/// Load configuration from `config.toml` (optional) and RECIPE_EXTRACT__ variables
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("config").required(false))
        // Use double underscore for nested: RECIPE_EXTRACT__IMAGE_GENERATION__MODEL
        .add_source(
            Environment::with_prefix("RECIPE_EXTRACT")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
