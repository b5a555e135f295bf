use crate::error::{Result, ScraperError};
use crate::models::{DelayConfig, SearchQuery};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

pub const PROFILE_PATH_MARKER: &str = "/in/";
pub const PLACEHOLDER_NAME: &str = "LinkedIn Member";
pub const DEFAULT_SITE_HOST: &str = "www.linkedin.com";

pub const INSTITUTION_NAME: &str = "Chennai Institute of Technology";
pub const ALLOWED_PROFILE_HOST: &str = "linkedin.com";

/// A result must mention one of these anywhere to be considered.
pub const RELEVANCE_KEYWORDS: &[&str] = &[
    "chennai institute of technology",
    "chennai institute technology",
    "cit chennai",
];

/// Narrower set a line must match to become the headline.
pub const HEADLINE_KEYWORDS: &[&str] = &[
    "chennai institute of technology",
    "chennai institute technology",
];

pub const CHROME_KEYWORDS: &[&str] = &["connections", "mutual", "message", "connect", "view"];

pub const PLACE_KEYWORDS: &[&str] = &["coimbatore", "chennai", "tamil nadu", "india"];

pub const QUERY_PHRASES: &[&str] = &[
    "Chennai Institute of Technology student",
    "Chennai Institute of Technology professor",
    "Chennai Institute of Technology alumni",
    "CIT Chennai",
    "Chennai Institute Technology faculty",
];

pub const RESULT_CAP: usize = 10;

const SEARCH_URL: &str = "https://www.linkedin.com/search/results/people/";
const CONTAINER_SELECTOR: &str = ".entity-result, .search-result, [data-view-name=\"search-entity-result-universal-template\"]";
const TITLE_LINK_SELECTOR: &str =
    ".entity-result__title-text a, .search-result__title a, [data-control-name*=\"profile\"] a";

/// Keyword sets and markers the text normalizer and link resolver work from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Full institution name, used when building follow-up searches.
    pub institution_name: String,
    /// Lowercase phrases a result's text must contain to be considered.
    pub relevance_keywords: Vec<String>,
    /// Lowercase phrases that mark a line as the institution headline.
    pub headline_keywords: Vec<String>,
    /// Lowercase relationship-chrome words that disqualify a line as a name.
    pub chrome_keywords: Vec<String>,
    /// Lowercase place names that mark a line as a location.
    pub place_keywords: Vec<String>,
    /// Literal shown instead of a name for out-of-network members.
    pub placeholder_name: String,
    pub profile_path_marker: String,
    /// Host used to canonicalize relative profile links.
    pub default_site_host: String,
    /// Absolute profile links must be on this host or one of its subdomains.
    /// `None` accepts any host.
    pub allowed_profile_host: Option<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            institution_name: INSTITUTION_NAME.to_string(),
            relevance_keywords: to_owned(RELEVANCE_KEYWORDS),
            headline_keywords: to_owned(HEADLINE_KEYWORDS),
            chrome_keywords: to_owned(CHROME_KEYWORDS),
            place_keywords: to_owned(PLACE_KEYWORDS),
            placeholder_name: PLACEHOLDER_NAME.to_string(),
            profile_path_marker: PROFILE_PATH_MARKER.to_string(),
            default_site_host: DEFAULT_SITE_HOST.to_string(),
            allowed_profile_host: Some(ALLOWED_PROFILE_HOST.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Phrases searched in order, one pass each.
    pub queries: Vec<SearchQuery>,
    /// Containers processed per query.
    pub result_cap: usize,
    /// People-search endpoint; the phrase goes into `keywords`.
    pub search_url: String,
    pub container_selector: String,
    /// Links tried by the navigate-and-observe fallback.
    pub title_link_selector: String,
    pub scroll_passes: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            queries: QUERY_PHRASES.iter().map(|q| SearchQuery::new(*q)).collect(),
            result_cap: RESULT_CAP,
            search_url: SEARCH_URL.to_string(),
            container_selector: CONTAINER_SELECTOR.to_string(),
            title_link_selector: TITLE_LINK_SELECTOR.to_string(),
            scroll_passes: 3,
        }
    }
}

/// Think-time windows between steps.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    pub search_load: DelayConfig,
    pub scroll: DelayConfig,
    pub between_results: DelayConfig,
    pub between_queries: DelayConfig,
    pub after_navigation: DelayConfig,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            search_load: DelayConfig::new(5000, 8000),
            scroll: DelayConfig::new(2000, 4000),
            between_results: DelayConfig::new(1000, 3000),
            between_queries: DelayConfig::new(5000, 10000),
            after_navigation: DelayConfig::new(3000, 5000),
        }
    }
}

impl PacingConfig {
    pub fn disabled() -> Self {
        Self {
            search_load: DelayConfig::disabled(),
            scroll: DelayConfig::disabled(),
            between_results: DelayConfig::disabled(),
            between_queries: DelayConfig::disabled(),
            after_navigation: DelayConfig::disabled(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub csv_path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from("cit_alumni_with_real_profile_urls.csv"),
        }
    }
}

/// Everything a run needs apart from secrets.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HarvestConfig {
    pub extraction: ExtractionConfig,
    pub search: SearchConfig,
    pub pacing: PacingConfig,
    pub output: OutputConfig,
}

impl HarvestConfig {
    /// Loads a config from JSON. Missing sections keep their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: HarvestConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.extraction.relevance_keywords.is_empty() {
            return Err(ScraperError::ConfigError(
                "at least one relevance keyword is required".to_string(),
            ));
        }
        if self.extraction.headline_keywords.is_empty() {
            return Err(ScraperError::ConfigError(
                "at least one headline keyword is required".to_string(),
            ));
        }
        if self.extraction.profile_path_marker.is_empty() {
            return Err(ScraperError::ConfigError(
                "profile path marker must not be empty".to_string(),
            ));
        }
        if self.search.queries.is_empty() {
            return Err(ScraperError::ConfigError(
                "at least one search query is required".to_string(),
            ));
        }
        Ok(())
    }
}

/// Login credentials for the site.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

impl Credentials {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            username: require_var("LINKEDIN_USERNAME")?,
            password: require_var("LINKEDIN_PASSWORD")?,
        })
    }
}

/// Connection parameters for the remote profile table.
#[derive(Debug, Clone)]
pub struct RemoteSettings {
    pub base_url: String,
    pub api_key: String,
    pub table: String,
}

impl RemoteSettings {
    /// `None` when any of the variables is unset.
    pub fn from_env() -> Option<Self> {
        Some(Self {
            base_url: env::var("SUPABASE_URL").ok()?,
            api_key: env::var("SUPABASE_KEY").ok()?,
            table: env::var("SUPABASE_TABLE").ok()?,
        })
    }
}

/// Loads `.env` from the working directory if present.
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn require_var(key: &str) -> Result<String> {
    env::var(key).map_err(|_| ScraperError::ConfigError(format!("{} env var not set", key)))
}

fn to_owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
