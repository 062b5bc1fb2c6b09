//! Repository configuration types
//!
//! This module provides configuration for the event store client and for the
//! level catalog loader.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Event store (Learning Record Store) configuration
///
/// # Examples
///
/// ```rust
/// use spy_repository::LrsConfig;
///
/// let config = LrsConfig::new("https://lrs.example.com/data/xAPI/statements")
///     .with_credentials("key", "secret");
/// assert_eq!(config.version, "1.0.3");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LrsConfig {
    /// Statements endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Basic-auth user name (LRS client key)
    #[serde(default)]
    pub username: String,

    /// Basic-auth password (LRS client secret)
    #[serde(default)]
    pub password: String,

    /// Account home page used in the actor filter
    #[serde(default = "default_home_page")]
    pub home_page: String,

    /// Value of the `X-Experience-API-Version` header
    #[serde(default = "default_version")]
    pub version: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Statements fetched for the progress view
    #[serde(default = "default_progress_limit")]
    pub progress_limit: usize,

    /// Statements fetched for the statements table
    #[serde(default = "default_statements_limit")]
    pub statements_limit: usize,
}

fn default_endpoint() -> String {
    "https://lrsels.lip6.fr/data/xAPI/statements".to_string()
}

fn default_home_page() -> String {
    "https://www.lip6.fr/mocah/".to_string()
}

fn default_version() -> String {
    "1.0.3".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_progress_limit() -> usize {
    500
}

fn default_statements_limit() -> usize {
    100
}

impl Default for LrsConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            username: String::new(),
            password: String::new(),
            home_page: default_home_page(),
            version: default_version(),
            timeout_secs: default_timeout_secs(),
            progress_limit: default_progress_limit(),
            statements_limit: default_statements_limit(),
        }
    }
}

impl LrsConfig {
    /// Create a configuration for a statements endpoint
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    /// Set basic-auth credentials
    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = username.into();
        self.password = password.into();
        self
    }

    /// Set the request timeout
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

/// A maximum score that cannot be discovered from the level files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreOverride {
    pub category: String,
    pub mission: String,
    pub max_score: u32,
}

/// Level catalog configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Root directory holding one subdirectory per category
    #[serde(default = "default_catalog_path")]
    pub path: PathBuf,

    /// Category whose maxima rescale learner scores
    #[serde(default = "default_category")]
    pub category: String,

    /// Subdirectories that are not mission categories
    #[serde(default = "default_excluded")]
    pub excluded: Vec<String>,

    /// Token of level file names replaced to form the mission identifier
    #[serde(default = "default_name_token")]
    pub name_token: String,

    /// Replacement of `name_token`
    #[serde(default = "default_name_replacement")]
    pub name_replacement: String,

    /// Maxima applied after loading
    #[serde(default = "default_overrides")]
    pub overrides: Vec<ScoreOverride>,
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("Levels")
}

fn default_category() -> String {
    "Infiltration".to_string()
}

fn default_excluded() -> Vec<String> {
    ["RonDoor_Scenario", "Selectionneur", "Tutoriel", "ELS"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_name_token() -> String {
    "Niveau".to_string()
}

fn default_name_replacement() -> String {
    "mission".to_string()
}

fn default_overrides() -> Vec<ScoreOverride> {
    // mission08 ships without a <score> element
    vec![ScoreOverride {
        category: "Infiltration".to_string(),
        mission: "mission08".to_string(),
        max_score: 3976,
    }]
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: default_catalog_path(),
            category: default_category(),
            excluded: default_excluded(),
            name_token: default_name_token(),
            name_replacement: default_name_replacement(),
            overrides: default_overrides(),
        }
    }
}

impl CatalogConfig {
    /// Create a catalog configuration rooted at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Replace the overrides
    pub fn with_overrides(mut self, overrides: Vec<ScoreOverride>) -> Self {
        self.overrides = overrides;
        self
    }

    /// Mission identifier of a level file stem
    pub fn mission_name(&self, file_stem: &str) -> String {
        if self.name_token.is_empty() {
            return file_stem.to_string();
        }
        file_stem.replace(&self.name_token, &self.name_replacement)
    }

    pub fn is_excluded(&self, directory: &str) -> bool {
        self.excluded.iter().any(|excluded| excluded == directory)
    }
}
