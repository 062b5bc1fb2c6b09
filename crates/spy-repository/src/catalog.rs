//! Level catalog
//!
//! Maximum (three-stars) score of every mission, read from the game's level
//! directory:
//!
//! ```text
//! Levels/
//! ├── Infiltration/          <- category
//! │   ├── Niveau01.xml       <- mission "mission01"
//! │   └── Niveau02.xml
//! ├── Tutoriel/              <- excluded
//! └── ...
//! ```
//!
//! Each level file holds a `<score threeStars="N"/>` element. The catalog is
//! built once at startup and is read-only afterwards.

use path_absolutize::Absolutize;
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, warn};

use crate::config::{CatalogConfig, ScoreOverride};
use crate::error::{RepositoryError, RepositoryResult};

/// Mission maxima grouped by category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MaxScoreCatalog {
    categories: BTreeMap<String, BTreeMap<String, u32>>,
}

impl MaxScoreCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maxima of one category
    pub fn category(&self, name: &str) -> Option<&BTreeMap<String, u32>> {
        self.categories.get(name)
    }

    /// Category names, sorted
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    pub fn max_score(&self, category: &str, mission: &str) -> Option<u32> {
        self.categories.get(category)?.get(mission).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Register a category, keeping missions already present
    pub fn insert_category(&mut self, name: impl Into<String>, missions: BTreeMap<String, u32>) {
        self.categories.entry(name.into()).or_default().extend(missions);
    }

    /// Set the maximum of one mission
    pub fn with_override(mut self, category: &str, mission: &str, max_score: u32) -> Self {
        self.categories
            .entry(category.to_string())
            .or_default()
            .insert(mission.to_string(), max_score);
        self
    }

    pub fn with_overrides(self, overrides: &[ScoreOverride]) -> Self {
        overrides.iter().fold(self, |catalog, o| {
            catalog.with_override(&o.category, &o.mission, o.max_score)
        })
    }
}

/// Loader building a [`MaxScoreCatalog`] from a level directory
pub struct CatalogLoader {
    config: CatalogConfig,
}

impl CatalogLoader {
    pub fn new(config: CatalogConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Load the catalog and apply the configured overrides
    ///
    /// Level files that fail to parse and category directories that cannot
    /// be read are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns an error if the root directory does not exist or cannot be read.
    pub async fn load(&self) -> RepositoryResult<MaxScoreCatalog> {
        let root = &self.config.path;
        if !root.is_dir() {
            return Err(RepositoryError::InvalidPath { path: root.clone() });
        }

        let root = root
            .absolutize()
            .map_err(|e| RepositoryError::Other(format!("Failed to absolutize path: {}", e)))?
            .to_path_buf();

        let mut catalog = MaxScoreCatalog::new();
        for (name, path) in sorted_entries(&root).await? {
            if !path.is_dir() || self.config.is_excluded(&name) {
                continue;
            }
            match self.load_category(&path).await {
                Ok(missions) => catalog.insert_category(name, missions),
                Err(e) => warn!("Skipping category {:?}: {}", path, e),
            }
        }

        let catalog = catalog.with_overrides(&self.config.overrides);
        info!(
            "✓ Loaded level catalog from {:?} ({} categories)",
            root,
            catalog.categories.len()
        );
        Ok(catalog)
    }

    /// Load the catalog, falling back to the overrides alone on failure
    pub async fn load_or_default(&self) -> MaxScoreCatalog {
        match self.load().await {
            Ok(catalog) => catalog,
            Err(e) => {
                warn!("Level catalog unavailable, using overrides only: {}", e);
                MaxScoreCatalog::new().with_overrides(&self.config.overrides)
            }
        }
    }

    async fn load_category(&self, dir: &Path) -> RepositoryResult<BTreeMap<String, u32>> {
        let mut missions = BTreeMap::new();

        for (name, path) in sorted_entries(dir).await? {
            let Some(stem) = name.strip_suffix(".xml") else {
                continue;
            };
            if !path.is_file() {
                continue;
            }

            match read_three_stars(&path).await {
                Ok(Some(max_score)) => {
                    missions.insert(self.config.mission_name(stem), max_score);
                }
                Ok(None) => {}
                Err(e) => warn!("{}", e),
            }
        }

        Ok(missions)
    }
}

/// Directory entries as (file name, path), sorted by name
async fn sorted_entries(dir: &Path) -> RepositoryResult<Vec<(String, PathBuf)>> {
    let mut entries = fs::read_dir(dir).await?;
    let mut found = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        if let Some(name) = entry.file_name().to_str() {
            found.push((name.to_string(), entry.path()));
        }
    }

    found.sort();
    Ok(found)
}

async fn read_three_stars(path: &Path) -> RepositoryResult<Option<u32>> {
    let content = fs::read_to_string(path).await?;
    parse_three_stars(&content).map_err(|message| RepositoryError::CatalogParse {
        path: path.to_path_buf(),
        message,
    })
}

/// Read the `threeStars` attribute of the first `score` element
///
/// The whole document is read so that malformed files are rejected even
/// when the score element comes first.
pub fn parse_three_stars(content: &str) -> Result<Option<u32>, String> {
    let mut reader = Reader::from_str(content);
    let mut three_stars: Option<String> = None;
    let mut seen_score = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                if seen_score || e.name().as_ref() != b"score" {
                    continue;
                }
                seen_score = true;
                for attr in e.attributes() {
                    let attr = attr.map_err(|e| e.to_string())?;
                    if attr.key.as_ref() == b"threeStars" {
                        three_stars = Some(String::from_utf8_lossy(&attr.value).into_owned());
                    }
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(format!(
                    "XML error at position {}: {}",
                    reader.buffer_position(),
                    e
                ))
            }
        }
    }

    three_stars
        .map(|value| {
            value
                .trim()
                .parse::<u32>()
                .map_err(|_| format!("invalid threeStars value '{}'", value))
        })
        .transpose()
}
