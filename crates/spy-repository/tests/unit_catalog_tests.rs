//! Unit tests for CatalogLoader
//!
//! These tests build level directories in a temporary folder.

use spy_repository::{CatalogConfig, CatalogLoader, RepositoryError, ScoreOverride};
use std::path::Path;
use tempfile::TempDir;
use tokio::fs;

fn level(three_stars: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<level>
  <map>
    <line>1 1 1</line>
  </map>
  <score twoStars="100" threeStars="{}"/>
</level>
"#,
        three_stars
    )
}

/// Helper to create a level tree with sample categories
async fn create_levels() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    fs::create_dir_all(root.join("Infiltration")).await.unwrap();
    fs::create_dir_all(root.join("Tutoriel")).await.unwrap();
    fs::create_dir_all(root.join("Empty")).await.unwrap();

    fs::write(root.join("Infiltration/Niveau01.xml"), level("100")).await.unwrap();
    fs::write(root.join("Infiltration/Niveau02.xml"), level("2500")).await.unwrap();
    fs::write(root.join("Infiltration/Niveau03.xml"), "<level><map/></level>")
        .await
        .unwrap();
    fs::write(
        root.join("Infiltration/Niveau04.xml"),
        r#"<level><score threeStars="40"></map></level>"#,
    )
    .await
    .unwrap();
    fs::write(root.join("Infiltration/notes.txt"), "not a level").await.unwrap();
    fs::write(root.join("Tutoriel/Niveau01.xml"), level("5")).await.unwrap();
    fs::write(root.join("README.md"), "levels").await.unwrap();

    temp_dir
}

fn config(root: &Path) -> CatalogConfig {
    CatalogConfig::new(root).with_overrides(vec![])
}

#[tokio::test]
async fn test_load_catalog() {
    let temp_dir = create_levels().await;
    let catalog = CatalogLoader::new(config(temp_dir.path())).load().await.unwrap();

    assert_eq!(catalog.max_score("Infiltration", "mission01"), Some(100));
    assert_eq!(catalog.max_score("Infiltration", "mission02"), Some(2500));
}

#[tokio::test]
async fn test_excluded_directories_are_skipped() {
    let temp_dir = create_levels().await;
    let catalog = CatalogLoader::new(config(temp_dir.path())).load().await.unwrap();

    assert!(catalog.category("Tutoriel").is_none());
    assert_eq!(catalog.categories().collect::<Vec<_>>(), vec!["Empty", "Infiltration"]);
}

#[tokio::test]
async fn test_category_without_levels_is_kept_empty() {
    let temp_dir = create_levels().await;
    let catalog = CatalogLoader::new(config(temp_dir.path())).load().await.unwrap();

    assert!(catalog.category("Empty").unwrap().is_empty());
}

#[tokio::test]
async fn test_unscored_and_malformed_files_are_skipped() {
    let temp_dir = create_levels().await;
    let catalog = CatalogLoader::new(config(temp_dir.path())).load().await.unwrap();

    let infiltration = catalog.category("Infiltration").unwrap();
    assert_eq!(infiltration.len(), 2);
    assert!(!infiltration.contains_key("mission03"));
    assert!(!infiltration.contains_key("mission04"));
}

#[tokio::test]
async fn test_overrides_are_applied() {
    let temp_dir = create_levels().await;
    let config = CatalogConfig::new(temp_dir.path()).with_overrides(vec![
        ScoreOverride {
            category: "Infiltration".to_string(),
            mission: "mission08".to_string(),
            max_score: 3976,
        },
        ScoreOverride {
            category: "Infiltration".to_string(),
            mission: "mission01".to_string(),
            max_score: 120,
        },
    ]);

    let catalog = CatalogLoader::new(config).load().await.unwrap();
    assert_eq!(catalog.max_score("Infiltration", "mission08"), Some(3976));
    assert_eq!(catalog.max_score("Infiltration", "mission01"), Some(120));
}

#[tokio::test]
async fn test_missing_root_is_invalid_path() {
    let result = CatalogLoader::new(CatalogConfig::new("/nonexistent/levels")).load().await;
    assert!(matches!(result, Err(RepositoryError::InvalidPath { .. })));
}

#[tokio::test]
async fn test_load_or_default_falls_back_to_overrides() {
    let catalog = CatalogLoader::new(CatalogConfig::new("/nonexistent/levels"))
        .load_or_default()
        .await;

    assert_eq!(catalog.max_score("Infiltration", "mission08"), Some(3976));
    assert_eq!(catalog.category("Infiltration").unwrap().len(), 1);
}

#[cfg(unix)]
#[tokio::test]
async fn test_unreadable_category_is_skipped() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = create_levels().await;
    let locked = temp_dir.path().join("Locked");
    fs::create_dir_all(&locked).await.unwrap();
    fs::write(locked.join("Niveau01.xml"), level("7")).await.unwrap();
    std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o000)).unwrap();
    // Privileged users can still list the directory
    let readable = std::fs::read_dir(&locked).is_ok();

    let result = CatalogLoader::new(config(temp_dir.path())).load().await;
    std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();

    let catalog = result.unwrap();
    assert_eq!(catalog.max_score("Infiltration", "mission02"), Some(2500));
    if readable {
        assert_eq!(catalog.max_score("Locked", "mission01"), Some(7));
    } else {
        assert!(catalog.category("Locked").is_none());
    }
}
