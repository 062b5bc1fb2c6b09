//! External collaborators of the SPY progress dashboard
//!
//! This crate provides the two data sources the statement-to-metrics pipeline
//! depends on:
//!
//! - **Event store**: xAPI statements of one learner, fetched over HTTPS from a
//!   Learning Record Store ([`LrsClient`], behind the [`StatementSource`] trait)
//! - **Level catalog**: the three-stars score of every mission, read once from
//!   the game's level files ([`CatalogLoader`] producing a [`MaxScoreCatalog`])
//!
//! # Quick Start
//!
//! ```no_run
//! use spy_repository::{CatalogConfig, CatalogLoader, LrsClient, LrsConfig, StatementSource};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Build the catalog once at startup
//!     let catalog = CatalogLoader::new(CatalogConfig::default()).load_or_default().await;
//!     println!("Loaded {} categories", catalog.categories().count());
//!
//!     // Fetch the statements of one learner
//!     let client = LrsClient::new(LrsConfig::default())?;
//!     let statements = client.fetch("C2ED0A43", 500).await?;
//!     println!("Fetched {} statements", statements.len());
//!
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod lrs;
pub mod traits;

// Re-exports - Configuration
pub use config::{CatalogConfig, LrsConfig, ScoreOverride};

// Re-exports - Error
pub use error::{RepositoryError, RepositoryResult};

// Re-exports - Sources
pub use catalog::{CatalogLoader, MaxScoreCatalog};
pub use lrs::LrsClient;
pub use traits::{MemoryStatementSource, StatementSource};
