//! SPY Dashboard SDK
//!
//! High-level API running the fetch, normalize, aggregate and rescale pipeline
//! for one learner and shaping the result for charts and tables.

pub mod builder;
pub mod config;
pub mod engine;
pub mod error;
pub mod view;

// Re-export main types
pub use builder::DashboardEngineBuilder;
pub use config::EngineConfig;
pub use engine::DashboardEngine;
pub use error::{Result, SdkError};
pub use view::{
    AttemptRow, AttemptStats, AttemptsView, ProgressView, SeriesPoint, StatementsView, ViewState,
};

// Re-export commonly used types from dependencies
pub use spy_core::{ActivityRecord, DropSummary, PipelineOptions, TimeSpentMode, UnsuccessfulScorePolicy};
pub use spy_repository::{
    CatalogConfig, LrsConfig, MaxScoreCatalog, MemoryStatementSource, RepositoryError, ScoreOverride,
    StatementSource,
};
