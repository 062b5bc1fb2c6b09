//! Core trait definitions for statement sources
//!
//! [`StatementSource`] is the seam between the dashboard pipeline and the
//! event store. [`LrsClient`](crate::LrsClient) is the production
//! implementation; [`MemoryStatementSource`] serves fixed statements for tests
//! and offline demos.

use async_trait::async_trait;
use spy_core::RawStatement;
use std::collections::HashMap;

use crate::RepositoryResult;

/// Source of raw xAPI statements for one learner
#[async_trait]
pub trait StatementSource: Send + Sync {
    /// Fetch at most `limit` statements whose actor account matches `identifier`
    ///
    /// Statements are returned in the order the store serves them.
    async fn fetch(&self, identifier: &str, limit: usize) -> RepositoryResult<Vec<RawStatement>>;
}

/// In-memory statement source keyed by learner identifier
///
/// Unknown identifiers yield an empty statement list.
#[derive(Debug, Clone, Default)]
pub struct MemoryStatementSource {
    statements: HashMap<String, Vec<RawStatement>>,
}

impl MemoryStatementSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the statements of one learner
    pub fn with_statements(mut self, identifier: impl Into<String>, statements: Vec<RawStatement>) -> Self {
        self.statements.insert(identifier.into(), statements);
        self
    }
}

#[async_trait]
impl StatementSource for MemoryStatementSource {
    async fn fetch(&self, identifier: &str, limit: usize) -> RepositoryResult<Vec<RawStatement>> {
        Ok(self
            .statements
            .get(identifier)
            .map(|statements| statements.iter().take(limit).cloned().collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_memory_source_respects_limit() {
        let source = MemoryStatementSource::new()
            .with_statements("A64881E9", vec![json!({"id": 1}), json!({"id": 2}), json!({"id": 3})]);

        let statements = source.fetch("A64881E9", 2).await.unwrap();
        assert_eq!(statements.len(), 2);
        assert_eq!(statements[0]["id"], 1);
    }

    #[tokio::test]
    async fn test_memory_source_unknown_identifier() {
        let source = MemoryStatementSource::new();
        assert!(source.fetch("nobody", 10).await.unwrap().is_empty());
    }
}
