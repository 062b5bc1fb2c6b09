//! Learning Record Store client
//!
//! Fetches the xAPI statements of one learner from a statements endpoint.
//!
//! # Request
//!
//! ```text
//! GET {endpoint}?agent={"account":{"homePage":"...","name":"{identifier}"}}&limit={limit}
//! X-Experience-API-Version: 1.0.3
//! Authorization: Basic {username:password}
//! ```
//!
//! # Response
//!
//! ```json
//! { "statements": [ ... ], "more": "/data/xAPI/statements?..." }
//! ```
//!
//! Only the first page is read. A status other than 200 fails with
//! [`RepositoryError::SourceUnavailable`]; there is no retry.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use spy_core::RawStatement;
use std::time::Duration;
use tracing::debug;

use crate::config::LrsConfig;
use crate::error::{RepositoryError, RepositoryResult};
use crate::traits::StatementSource;

/// HTTP header carrying the xAPI version
pub const XAPI_VERSION_HEADER: &str = "X-Experience-API-Version";

/// One page of statements
#[derive(Debug, Deserialize)]
struct StatementsPage {
    statements: Vec<RawStatement>,

    /// Link to the next page, ignored
    #[serde(default)]
    more: Option<String>,
}

/// Learning Record Store client
pub struct LrsClient {
    /// HTTP client for making requests
    client: Client,

    config: LrsConfig,
}

impl LrsClient {
    /// Create a new client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: LrsConfig) -> RepositoryResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RepositoryError::Other(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &LrsConfig {
        &self.config
    }

    /// JSON actor filter matching an account of the configured home page
    pub fn agent_filter(&self, identifier: &str) -> String {
        json!({
            "account": {
                "homePage": self.config.home_page,
                "name": identifier,
            }
        })
        .to_string()
    }
}

#[async_trait]
impl StatementSource for LrsClient {
    async fn fetch(&self, identifier: &str, limit: usize) -> RepositoryResult<Vec<RawStatement>> {
        let mut request = self
            .client
            .get(&self.config.endpoint)
            .header(XAPI_VERSION_HEADER, &self.config.version)
            .query(&[
                ("agent", self.agent_filter(identifier)),
                ("limit", limit.to_string()),
            ]);

        if !self.config.username.is_empty() {
            request = request.basic_auth(&self.config.username, Some(&self.config.password));
        }

        // Timeouts and connection failures surface the same way as error statuses
        let response = request
            .send()
            .await
            .map_err(|e| RepositoryError::SourceUnavailable(format!("Error fetching data: {}", e)))?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(RepositoryError::SourceUnavailable(format!(
                "Error fetching data: {}, {}",
                status.as_u16(),
                body
            )));
        }

        let page: StatementsPage = response
            .json()
            .await
            .map_err(|e| RepositoryError::InvalidResponse(format!("Failed to parse statements: {}", e)))?;

        if page.more.as_deref().is_some_and(|more| !more.is_empty()) {
            debug!(identifier, "More statements available, reading first page only");
        }

        debug!(identifier, count = page.statements.len(), "Fetched statements");
        Ok(page.statements)
    }
}
