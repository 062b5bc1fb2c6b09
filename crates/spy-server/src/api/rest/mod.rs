//! REST API implementation
//!
//! - types: Request/response type definitions
//! - extractors: JSON and query extractors with JSON error bodies
//! - conversions: Query parameter parsing
//! - handlers: API endpoint handlers
//! - router: Router creation and configuration

mod conversions;
mod extractors;
mod handlers;
mod router;
pub mod types;

// Re-export public API
pub use extractors::{JsonExtractor, QueryExtractor};
pub use router::create_router;
pub use types::{
    AppState, AttemptsQuery, CatalogResponse, HealthResponse, LoginRequest, LoginResponse,
    StatementsQuery,
};
