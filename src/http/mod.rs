//! HTTP REST adapter
//!
//! Depends only on core/.
//!
//! Exposes review submission, review retrieval and a health check
//! via the Axum web framework.

pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use error::ApiError;
pub use handlers::*;
pub use router::build_router;
