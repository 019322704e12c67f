//! Core domain logic (protocol-agnostic)
//!
//! This module contains all business logic that is independent
//! of the HTTP transport.
//!
//! # Architecture
//!
//! - **config**: Configuration loading (TOML + environment)
//! - **error**: Error types and Result alias
//! - **types**: Review data model and response bodies
//! - **xdg**: XDG directory handling
//! - **store**: Document store trait and backends
//! - **intake**: Payload validation, normalization and insert
//! - **retrieval**: Search mode dispatch and result collection
//! - **services**: Unified service container

pub mod config;
pub mod error;
pub mod intake;
pub mod retrieval;
pub mod services;
pub mod store;
pub mod types;
pub mod xdg;

// Re-export key types for convenience
pub use config::Config;
pub use error::{Result, ReviewError};
pub use services::Services;
