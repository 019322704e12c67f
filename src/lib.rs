//! Soda Review - rating service for soda fountains
//!
//! An HTTP service that accepts user reviews of soda beverages,
//! restaurants and dispensing machines, persists them to a document
//! store and retrieves them by restaurant, drink or user.
//!
//! # Architecture
//!
//! The codebase is organized into three main modules:
//!
//! - **core**: Domain logic (protocol-agnostic)
//!   - config, error, types, xdg
//!   - store (document store trait, memory and MongoDB backends)
//!   - intake (validation, canonical document, insert)
//!   - retrieval (restaurant / drink / user searches)
//!   - services (unified service container)
//!
//! - **http**: REST API adapter (depends on core)
//!   - router, handlers, extractors, middleware
//!
//! - **cli**: Command-line adapter (depends on core and http)

// Core domain logic (protocol-agnostic)
pub mod core;

// HTTP REST adapter
pub mod http;

// Command-line adapter
pub mod cli;

// Re-export commonly used types for convenience
pub use crate::core::config::Config;
pub use crate::core::error::{Result, ReviewError};
pub use crate::core::services::Services;
pub use crate::core::types::*;
