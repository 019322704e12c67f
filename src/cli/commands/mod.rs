//! CLI command implementations

pub mod config;
pub mod serve;

// Re-export argument types for use in mod.rs
pub use config::ConfigArgs;
pub use serve::ServeArgs;
