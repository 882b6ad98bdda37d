//! Data models for the region ping tester

pub mod config;

// Re-export main model types
pub use config::{Config, OutputFormat};
