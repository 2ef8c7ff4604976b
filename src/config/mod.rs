//! Configuration Management
//!
//! Scan configuration with hierarchical resolution:
//! 1. Built-in defaults
//! 2. Config file in the scanned root (`ai-scan-config.json` and friends)
//! 3. Environment variables (OVERVIEWGEN_*)
//! 4. CLI arguments (highest priority)

mod loader;
mod types;

pub use loader::{ConfigFormat, ConfigLoader};
pub use types::*;
