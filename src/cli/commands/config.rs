//! Config Command
//!
//! Manage the scan configuration.
//!
//! Usage:
//!   overviewgen config show [PATH] [-f json|yaml|toml]
//!   overviewgen config validate [PATH]
//!   overviewgen config init [PATH] [-f json|toml] [--force]

use std::path::{Path, PathBuf};

use crate::cli::Output;
use crate::config::{ConfigFormat, ConfigLoader};
use crate::types::{OverviewError, Result};

fn root_or_cwd(path: Option<PathBuf>) -> PathBuf {
    path.unwrap_or_else(|| PathBuf::from("."))
}

fn parse_format(format: &str) -> Result<ConfigFormat> {
    format.parse().map_err(OverviewError::Config)
}

/// Print the effective configuration (file plus environment overrides)
pub fn show(path: Option<PathBuf>, config: Option<&Path>, format: &str) -> Result<()> {
    let root = root_or_cwd(path);
    let format = parse_format(format)?;
    let config_path = ConfigLoader::resolve(&root, config)?;
    let scan_config = ConfigLoader::load_from_file(&config_path)?;

    println!("{}", ConfigLoader::render(&scan_config, format)?.trim_end());
    Ok(())
}

/// Load and validate without scanning
pub fn validate(path: Option<PathBuf>, config: Option<&Path>) -> Result<()> {
    let out = Output::new();
    let root = root_or_cwd(path);
    let (scan_config, config_path) = ConfigLoader::load(&root, config)?;

    out.success(&format!("Configuration is valid: {}", config_path.display()));
    out.field("Categories", scan_config.categories.len());
    out.field("Documents", scan_config.generated_files.len());
    out.field(
        "Endpoints",
        if scan_config.api_endpoints.is_some() {
            "enabled"
        } else {
            "disabled"
        },
    );
    out.field("Output", &scan_config.output_dir);
    Ok(())
}

/// Write a starter configuration into the project root
pub fn init(path: Option<PathBuf>, format: &str, force: bool) -> Result<()> {
    let out = Output::new();
    let root = root_or_cwd(path);
    let format = parse_format(format)?;
    if format == ConfigFormat::Yaml {
        out.warning("YAML configuration files are not loaded; writing JSON instead");
    }

    let config_path = ConfigLoader::init_project(&root, format, force)?;
    out.success("Initialized configuration");
    out.field("Config", config_path.display());
    out.info("Edit the category rules, then run 'overviewgen generate'");
    Ok(())
}
