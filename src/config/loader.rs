//! Configuration Loader (Figment-based)
//!
//! Merges configuration from, lowest to highest priority:
//! 1. Built-in defaults (Serialized)
//! 2. The config file: `--config`, else the first of `ai-scan-config.json`,
//!    `ai-scan-config.example.json`, `ai-scan-config.toml` in the scanned root
//! 3. Environment variables (`OVERVIEWGEN_*`; `__` separates nested keys,
//!    e.g. `OVERVIEWGEN_MARKDOWN__HEADER_LEVEL=3`)

use figment::{
    Figment,
    providers::{Env, Format, Json, Serialized, Toml},
};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::{debug, info};

use super::types::ScanConfig;
use crate::constants::config::{CONFIG_FILE_CANDIDATES, ENV_PREFIX};
use crate::types::{OverviewError, Result};

/// Serialization format for `config show` and `config init`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfigFormat {
    #[default]
    Json,
    Yaml,
    Toml,
}

impl ConfigFormat {
    /// Format implied by a file extension; anything but `.toml` is JSON
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Self::Toml,
            _ => Self::Json,
        }
    }
}

impl FromStr for ConfigFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            "toml" => Ok(Self::Toml),
            _ => Err(format!(
                "Unknown config format: {}. Valid values: json, yaml, toml",
                s
            )),
        }
    }
}

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and validate the configuration for a scan of `root`.
    pub fn load(root: &Path, explicit: Option<&Path>) -> Result<(ScanConfig, PathBuf)> {
        let path = Self::resolve(root, explicit)?;
        let config = Self::load_from_file(&path)?;
        config.validate()?;
        info!("Loaded configuration from: {}", path.display());
        Ok((config, path))
    }

    /// Load configuration from a specific file plus environment overrides,
    /// without validating it
    pub fn load_from_file(path: &Path) -> Result<ScanConfig> {
        if !path.is_file() {
            return Err(OverviewError::Config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        debug!("Loading config from: {}", path.display());
        let mut figment = Figment::new().merge(Serialized::defaults(ScanConfig::default()));
        figment = match ConfigFormat::from_path(path) {
            ConfigFormat::Toml => figment.merge(Toml::file(path)),
            ConfigFormat::Json | ConfigFormat::Yaml => figment.merge(Json::file(path)),
        };
        figment = figment.merge(
            Env::prefixed(ENV_PREFIX)
                .lowercase(false)
                .map(|key| env_key_to_field(key.as_str()).into()),
        );

        figment
            .extract()
            .map_err(|e| OverviewError::Config(format!("Configuration error: {}", e)))
    }

    /// The explicit path when given, else the first candidate present in `root`
    pub fn resolve(root: &Path, explicit: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = explicit {
            return Ok(path.to_path_buf());
        }
        Self::discover(root).ok_or_else(|| {
            OverviewError::Config(format!(
                "No configuration file found in {}. Expected one of: {}",
                root.display(),
                CONFIG_FILE_CANDIDATES.join(", ")
            ))
        })
    }

    /// First configuration file candidate that exists in `root`
    pub fn discover(root: &Path) -> Option<PathBuf> {
        CONFIG_FILE_CANDIDATES
            .iter()
            .map(|name| root.join(name))
            .find(|path| path.is_file())
    }

    // =========================================================================
    // Config Commands
    // =========================================================================

    /// Render a configuration in the requested format
    pub fn render(config: &ScanConfig, format: ConfigFormat) -> Result<String> {
        match format {
            ConfigFormat::Json => Ok(serde_json::to_string_pretty(config)?),
            ConfigFormat::Yaml => Ok(serde_yaml::to_string(config)?),
            ConfigFormat::Toml => {
                toml::to_string_pretty(config).map_err(|e| OverviewError::Config(e.to_string()))
            }
        }
    }

    /// Write the starter configuration into `root`.
    ///
    /// An existing file is left alone unless `force` is set.
    pub fn init_project(root: &Path, format: ConfigFormat, force: bool) -> Result<PathBuf> {
        let file_name = match format {
            ConfigFormat::Toml => "ai-scan-config.toml",
            _ => "ai-scan-config.json",
        };
        let format = match format {
            ConfigFormat::Yaml => ConfigFormat::Json,
            other => other,
        };

        let path = root.join(file_name);
        if path.exists() && !force {
            return Err(OverviewError::Config(format!(
                "Configuration already exists: {} (use --force to overwrite)",
                path.display()
            )));
        }

        fs::create_dir_all(root)?;
        let mut content = Self::render(&ScanConfig::starter(), format)?;
        if !content.ends_with('\n') {
            content.push('\n');
        }
        fs::write(&path, content)?;
        info!("Created config: {}", path.display());
        Ok(path)
    }
}

/// `MARKDOWN__HEADER_LEVEL` -> `markdown.headerLevel`
fn env_key_to_field(key: &str) -> String {
    key.split("__")
        .map(|segment| {
            let mut out = String::with_capacity(segment.len());
            for (i, word) in segment
                .split('_')
                .filter(|w| !w.is_empty())
                .enumerate()
            {
                let word = word.to_lowercase();
                if i == 0 {
                    out.push_str(&word);
                } else {
                    let mut chars = word.chars();
                    if let Some(first) = chars.next() {
                        out.extend(first.to_uppercase());
                        out.push_str(chars.as_str());
                    }
                }
            }
            out
        })
        .collect::<Vec<_>>()
        .join(".")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const MINIMAL_JSON: &str = r#"{
        "categories": [ { "name": "models", "paths": ["Models"], "extensions": [".cs"] } ],
        "generatedFiles": [ { "name": "Models.md", "includedCategories": ["models"] } ]
    }"#;

    #[test]
    fn test_env_key_to_field() {
        assert_eq!(env_key_to_field("OUTPUT_DIR"), "outputDir");
        assert_eq!(env_key_to_field("MARKDOWN__HEADER_LEVEL"), "markdown.headerLevel");
        assert_eq!(
            env_key_to_field("MARKDOWN__CODE_BLOCK_STYLE"),
            "markdown.codeBlockStyle"
        );
    }

    #[test]
    fn test_discover_prefers_primary_file() {
        let dir = TempDir::new().unwrap();
        assert!(ConfigLoader::discover(dir.path()).is_none());

        fs::write(dir.path().join("ai-scan-config.example.json"), MINIMAL_JSON).unwrap();
        assert_eq!(
            ConfigLoader::discover(dir.path()).unwrap(),
            dir.path().join("ai-scan-config.example.json")
        );

        fs::write(dir.path().join("ai-scan-config.json"), MINIMAL_JSON).unwrap();
        assert_eq!(
            ConfigLoader::discover(dir.path()).unwrap(),
            dir.path().join("ai-scan-config.json")
        );
    }

    #[test]
    fn test_load_json_with_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("ai-scan-config.json"), MINIMAL_JSON).unwrap();

        let (config, path) = ConfigLoader::load(dir.path(), None).unwrap();
        assert_eq!(path, dir.path().join("ai-scan-config.json"));
        assert_eq!(config.categories[0].name, "models");
        assert_eq!(config.markdown.header_level, 2);
    }

    #[test]
    fn test_load_toml() {
        let dir = TempDir::new().unwrap();
        let toml = r#"
[[categories]]
name = "services"
paths = ["Services"]
extensions = [".cs"]

[[generatedFiles]]
name = "Services.md"
includedCategories = ["services"]

[markdown]
codeBlockStyle = "indented"
"#;
        let path = dir.path().join("custom.toml");
        fs::write(&path, toml).unwrap();

        let (config, _) = ConfigLoader::load(dir.path(), Some(&path)).unwrap();
        assert_eq!(config.categories[0].name, "services");
        assert_eq!(config.markdown.code_block_style, "indented");
    }

    #[test]
    fn test_load_missing_config() {
        let dir = TempDir::new().unwrap();
        let err = ConfigLoader::load(dir.path(), None).unwrap_err();
        assert!(err.to_string().contains("ai-scan-config.json"));
    }

    #[test]
    fn test_load_rejects_invalid_config() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("ai-scan-config.json"),
            r#"{ "categories": [], "generatedFiles": [] }"#,
        )
        .unwrap();
        let err = ConfigLoader::load(dir.path(), None).unwrap_err();
        assert!(matches!(err, OverviewError::Validation(_)));
    }

    #[test]
    fn test_init_project_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = ConfigLoader::init_project(dir.path(), ConfigFormat::Json, false).unwrap();
        assert!(path.ends_with("ai-scan-config.json"));

        let (config, _) = ConfigLoader::load(dir.path(), None).unwrap();
        assert_eq!(config, ScanConfig::starter());

        assert!(ConfigLoader::init_project(dir.path(), ConfigFormat::Json, false).is_err());
        assert!(ConfigLoader::init_project(dir.path(), ConfigFormat::Json, true).is_ok());
    }

    #[test]
    fn test_render_formats() {
        let config = ScanConfig::starter();
        let json = ConfigLoader::render(&config, ConfigFormat::Json).unwrap();
        assert!(json.contains("\"generatedFiles\""));
        let yaml = ConfigLoader::render(&config, ConfigFormat::Yaml).unwrap();
        assert!(yaml.contains("headerLevel: 2"));
        let toml = ConfigLoader::render(&config, ConfigFormat::Toml).unwrap();
        assert!(toml.contains("PROJECT_OVERVIEW"));
    }
}
