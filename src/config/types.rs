//! Configuration Types
//!
//! Mirrors the `ai-scan-config.json` layout. Keys are camelCase; the longer
//! rule key names (`includePaths`, `excludeNamePatterns`, ...) are accepted
//! as aliases.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::constants::output::DEFAULT_OUTPUT_DIR;
use crate::types::{OverviewError, Result, ValidationErrorKind};

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScanConfig {
    /// Directory tree settings for `ProjectStructure.md`
    pub project_structure: ProjectStructureConfig,

    /// Filter selecting which files feed the endpoint table.
    /// `ApiEndpoints.md` is only written when this is present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_endpoints: Option<CategoryRule>,

    /// Ordered category rules; each file may match at most one
    pub categories: Vec<CategoryRule>,

    /// Output documents, each collecting a subset of categories
    pub generated_files: Vec<GeneratedFileConfig>,

    pub markdown: MarkdownConfig,

    /// Output directory, relative to the scanned root unless absolute
    pub output_dir: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            project_structure: ProjectStructureConfig::default(),
            api_endpoints: None,
            categories: Vec::new(),
            generated_files: Vec::new(),
            markdown: MarkdownConfig::default(),
            output_dir: DEFAULT_OUTPUT_DIR.to_string(),
        }
    }
}

impl ScanConfig {
    /// Check the configuration before any scanning starts.
    ///
    /// Returns the first problem found as `OverviewError::Validation`.
    pub fn validate(&self) -> Result<()> {
        if self.categories.is_empty() {
            return Err(OverviewError::validation(
                ValidationErrorKind::MissingField,
                "categories",
                "configuration must define at least one category",
            ));
        }

        if self.generated_files.is_empty() {
            return Err(OverviewError::validation(
                ValidationErrorKind::MissingField,
                "generatedFiles",
                "configuration must define at least one generated file",
            ));
        }

        let mut category_names = HashSet::new();
        for (i, category) in self.categories.iter().enumerate() {
            let field = format!("categories[{}]", i);
            if category.name.trim().is_empty() {
                return Err(OverviewError::validation(
                    ValidationErrorKind::MissingField,
                    format!("{}.name", field),
                    "all categories must have a non-empty name",
                ));
            }
            if !category_names.insert(category.name.as_str()) {
                return Err(OverviewError::validation(
                    ValidationErrorKind::Duplicate,
                    format!("{}.name", field),
                    format!("category '{}' is defined more than once", category.name),
                ));
            }
            if category.extensions.is_empty() {
                return Err(OverviewError::validation(
                    ValidationErrorKind::MissingField,
                    format!("{}.extensions", field),
                    format!(
                        "category '{}' must define at least one file extension",
                        category.name
                    ),
                ));
            }
        }

        let mut file_names = HashSet::new();
        for (i, file) in self.generated_files.iter().enumerate() {
            let field = format!("generatedFiles[{}]", i);
            if file.name.trim().is_empty() {
                return Err(OverviewError::validation(
                    ValidationErrorKind::MissingField,
                    format!("{}.name", field),
                    "all generated files must have a non-empty name",
                ));
            }
            if !file_names.insert(file.name.as_str()) {
                return Err(OverviewError::validation(
                    ValidationErrorKind::Duplicate,
                    format!("{}.name", field),
                    format!("generated file '{}' is defined more than once", file.name),
                ));
            }
            if file.included_categories.is_empty() {
                return Err(OverviewError::validation(
                    ValidationErrorKind::MissingField,
                    format!("{}.includedCategories", field),
                    format!("generated file '{}' must include at least one category", file.name),
                ));
            }
            if let Some(unknown) = file
                .included_categories
                .iter()
                .find(|c| !category_names.contains(c.as_str()))
            {
                return Err(OverviewError::validation(
                    ValidationErrorKind::UnknownReference,
                    format!("{}.includedCategories", field),
                    format!(
                        "generated file '{}' references unknown category: {}",
                        file.name, unknown
                    ),
                ));
            }
        }

        if !(1..=6).contains(&self.markdown.header_level) {
            return Err(OverviewError::validation(
                ValidationErrorKind::Range,
                "markdown.headerLevel",
                format!(
                    "header level must be between 1 and 6, got {}",
                    self.markdown.header_level
                ),
            ));
        }

        if CodeBlockStyle::parse(&self.markdown.code_block_style).is_none() {
            return Err(OverviewError::validation(
                ValidationErrorKind::Format,
                "markdown.codeBlockStyle",
                format!(
                    "code block style must be 'fenced' or 'indented', got '{}'",
                    self.markdown.code_block_style
                ),
            ));
        }

        if self.output_dir.trim().is_empty() {
            return Err(OverviewError::validation(
                ValidationErrorKind::MissingField,
                "outputDir",
                "output directory must not be empty",
            ));
        }

        Ok(())
    }

    /// Configuration written by `config init`: a typical layered web API
    /// with a TypeScript client.
    pub fn starter() -> Self {
        let rule = |name: &str, description: &str, paths: &[&str], extensions: &[&str]| {
            CategoryRule {
                name: name.to_string(),
                description: Some(description.to_string()),
                paths: paths.iter().map(|s| s.to_string()).collect(),
                extensions: extensions.iter().map(|s| s.to_string()).collect(),
                ..CategoryRule::default()
            }
        };

        let mut controllers = rule(
            "controllers",
            "HTTP controllers",
            &["*/Controllers"],
            &[".cs", ".ts"],
        );
        controllers.patterns = vec!["Controller".to_string()];

        let mut services = rule("services", "Application services", &["*/Services"], &[".cs"]);
        services.excluded_patterns = vec!["Test".to_string()];

        Self {
            project_structure: ProjectStructureConfig {
                description: Some("Repository layout".to_string()),
                excluded_paths: vec!["*/Migrations".to_string(), "wwwroot".to_string()],
                excluded_extensions: vec![".dll".to_string(), ".pdb".to_string()],
            },
            api_endpoints: Some(CategoryRule {
                name: "api".to_string(),
                paths: vec!["*/Controllers".to_string()],
                extensions: vec![".cs".to_string(), ".ts".to_string()],
                ..CategoryRule::default()
            }),
            categories: vec![
                controllers,
                services,
                rule("models", "Entities and DTOs", &["*/Models"], &[".cs", ".ts"]),
                rule("scripts", "Game scripts", &["*/scripts"], &[".gd"]),
            ],
            generated_files: vec![
                GeneratedFileConfig {
                    name: "Api.md".to_string(),
                    description: Some("Controllers and their handlers".to_string()),
                    included_categories: vec!["controllers".to_string()],
                },
                GeneratedFileConfig {
                    name: "Domain.md".to_string(),
                    description: Some("Services and models".to_string()),
                    included_categories: vec!["services".to_string(), "models".to_string()],
                },
                GeneratedFileConfig {
                    name: "Scripts.md".to_string(),
                    description: None,
                    included_categories: vec!["scripts".to_string()],
                },
            ],
            markdown: MarkdownConfig::default(),
            output_dir: DEFAULT_OUTPUT_DIR.to_string(),
        }
    }
}

// =============================================================================
// Project Structure
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectStructureConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Directories left out of the tree and out of discovery
    pub excluded_paths: Vec<String>,

    /// Extensions left out of the tree (`.dll`, `.png`)
    pub excluded_extensions: Vec<String>,
}

// =============================================================================
// Category Rule
// =============================================================================

/// One named category with its path, name and extension filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CategoryRule {
    /// Unique key, referenced from `generatedFiles`
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(alias = "includePaths")]
    pub paths: Vec<String>,

    /// Rejects unconditionally; takes precedence over `paths`
    #[serde(alias = "excludePaths")]
    pub excluded_paths: Vec<String>,

    /// Case-insensitive substrings of the file path
    #[serde(alias = "includeNamePatterns")]
    pub patterns: Vec<String>,

    #[serde(alias = "excludeNamePatterns")]
    pub excluded_patterns: Vec<String>,

    /// `*.cs`, `.cs` and `cs` are all accepted
    pub extensions: Vec<String>,
}

// =============================================================================
// Generated Files
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeneratedFileConfig {
    /// Output file name, e.g. `Domain.md`
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub included_categories: Vec<String>,
}

// =============================================================================
// Markdown
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MarkdownConfig {
    /// Level of the top heading in every document (1 = `#`)
    pub header_level: u8,

    /// `fenced` or `indented`
    pub code_block_style: String,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            header_level: 2,
            code_block_style: CodeBlockStyle::Fenced.as_str().to_string(),
        }
    }
}

impl MarkdownConfig {
    /// Parsed code block style; unknown values fall back to fenced
    pub fn code_block(&self) -> CodeBlockStyle {
        CodeBlockStyle::parse(&self.code_block_style).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodeBlockStyle {
    #[default]
    Fenced,
    Indented,
}

impl CodeBlockStyle {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "fenced" => Some(Self::Fenced),
            "indented" => Some(Self::Indented),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fenced => "fenced",
            Self::Indented => "indented",
        }
    }
}
