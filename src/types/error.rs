//! Unified Error Type System
//!
//! Centralized error types for the entire application.
//!
//! ## Failure Policy
//!
//! - Scanner heuristics never fail: unmatched braces and unrecognized member
//!   lines are skipped silently
//! - Configuration problems fail before any scanning starts
//! - A file matching more than one category is fatal for the whole run, and
//!   every conflicting file is reported together

use std::fmt;

use thiserror::Error;

// =============================================================================
// Classification Errors
// =============================================================================

/// A single file matched more than one category rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("File '{path}' matches multiple categories: {}", categories.join(", "))]
pub struct ClassificationConflict {
    /// Relative path of the offending file
    pub path: String,
    /// Every matching category, in rule order
    pub categories: Vec<String>,
}

impl ClassificationConflict {
    pub fn new(path: impl Into<String>, categories: Vec<String>) -> Self {
        Self {
            path: path.into(),
            categories,
        }
    }
}

/// All classification conflicts found across one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationFailure {
    pub conflicts: Vec<ClassificationConflict>,
}

impl fmt::Display for ClassificationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} file(s) match more than one category. Each file must belong to exactly one \
             category; review paths, patterns and exclusions so rules do not overlap:",
            self.conflicts.len()
        )?;
        for conflict in &self.conflicts {
            write!(f, "\n  - {}", conflict)?;
        }
        Ok(())
    }
}

impl std::error::Error for ClassificationFailure {}

// =============================================================================
// Validation Error
// =============================================================================

/// Structured validation error with context
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// What validation failed
    pub kind: ValidationErrorKind,
    /// Field or component that failed validation
    pub field: Option<String>,
    /// Detailed message
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(field) = &self.field {
            write!(f, "Validation failed for '{}': {}", field, self.message)
        } else {
            write!(f, "Validation failed: {}", self.message)
        }
    }
}

impl std::error::Error for ValidationError {}

impl ValidationError {
    /// Create a new validation error
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            field: None,
            message: message.into(),
        }
    }

    /// Add field context
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }
}

/// Validation error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Required field missing or empty
    MissingField,
    /// Reference to something that does not exist
    UnknownReference,
    /// Same key defined twice
    Duplicate,
    /// Value out of range
    Range,
    /// Invalid format
    Format,
}

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum OverviewError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // -------------------------------------------------------------------------
    // Domain Errors
    // -------------------------------------------------------------------------
    #[error("Config error: {0}")]
    Config(String),

    #[error("{0}")]
    Validation(ValidationError),

    #[error("Parse error in {path}: {message}")]
    Parse { message: String, path: String },

    #[error("{0}")]
    Classification(ClassificationFailure),

    #[error("Output error: {0}")]
    Output(String),
}

impl From<ValidationError> for OverviewError {
    fn from(err: ValidationError) -> Self {
        OverviewError::Validation(err)
    }
}

impl From<ClassificationFailure> for OverviewError {
    fn from(err: ClassificationFailure) -> Self {
        OverviewError::Classification(err)
    }
}

impl From<ClassificationConflict> for OverviewError {
    fn from(err: ClassificationConflict) -> Self {
        OverviewError::Classification(ClassificationFailure {
            conflicts: vec![err],
        })
    }
}

pub type Result<T> = std::result::Result<T, OverviewError>;

impl OverviewError {
    /// Create a validation error for a specific field
    pub fn validation(
        kind: ValidationErrorKind,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Validation(ValidationError::new(kind, message).with_field(field))
    }

    /// True when the run failed because categories overlap
    pub fn is_classification_conflict(&self) -> bool {
        matches!(self, Self::Classification(_))
    }
}

/// Context extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn with_context<C: Into<String>>(self, context: C) -> Result<T>;
}

impl<T, E: std::error::Error + Send + Sync + 'static> ResultExt<T> for std::result::Result<T, E> {
    fn with_context<C: Into<String>>(self, context: C) -> Result<T> {
        self.map_err(|e| OverviewError::Output(format!("{}: {}", context.into(), e)))
    }
}
