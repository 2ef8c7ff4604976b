//! overviewgen - Heuristic Project Overview Generator
//!
//! Scans C#, TypeScript and GDScript source trees without compiling them and
//! writes markdown overviews: the directory layout, an HTTP endpoint table,
//! and per-category type listings.
//!
//! ## Core Features
//!
//! - **Heuristic Scanning**: regex and brace counting, tolerant of broken input
//! - **Endpoint Extraction**: routes composed from container and handler annotations
//! - **Category Classification**: each file lands in at most one configured category
//! - **Layered Configuration**: JSON or TOML file, overridable from the environment
//!
//! ## Quick Start
//!
//! ```ignore
//! use overviewgen::{ConfigLoader, OverviewPipeline};
//!
//! let (config, _) = ConfigLoader::load(&root, None)?;
//! let summary = OverviewPipeline::new(&root, config).run()?;
//! println!("wrote {:?}", summary.generation.written);
//! ```
//!
//! ## Modules
//!
//! - [`analyzer`]: workspace discovery and per-language scanners
//! - [`classifier`]: category rules and conflict detection
//! - [`config`]: configuration model, loading and validation
//! - [`report`]: markdown rendering and output
//! - [`pipeline`]: discover, scan, classify, generate

pub mod analyzer;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod constants;
pub mod pipeline;
pub mod report;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{CategoryRule, ConfigFormat, ConfigLoader, GeneratedFileConfig, ScanConfig};

// Error Types
pub use types::error::{
    ClassificationConflict, ClassificationFailure, OverviewError, Result, ResultExt,
};

// Pipeline
pub use pipeline::{GenerationSummary, OverviewPipeline, RunSummary, ScanOutcome};

// =============================================================================
// Analyzer Re-exports
// =============================================================================

pub use analyzer::{
    parser::{Language, Parser, create_parser, create_parser_for_path},
    scanner::WorkspaceScanner,
};
pub use classifier::{CategoryMatcher, ClassifiedFile};
pub use types::{EndpointRecord, FileMetadata, MemberRecord, TypeRecord};
