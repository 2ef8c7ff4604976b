//! Code Analyzer Module
//!
//! - Workspace discovery with gitignore support
//! - Heuristic per-language scanning into [`FileMetadata`](crate::types::FileMetadata)

pub mod parser;
pub mod scanner;

pub use parser::{Language, Parser, create_parser};
pub use scanner::WorkspaceScanner;
