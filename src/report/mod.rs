//! Report Generation
//!
//! Renders scan and classification results as markdown and writes them to
//! the output directory.

pub mod markdown;
pub mod output;
pub mod tree;

pub use markdown::MarkdownGenerator;
pub use output::OutputWriter;
pub use tree::DirectoryTree;
