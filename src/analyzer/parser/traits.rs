use crate::types::{FileMetadata, Result};

pub trait Parser: Send + Sync {
    /// Extract type records from one file's text.
    ///
    /// Heuristic mismatches never fail; an error means the input could not be
    /// handed to this parser at all.
    fn parse(&self, path: &str, content: &str) -> Result<FileMetadata>;
    fn language(&self) -> super::Language;
}
