use super::heuristic::HeuristicScanner;
use super::{Language, Parser, SourceSyntax};
use crate::types::{FileMetadata, Result};

/// TypeScript classes, interfaces, enums and object type aliases with
/// decorator-based routing.
pub struct TypeScriptParser {
    scanner: HeuristicScanner,
}

impl TypeScriptParser {
    pub fn new() -> Self {
        Self {
            scanner: HeuristicScanner::new(SourceSyntax::Decorated),
        }
    }
}

impl Default for TypeScriptParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for TypeScriptParser {
    fn parse(&self, path: &str, content: &str) -> Result<FileMetadata> {
        Ok(FileMetadata::new(path, Language::TypeScript, self.scanner.scan(content)))
    }

    fn language(&self) -> Language {
        Language::TypeScript
    }
}
