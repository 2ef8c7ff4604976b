//! Language Parser Module
//!
//! Heuristic, regex and brace-counting parsers. They never build a syntax
//! tree and never fail on malformed input; anything unrecognized is skipped.
//!
//! ## Pipeline
//!
//! For brace languages (C#, TypeScript) each file goes through:
//!
//! 1. [`declaration`] locates type declarations and their route prefixes
//! 2. [`body`] cuts out each declaration's braced body
//! 3. [`member`] turns top-level body lines into member records
//! 4. [`endpoint`] derives HTTP endpoints from annotated handler methods
//!
//! GDScript files are line-oriented and handled by [`gdscript`] directly.
//!
//! ## Parser Factory
//!
//! ```rust,ignore
//! use overviewgen::analyzer::parser::{Language, create_parser};
//!
//! let parser = create_parser(Language::CSharp)?;
//! let metadata = parser.parse("Api/UsersController.cs", content)?;
//! ```

pub mod annotation;
pub mod body;
pub mod csharp;
pub mod declaration;
pub mod endpoint;
pub mod gdscript;
pub mod heuristic;
pub mod language;
pub mod member;
pub mod signature;
pub mod text;
pub mod traits;
pub mod typescript;

pub use csharp::CSharpParser;
pub use gdscript::GdScriptParser;
pub use heuristic::HeuristicScanner;
pub use language::{Language, SourceSyntax};
pub use signature::tokenize;
pub use traits::Parser;
pub use typescript::TypeScriptParser;

use crate::types::{OverviewError, Result};

/// Create a parser for the given language.
///
/// Returns an error if the language has no scanner.
pub fn create_parser(language: Language) -> Result<Box<dyn Parser>> {
    match language {
        Language::CSharp => Ok(Box::new(CSharpParser::new())),
        Language::TypeScript => Ok(Box::new(TypeScriptParser::new())),
        Language::GdScript => Ok(Box::new(GdScriptParser::new())),
        Language::Unknown => Err(OverviewError::Config(format!(
            "No parser support for language: {}",
            language
        ))),
    }
}

/// Parser for a file path, detected from its extension.
pub fn create_parser_for_path(path: &str) -> Option<Box<dyn Parser>> {
    create_parser(Language::from_path(path)).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_parser_known_languages() {
        for language in [Language::CSharp, Language::TypeScript, Language::GdScript] {
            let parser = create_parser(language).unwrap();
            assert_eq!(parser.language(), language);
        }
    }

    #[test]
    fn test_create_parser_unsupported() {
        assert!(create_parser(Language::Unknown).is_err());
    }

    #[test]
    fn test_create_parser_for_path() {
        assert!(create_parser_for_path("Api/OrdersController.cs").is_some());
        assert!(create_parser_for_path("scripts/player.gd").is_some());
        assert!(create_parser_for_path("README.md").is_none());
    }

    #[test]
    fn test_parsers_are_idempotent() {
        let source = "public class A { public int X { get; set; } public void F() { } }";
        let parser = create_parser(Language::CSharp).unwrap();
        let first = parser.parse("A.cs", source).unwrap();
        let second = parser.parse("A.cs", source).unwrap();
        assert_eq!(first, second);
    }
}
