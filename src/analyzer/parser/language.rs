//! Language Detection Module
//!
//! Maps file extensions to the languages the scanner understands and to the
//! annotation syntax each of them uses.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use overviewgen::analyzer::parser::language::{Language, SourceSyntax};
//!
//! let lang = Language::from_path("Api/UsersController.cs");
//! assert_eq!(lang, Language::CSharp);
//! assert_eq!(lang.syntax(), Some(SourceSyntax::Attributed));
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// =============================================================================
// Source Syntax
// =============================================================================

/// Annotation and member conventions shared by a family of languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceSyntax {
    /// `[Name(args)]` attributes, explicit access modifiers (C#)
    Attributed,
    /// `@Name(args)` decorators, `name: Type` annotations (TypeScript)
    Decorated,
    /// Indentation scoped scripts with `@annotation` lines (GDScript)
    Script,
}

impl SourceSyntax {
    /// Route annotation name carried by the container type
    pub fn container_route_annotation(&self) -> &'static str {
        match self {
            Self::Attributed => "Route",
            Self::Decorated => "Controller",
            Self::Script => "",
        }
    }

    /// Prefix of a line-comment
    pub fn line_comment(&self) -> &'static str {
        match self {
            Self::Script => "#",
            _ => "//",
        }
    }
}

// =============================================================================
// Language Metadata Table
// =============================================================================

struct LanguageMeta {
    display_name: &'static str,
    extensions: &'static [&'static str],
    aliases: &'static [&'static str],
    syntax: Option<SourceSyntax>,
}

macro_rules! lang_meta {
    ($display:literal, [$($ext:literal),*], [$($alias:literal),*], $syntax:expr) => {
        LanguageMeta {
            display_name: $display,
            extensions: &[$($ext),*],
            aliases: &[$($alias),*],
            syntax: $syntax,
        }
    };
}

impl Language {
    fn meta(&self) -> LanguageMeta {
        match self {
            Language::CSharp => lang_meta!("C#", ["cs"], ["csharp", "c#", "cs"], Some(SourceSyntax::Attributed)),
            Language::TypeScript => lang_meta!("TypeScript", ["ts", "tsx", "mts", "cts"], ["typescript", "ts"], Some(SourceSyntax::Decorated)),
            Language::GdScript => lang_meta!("GDScript", ["gd"], ["gdscript", "gd", "godot"], Some(SourceSyntax::Script)),
            Language::Unknown => lang_meta!("Unknown", [], ["unknown", "text", ""], None),
        }
    }
}

// =============================================================================
// Language Enum Definition
// =============================================================================

/// Languages with a heuristic scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Language {
    CSharp,
    TypeScript,
    GdScript,
    #[default]
    Unknown,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        self.meta().display_name
    }

    /// Detect language from a file extension, with or without the leading dot
    pub fn from_extension(ext: &str) -> Self {
        let ext_lower = ext.trim_start_matches('.').to_lowercase();

        Self::all_variants()
            .iter()
            .copied()
            .find(|lang| lang.meta().extensions.iter().any(|e| *e == ext_lower))
            .unwrap_or(Language::Unknown)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        path.as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .map(Self::from_extension)
            .unwrap_or(Language::Unknown)
    }

    pub fn syntax(&self) -> Option<SourceSyntax> {
        self.meta().syntax
    }

    /// Every extension handled by some scanner, dot-prefixed
    pub fn supported_extensions() -> Vec<String> {
        Self::all_variants()
            .iter()
            .flat_map(|lang| lang.meta().extensions.iter())
            .map(|ext| format!(".{}", ext))
            .collect()
    }

    fn all_variants() -> &'static [Language] {
        &[Language::CSharp, Language::TypeScript, Language::GdScript]
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Language {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s_lower = s.to_lowercase();

        if let Some(lang) = Self::all_variants()
            .iter()
            .find(|lang| lang.meta().aliases.iter().any(|a| *a == s_lower))
        {
            return Ok(*lang);
        }

        if s_lower.is_empty() || s_lower == "unknown" || s_lower == "text" {
            return Ok(Language::Unknown);
        }

        Err(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension() {
        assert_eq!(Language::from_extension("cs"), Language::CSharp);
        assert_eq!(Language::from_extension(".CS"), Language::CSharp);
        assert_eq!(Language::from_extension(".ts"), Language::TypeScript);
        assert_eq!(Language::from_extension("gd"), Language::GdScript);
        assert_eq!(Language::from_extension("rs"), Language::Unknown);
    }

    #[test]
    fn test_from_path() {
        assert_eq!(Language::from_path("Api/UsersController.cs"), Language::CSharp);
        assert_eq!(Language::from_path("src/app.controller.ts"), Language::TypeScript);
        assert_eq!(Language::from_path("scenes/player.gd"), Language::GdScript);
        assert_eq!(Language::from_path("README"), Language::Unknown);
    }

    #[test]
    fn test_syntax_families() {
        assert_eq!(Language::CSharp.syntax(), Some(SourceSyntax::Attributed));
        assert_eq!(Language::TypeScript.syntax(), Some(SourceSyntax::Decorated));
        assert_eq!(Language::GdScript.syntax(), Some(SourceSyntax::Script));
        assert_eq!(Language::Unknown.syntax(), None);
    }

    #[test]
    fn test_supported_extensions_are_dotted() {
        let exts = Language::supported_extensions();
        assert!(exts.contains(&".cs".to_string()));
        assert!(exts.contains(&".gd".to_string()));
        assert!(exts.iter().all(|e| e.starts_with('.')));
    }

    #[test]
    fn test_from_str() {
        assert_eq!("c#".parse::<Language>(), Ok(Language::CSharp));
        assert_eq!("TypeScript".parse::<Language>(), Ok(Language::TypeScript));
        assert_eq!("cobol".parse::<Language>(), Err(()));
    }

    #[test]
    fn test_display() {
        assert_eq!(Language::CSharp.to_string(), "C#");
        assert_eq!(Language::GdScript.to_string(), "GDScript");
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&Language::CSharp).unwrap();
        assert_eq!(json, "\"CSharp\"");
        let parsed: Language = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Language::CSharp);
    }
}
