//! Scan Result Types
//!
//! Records produced by the heuristic scanner. Every record is created once
//! during scanning and never mutated afterwards; names and types are kept as
//! the literal text found in the source, never resolved.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analyzer::parser::Language;

/// Declared type for members whose type token could not be determined.
pub const UNKNOWN_TYPE: &str = "unknown";

// =============================================================================
// Source File
// =============================================================================

/// One file handed to the scanner by workspace discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path as discovered (absolute or relative to the working directory)
    pub path: String,
    /// Path relative to the scanned root, `/`-separated
    pub relative_path: String,
    /// Extension including the leading dot, e.g. `.cs`
    pub extension: String,
    /// Raw file text
    pub text: String,
}

impl SourceFile {
    pub fn new(path: impl Into<String>, text: impl Into<String>) -> Self {
        let path = path.into();
        let extension = extension_of(&path);
        Self {
            relative_path: path.replace('\\', "/"),
            path,
            extension,
            text: text.into(),
        }
    }

    pub fn with_relative_path(mut self, relative_path: impl Into<String>) -> Self {
        self.relative_path = relative_path.into().replace('\\', "/");
        self
    }

    pub fn language(&self) -> Language {
        Language::from_extension(&self.extension)
    }
}

/// Extension of `path` with a leading dot, or an empty string.
pub fn extension_of(path: &str) -> String {
    Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e))
        .unwrap_or_default()
}

// =============================================================================
// Type Records
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
    Record,
    Struct,
    TypeAlias,
}

impl TypeKind {
    /// Map a declaration keyword to its kind.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "class" => Some(Self::Class),
            "interface" => Some(Self::Interface),
            "enum" => Some(Self::Enum),
            "record" => Some(Self::Record),
            "struct" => Some(Self::Struct),
            "type" => Some(Self::TypeAlias),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Interface => "interface",
            Self::Enum => "enum",
            Self::Record => "record",
            Self::Struct => "struct",
            Self::TypeAlias => "type-alias",
        }
    }

    /// Members carry no access modifiers (interfaces, object type aliases)
    pub fn is_interface_like(&self) -> bool {
        matches!(self, Self::Interface | Self::TypeAlias)
    }

    pub fn is_class_like(&self) -> bool {
        matches!(self, Self::Class | Self::Record | Self::Struct)
    }

    pub fn is_enum(&self) -> bool {
        matches!(self, Self::Enum)
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A type declaration located in one source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRecord {
    pub name: String,
    pub kind: TypeKind,
    /// Literal identifiers from the inheritance clause, in source order
    pub base_types: Vec<String>,
    pub implemented_interfaces: Vec<String>,
    /// Declaration order; always empty for enums
    pub members: Vec<MemberRecord>,
    /// Only populated for enums
    pub enum_values: Vec<String>,
    pub endpoints: Vec<EndpointRecord>,
}

impl TypeRecord {
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            base_types: Vec::new(),
            implemented_interfaces: Vec::new(),
            members: Vec::new(),
            enum_values: Vec::new(),
            endpoints: Vec::new(),
        }
    }
}

// =============================================================================
// Member Records
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberKind {
    Method,
    Property,
    Field,
    Constructor,
    Readonly,
    Signal,
}

impl MemberKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Method => "method",
            Self::Property => "property",
            Self::Field => "field",
            Self::Constructor => "constructor",
            Self::Readonly => "readonly",
            Self::Signal => "signal",
        }
    }

    pub fn is_method(&self) -> bool {
        matches!(self, Self::Method)
    }
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberRecord {
    pub name: String,
    pub kind: MemberKind,
    /// Literal type text, [`UNKNOWN_TYPE`] when undeterminable
    pub declared_type: String,
    /// Single-line header; never contains the member body
    pub signature: String,
    pub annotations: Vec<AnnotationRecord>,
}

impl MemberRecord {
    pub fn annotation(&self, name: &str) -> Option<&AnnotationRecord> {
        self.annotations
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
    }
}

// =============================================================================
// Annotations
// =============================================================================

/// One `[Name(args)]` attribute or `@Name(args)` decorator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    pub name: String,
    pub arguments: AnnotationArguments,
}

/// Annotation arguments, kept as unparsed text.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "form", content = "value", rename_all = "lowercase")]
pub enum AnnotationArguments {
    #[default]
    None,
    /// Decomposed `key -> text` pairs; positional arguments are keyed by index
    Mapped(Vec<(String, String)>),
    /// Arguments that could not be decomposed
    Raw(String),
}

impl AnnotationRecord {
    pub fn new(name: impl Into<String>, arguments: AnnotationArguments) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }

    /// Raw text of an argument by key (`"0"` for the first positional one)
    pub fn argument(&self, key: &str) -> Option<&str> {
        match &self.arguments {
            AnnotationArguments::Mapped(pairs) => pairs
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(key))
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }

    /// Route-like string argument: first positional string literal, or a
    /// `template`/`path` named argument.
    pub fn route_argument(&self) -> Option<String> {
        ["0", "template", "path"]
            .iter()
            .filter_map(|key| self.argument(key))
            .find_map(unquote)
            .map(str::to_string)
    }
}

/// Strip one pair of matching string quotes (C# verbatim `@"..."` included).
pub fn unquote(text: &str) -> Option<&str> {
    let text = text.trim();
    let text = text.strip_prefix('@').unwrap_or(text);
    let mut chars = text.chars();
    let first = chars.next()?;
    let last = chars.next_back()?;
    if first == last && matches!(first, '"' | '\'' | '`') {
        Some(&text[1..text.len() - 1])
    } else {
        None
    }
}

// =============================================================================
// Endpoints
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Options,
    Head,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 7] = [
        Self::Get,
        Self::Post,
        Self::Put,
        Self::Delete,
        Self::Patch,
        Self::Options,
        Self::Head,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
            Self::Options => "OPTIONS",
            Self::Head => "HEAD",
        }
    }

    /// Parse a bare verb name, case-insensitively
    pub fn from_verb(verb: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(verb))
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// HTTP endpoint derived from an annotated handler method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointRecord {
    pub route: String,
    pub http_method: HttpMethod,
    pub container_name: String,
    pub handler_name: String,
    /// Ordered, de-duplicated
    pub dto_type_names: Vec<String>,
}

// =============================================================================
// File Metadata
// =============================================================================

/// Everything the scanner extracted from one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetadata {
    pub path: String,
    pub relative_path: String,
    pub extension: String,
    pub language: Language,
    pub types: Vec<TypeRecord>,
}

impl FileMetadata {
    pub fn new(path: &str, language: Language, types: Vec<TypeRecord>) -> Self {
        Self {
            path: path.to_string(),
            relative_path: path.replace('\\', "/"),
            extension: extension_of(path),
            language,
            types,
        }
    }

    pub fn with_relative_path(mut self, relative_path: impl Into<String>) -> Self {
        self.relative_path = relative_path.into().replace('\\', "/");
        self
    }

    /// File name without directories
    pub fn file_name(&self) -> &str {
        self.relative_path
            .rsplit('/')
            .next()
            .unwrap_or(&self.relative_path)
    }

    /// Endpoints of every type in declaration order
    pub fn endpoints(&self) -> impl Iterator<Item = &EndpointRecord> {
        self.types.iter().flat_map(|t| t.endpoints.iter())
    }

    /// True when scanning produced no type records
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_file_derives_extension() {
        let file = SourceFile::new("src\\Api\\UsersController.cs", "class A {}");
        assert_eq!(file.extension, ".cs");
        assert_eq!(file.relative_path, "src/Api/UsersController.cs");
        assert_eq!(file.language(), Language::CSharp);
    }

    #[test]
    fn test_extension_of_missing() {
        assert_eq!(extension_of("Makefile"), "");
    }

    #[test]
    fn test_type_kind_groups() {
        assert!(TypeKind::Interface.is_interface_like());
        assert!(TypeKind::TypeAlias.is_interface_like());
        assert!(TypeKind::Record.is_class_like());
        assert!(!TypeKind::Enum.is_class_like());
        assert_eq!(TypeKind::from_keyword("struct"), Some(TypeKind::Struct));
        assert_eq!(TypeKind::from_keyword("namespace"), None);
    }

    #[test]
    fn test_http_method_from_verb() {
        assert_eq!(HttpMethod::from_verb("get"), Some(HttpMethod::Get));
        assert_eq!(HttpMethod::from_verb("Patch"), Some(HttpMethod::Patch));
        assert_eq!(HttpMethod::from_verb("Route"), None);
        assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
    }

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("\"api/users\""), Some("api/users"));
        assert_eq!(unquote("':id'"), Some(":id"));
        assert_eq!(unquote("@\"raw\""), Some("raw"));
        assert_eq!(unquote("Name"), None);
        assert_eq!(unquote("\""), None);
    }

    #[test]
    fn test_route_argument_prefers_positional() {
        let annotation = AnnotationRecord::new(
            "HttpGet",
            AnnotationArguments::Mapped(vec![
                ("0".into(), "\"{id}\"".into()),
                ("Name".into(), "\"GetById\"".into()),
            ]),
        );
        assert_eq!(annotation.route_argument().as_deref(), Some("{id}"));

        let named = AnnotationRecord::new(
            "Route",
            AnnotationArguments::Mapped(vec![("template".into(), "\"x\"".into())]),
        );
        assert_eq!(named.route_argument().as_deref(), Some("x"));

        let bare = AnnotationRecord::new("HttpPost", AnnotationArguments::None);
        assert_eq!(bare.route_argument(), None);
    }

    #[test]
    fn test_file_metadata_endpoints_flatten() {
        let mut first = TypeRecord::new("A", TypeKind::Class);
        first.endpoints.push(EndpointRecord {
            route: "a/".into(),
            http_method: HttpMethod::Get,
            container_name: "A".into(),
            handler_name: "Get".into(),
            dto_type_names: vec![],
        });
        let file = FileMetadata::new("x/A.cs", Language::CSharp, vec![first]);
        assert_eq!(file.endpoints().count(), 1);
        assert_eq!(file.file_name(), "A.cs");
        assert!(!file.is_empty());
    }
}
