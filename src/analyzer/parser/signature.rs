//! Member signature tokenizer.
//!
//! Splits one joined member line into name, declared type and a body-free
//! header. Re-tokenizing a header yields the same name and type.

use std::sync::LazyLock;

use regex::Regex;

use crate::constants::scanner::MODIFIER_KEYWORDS;
use crate::types::UNKNOWN_TYPE;

use super::language::SourceSyntax;
use super::text::{find_matching, identifier_before, type_token_before};

static ACCESSOR_LIST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\{\s*(?:(?:public|private|protected|internal)\s+)?(?:get|set|init)\s*;(?:\s*(?:(?:public|private|protected|internal)\s+)?(?:get|set|init)\s*;)*\s*\}")
        .unwrap()
});

/// Character that ended the member head.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminator {
    /// `(` parameter list
    Paren,
    /// `{` accessor list or body
    Brace,
    Semicolon,
    /// `=` initializer or `=>` expression body
    Assign,
    /// `:` type annotation (decorated syntax only)
    Colon,
    End,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureParts {
    pub name: String,
    /// Byte offset of `name` in the trimmed line
    pub name_start: usize,
    /// `None` when no type could be read
    pub declared_type: Option<String>,
    pub terminator: Terminator,
    pub header: String,
    /// `{ get; set; }` accessor list present
    pub has_accessors: bool,
}

impl SignatureParts {
    pub fn declared_type_or_unknown(&self) -> String {
        self.declared_type
            .clone()
            .unwrap_or_else(|| UNKNOWN_TYPE.to_string())
    }
}

/// Tokenize a joined member line.
///
/// Returns `None` when no member name can be read or a parameter list never
/// closes.
pub fn analyze(raw: &str, syntax: SourceSyntax, interface_like: bool) -> Option<SignatureParts> {
    let text = raw.trim();
    let (term_at, terminator) = find_terminator(text, syntax);
    let (name_start, name) = identifier_before(text, term_at)?;

    let (header_end, declared_type, has_accessors) = match terminator {
        Terminator::Paren => {
            let close = find_matching(text, term_at)?;
            match syntax {
                SourceSyntax::Attributed => {
                    (close + 1, attributed_type(text, name_start), false)
                }
                _ => match return_annotation(text, close + 1) {
                    Some((end, ty)) => (end, Some(ty.to_string()), false),
                    None => (close + 1, None, false),
                },
            }
        }
        Terminator::Brace => {
            let accessors = ACCESSOR_LIST.find(&text[term_at..]);
            let end = accessors.map_or(term_at, |m| term_at + m.end());
            (end, attributed_type(text, name_start), accessors.is_some())
        }
        Terminator::Colon => {
            match annotation_type(text, term_at + 1) {
                (_, "") => (term_at, None, false),
                (end, ty) => (end, Some(ty.to_string()), false),
            }
        }
        Terminator::Semicolon | Terminator::Assign | Terminator::End => {
            let ty = match syntax {
                SourceSyntax::Attributed => attributed_type(text, name_start),
                _ => None,
            };
            (term_at, ty, false)
        }
    };

    let mut header = text[..header_end].trim().to_string();
    if interface_like
        && terminator == Terminator::Paren
        && text[header_end..].trim_start().starts_with(';')
    {
        header.push(';');
    }

    Some(SignatureParts {
        name: name.to_string(),
        name_start,
        declared_type,
        terminator,
        header,
        has_accessors,
    })
}

/// Name and declared type of a member line, with [`UNKNOWN_TYPE`] for a
/// missing type.
pub fn tokenize(raw: &str, syntax: SourceSyntax) -> Option<(String, String)> {
    analyze(raw, syntax, false).map(|parts| {
        let ty = parts.declared_type_or_unknown();
        (parts.name, ty)
    })
}

/// First `( { ; =` (and `:` in decorated syntax) outside generic brackets.
fn find_terminator(text: &str, syntax: SourceSyntax) -> (usize, Terminator) {
    let mut angle = 0usize;
    for (i, b) in text.bytes().enumerate() {
        match b {
            b'<' => angle += 1,
            b'>' => angle = angle.saturating_sub(1),
            _ if angle > 0 => {}
            b'(' => return (i, Terminator::Paren),
            b'{' => return (i, Terminator::Brace),
            b';' => return (i, Terminator::Semicolon),
            b'=' => return (i, Terminator::Assign),
            b':' if syntax != SourceSyntax::Attributed => return (i, Terminator::Colon),
            _ => {}
        }
    }
    (text.len(), Terminator::End)
}

/// Type token in front of the member name, unless it is a modifier
fn attributed_type(text: &str, name_start: usize) -> Option<String> {
    let token = type_token_before(text, name_start)?;
    (!MODIFIER_KEYWORDS.contains(&token)).then(|| token.to_string())
}

/// `: Type` following a parameter list; returns the end offset and the type
fn return_annotation(text: &str, after_params: usize) -> Option<(usize, &str)> {
    let rest = &text[after_params..];
    let colon = rest.len() - rest.trim_start().len();
    if !rest[colon..].starts_with(':') {
        return None;
    }
    let start = after_params + colon + 1;
    let (end, ty) = annotation_type(text, start);
    (!ty.is_empty()).then_some((end, ty))
}

/// Type text starting at `start`, up to a top-level `{ ; = ,` or end of line.
/// `=>` inside function types does not terminate.
fn annotation_type(text: &str, start: usize) -> (usize, &str) {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut end = bytes.len();

    for i in start..bytes.len() {
        match bytes[i] {
            b'<' | b'(' | b'[' => depth += 1,
            b'>' if i > 0 && bytes[i - 1] == b'=' => {}
            b'>' | b')' | b']' => depth = depth.saturating_sub(1),
            b'=' if bytes.get(i + 1) == Some(&b'>') => {}
            b'{' | b';' | b'=' | b',' if depth == 0 => {
                end = i;
                break;
            }
            _ => {}
        }
    }

    let ty = text[start..end].trim();
    let end = start + text[start..end].trim_end().len();
    (end, ty)
}
