//! Annotation parsing.
//!
//! Turns `[A, B(x)]`, `[A][B]` and `@A() @B({ key: 'v' })` lines into
//! [`AnnotationRecord`]s. Argument values stay as raw source text.

use crate::constants::scanner::ANNOTATION_LOOKBACK_LINES;
use crate::types::{AnnotationArguments, AnnotationRecord};

use super::language::SourceSyntax;
use super::text::{
    find_matching, is_annotation_line, is_comment_line, is_ident_byte, is_identifier,
    split_leading_annotations, split_top_level,
};

/// Parse every annotation at the start of `line`.
pub fn parse_annotations(line: &str, syntax: SourceSyntax) -> Vec<AnnotationRecord> {
    let (texts, _) = split_leading_annotations(line, syntax);
    texts
        .into_iter()
        .flat_map(|text| parse_annotation_text(text, syntax))
        .collect()
}

/// Annotation block directly above line `index`.
///
/// Walks upward over blank, comment and annotation lines and stops at the first
/// line of code. Records come back in source order.
pub fn annotations_above(lines: &[&str], index: usize, syntax: SourceSyntax) -> Vec<AnnotationRecord> {
    let mut block = Vec::new();
    let floor = index.saturating_sub(ANNOTATION_LOOKBACK_LINES);

    for line in lines[floor..index].iter().rev() {
        let trimmed = line.trim();
        if trimmed.is_empty() || is_comment_line(trimmed, syntax) {
            continue;
        }
        if !is_annotation_line(trimmed, syntax) {
            break;
        }
        block.push(trimmed);
    }

    block
        .into_iter()
        .rev()
        .flat_map(|line| parse_annotations(line, syntax))
        .collect()
}

fn parse_annotation_text(text: &str, syntax: SourceSyntax) -> Vec<AnnotationRecord> {
    match syntax {
        SourceSyntax::Attributed => {
            let inner = text
                .strip_prefix('[')
                .and_then(|t| t.strip_suffix(']'))
                .unwrap_or(text);
            split_top_level(inner, b',')
                .into_iter()
                .filter_map(parse_single)
                .collect()
        }
        SourceSyntax::Decorated | SourceSyntax::Script => text
            .strip_prefix('@')
            .and_then(parse_single)
            .into_iter()
            .collect(),
    }
}

fn parse_single(piece: &str) -> Option<AnnotationRecord> {
    let piece = strip_target(piece.trim());
    let bytes = piece.as_bytes();

    let mut end = 0;
    while end < bytes.len() && (is_ident_byte(bytes[end]) || bytes[end] == b'.') {
        end += 1;
    }
    let name = &piece[..end];
    if name.is_empty() {
        return None;
    }
    let name = match name.strip_suffix("Attribute") {
        Some(short) if !short.is_empty() => short,
        _ => name,
    };

    let rest = piece[end..].trim_start();
    let arguments = if rest.starts_with('(') {
        match find_matching(rest, 0) {
            Some(close) => parse_arguments(&rest[1..close]),
            None => AnnotationArguments::Raw(rest[1..].trim().to_string()),
        }
    } else {
        AnnotationArguments::None
    };

    Some(AnnotationRecord::new(name, arguments))
}

/// Drop an attribute target such as `return:` or `assembly:`
fn strip_target(piece: &str) -> &str {
    match piece.split_once(':') {
        Some((target, rest)) if is_identifier(target.trim()) && !rest.starts_with(':') => {
            rest.trim_start()
        }
        _ => piece,
    }
}

fn parse_arguments(inner: &str) -> AnnotationArguments {
    let inner = inner.trim();
    if inner.is_empty() {
        return AnnotationArguments::None;
    }

    let mut pairs = Vec::new();
    let mut position = 0usize;

    for piece in split_top_level(inner, b',') {
        if let Some(object) = piece.strip_prefix('{').and_then(|p| p.strip_suffix('}')) {
            match object_pairs(object) {
                Some(found) => pairs.extend(found),
                None => return AnnotationArguments::Raw(inner.to_string()),
            }
            continue;
        }

        match named_argument(piece) {
            Some((key, value)) => pairs.push((key.to_string(), value.to_string())),
            None => {
                pairs.push((position.to_string(), piece.to_string()));
                position += 1;
            }
        }
    }

    AnnotationArguments::Mapped(pairs)
}

/// `Name = value` or `name: value`
fn named_argument(piece: &str) -> Option<(&str, &str)> {
    let sep = piece.find(['=', ':'])?;
    let key = piece[..sep].trim();
    let after = &piece[sep + 1..];
    // `==`, `=>` and `::` are expressions, not named arguments
    if after.starts_with(['=', '>', ':']) || !is_identifier(key) {
        return None;
    }
    Some((key, after.trim()))
}

/// Pairs of an object literal; `None` when any entry is not `key: value`
fn object_pairs(object: &str) -> Option<Vec<(String, String)>> {
    split_top_level(object, b',')
        .into_iter()
        .map(|entry| {
            let (key, value) = entry.split_once(':')?;
            let key = key.trim().trim_matches(['"', '\'']);
            is_identifier(key).then(|| (key.to_string(), value.trim().to_string()))
        })
        .collect()
}
