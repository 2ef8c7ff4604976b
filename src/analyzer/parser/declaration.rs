//! Declaration Locator
//!
//! Finds type declarations with keyword patterns and resolves each one's
//! inheritance clause and route prefix. Declarations inside comments and string
//! literals are ignored.

use std::sync::LazyLock;

use regex::Regex;

use crate::constants::scanner::{CONTROLLER_SUFFIX, ROUTE_LOOKBACK_LINES};
use crate::types::TypeKind;

use super::annotation::parse_annotations;
use super::language::SourceSyntax;
use super::text::{is_annotation_line, is_comment_line, is_masked, split_top_level};

static ATTRIBUTED_DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?P<kind>record(?:\s+(?:struct|class))?|class|interface|enum|struct)\s+(?P<name>[A-Za-z_]\w*)(?:\s*<[^<>{};]*(?:<[^<>{};]*>[^<>{};]*)*>)?(?:\s*\([^(){};]*(?:\([^(){};]*\)[^(){};]*)*\))?(?:\s*:\s*(?P<bases>[^{;]*))?",
    )
    .unwrap()
});

static DECORATED_DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?P<kind>class|interface|enum)\s+(?P<name>[A-Za-z_$][\w$]*)(?P<heritage>[^{;]*)")
        .unwrap()
});

static DECORATED_TYPE_ALIAS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\btype\s+(?P<name>[A-Za-z_$][\w$]*)\s*(?:<[^=]*>)?\s*=\s*\{").unwrap()
});

static WHERE_CLAUSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bwhere\b").unwrap());

/// Words that can follow a declaration keyword without naming a type
const NON_NAMES: &[&str] = &["extends", "implements", "where", "of", "in"];

/// A located type declaration, before its body is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub kind: TypeKind,
    pub name: String,
    pub base_types: Vec<String>,
    pub implemented_interfaces: Vec<String>,
    pub route_prefix: String,
    /// Byte offset of the declaration keyword
    pub start: usize,
    /// Byte offset where the body search begins
    pub header_end: usize,
}

/// Every declaration in `source`, ordered by position.
pub fn locate_declarations(source: &str, syntax: SourceSyntax) -> Vec<Declaration> {
    let mut found = match syntax {
        SourceSyntax::Attributed => attributed_declarations(source),
        SourceSyntax::Decorated => decorated_declarations(source),
        SourceSyntax::Script => Vec::new(),
    };
    found.retain(|d| !is_masked(source, d.start, syntax));
    found.sort_by_key(|d| d.start);

    for declaration in &mut found {
        if declaration.kind.is_class_like() {
            declaration.route_prefix = route_prefix(source, declaration, syntax);
        }
    }
    found
}

fn attributed_declarations(source: &str) -> Vec<Declaration> {
    ATTRIBUTED_DECLARATION
        .captures_iter(source)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let keyword = caps["kind"].split_whitespace().next()?;
            let kind = TypeKind::from_keyword(keyword)?;
            let name = &caps["name"];
            if NON_NAMES.contains(&name) {
                return None;
            }

            let base_types = caps
                .name("bases")
                .map(|m| {
                    let text = m.as_str();
                    let text = WHERE_CLAUSE.find(text).map_or(text, |w| &text[..w.start()]);
                    split_top_level(text, b',')
                        .into_iter()
                        .map(|base| strip_arguments(base).to_string())
                        .collect()
                })
                .unwrap_or_default();

            Some(Declaration {
                kind,
                name: name.to_string(),
                base_types,
                implemented_interfaces: Vec::new(),
                route_prefix: String::new(),
                start: whole.start(),
                header_end: whole.end(),
            })
        })
        .collect()
}

fn decorated_declarations(source: &str) -> Vec<Declaration> {
    let mut found: Vec<Declaration> = DECORATED_DECLARATION
        .captures_iter(source)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let kind = TypeKind::from_keyword(&caps["kind"])?;
            let name = &caps["name"];
            if NON_NAMES.contains(&name) {
                return None;
            }
            let (base_types, implemented_interfaces) = parse_heritage(&caps["heritage"]);

            Some(Declaration {
                kind,
                name: name.to_string(),
                base_types,
                implemented_interfaces,
                route_prefix: String::new(),
                start: whole.start(),
                header_end: whole.end(),
            })
        })
        .collect();

    found.extend(DECORATED_TYPE_ALIAS.captures_iter(source).filter_map(|caps| {
        let whole = caps.get(0)?;
        Some(Declaration {
            kind: TypeKind::TypeAlias,
            name: caps["name"].to_string(),
            base_types: Vec::new(),
            implemented_interfaces: Vec::new(),
            route_prefix: String::new(),
            start: whole.start(),
            // points at the `{` so the body extractor starts there
            header_end: whole.end() - 1,
        })
    }));
    found
}

/// Split `extends A, B implements C` into base types and interfaces.
fn parse_heritage(text: &str) -> (Vec<String>, Vec<String>) {
    #[derive(Clone, Copy)]
    enum Clause {
        Extends,
        Implements,
    }

    let mut bases = Vec::new();
    let mut interfaces = Vec::new();
    let mut clause = None;

    for token in heritage_tokens(text) {
        match token {
            "extends" => clause = Some(Clause::Extends),
            "implements" => clause = Some(Clause::Implements),
            _ => {
                let starts_like_type = token
                    .chars()
                    .next()
                    .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$');
                match clause {
                    Some(Clause::Extends) if starts_like_type => bases.push(token.to_string()),
                    Some(Clause::Implements) if starts_like_type => {
                        interfaces.push(token.to_string())
                    }
                    _ => {}
                }
            }
        }
    }
    (bases, interfaces)
}

/// Whitespace/comma separated tokens, keeping generic arguments attached.
fn heritage_tokens(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut depth = 0i32;
    let mut start: Option<usize> = None;

    for (i, c) in text.char_indices() {
        match c {
            '<' | '(' => depth += 1,
            '>' | ')' => depth = (depth - 1).max(0),
            _ => {}
        }
        let separator = depth == 0 && (c.is_whitespace() || c == ',');
        match (separator, start) {
            (true, Some(s)) => {
                tokens.push(&text[s..i]);
                start = None;
            }
            (false, None) => start = Some(i),
            _ => {}
        }
    }
    if let Some(s) = start {
        tokens.push(&text[s..]);
    }
    tokens
}

/// `Base(arg)` from a primary-constructor call keeps only `Base`
fn strip_arguments(base: &str) -> &str {
    match base.find('(') {
        Some(i) => base[..i].trim(),
        None => base.trim(),
    }
}

/// Route prefix of a class-like declaration.
///
/// Reads the annotation block above the declaration (and any annotations on the
/// same line). Without a route annotation the prefix is the type name minus a
/// `Controller` suffix, or empty when the name has no such suffix.
fn route_prefix(source: &str, declaration: &Declaration, syntax: SourceSyntax) -> String {
    let line_start = source[..declaration.start].rfind('\n').map_or(0, |i| i + 1);
    let mut block: Vec<&str> = vec![source[line_start..declaration.start].trim()];

    let mut examined = 0;
    for line in source[..line_start].lines().rev() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        examined += 1;
        if examined > ROUTE_LOOKBACK_LINES {
            break;
        }
        if is_comment_line(trimmed, syntax) {
            continue;
        }
        if !is_annotation_line(trimmed, syntax) {
            break;
        }
        block.push(trimmed);
    }

    let route_name = syntax.container_route_annotation();
    let explicit = block
        .iter()
        .rev()
        .flat_map(|line| parse_annotations(line, syntax))
        .find(|a| a.name.eq_ignore_ascii_case(route_name))
        .and_then(|a| a.route_argument());

    let controller_name = declaration
        .name
        .strip_suffix(CONTROLLER_SUFFIX)
        .filter(|short| !short.is_empty());

    match explicit {
        Some(prefix) => substitute_controller_token(&prefix, controller_name.unwrap_or(declaration.name.as_str())),
        None => controller_name.unwrap_or_default().to_string(),
    }
}

/// Replace a `[controller]` placeholder, case-insensitively
fn substitute_controller_token(route: &str, controller: &str) -> String {
    replace_token(route, "[controller]", controller)
}

/// Replace every case-insensitive occurrence of an ASCII `token`
pub fn replace_token(route: &str, token: &str, value: &str) -> String {
    let lower = route.to_ascii_lowercase();
    let mut out = String::with_capacity(route.len());
    let mut last = 0;
    for (i, _) in lower.match_indices(token) {
        out.push_str(&route[last..i]);
        out.push_str(value);
        last = i + token.len();
    }
    out.push_str(&route[last..]);
    out
}
