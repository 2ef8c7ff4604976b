//! Endpoint Extractor
//!
//! Derives [`EndpointRecord`]s from handler methods carrying an HTTP verb
//! annotation. DTO names are a best-effort guess from parameter and return
//! types; nothing is resolved against real type definitions.

use crate::constants::endpoint::{
    ACTION_RESULT_MARKERS, ATTRIBUTED_BINDINGS, DECORATED_BINDINGS, PRIMITIVE_TYPES,
};
use crate::types::{AnnotationRecord, EndpointRecord, HttpMethod, MemberRecord};

use super::declaration::replace_token;
use super::language::SourceSyntax;
use super::text::{
    find_matching, identifier_before, is_ident_byte, split_leading_annotations, split_top_level,
};

const PARAMETER_MODIFIERS: &[&str] = &["this", "ref", "out", "in", "params", "scoped"];

/// Endpoint for `member`, when it is a method with an HTTP verb annotation.
pub fn extract_endpoint(
    member: &MemberRecord,
    container: &str,
    route_prefix: &str,
    syntax: SourceSyntax,
) -> Option<EndpointRecord> {
    if !member.kind.is_method() {
        return None;
    }

    let (verb_annotation, http_method) = member
        .annotations
        .iter()
        .find_map(|a| http_verb(a, syntax).map(|m| (a, m)))?;

    let suffix = verb_annotation
        .route_argument()
        .or_else(|| member.annotation("Route").and_then(|r| r.route_argument()))
        .unwrap_or_default();
    let suffix = replace_token(&suffix, "[action]", &member.name);

    Some(EndpointRecord {
        route: compose_route(route_prefix, &suffix),
        http_method,
        container_name: container.to_string(),
        handler_name: member.name.clone(),
        dto_type_names: infer_dtos(&member.signature, &member.declared_type, syntax),
    })
}

/// Verb carried by an annotation: `HttpGet` in attributed syntax, `Get` in
/// decorated syntax.
fn http_verb(annotation: &AnnotationRecord, syntax: SourceSyntax) -> Option<HttpMethod> {
    let name = annotation.name.rsplit('.').next().unwrap_or(&annotation.name);
    match syntax {
        SourceSyntax::Attributed => {
            let lower = name.to_ascii_lowercase();
            lower.strip_prefix("http").and_then(HttpMethod::from_verb)
        }
        SourceSyntax::Decorated => HttpMethod::from_verb(name),
        SourceSyntax::Script => None,
    }
}

/// Join a container prefix and a handler suffix with exactly one separator.
///
/// A prefix without suffix gets a trailing slash; a suffix without prefix is
/// used as-is.
pub fn compose_route(prefix: &str, suffix: &str) -> String {
    match (prefix.is_empty(), suffix.is_empty()) {
        (true, _) => suffix.to_string(),
        (false, true) if prefix.ends_with('/') => prefix.to_string(),
        (false, true) => format!("{}/", prefix),
        (false, false) if prefix.ends_with('/') || suffix.starts_with('/') => {
            format!("{}{}", prefix, suffix)
        }
        (false, false) => format!("{}/{}", prefix, suffix),
    }
}

/// DTO candidates of a handler, ordered and de-duplicated.
///
/// Parameters with a binding annotation win; only when no parameter has one
/// are all non-primitive parameter types taken. A wrapped return type adds its
/// payload type.
pub fn infer_dtos(signature: &str, return_type: &str, syntax: SourceSyntax) -> Vec<String> {
    let parameters = parameter_list(signature)
        .map(|list| split_top_level(list, b','))
        .unwrap_or_default();

    let bound: Vec<&str> = parameters
        .iter()
        .copied()
        .filter(|p| has_binding(p, syntax))
        .collect();
    let considered = if bound.is_empty() { parameters } else { bound };

    let mut dtos: Vec<String> = Vec::new();
    let candidates = considered
        .into_iter()
        .filter_map(|p| parameter_type(p, syntax))
        .map(str::to_string)
        .chain(payload_type(return_type));

    for candidate in candidates {
        if !is_primitive(&candidate) && !dtos.contains(&candidate) {
            dtos.push(candidate);
        }
    }
    dtos
}

/// Text inside the parameter list that follows the member name
fn parameter_list(signature: &str) -> Option<&str> {
    let open = signature.find('(')?;
    let close = find_matching(signature, open)?;
    Some(&signature[open + 1..close])
}

fn has_binding(parameter: &str, syntax: SourceSyntax) -> bool {
    let bindings = match syntax {
        SourceSyntax::Attributed => ATTRIBUTED_BINDINGS,
        SourceSyntax::Decorated => DECORATED_BINDINGS,
        SourceSyntax::Script => return false,
    };
    let (annotations, _) = split_leading_annotations(parameter, syntax);
    annotations.iter().any(|text| {
        let name: String = text
            .trim_start_matches(['[', '@'])
            .bytes()
            .take_while(|b| is_ident_byte(*b))
            .map(char::from)
            .collect();
        bindings.contains(&name.as_str())
    })
}

/// Declared type of one parameter
fn parameter_type(parameter: &str, syntax: SourceSyntax) -> Option<&str> {
    let (_, rest) = split_leading_annotations(parameter, syntax);
    let rest = split_top_level(rest, b'=').into_iter().next()?;

    match syntax {
        SourceSyntax::Attributed => {
            let (name_start, _) = identifier_before(rest, rest.len())?;
            let mut ty = rest[..name_start].trim();
            loop {
                match ty.split_once(' ') {
                    Some((first, tail)) if PARAMETER_MODIFIERS.contains(&first) => {
                        ty = tail.trim_start()
                    }
                    _ => break,
                }
            }
            (!ty.is_empty()).then_some(ty)
        }
        _ => {
            let rest = strip_parameter_property(rest);
            let (_, ty) = rest.split_once(':')?;
            let ty = ty.trim();
            (!ty.is_empty()).then_some(ty)
        }
    }
}

/// `private readonly service: T` constructor parameter properties
fn strip_parameter_property(parameter: &str) -> &str {
    let mut rest = parameter.trim();
    for modifier in ["public ", "private ", "protected ", "readonly ", "override "] {
        rest = rest.strip_prefix(modifier).unwrap_or(rest).trim_start();
    }
    rest
}

/// Payload type inside a wrapper such as `Task<UserDto>`.
///
/// Action-result markers are looked through when generic and yield nothing
/// otherwise.
fn payload_type(return_type: &str) -> Option<String> {
    let ty = return_type.trim();
    let open = ty.find('<')?;
    if !ty.ends_with('>') {
        return None;
    }
    let inner = ty[open + 1..ty.len() - 1].trim();
    if split_top_level(inner, b',').len() != 1 {
        return None;
    }

    let inner_base = inner.split('<').next().unwrap_or(inner).trim();
    if ACTION_RESULT_MARKERS.contains(&inner_base) {
        return if inner.contains('<') {
            payload_type(inner)
        } else {
            None
        };
    }
    (!is_primitive(inner)).then(|| inner.to_string())
}

/// Primitive after dropping nullable and array markers
fn is_primitive(ty: &str) -> bool {
    let base = ty.trim().trim_end_matches('?').trim_end_matches("[]").trim_end_matches('?');
    PRIMITIVE_TYPES.contains(&base)
}
