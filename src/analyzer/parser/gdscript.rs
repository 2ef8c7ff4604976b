//! GDScript parser.
//!
//! A script file is one class: `class_name` names it (else the file stem) and
//! `extends` gives its base. Only unindented lines declare members; indented
//! lines belong to function bodies or inner classes.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use super::annotation::{annotations_above, parse_annotations};
use super::text::{paren_delta, split_leading_annotations};
use super::{Language, Parser, SourceSyntax};
use crate::constants::scanner::{LIFECYCLE_HOOKS, MAX_SIGNATURE_LINES};
use crate::types::{FileMetadata, MemberKind, MemberRecord, Result, TypeKind, TypeRecord, UNKNOWN_TYPE};

static CLASS_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^class_name\s+([A-Za-z_]\w*)").unwrap());

static EXTENDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?m)^extends\s+"?([\w./:]+)"?"#).unwrap());

static FUNC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:static\s+)?func\s+([A-Za-z_]\w*)\s*\(").unwrap()
});

static RETURN_TYPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\)\s*->\s*([\w.\[\]]+)\s*:?\s*$").unwrap());

static VARIABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:static\s+)?(var|const)\s+([A-Za-z_]\w*)\s*(?::\s*([\w.\[\]]+))?").unwrap()
});

static SIGNAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^signal\s+([A-Za-z_]\w*)").unwrap());

pub struct GdScriptParser;

impl GdScriptParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GdScriptParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for GdScriptParser {
    fn parse(&self, path: &str, content: &str) -> Result<FileMetadata> {
        let name = CLASS_NAME
            .captures(content)
            .map(|c| c[1].to_string())
            .unwrap_or_else(|| {
                Path::new(path)
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or(path)
                    .to_string()
            });

        let mut record = TypeRecord::new(name, TypeKind::Class);
        if let Some(caps) = EXTENDS.captures(content) {
            record.base_types.push(caps[1].to_string());
        }
        record.members = scan_members(content);

        Ok(FileMetadata::new(path, Language::GdScript, vec![record]))
    }

    fn language(&self) -> Language {
        Language::GdScript
    }
}

fn scan_members(content: &str) -> Vec<MemberRecord> {
    let lines: Vec<&str> = content.lines().collect();
    let mut members = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        if line.starts_with([' ', '\t']) || line.trim().is_empty() || line.starts_with('#') {
            i += 1;
            continue;
        }

        let (inline, code) = split_leading_annotations(line, SourceSyntax::Script);
        let code = code.split(" #").next().unwrap_or(code).trim_end();
        let (joined, consumed) = join_parameters(&lines, i, code);

        let found = member_from_line(&joined);
        if let Some((name, kind, declared_type, signature)) = found
            && (!name.starts_with('_') || LIFECYCLE_HOOKS.contains(&name.as_str()))
        {
            let mut annotations = annotations_above(&lines, i, SourceSyntax::Script);
            annotations.extend(
                inline
                    .iter()
                    .flat_map(|a| parse_annotations(a, SourceSyntax::Script)),
            );
            members.push(MemberRecord {
                name,
                kind,
                declared_type,
                signature,
                annotations,
            });
        }
        i += consumed;
    }
    members
}

/// Join a `func` header whose parameter list spans several lines
fn join_parameters(lines: &[&str], start: usize, code: &str) -> (String, usize) {
    let mut depth = paren_delta(code);
    let mut joined = code.to_string();
    let mut consumed = 1;
    while depth > 0 && consumed < MAX_SIGNATURE_LINES && start + consumed < lines.len() {
        let next = lines[start + consumed].trim();
        joined.push(' ');
        joined.push_str(next);
        depth += paren_delta(next);
        consumed += 1;
    }
    if depth > 0 {
        (code.to_string(), 1)
    } else {
        (joined, consumed)
    }
}

fn member_from_line(code: &str) -> Option<(String, MemberKind, String, String)> {
    if let Some(caps) = FUNC.captures(code) {
        let declared_type = RETURN_TYPE
            .captures(code)
            .map_or_else(|| UNKNOWN_TYPE.to_string(), |c| c[1].to_string());
        let signature = code.trim_end().trim_end_matches(':').trim_end().to_string();
        return Some((caps[1].to_string(), MemberKind::Method, declared_type, signature));
    }

    if let Some(caps) = VARIABLE.captures(code) {
        let kind = if &caps[1] == "const" {
            MemberKind::Readonly
        } else {
            MemberKind::Field
        };
        let declared_type = caps
            .get(3)
            .map_or_else(|| UNKNOWN_TYPE.to_string(), |m| m.as_str().to_string());
        let signature = code.split('=').next().unwrap_or(code).trim_end();
        let signature = signature.strip_suffix(':').unwrap_or(signature).trim_end();
        return Some((caps[2].to_string(), kind, declared_type, signature.to_string()));
    }

    if let Some(caps) = SIGNAL.captures(code) {
        return Some((
            caps[1].to_string(),
            MemberKind::Signal,
            UNKNOWN_TYPE.to_string(),
            code.trim_end().to_string(),
        ));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAYER: &str = r#"@tool
class_name Player
extends CharacterBody2D

signal health_changed(old_value: int, new_value: int)

const MAX_SPEED := 300.0
@export var speed: float = 200.0
@onready
var sprite: Sprite2D = $Sprite
var _velocity := Vector2.ZERO  # internal

func _ready() -> void:
	sprite.play("idle")
	var local = 1

func take_damage(amount: int,
		source: Node) -> bool:
	return true

func _private_helper():
	pass

class Inner:
	var hidden = 1
"#;

    #[test]
    fn test_parse_player_script() {
        let metadata = GdScriptParser::new().parse("scenes/player.gd", PLAYER).unwrap();
        assert_eq!(metadata.language, Language::GdScript);
        assert_eq!(metadata.types.len(), 1);

        let player = &metadata.types[0];
        assert_eq!(player.name, "Player");
        assert_eq!(player.base_types, vec!["CharacterBody2D"]);

        let members: Vec<_> = player
            .members
            .iter()
            .map(|m| (m.name.as_str(), m.kind, m.declared_type.as_str()))
            .collect();
        assert_eq!(
            members,
            vec![
                ("health_changed", MemberKind::Signal, "unknown"),
                ("MAX_SPEED", MemberKind::Readonly, "unknown"),
                ("speed", MemberKind::Field, "float"),
                ("sprite", MemberKind::Field, "Sprite2D"),
                ("_ready", MemberKind::Method, "void"),
                ("take_damage", MemberKind::Method, "bool"),
            ]
        );

        assert_eq!(player.members[2].annotations[0].name, "export");
        assert_eq!(player.members[3].annotations[0].name, "onready");
        assert_eq!(player.members[2].signature, "var speed: float");
        assert_eq!(
            player.members[5].signature,
            "func take_damage(amount: int, source: Node) -> bool"
        );
    }

    #[test]
    fn test_class_name_falls_back_to_file_stem() {
        let metadata = GdScriptParser::new()
            .parse("ui/main_menu.gd", "extends Control\n\nfunc open():\n\tpass\n")
            .unwrap();
        assert_eq!(metadata.types[0].name, "main_menu");
        assert_eq!(metadata.types[0].members[0].declared_type, UNKNOWN_TYPE);
    }

    #[test]
    fn test_quoted_extends_path() {
        let metadata = GdScriptParser::new()
            .parse("enemy.gd", "extends \"res://actors/base.gd\"\n")
            .unwrap();
        assert_eq!(metadata.types[0].base_types, vec!["res://actors/base.gd"]);
    }
}
