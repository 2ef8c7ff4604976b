//! Member Scanner
//!
//! Walks a type body line by line and turns top-level member lines into
//! [`MemberRecord`]s (or enum values for enums). Lines nested deeper than the
//! body's own braces belong to member bodies and are never scanned.

use std::sync::LazyLock;

use regex::Regex;

use crate::constants::scanner::{
    ATTRIBUTED_ACCESS_MODIFIERS, DECORATED_MEMBER_MODIFIERS, LIFECYCLE_HOOKS, MAX_SIGNATURE_LINES,
};
use crate::types::{MemberKind, MemberRecord, TypeKind};

use super::annotation::{annotations_above, parse_annotations};
use super::language::SourceSyntax;
use super::signature::{SignatureParts, Terminator, analyze};
use super::text::{
    brace_delta, first_word, is_comment_line, paren_delta, split_leading_annotations,
    split_top_level,
};

static ENUM_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z_]\w*)\s*(?:=\s*(.+))?$").unwrap());

static INTEGER_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?(?:0[xX][0-9a-fA-F]+|\d+)$").unwrap());

static NESTED_TYPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:class|interface|enum|struct|record|namespace)\s+[A-Za-z_]").unwrap()
});

static IMPLICIT_MEMBER_HEAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_$#][\w$]*[?!]?\s*(?:<[^>]*>)?\s*[(:=;]").unwrap()
});

/// Members and enum values found in one type body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberScan {
    pub members: Vec<MemberRecord>,
    pub enum_values: Vec<String>,
}

/// Scans the body of one declaration.
pub struct MemberScanner<'a> {
    type_name: &'a str,
    kind: TypeKind,
    syntax: SourceSyntax,
}

impl<'a> MemberScanner<'a> {
    pub fn new(type_name: &'a str, kind: TypeKind, syntax: SourceSyntax) -> Self {
        Self {
            type_name,
            kind,
            syntax,
        }
    }

    pub fn scan(&self, body: &str) -> MemberScan {
        let lines: Vec<&str> = body.lines().collect();
        if self.kind.is_enum() {
            return MemberScan {
                members: Vec::new(),
                enum_values: enum_values(&lines, self.syntax),
            };
        }

        let mut members = Vec::new();
        let mut depth = 0i32;
        let mut parens = 0i32;
        let mut i = 0;

        while i < lines.len() {
            let trimmed = lines[i].trim();

            if trimmed.is_empty() || is_comment_line(trimmed, self.syntax) {
                i += 1;
                continue;
            }

            let (inline, code) = split_leading_annotations(trimmed, self.syntax);
            let at_top = depth == 0 && parens == 0;

            if !at_top || code.is_empty() || !self.is_candidate(code) {
                depth = (depth + brace_delta(trimmed)).max(0);
                parens = (parens + paren_delta(trimmed)).max(0);
                i += 1;
                continue;
            }

            let (joined, consumed) = gather_signature(&lines, i, code);
            for line in &lines[i..i + consumed] {
                depth += brace_delta(line.trim());
            }
            depth = depth.max(0);

            let mut annotations = annotations_above(&lines, i, self.syntax);
            annotations.extend(inline.iter().flat_map(|a| parse_annotations(a, self.syntax)));
            i += consumed;

            let Some(parts) = analyze(&joined, self.syntax, self.kind.is_interface_like()) else {
                tracing::trace!(line = %joined, "Unrecognized member line skipped");
                continue;
            };
            if !self.is_visible(&parts.name) {
                continue;
            }

            members.push(MemberRecord {
                kind: self.member_kind(&joined, &parts),
                declared_type: parts.declared_type_or_unknown(),
                name: parts.name,
                signature: parts.header,
                annotations,
            });
        }

        MemberScan {
            members,
            enum_values: Vec::new(),
        }
    }

    fn is_candidate(&self, code: &str) -> bool {
        if NESTED_TYPE.is_match(code) && !code.contains('(') {
            return false;
        }
        if self.kind.is_interface_like() {
            let accessor = match self.syntax {
                SourceSyntax::Attributed => code.contains("{ get") || code.contains("{get"),
                _ => code.contains(':'),
            };
            return code.contains('(')
                || accessor
                || (code.contains(' ') && (code.contains(';') || code.ends_with('}')));
        }

        let word = first_word(code);
        match self.syntax {
            SourceSyntax::Attributed => ATTRIBUTED_ACCESS_MODIFIERS.contains(&word),
            _ => DECORATED_MEMBER_MODIFIERS.contains(&word) || IMPLICIT_MEMBER_HEAD.is_match(code),
        }
    }

    /// Underscore-prefixed members and constructors named after the type are
    /// hidden on class-like types
    fn is_visible(&self, name: &str) -> bool {
        if self.kind.is_interface_like() {
            return true;
        }
        if name == self.type_name {
            return false;
        }
        !name.starts_with('_') || LIFECYCLE_HOOKS.contains(&name)
    }

    fn member_kind(&self, joined: &str, parts: &SignatureParts) -> MemberKind {
        if parts.terminator == Terminator::Paren {
            return match self.syntax {
                SourceSyntax::Decorated if parts.name == "constructor" => MemberKind::Constructor,
                _ => MemberKind::Method,
            };
        }

        let (head, tail) = joined.trim().split_at(parts.name_start);
        let has_modifier = |m: &str| head.split_whitespace().any(|w| w == m);
        if has_modifier("readonly") || has_modifier("const") {
            return MemberKind::Readonly;
        }

        match self.syntax {
            SourceSyntax::Attributed => {
                let expression_bodied = parts.terminator == Terminator::Assign
                    && tail.contains("=>");
                if parts.has_accessors
                    || expression_bodied
                    || parts.terminator == Terminator::Brace
                    || self.kind.is_interface_like()
                {
                    MemberKind::Property
                } else {
                    MemberKind::Field
                }
            }
            _ => MemberKind::Property,
        }
    }
}

/// Join continuation lines while the parameter list stays open.
///
/// Falls back to the single line when the list never closes within
/// [`MAX_SIGNATURE_LINES`].
fn gather_signature(lines: &[&str], start: usize, code: &str) -> (String, usize) {
    let mut depth = paren_delta(code);
    if depth <= 0 {
        return (code.to_string(), 1);
    }

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

/// `Name` or `Name = N`; only integer initializers are kept
fn enum_values(lines: &[&str], syntax: SourceSyntax) -> Vec<String> {
    let mut values = Vec::new();
    for line in lines {
        let trimmed = line.trim();
        if trimmed.is_empty() || is_comment_line(trimmed, syntax) {
            continue;
        }
        let (_, code) = split_leading_annotations(trimmed, syntax);
        let code = code.split("//").next().unwrap_or(code);

        for piece in split_top_level(code, b',') {
            let Some(caps) = ENUM_VALUE.captures(piece) else {
                continue;
            };
            let value = caps.get(2).map(|v| v.as_str().trim());
            values.push(match value {
                Some(v) if INTEGER_LITERAL.is_match(v) => format!("{} = {}", &caps[1], v),
                _ => caps[1].to_string(),
            });
        }
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UNKNOWN_TYPE;

    fn scan(body: &str, name: &str, kind: TypeKind, syntax: SourceSyntax) -> MemberScan {
        MemberScanner::new(name, kind, syntax).scan(body)
    }

    fn names(scan: &MemberScan) -> Vec<&str> {
        scan.members.iter().map(|m| m.name.as_str()).collect()
    }

    #[test]
    fn test_enum_values_and_no_members() {
        let body = "\n    Active = 1,\n    Inactive = 0x2, // legacy\n    // Removed = 3,\n    Pending\n";
        let result = scan(body, "Status", TypeKind::Enum, SourceSyntax::Attributed);
        assert_eq!(result.enum_values, vec!["Active = 1", "Inactive = 0x2", "Pending"]);
        assert!(result.members.is_empty());
    }

    #[test]
    fn test_single_line_and_string_enums() {
        let result = scan(" Red, Green = 2 ", "Color", TypeKind::Enum, SourceSyntax::Attributed);
        assert_eq!(result.enum_values, vec!["Red", "Green = 2"]);

        let result = scan("\n  Active = 'active',\n  Gone = -1,\n", "State", TypeKind::Enum, SourceSyntax::Decorated);
        assert_eq!(result.enum_values, vec!["Active", "Gone = -1"]);
    }

    #[test]
    fn test_csharp_class_members() {
        let body = r#"
    private readonly IOrderService _service;
    public const int MaxItems = 50;

    public OrdersController(IOrderService service)
    {
        _service = service;
    }

    public string Name { get; set; }
    public int Count => _items.Count;
    public int Total;

    [HttpGet("{id}")]
    public async Task<ActionResult<OrderDto>> Get(Guid id)
    {
        if (id == Guid.Empty) { return NotFound(); }
        public int NotAMember = 1;
        return Ok();
    }

    private void _Ready() { }
    private void _helper() { }
"#;
        let result = scan(body, "OrdersController", TypeKind::Class, SourceSyntax::Attributed);
        assert_eq!(names(&result), vec!["MaxItems", "Name", "Count", "Total", "Get", "_Ready"]);

        let kinds: Vec<_> = result.members.iter().map(|m| m.kind).collect();
        assert_eq!(
            kinds,
            vec![
                MemberKind::Readonly,
                MemberKind::Property,
                MemberKind::Property,
                MemberKind::Field,
                MemberKind::Method,
                MemberKind::Method,
            ]
        );

        let get = &result.members[4];
        assert_eq!(get.declared_type, "Task<ActionResult<OrderDto>>");
        assert_eq!(get.signature, "public async Task<ActionResult<OrderDto>> Get(Guid id)");
        assert_eq!(get.annotations.len(), 1);
        assert_eq!(get.annotations[0].name, "HttpGet");
    }

    #[test]
    fn test_modifiers_read_before_member_name() {
        let body = "\n    private const double vat = 0.2;\n    public const int c = 1;\n    public int ate;\n";
        let result = scan(body, "Pricing", TypeKind::Class, SourceSyntax::Attributed);
        let kinds: Vec<_> = result.members.iter().map(|m| (m.name.as_str(), m.kind)).collect();
        assert_eq!(
            kinds,
            vec![
                ("vat", MemberKind::Readonly),
                ("c", MemberKind::Readonly),
                ("ate", MemberKind::Field),
            ]
        );

        let result = scan("\n  private readonly vat = 0.2;\n", "Pricing", TypeKind::Class, SourceSyntax::Decorated);
        assert_eq!(result.members[0].kind, MemberKind::Readonly);
    }

    #[test]
    fn test_braces_in_string_literals_keep_depth() {
        let body = "\n    public string Open = \"{\";\n    public string Close = \"}\";\n    public int Count;\n";
        let result = scan(body, "Tokens", TypeKind::Class, SourceSyntax::Attributed);
        assert_eq!(names(&result), vec!["Open", "Close", "Count"]);
    }

    #[test]
    fn test_multiline_signature_is_joined() {
        let body = "\n    [HttpPost]\n    public IActionResult Create(\n        [FromBody] CreateOrder request,\n        CancellationToken ct)\n    {\n        return Ok();\n    }\n    public int After { get; set; }\n";
        let result = scan(body, "OrdersController", TypeKind::Class, SourceSyntax::Attributed);
        assert_eq!(names(&result), vec!["Create", "After"]);
        assert_eq!(
            result.members[0].signature,
            "public IActionResult Create( [FromBody] CreateOrder request, CancellationToken ct)"
        );
    }

    #[test]
    fn test_unclosed_signature_is_skipped() {
        let body = "\n    public void Broken(int a,\n";
        let result = scan(body, "X", TypeKind::Class, SourceSyntax::Attributed);
        assert!(result.members.is_empty());
    }

    #[test]
    fn test_inline_annotation_on_member_line() {
        let body = "\n    [Required] public string Email { get; set; }\n";
        let result = scan(body, "Dto", TypeKind::Class, SourceSyntax::Attributed);
        assert_eq!(names(&result), vec!["Email"]);
        assert_eq!(result.members[0].annotations[0].name, "Required");
    }

    #[test]
    fn test_interface_members_are_exempt_from_filters() {
        let body = "\n    Task<User> FindAsync(int id);\n    string _Legacy { get; }\n    void IRepo();\n";
        let result = scan(body, "IRepo", TypeKind::Interface, SourceSyntax::Attributed);
        assert_eq!(names(&result), vec!["FindAsync", "_Legacy", "IRepo"]);
        assert_eq!(result.members[0].signature, "Task<User> FindAsync(int id);");
        assert_eq!(result.members[1].kind, MemberKind::Property);
    }

    #[test]
    fn test_nested_type_is_not_a_member() {
        let body = "\n    public enum Mode { A, B }\n    public Mode Current { get; set; }\n";
        let result = scan(body, "Holder", TypeKind::Class, SourceSyntax::Attributed);
        assert_eq!(names(&result), vec!["Current"]);
    }

    #[test]
    fn test_typescript_class_members() {
        let body = r#"
  private readonly logger = new Logger();
  name: string;
  optional?: number;

  constructor(private readonly service: CatsService) {}

  @Get(':id')
  async findOne(@Param('id') id: string): Promise<Cat> {
    const x = 1;
    return this.service.find(id);
  }

  get total(): number {
    return 1;
  }
"#;
        let result = scan(body, "CatsController", TypeKind::Class, SourceSyntax::Decorated);
        assert_eq!(names(&result), vec!["logger", "name", "optional", "constructor", "findOne", "total"]);
        assert_eq!(result.members[0].kind, MemberKind::Readonly);
        assert_eq!(result.members[0].declared_type, UNKNOWN_TYPE);
        assert_eq!(result.members[1].kind, MemberKind::Property);
        assert_eq!(result.members[1].declared_type, "string");
        assert_eq!(result.members[3].kind, MemberKind::Constructor);
        assert_eq!(result.members[4].declared_type, "Promise<Cat>");
        assert_eq!(result.members[4].annotations[0].name, "Get");
    }

    #[test]
    fn test_typescript_interface_members() {
        let body = "\n  id: number;\n  readonly tags: string[];\n  find(id: number): Promise<User>;\n  nested: {\n    deep: string;\n  };\n";
        let result = scan(body, "User", TypeKind::Interface, SourceSyntax::Decorated);
        assert_eq!(names(&result), vec!["id", "tags", "find", "nested"]);
        assert_eq!(result.members[1].kind, MemberKind::Readonly);
        assert_eq!(result.members[2].signature, "find(id: number): Promise<User>;");
    }
}
