//! Brace-language scanner.
//!
//! Chains the declaration locator, body extractor, member scanner and endpoint
//! extractor for languages whose types are delimited by braces.

use tracing::{debug, trace};

use crate::types::TypeRecord;

use super::body::{extract_body, opening_brace};
use super::declaration::locate_declarations;
use super::endpoint::extract_endpoint;
use super::language::SourceSyntax;
use super::member::MemberScanner;

pub struct HeuristicScanner {
    syntax: SourceSyntax,
}

impl HeuristicScanner {
    pub fn new(syntax: SourceSyntax) -> Self {
        Self { syntax }
    }

    pub fn syntax(&self) -> SourceSyntax {
        self.syntax
    }

    /// Type records of `source` in declaration order.
    ///
    /// Declarations that start inside an already accepted body are nested
    /// types and are not reported separately. Declarations without a balanced
    /// body produce nothing; an opened but unterminated body runs to the end
    /// of the file, so nothing after it is reported either.
    pub fn scan(&self, source: &str) -> Vec<TypeRecord> {
        let mut types = Vec::new();
        let mut covered_until = 0usize;

        for declaration in locate_declarations(source, self.syntax) {
            if declaration.start < covered_until {
                trace!(name = %declaration.name, "Nested declaration skipped");
                continue;
            }

            let Some(body) = extract_body(source, declaration.header_end) else {
                if opening_brace(source, declaration.header_end).is_some() {
                    covered_until = source.len();
                }
                debug!(name = %declaration.name, "Declaration without a balanced body skipped");
                continue;
            };
            covered_until = body.close;

            let scan = MemberScanner::new(&declaration.name, declaration.kind, self.syntax)
                .scan(body.text);

            let endpoints = scan
                .members
                .iter()
                .filter_map(|m| {
                    extract_endpoint(m, &declaration.name, &declaration.route_prefix, self.syntax)
                })
                .collect();

            types.push(TypeRecord {
                name: declaration.name,
                kind: declaration.kind,
                base_types: declaration.base_types,
                implemented_interfaces: declaration.implemented_interfaces,
                members: scan.members,
                enum_values: scan.enum_values,
                endpoints,
            });
        }

        types
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{HttpMethod, TypeKind};

    const USERS_CONTROLLER: &str = r#"
using Microsoft.AspNetCore.Mvc;

namespace Demo.Api
{
    [ApiController]
    [Route("api/users")]
    public class UsersController : ControllerBase
    {
        private readonly IUserService _users;

        public UsersController(IUserService users)
        {
            _users = users;
        }

        [HttpGet("{id}")]
        public async Task<ActionResult<UserDto>> GetById(Guid id)
        {
            var user = await _users.Find(id);
            return user is null ? NotFound() : Ok(user);
        }

        [HttpGet]
        public IActionResult List() => Ok(_users.All());

        [HttpPut("{id}")]
        public IActionResult Update(Guid id, [FromBody] UpdateRequest request)
        {
            return NoContent();
        }

        private class Cache
        {
            public int Size { get; set; }
        }
    }

    public enum Role
    {
        Admin = 1,
        Member = 2
    }
}
"#;

    #[test]
    fn test_controller_end_to_end() {
        let types = HeuristicScanner::new(SourceSyntax::Attributed).scan(USERS_CONTROLLER);
        let names: Vec<_> = types.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["UsersController", "Role"]);

        let controller = &types[0];
        assert_eq!(controller.base_types, vec!["ControllerBase"]);
        let members: Vec<_> = controller.members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(members, vec!["GetById", "List", "Update"]);

        let routes: Vec<_> = controller
            .endpoints
            .iter()
            .map(|e| (e.http_method, e.route.as_str()))
            .collect();
        assert_eq!(
            routes,
            vec![
                (HttpMethod::Get, "api/users/{id}"),
                (HttpMethod::Get, "api/users/"),
                (HttpMethod::Put, "api/users/{id}"),
            ]
        );
        assert_eq!(controller.endpoints[0].dto_type_names, vec!["UserDto"]);
        assert_eq!(controller.endpoints[2].dto_type_names, vec!["UpdateRequest"]);

        let role = &types[1];
        assert_eq!(role.kind, TypeKind::Enum);
        assert_eq!(role.enum_values, vec!["Admin = 1", "Member = 2"]);
        assert!(role.members.is_empty());
    }

    #[test]
    fn test_truncated_source_yields_nothing() {
        let truncated = "public class Broken\n{\n    public int A { get; set; }\n    public void F() {\n";
        assert!(HeuristicScanner::new(SourceSyntax::Attributed).scan(truncated).is_empty());
    }

    #[test]
    fn test_types_inside_unterminated_body_are_not_promoted() {
        let truncated = "public class Outer\n{\n    public class Inner\n    {\n        public int A { get; set; }\n    }\n    public void F() {\n";
        assert!(HeuristicScanner::new(SourceSyntax::Attributed).scan(truncated).is_empty());
    }

    #[test]
    fn test_bodiless_record_is_skipped() {
        let source = "public record Point(int X, int Y);\npublic class Shape { public int Sides { get; set; } }";
        let types = HeuristicScanner::new(SourceSyntax::Attributed).scan(source);
        assert_eq!(types.len(), 1);
        assert_eq!(types[0].name, "Shape");
    }

    #[test]
    fn test_scan_is_deterministic() {
        let scanner = HeuristicScanner::new(SourceSyntax::Attributed);
        assert_eq!(scanner.scan(USERS_CONTROLLER), scanner.scan(USERS_CONTROLLER));
    }
}
