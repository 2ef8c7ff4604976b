//! Markdown Rendering
//!
//! Three document kinds:
//! - `ProjectStructure.md`: directory tree plus the configured exclusions
//! - `ApiEndpoints.md`: one table row per endpoint, sorted by route
//! - one document per `generatedFiles` entry, grouped by category then file

use std::collections::BTreeMap;

use crate::config::{CategoryRule, CodeBlockStyle, GeneratedFileConfig, MarkdownConfig, ProjectStructureConfig};
use crate::types::{EndpointRecord, FileMetadata, TypeRecord};

use super::tree::DirectoryTree;

/// Marker used to pick the request DTO out of an endpoint's DTO list
const REQUEST_MARKER: &str = "Request";

pub struct MarkdownGenerator {
    header_level: usize,
    code_block: CodeBlockStyle,
}

impl MarkdownGenerator {
    pub fn new(config: &MarkdownConfig) -> Self {
        Self {
            header_level: usize::from(config.header_level.clamp(1, 6)),
            code_block: config.code_block(),
        }
    }

    fn heading(&self, depth: usize, title: &str) -> String {
        let level = (self.header_level + depth).min(6);
        format!("{} {}\n\n", "#".repeat(level), title)
    }

    fn code_block(&self, body: &str) -> String {
        match self.code_block {
            CodeBlockStyle::Fenced => format!("```\n{}\n```\n\n", body),
            CodeBlockStyle::Indented => {
                let mut out = String::new();
                for line in body.lines() {
                    out.push_str("    ");
                    out.push_str(line);
                    out.push('\n');
                }
                out.push('\n');
                out
            }
        }
    }

    // =========================================================================
    // Project Structure
    // =========================================================================

    pub fn project_structure(
        &self,
        tree: &DirectoryTree,
        config: &ProjectStructureConfig,
    ) -> String {
        let mut output = self.heading(0, "Project Structure");

        if let Some(description) = config.description.as_deref().filter(|d| !d.is_empty()) {
            output.push_str(description);
            output.push_str("\n\n");
        }

        output.push_str(&self.heading(1, "Directory Structure"));
        output.push_str(&self.code_block(&tree.render()));

        if !config.excluded_paths.is_empty() {
            output.push_str(&self.heading(1, "Excluded Paths"));
            output.push_str(
                "The following paths are **excluded** from the project structure analysis:\n\n",
            );
            for path in &config.excluded_paths {
                output.push_str(&format!("- `{}`\n", path));
            }
            output.push('\n');
        }

        if !config.excluded_extensions.is_empty() {
            output.push_str(&self.heading(1, "Excluded Extensions"));
            output.push_str("The following file extensions are **excluded** from the analysis:\n\n");
            for ext in &config.excluded_extensions {
                output.push_str(&format!("- `{}`\n", ext));
            }
            output.push('\n');
        }

        output
    }

    // =========================================================================
    // API Endpoints
    // =========================================================================

    /// Endpoint table over files passing `filter`.
    ///
    /// A filter with neither paths nor extensions selects every file.
    pub fn api_endpoints(&self, files: &[FileMetadata], filter: &CategoryRule) -> String {
        let unfiltered = filter.paths.is_empty() && filter.extensions.is_empty();
        let mut endpoints: Vec<&EndpointRecord> = files
            .iter()
            .filter(|f| unfiltered || filter.matches(&f.relative_path, &f.extension))
            .flat_map(|f| f.endpoints())
            .collect();
        endpoints.sort_by(|a, b| a.route.cmp(&b.route));

        let mut output = self.heading(0, "API Endpoints");
        output.push_str("| Route | HTTP Method | Controller | Handler | Request DTO | Response DTO |\n");
        output.push_str("|-------|-------------|------------|---------|-------------|--------------|\n");

        if endpoints.is_empty() {
            output.push_str("| _No endpoints found_ | | | | | |\n");
        }
        for endpoint in endpoints {
            let (request, response) = split_dtos(&endpoint.dto_type_names);
            output.push_str(&format!(
                "| `{}` | {} | {} | {} | {} | {} |\n",
                endpoint.route,
                endpoint.http_method,
                endpoint.container_name,
                endpoint.handler_name,
                request,
                response
            ));
        }

        output.push('\n');
        output
    }

    // =========================================================================
    // Category Documents
    // =========================================================================

    /// Document for one generated file.
    ///
    /// `files` pairs each scanned file with its category; files outside the
    /// document's categories are ignored.
    pub fn category_document(
        &self,
        document: &GeneratedFileConfig,
        files: &[(&FileMetadata, &str)],
        categories: &[CategoryRule],
    ) -> String {
        let title = document.name.strip_suffix(".md").unwrap_or(&document.name);
        let mut output = self.heading(0, title);
        if let Some(description) = document.description.as_deref().filter(|d| !d.is_empty()) {
            output.push_str(description);
            output.push_str("\n\n");
        }

        let mut by_category: BTreeMap<&str, Vec<&FileMetadata>> = BTreeMap::new();
        for (file, category) in files {
            if document.included_categories.iter().any(|c| c == category) {
                by_category.entry(*category).or_default().push(*file);
            }
        }

        for (category, mut category_files) in by_category {
            output.push_str(&self.heading(1, category));
            if let Some(description) = categories
                .iter()
                .find(|c| c.name == category)
                .and_then(|c| c.description.as_deref())
                .filter(|d| !d.is_empty())
            {
                output.push_str(&format!("_{}_\n\n", description));
            }

            category_files.sort_by(|a, b| {
                a.file_name()
                    .cmp(b.file_name())
                    .then_with(|| a.relative_path.cmp(&b.relative_path))
            });
            for file in category_files.into_iter().filter(|f| !f.is_empty()) {
                output.push_str(&format!("**File:** `{}`\n\n", file.file_name()));
                for record in &file.types {
                    output.push_str(&render_type(record));
                    output.push('\n');
                }
            }
        }

        output
    }
}

fn render_type(record: &TypeRecord) -> String {
    let mut output = format!("- **{}** ({})\n", record.name, record.kind);

    if !record.base_types.is_empty() {
        output.push_str(&format!("  - Base Types: {}\n", code_list(&record.base_types)));
    }
    if !record.implemented_interfaces.is_empty() {
        output.push_str(&format!(
            "  - Implements: {}\n",
            code_list(&record.implemented_interfaces)
        ));
    }
    if !record.enum_values.is_empty() {
        output.push_str(&format!("  - Values: {}\n", code_list(&record.enum_values)));
    }

    if !record.members.is_empty() {
        output.push_str("  - Members:\n");
        let mut members: Vec<_> = record.members.iter().collect();
        members.sort_by(|a, b| a.name.cmp(&b.name));
        for member in members {
            if member.signature.is_empty() {
                output.push_str(&format!(
                    "    - `{}` {} : {}\n",
                    member.kind, member.name, member.declared_type
                ));
            } else {
                output.push_str(&format!("    - `{}`\n", member.signature));
            }
        }
    }

    output
}

fn code_list(items: &[String]) -> String {
    items
        .iter()
        .map(|i| format!("`{}`", i))
        .collect::<Vec<_>>()
        .join(", ")
}

/// First DTO naming a request, and first DTO that does not
fn split_dtos(dtos: &[String]) -> (&str, &str) {
    let request = dtos.iter().find(|d| d.contains(REQUEST_MARKER));
    let response = dtos.iter().find(|d| !d.contains(REQUEST_MARKER));
    (
        request.map_or("", String::as_str),
        response.map_or("", String::as_str),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::parser::{Language, create_parser};

    const CONTROLLER: &str = r#"
[ApiController]
[Route("api/orders")]
public class OrdersController : ControllerBase
{
    [HttpPost]
    public ActionResult<OrderDto> Create([FromBody] CreateOrderRequest request)
    {
        return Ok();
    }

    [HttpGet("{id}")]
    public OrderDto Get(Guid id) { return null; }
}
"#;

    fn generator(level: u8, style: &str) -> MarkdownGenerator {
        MarkdownGenerator::new(&MarkdownConfig {
            header_level: level,
            code_block_style: style.to_string(),
        })
    }

    fn controller() -> FileMetadata {
        create_parser(Language::CSharp)
            .unwrap()
            .parse("Api/Controllers/OrdersController.cs", CONTROLLER)
            .unwrap()
    }

    #[test]
    fn test_project_structure_sections() {
        let tree = DirectoryTree::from_paths("shop", ["src/Program.cs"], &[]);
        let config = ProjectStructureConfig {
            description: None,
            excluded_paths: vec!["bin".to_string()],
            excluded_extensions: vec![],
        };
        let md = generator(2, "fenced").project_structure(&tree, &config);
        assert!(md.starts_with("## Project Structure\n\n### Directory Structure\n\n```\nshop/\n"));
        assert!(md.contains("### Excluded Paths"));
        assert!(md.contains("- `bin`"));
        assert!(!md.contains("Excluded Extensions"));
    }

    #[test]
    fn test_indented_code_block() {
        let tree = DirectoryTree::from_paths("shop", ["a.cs"], &[]);
        let md = generator(1, "indented").project_structure(&tree, &ProjectStructureConfig::default());
        assert!(md.contains("## Directory Structure\n\n    shop/\n    └── a.cs\n"));
        assert!(!md.contains("```"));
    }

    #[test]
    fn test_api_endpoint_table() {
        let files = vec![controller()];
        let md = generator(2, "fenced").api_endpoints(&files, &CategoryRule::default());
        let rows: Vec<&str> = md.lines().filter(|l| l.starts_with("| `")).collect();
        assert_eq!(
            rows,
            vec![
                "| `api/orders/` | POST | OrdersController | Create | CreateOrderRequest | OrderDto |",
                "| `api/orders/{id}` | GET | OrdersController | Get |  |  |",
            ]
        );
    }

    #[test]
    fn test_api_endpoint_filter_excludes_files() {
        let files = vec![controller()];
        let filter = CategoryRule {
            paths: vec!["*/Handlers".to_string()],
            ..CategoryRule::default()
        };
        let md = generator(2, "fenced").api_endpoints(&files, &filter);
        assert!(md.contains("_No endpoints found_"));
    }

    #[test]
    fn test_category_document() {
        let order = create_parser(Language::CSharp)
            .unwrap()
            .parse(
                "Domain/Order.cs",
                "public class Order : Entity\n{\n    public int Total { get; set; }\n    public Guid Id { get; set; }\n}\n\npublic enum Status\n{\n    Open,\n    Closed = 2\n}\n",
            )
            .unwrap();
        let controller = controller();
        let document = GeneratedFileConfig {
            name: "Domain.md".to_string(),
            description: Some("Core model".to_string()),
            included_categories: vec!["models".to_string()],
        };
        let files = vec![(&order, "models"), (&controller, "controllers")];
        let md = generator(2, "fenced").category_document(&document, &files, &[]);

        assert!(md.starts_with("## Domain\n\nCore model\n\n### models\n\n**File:** `Order.cs`\n\n"));
        assert!(md.contains("- **Order** (class)\n  - Base Types: `Entity`\n  - Members:\n    - `public Guid Id { get; set; }`\n    - `public int Total { get; set; }`\n"));
        assert!(md.contains("- **Status** (enum)\n  - Values: `Open`, `Closed = 2`\n"));
        assert!(!md.contains("OrdersController"));
    }

    #[test]
    fn test_split_dtos() {
        let dtos = vec!["UserDto".to_string(), "UpdateRequest".to_string()];
        assert_eq!(split_dtos(&dtos), ("UpdateRequest", "UserDto"));
        assert_eq!(split_dtos(&[]), ("", ""));
    }
}
