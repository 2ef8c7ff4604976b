use super::heuristic::HeuristicScanner;
use super::{Language, Parser, SourceSyntax};
use crate::types::{FileMetadata, Result};

/// C# classes, records, structs, interfaces and enums with ASP.NET routing.
pub struct CSharpParser {
    scanner: HeuristicScanner,
}

impl CSharpParser {
    pub fn new() -> Self {
        Self {
            scanner: HeuristicScanner::new(SourceSyntax::Attributed),
        }
    }
}

impl Default for CSharpParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for CSharpParser {
    fn parse(&self, path: &str, content: &str) -> Result<FileMetadata> {
        Ok(FileMetadata::new(path, Language::CSharp, self.scanner.scan(content)))
    }

    fn language(&self) -> Language {
        Language::CSharp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MemberKind, TypeKind};

    #[test]
    fn test_parse_file_metadata() {
        let source = r#"
namespace Shop.Domain;

/// <summary>Order aggregate.</summary>
public sealed class Order : Entity, IAggregateRoot
{
    public Guid Id { get; private set; }
    public IReadOnlyList<OrderLine> Lines => _lines;
    private readonly List<OrderLine> _lines = new();

    public void AddLine(Product product, int quantity)
    {
        _lines.Add(new OrderLine(product, quantity));
    }
}

public interface IOrderRepository
{
    Task<Order?> GetAsync(Guid id, CancellationToken ct = default);
    void Add(Order order);
}
"#;
        let metadata = CSharpParser::new().parse("Domain/Order.cs", source).unwrap();
        assert_eq!(metadata.extension, ".cs");
        assert_eq!(metadata.language, Language::CSharp);
        assert_eq!(metadata.types.len(), 2);

        let order = &metadata.types[0];
        assert_eq!(order.kind, TypeKind::Class);
        assert_eq!(order.base_types, vec!["Entity", "IAggregateRoot"]);
        let members: Vec<_> = order
            .members
            .iter()
            .map(|m| (m.name.as_str(), m.kind, m.declared_type.as_str()))
            .collect();
        assert_eq!(
            members,
            vec![
                ("Id", MemberKind::Property, "Guid"),
                ("Lines", MemberKind::Property, "IReadOnlyList<OrderLine>"),
                ("AddLine", MemberKind::Method, "void"),
            ]
        );
        assert!(metadata.endpoints().next().is_none());

        let repo = &metadata.types[1];
        assert_eq!(repo.kind, TypeKind::Interface);
        assert_eq!(repo.members[0].signature, "Task<Order?> GetAsync(Guid id, CancellationToken ct = default);");
        assert_eq!(repo.members[0].declared_type, "Task<Order?>");
    }

    #[test]
    fn test_empty_file_has_no_types() {
        let metadata = CSharpParser::new().parse("Empty.cs", "").unwrap();
        assert!(metadata.is_empty());
    }
}
