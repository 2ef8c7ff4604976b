use tracing::debug;

use crate::config::CategoryRule;
use crate::types::{ClassificationConflict, ClassificationFailure};

impl CategoryRule {
    /// True when a file survives every filter of this rule.
    ///
    /// Filters run in order: extension, include paths, excluded paths,
    /// include name patterns, excluded name patterns. An empty include list
    /// lets every file through; a match on an exclusion list always rejects.
    pub fn matches(&self, relative_path: &str, extension: &str) -> bool {
        if !self.extensions.is_empty()
            && !self
                .extensions
                .iter()
                .any(|e| normalize_extension(e).eq_ignore_ascii_case(extension))
        {
            return false;
        }

        if !self.paths.is_empty()
            && !self
                .paths
                .iter()
                .any(|p| path_matches_pattern(relative_path, p))
        {
            return false;
        }

        if self
            .excluded_paths
            .iter()
            .any(|p| path_matches_pattern(relative_path, p))
        {
            return false;
        }

        let path = relative_path.to_lowercase();
        let contains = |pattern: &String| path.contains(&pattern.to_lowercase());

        if !self.patterns.is_empty() && !self.patterns.iter().any(contains) {
            return false;
        }

        !self.excluded_patterns.iter().any(contains)
    }
}

/// `*.cs`, `.cs` and `cs` all become `.cs`
fn normalize_extension(extension: &str) -> String {
    format!(".{}", extension.trim().trim_start_matches(['*', '.']))
}

/// Glob-like path test.
///
/// `*`, `*/*` and `**` match everything. `*/Dir` and `**/Dir` match a path
/// containing `/Dir` or ending in `Dir`. Any other pattern matches by
/// containment after a trailing `*` is dropped. Comparison ignores case and
/// separator style.
pub fn path_matches_pattern(path: &str, pattern: &str) -> bool {
    let path = path.replace('\\', "/").to_lowercase();
    let pattern = pattern.replace('\\', "/").to_lowercase();

    if matches!(pattern.as_str(), "*" | "*/*" | "**") {
        return true;
    }

    if let Some(suffix) = pattern
        .strip_prefix("**/")
        .or_else(|| pattern.strip_prefix("*/"))
    {
        let suffix = suffix.trim_end_matches('*');
        return path.contains(&format!("/{}", suffix)) || path.ends_with(suffix);
    }

    path.contains(pattern.trim_end_matches('*'))
}

/// A file with its assigned category, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedFile {
    pub relative_path: String,
    pub category: Option<String>,
}

/// Assigns each file to at most one configured category.
pub struct CategoryMatcher<'a> {
    rules: &'a [CategoryRule],
}

impl<'a> CategoryMatcher<'a> {
    pub fn new(rules: &'a [CategoryRule]) -> Self {
        Self { rules }
    }

    /// Names of every rule matching the file, in rule order
    pub fn matching_categories(&self, relative_path: &str, extension: &str) -> Vec<String> {
        self.rules
            .iter()
            .filter(|rule| rule.matches(relative_path, extension))
            .map(|rule| rule.name.clone())
            .collect()
    }

    /// Category of one file.
    ///
    /// `Ok(None)` when no rule matches. More than one match is a conflict
    /// naming the file and every matching category.
    pub fn classify(
        &self,
        relative_path: &str,
        extension: &str,
    ) -> Result<Option<String>, ClassificationConflict> {
        let mut matched = self.matching_categories(relative_path, extension);
        match matched.len() {
            0 => Ok(None),
            1 => Ok(matched.pop()),
            _ => Err(ClassificationConflict::new(relative_path, matched)),
        }
    }

    /// Classify every file before deciding the outcome, so that a failure
    /// lists all conflicting files rather than the first one.
    pub fn classify_all<'f, I>(&self, files: I) -> Result<Vec<ClassifiedFile>, ClassificationFailure>
    where
        I: IntoIterator<Item = (&'f str, &'f str)>,
    {
        let mut classified = Vec::new();
        let mut conflicts = Vec::new();

        for (relative_path, extension) in files {
            match self.classify(relative_path, extension) {
                Ok(category) => {
                    debug!(path = relative_path, category = ?category, "Classified file");
                    classified.push(ClassifiedFile {
                        relative_path: relative_path.to_string(),
                        category,
                    });
                }
                Err(conflict) => conflicts.push(conflict),
            }
        }

        if conflicts.is_empty() {
            Ok(classified)
        } else {
            Err(ClassificationFailure { conflicts })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rule(name: &str) -> CategoryRule {
        CategoryRule {
            name: name.to_string(),
            extensions: vec!["*.cs".to_string()],
            ..CategoryRule::default()
        }
    }

    #[test]
    fn test_path_patterns() {
        assert!(path_matches_pattern("Api/Controllers/Users.cs", "*"));
        assert!(path_matches_pattern("Api/Controllers/Users.cs", "**"));
        assert!(path_matches_pattern("Api/Controllers/Users.cs", "*/Controllers"));
        assert!(path_matches_pattern("Api\\Controllers\\Users.cs", "**/controllers"));
        assert!(path_matches_pattern("Controllers", "*/Controllers"));
        assert!(path_matches_pattern("Api/Models/Order.cs", "Models/*"));
        assert!(path_matches_pattern("Api/Models/Order.cs", "api/models"));
        assert!(!path_matches_pattern("Api/ViewModels/Order.cs", "*/Models"));
        assert!(!path_matches_pattern("Api/Services/Order.cs", "Models"));
    }

    #[test]
    fn test_extension_filter() {
        let r = rule("models");
        assert!(r.matches("Models/Order.cs", ".cs"));
        assert!(r.matches("Models/Order.CS", ".CS"));
        assert!(!r.matches("Models/order.ts", ".ts"));

        let bare = CategoryRule {
            extensions: vec!["ts".to_string()],
            ..rule("web")
        };
        assert!(bare.matches("web/app.ts", ".ts"));
    }

    #[test]
    fn test_exclusions_override_inclusions() {
        let r = CategoryRule {
            paths: vec!["Services/".to_string()],
            excluded_paths: vec!["Services/Legacy".to_string()],
            patterns: vec!["Order".to_string()],
            excluded_patterns: vec!["Test".to_string()],
            ..rule("services")
        };
        assert!(r.matches("Services/OrderService.cs", ".cs"));
        assert!(!r.matches("Services/Legacy/OldService.cs", ".cs"));
        assert!(!r.matches("Services/OrderServiceTests.cs", ".cs"));
        assert!(!r.matches("Services/Helpers.cs", ".cs"));
        assert!(!r.matches("Domain/OrderService.cs", ".cs"));
    }

    #[test]
    fn test_unmatched_file_is_unclassified() {
        let rules = vec![CategoryRule {
            paths: vec!["Models".to_string()],
            ..rule("models")
        }];
        let matcher = CategoryMatcher::new(&rules);
        assert_eq!(matcher.classify("Api/Program.cs", ".cs"), Ok(None));
        assert_eq!(
            matcher.classify("Models/Order.cs", ".cs"),
            Ok(Some("models".to_string()))
        );
    }

    #[test]
    fn test_overlapping_rules_conflict() {
        let rules = vec![
            CategoryRule {
                paths: vec!["services/".to_string()],
                ..rule("A")
            },
            CategoryRule {
                patterns: vec!["Service".to_string()],
                ..rule("B")
            },
        ];
        let matcher = CategoryMatcher::new(&rules);
        let conflict = matcher
            .classify("services/OrderService.cs", ".cs")
            .unwrap_err();
        assert_eq!(conflict.path, "services/OrderService.cs");
        assert_eq!(conflict.categories, vec!["A", "B"]);
    }

    #[test]
    fn test_classify_all_reports_every_conflict() {
        let rules = vec![
            CategoryRule {
                paths: vec!["services/".to_string()],
                ..rule("A")
            },
            CategoryRule {
                patterns: vec!["Service.cs".to_string()],
                ..rule("B")
            },
        ];
        let matcher = CategoryMatcher::new(&rules);
        let files = [
            ("services/OrderService.cs", ".cs"),
            ("Domain/Order.cs", ".cs"),
            ("services/UserService.cs", ".cs"),
        ];
        let failure = matcher.classify_all(files).unwrap_err();
        let paths: Vec<_> = failure.conflicts.iter().map(|c| c.path.as_str()).collect();
        assert_eq!(paths, vec!["services/OrderService.cs", "services/UserService.cs"]);

        let ok = matcher
            .classify_all([("Domain/Order.cs", ".cs"), ("services/Helpers.cs", ".cs")])
            .unwrap();
        assert_eq!(ok[0].category, None);
        assert_eq!(ok[1].category.as_deref(), Some("A"));
    }

    fn arb_rule() -> impl Strategy<Value = CategoryRule> {
        let dirs = prop::sample::select(vec!["Models", "Services", "Api", "*/Models", "**"]);
        let names = prop::sample::select(vec!["Order", "Service", "Dto", "Controller"]);
        (
            prop::collection::vec(dirs, 0..2),
            prop::collection::vec(names.clone(), 0..2),
            prop::collection::vec(names, 0..2),
        )
            .prop_map(|(paths, patterns, excluded_patterns)| CategoryRule {
                name: String::new(),
                paths: paths.into_iter().map(String::from).collect(),
                patterns: patterns.into_iter().map(String::from).collect(),
                excluded_patterns: excluded_patterns.into_iter().map(String::from).collect(),
                extensions: vec![".cs".to_string()],
                ..CategoryRule::default()
            })
    }

    proptest! {
        #[test]
        fn prop_classification_is_single_or_conflict(
            rules in prop::collection::vec(arb_rule(), 1..5),
            dir in prop::sample::select(vec!["Models", "Services", "Api/Models", "Web"]),
            file in prop::sample::select(vec!["Order", "OrderService", "OrderDto", "UsersController"]),
        ) {
            let rules: Vec<CategoryRule> = rules
                .into_iter()
                .enumerate()
                .map(|(i, r)| CategoryRule { name: format!("c{}", i), ..r })
                .collect();
            let path = format!("{}/{}.cs", dir, file);
            let matcher = CategoryMatcher::new(&rules);
            let matched = matcher.matching_categories(&path, ".cs");

            match matcher.classify(&path, ".cs") {
                Ok(None) => prop_assert!(matched.is_empty()),
                Ok(Some(category)) => prop_assert_eq!(matched, vec![category]),
                Err(conflict) => {
                    prop_assert!(conflict.categories.len() >= 2);
                    prop_assert_eq!(conflict.categories, matched);
                }
            }
        }
    }
}
