use std::collections::BTreeMap;

/// Directory tree assembled from relative file paths.
///
/// Directories are listed before files at every level, each group sorted by
/// name.
#[derive(Debug, Default)]
pub struct DirectoryTree {
    root: String,
    node: TreeNode,
}

#[derive(Debug, Default)]
struct TreeNode {
    directories: BTreeMap<String, TreeNode>,
    files: Vec<String>,
}

impl DirectoryTree {
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            node: TreeNode::default(),
        }
    }

    /// Build from `/`-separated relative paths, dropping files whose
    /// extension is in `excluded_extensions` (case-insensitive).
    pub fn from_paths<I, S>(root: impl Into<String>, paths: I, excluded_extensions: &[String]) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tree = Self::new(root);
        for path in paths {
            let path = path.as_ref();
            if has_excluded_extension(path, excluded_extensions) {
                continue;
            }
            tree.insert(path);
        }
        tree
    }

    pub fn insert(&mut self, relative_path: &str) {
        let normalized = relative_path.replace('\\', "/");
        let mut parts: Vec<&str> = normalized.split('/').filter(|p| !p.is_empty()).collect();
        let Some(file) = parts.pop() else {
            return;
        };

        let mut node = &mut self.node;
        for dir in parts {
            node = node.directories.entry(dir.to_string()).or_default();
        }
        if !node.files.iter().any(|f| f == file) {
            node.files.push(file.to_string());
            node.files.sort();
        }
    }

    pub fn is_empty(&self) -> bool {
        self.node.directories.is_empty() && self.node.files.is_empty()
    }

    /// Render with box-drawing connectors, root name on the first line
    pub fn render(&self) -> String {
        let mut lines = vec![format!("{}/", self.root)];
        render_node(&self.node, "", &mut lines);
        lines.join("\n")
    }
}

fn render_node(node: &TreeNode, indent: &str, lines: &mut Vec<String>) {
    let total = node.directories.len() + node.files.len();
    let mut index = 0;

    for (name, child) in &node.directories {
        index += 1;
        let last = index == total;
        lines.push(format!("{}{}{}/", indent, connector(last), name));
        let next = format!("{}{}", indent, if last { "    " } else { "│   " });
        render_node(child, &next, lines);
    }

    for name in &node.files {
        index += 1;
        lines.push(format!("{}{}{}", indent, connector(index == total), name));
    }
}

fn connector(last: bool) -> &'static str {
    if last { "└── " } else { "├── " }
}

fn has_excluded_extension(path: &str, excluded: &[String]) -> bool {
    let extension = crate::types::extension_of(path);
    !extension.is_empty()
        && excluded.iter().any(|e| {
            let e = e.trim().trim_start_matches('*');
            let e = if e.starts_with('.') {
                e.to_string()
            } else {
                format!(".{}", e)
            };
            e.eq_ignore_ascii_case(&extension)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_tree() {
        let tree = DirectoryTree::from_paths(
            "shop",
            ["src/Api/UsersController.cs", "README.md", "src/Program.cs", "src/Api/Users.dll"],
            &[".dll".to_string()],
        );
        assert_eq!(
            tree.render(),
            "shop/\n\
             ├── src/\n\
             │   ├── Api/\n\
             │   │   └── UsersController.cs\n\
             │   └── Program.cs\n\
             └── README.md"
        );
    }

    #[test]
    fn test_empty_tree() {
        let tree = DirectoryTree::from_paths("empty", Vec::<String>::new(), &[]);
        assert!(tree.is_empty());
        assert_eq!(tree.render(), "empty/");
    }

    #[test]
    fn test_excluded_extension_forms() {
        let excluded = vec!["png".to_string(), "*.PDB".to_string()];
        assert!(has_excluded_extension("assets/logo.png", &excluded));
        assert!(has_excluded_extension("bin/App.pdb", &excluded));
        assert!(!has_excluded_extension("Makefile", &excluded));
    }
}
