use std::collections::{BTreeMap, HashMap, HashSet};

use vw_base::ChangeMark;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    File,
    Directory,
}

/// One entry of a built tree. Built fresh on every rebuild and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub name: String,
    pub kind: NodeKind,
    /// Only non-empty for expanded directories
    pub children: Vec<TreeNode>,
    /// `/`-separated path from the watch root; empty for the root itself
    pub relative_path: String,
    pub expanded: bool,
    pub change: Option<ChangeMark>,
}

impl TreeNode {
    pub fn is_dir(&self) -> bool {
        self.kind == NodeKind::Directory
    }

    /// Number of rendered lines below this node (the node's own line excluded).
    pub fn descendant_lines(&self) -> usize {
        self.children.iter().map(|c| 1 + c.descendant_lines()).sum()
    }
}

/// Line number → path, split by kind.
///
/// Lines are zero-based and assigned in depth-first pre-order, one per
/// rendered entry. A line is either a file or a directory, never both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PositionIndex {
    file_at: BTreeMap<usize, String>,
    dir_at: BTreeMap<usize, String>,
    file_line: HashMap<String, usize>,
    dir_line: HashMap<String, usize>,
}

impl PositionIndex {
    pub(crate) fn insert(&mut self, line: usize, kind: NodeKind, path: &str) {
        match kind {
            NodeKind::File => {
                self.file_at.insert(line, path.to_string());
                self.file_line.insert(path.to_string(), line);
            }
            NodeKind::Directory => {
                self.dir_at.insert(line, path.to_string());
                self.dir_line.insert(path.to_string(), line);
            }
        }
    }

    pub fn file_at(&self, line: usize) -> Option<&str> {
        self.file_at.get(&line).map(String::as_str)
    }

    pub fn dir_at(&self, line: usize) -> Option<&str> {
        self.dir_at.get(&line).map(String::as_str)
    }

    /// Path at `line`, files first.
    pub fn path_at(&self, line: usize) -> Option<(NodeKind, &str)> {
        self.file_at(line)
            .map(|p| (NodeKind::File, p))
            .or_else(|| self.dir_at(line).map(|p| (NodeKind::Directory, p)))
    }

    pub fn find_file(&self, path: &str) -> Option<usize> {
        self.file_line.get(path).copied()
    }

    pub fn find_dir(&self, path: &str) -> Option<usize> {
        self.dir_line.get(path).copied()
    }

    pub fn files(&self) -> impl Iterator<Item = (usize, &str)> {
        self.file_at.iter().map(|(l, p)| (*l, p.as_str()))
    }

    pub fn dirs(&self) -> impl Iterator<Item = (usize, &str)> {
        self.dir_at.iter().map(|(l, p)| (*l, p.as_str()))
    }

    pub fn len(&self) -> usize {
        self.file_at.len() + self.dir_at.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Directories opened by hand while global nesting is off.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionState {
    open: HashSet<String>,
}

impl ExpansionState {
    pub fn contains(&self, path: &str) -> bool {
        self.open.contains(path)
    }

    /// Returns true if the directory is now open.
    pub fn toggle(&mut self, path: &str) -> bool {
        if self.open.remove(path) {
            false
        } else {
            self.open.insert(path.to_string());
            true
        }
    }

    pub fn expand(&mut self, path: &str) {
        self.open.insert(path.to_string());
    }

    pub fn collapse(&mut self, path: &str) {
        self.open.remove(path);
    }

    pub fn clear(&mut self) {
        self.open.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }
}

/// Visibility flags consumed by the builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewPolicy {
    pub show_hidden: bool,
    pub respect_rules: bool,
    /// Expand every directory
    pub nesting: bool,
}

impl Default for ViewPolicy {
    fn default() -> Self {
        Self { show_hidden: false, respect_rules: true, nesting: false }
    }
}

/// One rendered line, with everything the renderer needs to style it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeLine {
    /// Guides and connector, e.g. `"│   ├── "`
    pub prefix: String,
    pub name: String,
    pub kind: NodeKind,
    pub path: String,
    pub expanded: bool,
    pub change: Option<ChangeMark>,
}

impl TreeLine {
    /// Expansion marker for directories, empty for files
    pub fn marker(&self) -> &'static str {
        match (self.kind, self.expanded) {
            (NodeKind::File, _) => "",
            (NodeKind::Directory, true) => "▼ ",
            (NodeKind::Directory, false) => "▶ ",
        }
    }

    /// Name plus decoration: `dir/`, `file`, `file (+3)`, `file (new)`.
    pub fn label(&self) -> String {
        match self.kind {
            NodeKind::Directory => format!("{}/", self.name),
            NodeKind::File => match self.change {
                Some(mark) => format!("{}{}", self.name, mark.label()),
                None => self.name.clone(),
            },
        }
    }

    pub fn text(&self) -> String {
        format!("{}{}{}", self.prefix, self.marker(), self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_lookups_are_kind_separated() {
        let mut index = PositionIndex::default();
        index.insert(0, NodeKind::File, "a.rs");
        index.insert(1, NodeKind::Directory, "src");
        assert_eq!(index.path_at(0), Some((NodeKind::File, "a.rs")));
        assert_eq!(index.path_at(1), Some((NodeKind::Directory, "src")));
        assert_eq!(index.file_at(1), None);
        assert_eq!(index.find_dir("src"), Some(1));
        assert_eq!(index.find_file("src"), None);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn expansion_toggle() {
        let mut state = ExpansionState::default();
        assert!(state.toggle("src"));
        assert!(state.contains("src"));
        assert!(!state.toggle("src"));
        assert!(state.is_empty());
    }

    #[test]
    fn line_labels() {
        let mut line = TreeLine {
            prefix: "├── ".into(),
            name: "b.go".into(),
            kind: NodeKind::File,
            path: "b.go".into(),
            expanded: false,
            change: Some(ChangeMark::Lines(2)),
        };
        assert_eq!(line.text(), "├── b.go (+2)");
        line.kind = NodeKind::Directory;
        assert_eq!(line.label(), "b.go/");
        assert_eq!(line.text(), "├── ▶ b.go/");
    }
}
