//! Directory walk producing the tree, its rendered lines and the position index.

use std::path::Path;

use tracing::debug;

use vw_base::config::CONFIG;
use vw_base::{ChangeMap, ChangeMark};

use crate::ignore_rules::IgnoreRuleSet;
use crate::source::{DirEntryInfo, DirSource};
use crate::types::{ExpansionState, NodeKind, PositionIndex, TreeLine, TreeNode, ViewPolicy};

/// Everything a build reads. Borrowed; the builder owns nothing between calls.
#[derive(Debug, Clone, Copy)]
pub struct BuildInput<'a> {
    pub root: &'a Path,
    pub changes: &'a ChangeMap,
    pub rules: &'a IgnoreRuleSet,
    pub policy: ViewPolicy,
    pub expanded: &'a ExpansionState,
}

/// Result of one build: node tree, one line per visible entry, and the index
/// mapping those lines back to paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeSnapshot {
    pub root: TreeNode,
    pub index: PositionIndex,
    pub lines: Vec<TreeLine>,
    /// Bumped by the session on every rebuild or redecoration
    pub generation: u64,
}

impl TreeSnapshot {
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Last valid cursor line; 0 for an empty tree.
    pub fn max_line(&self) -> usize {
        self.lines.len().saturating_sub(1)
    }

    /// Plain text, one line per entry.
    pub fn text(&self) -> String {
        self.lines.iter().map(TreeLine::text).collect::<Vec<_>>().join("\n")
    }

    /// Swap change annotations in place without walking the filesystem.
    pub fn redecorate(&mut self, changes: &ChangeMap) {
        for line in &mut self.lines {
            if line.kind == NodeKind::File {
                line.change = ChangeMark::lookup(changes, &line.path);
            }
        }
        redecorate_nodes(&mut self.root.children, changes);
    }
}

fn redecorate_nodes(nodes: &mut [TreeNode], changes: &ChangeMap) {
    for node in nodes {
        match node.kind {
            NodeKind::File => node.change = ChangeMark::lookup(changes, &node.relative_path),
            NodeKind::Directory => redecorate_nodes(&mut node.children, changes),
        }
    }
}

/// Walk `input.root` through `source`.
///
/// Unreadable directories come out empty. Collapsed directories are listed
/// by their parent but never read themselves.
pub fn build<S: DirSource + ?Sized>(source: &S, input: &BuildInput<'_>) -> TreeSnapshot {
    let walked = walk(source, input, input.root, "");

    let mut index = PositionIndex::default();
    for (line, row) in walked.lines.iter().enumerate() {
        index.insert(line, row.kind, &row.path);
    }

    let name = input
        .root
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| input.root.display().to_string());
    let root = TreeNode {
        name,
        kind: NodeKind::Directory,
        children: walked.nodes,
        relative_path: String::new(),
        expanded: true,
        change: None,
    };

    debug!(root = %input.root.display(), lines = walked.lines.len(), "tree built");
    TreeSnapshot { root, index, lines: walked.lines, generation: 0 }
}

/// Children of one directory. `lines.len()` is the number of lines consumed;
/// line numbers are local and the caller offsets them by appending.
#[derive(Default)]
struct Subtree {
    nodes: Vec<TreeNode>,
    lines: Vec<TreeLine>,
}

fn walk<S: DirSource + ?Sized>(source: &S, input: &BuildInput<'_>, dir: &Path, rel: &str) -> Subtree {
    let entries = match source.read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!(dir = %dir.display(), error = %e, "directory unreadable, shown empty");
            return Subtree::default();
        }
    };

    let visible: Vec<DirEntryInfo> = entries.into_iter().filter(|e| is_visible(input, dir, e)).collect();
    let total = visible.len();
    let mut out = Subtree::default();

    for (i, entry) in visible.into_iter().enumerate() {
        let last = i + 1 == total;
        let connector = if last { "└── " } else { "├── " };
        let guide = if last { "    " } else { "│   " };
        let path = if rel.is_empty() { entry.name.clone() } else { format!("{}/{}", rel, entry.name) };

        if entry.is_dir {
            let expanded = input.policy.nesting || input.expanded.contains(&path);
            out.lines.push(TreeLine {
                prefix: connector.to_string(),
                name: entry.name.clone(),
                kind: NodeKind::Directory,
                path: path.clone(),
                expanded,
                change: None,
            });

            let mut children = Vec::new();
            if expanded {
                let sub = walk(source, input, &dir.join(&entry.name), &path);
                out.lines.extend(sub.lines.into_iter().map(|mut line| {
                    line.prefix.insert_str(0, guide);
                    line
                }));
                children = sub.nodes;
            }
            out.nodes.push(TreeNode {
                name: entry.name,
                kind: NodeKind::Directory,
                children,
                relative_path: path,
                expanded,
                change: None,
            });
        } else {
            let change = ChangeMark::lookup(input.changes, &path);
            out.lines.push(TreeLine {
                prefix: connector.to_string(),
                name: entry.name.clone(),
                kind: NodeKind::File,
                path: path.clone(),
                expanded: false,
                change,
            });
            out.nodes.push(TreeNode {
                name: entry.name,
                kind: NodeKind::File,
                children: Vec::new(),
                relative_path: path,
                expanded: false,
                change,
            });
        }
    }
    out
}

/// Filter precedence: VCS dir, then hidden entries, then ignore rules.
fn is_visible(input: &BuildInput<'_>, dir: &Path, entry: &DirEntryInfo) -> bool {
    let tree = &CONFIG.tree;
    if entry.name == tree.vcs_dir {
        return false;
    }
    if entry.name.starts_with(&tree.hidden_prefix) && entry.name != tree.ignore_file && !input.policy.show_hidden {
        return false;
    }
    if input.policy.respect_rules && input.rules.is_ignored(&dir.join(&entry.name)) {
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::io;
    use std::path::PathBuf;

    /// In-memory listing that records every directory it is asked to read.
    #[derive(Default)]
    struct FakeSource {
        dirs: HashMap<PathBuf, Vec<DirEntryInfo>>,
        reads: RefCell<Vec<PathBuf>>,
    }

    impl FakeSource {
        fn with(mut self, dir: &str, entries: Vec<DirEntryInfo>) -> Self {
            self.dirs.insert(PathBuf::from(dir), entries);
            self
        }

        fn read_count(&self, dir: &str) -> usize {
            self.reads.borrow().iter().filter(|p| p.as_path() == Path::new(dir)).count()
        }
    }

    impl DirSource for FakeSource {
        fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntryInfo>> {
            self.reads.borrow_mut().push(path.to_path_buf());
            self.dirs.get(path).cloned().ok_or_else(|| io::Error::from(io::ErrorKind::PermissionDenied))
        }
    }

    fn sample() -> FakeSource {
        FakeSource::default()
            .with(
                "/w",
                vec![
                    DirEntryInfo::dir(".git"),
                    DirEntryInfo::file(".env"),
                    DirEntryInfo::file(".gitignore"),
                    DirEntryInfo::file("a.go"),
                    DirEntryInfo::dir("logs"),
                    DirEntryInfo::dir("sub"),
                    DirEntryInfo::file("z.log"),
                ],
            )
            .with("/w/sub", vec![DirEntryInfo::file("d.go"), DirEntryInfo::dir("deep")])
            .with("/w/sub/deep", vec![DirEntryInfo::file("e.go")])
            .with("/w/logs", vec![])
            .with("/w/.git", vec![DirEntryInfo::file("HEAD")])
    }

    fn build_with(source: &FakeSource, policy: ViewPolicy, expanded: &ExpansionState, rules: &str) -> TreeSnapshot {
        let root = Path::new("/w");
        let rules = IgnoreRuleSet::from_lines(root, rules);
        let changes = ChangeMap::new();
        build(source, &BuildInput { root, changes: &changes, rules: &rules, policy, expanded })
    }

    fn labels(snapshot: &TreeSnapshot) -> Vec<String> {
        snapshot.lines.iter().map(TreeLine::label).collect()
    }

    #[test]
    fn default_policy_filters_in_order() {
        let source = sample();
        let snap = build_with(&source, ViewPolicy::default(), &ExpansionState::default(), "*.log\nlogs/");
        assert_eq!(labels(&snap), vec![".gitignore", "a.go", "sub/"]);
        assert_eq!(snap.index.find_dir("sub"), Some(2));
        assert_eq!(snap.index.file_at(2), None);
    }

    #[test]
    fn rules_off_and_hidden_on() {
        let source = sample();
        let policy = ViewPolicy { show_hidden: true, respect_rules: false, nesting: false };
        let snap = build_with(&source, policy, &ExpansionState::default(), "*.log");
        // .git stays out whatever the policy
        assert_eq!(labels(&snap), vec![".env", ".gitignore", "a.go", "logs/", "sub/", "z.log"]);
    }

    #[test]
    fn collapsed_directories_are_not_read() {
        let source = sample();
        build_with(&source, ViewPolicy::default(), &ExpansionState::default(), "");
        assert_eq!(source.read_count("/w"), 1);
        assert_eq!(source.read_count("/w/sub"), 0);
        assert_eq!(source.read_count("/w/logs"), 0);
        assert_eq!(source.read_count("/w/.git"), 0);
    }

    #[test]
    fn expanded_entry_reads_only_that_directory() {
        let source = sample();
        let mut expanded = ExpansionState::default();
        expanded.expand("sub");
        let snap = build_with(&source, ViewPolicy::default(), &expanded, "");
        assert_eq!(source.read_count("/w/sub"), 1);
        assert_eq!(source.read_count("/w/sub/deep"), 0);
        assert_eq!(snap.index.find_file("sub/d.go"), Some(4));
        assert_eq!(snap.index.find_dir("sub/deep"), Some(5));
    }

    #[test]
    fn nesting_expands_everything_in_preorder() {
        let source = sample();
        let policy = ViewPolicy { nesting: true, ..ViewPolicy::default() };
        let snap = build_with(&source, policy, &ExpansionState::default(), "");
        assert_eq!(labels(&snap), vec![".gitignore", "a.go", "logs/", "sub/", "d.go", "deep/", "e.go", "z.log"]);
        assert_eq!(snap.index.find_file("sub/deep/e.go"), Some(6));
        assert_eq!(snap.lines[6].text(), "│       └── e.go");
        assert_eq!(snap.root.descendant_lines(), snap.line_count());
    }

    #[test]
    fn every_line_is_indexed_once() {
        let source = sample();
        let policy = ViewPolicy { nesting: true, show_hidden: true, respect_rules: false };
        let snap = build_with(&source, policy, &ExpansionState::default(), "");
        assert_eq!(snap.index.len(), snap.line_count());
        for line in 0..snap.line_count() {
            assert!(snap.index.file_at(line).is_some() ^ snap.index.dir_at(line).is_some());
        }
    }

    #[test]
    fn unreadable_directory_is_empty() {
        let source = FakeSource::default().with("/w", vec![DirEntryInfo::dir("locked"), DirEntryInfo::file("f")]);
        let policy = ViewPolicy { nesting: true, ..ViewPolicy::default() };
        let snap = build_with(&source, policy, &ExpansionState::default(), "");
        assert_eq!(labels(&snap), vec!["locked/", "f"]);
        assert!(snap.root.children[0].children.is_empty());
    }

    #[test]
    fn unreadable_root_gives_empty_tree() {
        let source = FakeSource::default();
        let snap = build_with(&source, ViewPolicy::default(), &ExpansionState::default(), "");
        assert_eq!(snap.line_count(), 0);
        assert_eq!(snap.max_line(), 0);
        assert_eq!(snap.text(), "");
    }

    #[test]
    fn redecorate_swaps_annotations_only() {
        let source = sample();
        let mut snap = build_with(&source, ViewPolicy::default(), &ExpansionState::default(), "");
        let mut changes = ChangeMap::new();
        changes.insert("a.go".to_string(), 5);
        snap.redecorate(&changes);
        assert_eq!(snap.lines[1].label(), "a.go (+5)");
        assert_eq!(snap.root.children[1].change, Some(ChangeMark::Lines(5)));

        snap.redecorate(&ChangeMap::new());
        assert_eq!(snap.lines[1].label(), "a.go");
    }
}
