//! Root-level ignore rules with simplified gitignore matching.
//!
//! Only the file at the watch root is read. Matching follows shell-glob
//! semantics where `*` never crosses a `/`:
//!
//! - `dir/` (trailing slash) matches any path segment equal to `dir`
//! - patterns without a `/` match the basename or any path segment
//! - patterns with a `/` match the basename or the full relative path
//! - `**` is treated like a single `*` (no recursive-depth matching)
//!
//! A pattern that fails to compile never matches anything.

use std::fs;
use std::path::{Component, Path, PathBuf};

use globset::{GlobBuilder, GlobMatcher};
use tracing::debug;

use vw_base::config::CONFIG;

#[derive(Debug, Clone)]
struct Rule {
    source: String,
    /// Pattern had a trailing `/`
    segment_only: bool,
    /// Pattern (after trimming) contains a `/`
    anchored: bool,
    matcher: Option<GlobMatcher>,
}

impl Rule {
    fn parse(line: &str) -> Self {
        let trimmed = line.strip_prefix('/').unwrap_or(line);
        let segment_only = trimmed.ends_with('/');
        let body = trimmed.trim_end_matches('/');

        let mut glob = body.to_string();
        while glob.contains("**") {
            glob = glob.replace("**", "*");
        }
        let matcher = GlobBuilder::new(&glob)
            .literal_separator(true)
            .backslash_escape(true)
            .build()
            .map(|g| g.compile_matcher())
            .map_err(|e| debug!(pattern = line, error = %e, "ignore pattern skipped"))
            .ok();

        Self { source: line.to_string(), segment_only, anchored: body.contains('/'), matcher }
    }

    fn matches(&self, rel: &str) -> bool {
        let Some(matcher) = &self.matcher else { return false };
        let base = rel.rsplit('/').next().unwrap_or(rel);
        if matcher.is_match(base) || matcher.is_match(rel) {
            return true;
        }
        (self.segment_only || !self.anchored) && rel.split('/').any(|segment| matcher.is_match(segment))
    }
}

/// Ordered patterns loaded from the root ignore file.
#[derive(Debug, Clone, Default)]
pub struct IgnoreRuleSet {
    root: PathBuf,
    rules: Vec<Rule>,
}

impl IgnoreRuleSet {
    /// Read `<root>/<ignore_file>`. A missing or unreadable file gives an
    /// empty set that ignores nothing.
    pub fn load(root: &Path) -> Self {
        let path = root.join(&CONFIG.tree.ignore_file);
        let content = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "no ignore rules loaded");
                String::new()
            }
        };
        Self::from_lines(root, &content)
    }

    /// Build from file content. Blank lines and `#` comments are skipped.
    pub fn from_lines(root: &Path, content: &str) -> Self {
        let rules = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(Rule::parse)
            .collect();
        Self { root: root.to_path_buf(), rules }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|r| r.source.as_str())
    }

    /// Whether `path` (absolute, under the root) matches any pattern.
    /// Paths outside the root are never ignored.
    pub fn is_ignored(&self, path: &Path) -> bool {
        if self.rules.is_empty() {
            return false;
        }
        let Some(rel) = relative_key(&self.root, path) else { return false };
        if rel.is_empty() {
            return false;
        }
        self.rules.iter().any(|rule| rule.matches(&rel))
    }
}

/// `/`-joined path of `path` relative to `root`.
fn relative_key(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<_> = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy()),
            _ => None,
        })
        .collect();
    Some(parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn rules(content: &str) -> IgnoreRuleSet {
        IgnoreRuleSet::from_lines(Path::new("/w"), content)
    }

    fn ignored(set: &IgnoreRuleSet, rel: &str) -> bool {
        set.is_ignored(&Path::new("/w").join(rel))
    }

    #[test]
    fn missing_file_is_permissive() {
        let dir = TempDir::new().unwrap();
        let set = IgnoreRuleSet::load(dir.path());
        assert!(set.is_empty());
        assert!(!set.is_ignored(&dir.path().join("anything")));
    }

    #[test]
    fn load_skips_comments_and_blanks() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".gitignore"), "# build output\n\n  target/  \n*.log\n").unwrap();
        let set = IgnoreRuleSet::load(dir.path());
        assert_eq!(set.patterns().collect::<Vec<_>>(), vec!["target/", "*.log"]);
        assert!(set.is_ignored(&dir.path().join("target")));
    }

    #[test]
    fn basename_patterns_match_at_any_depth() {
        let set = rules("*.log");
        assert!(ignored(&set, "debug.log"));
        assert!(ignored(&set, "a/b/trace.log"));
        assert!(!ignored(&set, "log.txt"));
    }

    #[test]
    fn trailing_slash_matches_segments() {
        let set = rules("node_modules/");
        assert!(ignored(&set, "node_modules"));
        assert!(ignored(&set, "web/node_modules/pkg/index.js"));
        assert!(!ignored(&set, "web/node_modules_old"));
    }

    #[test]
    fn slash_patterns_match_full_path() {
        let set = rules("docs/*.md");
        assert!(ignored(&set, "docs/readme.md"));
        // `*` does not cross directories
        assert!(!ignored(&set, "docs/sub/readme.md"));
        assert!(!ignored(&set, "other/readme.md"));
    }

    #[test]
    fn leading_slash_is_stripped() {
        let set = rules("/dist");
        assert!(ignored(&set, "dist"));
        assert!(ignored(&set, "pkg/dist"));
    }

    #[test]
    fn double_star_degrades_to_single() {
        let set = rules("src/**/gen.rs");
        assert!(ignored(&set, "src/a/gen.rs"));
        assert!(!ignored(&set, "src/a/b/gen.rs"));
        let set = rules("**/*.tmp");
        assert!(ignored(&set, "x/y.tmp"));
    }

    #[test]
    fn malformed_pattern_never_matches() {
        let set = rules("[unclosed\n*.bak");
        assert_eq!(set.len(), 2);
        assert!(!ignored(&set, "[unclosed"));
        assert!(ignored(&set, "old.bak"));
    }

    #[test]
    fn outside_root_is_not_ignored() {
        let set = rules("*");
        assert!(!set.is_ignored(Path::new("/elsewhere/file")));
        assert!(!set.is_ignored(Path::new("/w")));
    }
}
