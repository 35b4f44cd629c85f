//! `--benchmark`: time the expensive paths on a real root and print to stderr.

use std::path::Path;
use std::time::{Duration, Instant};

use vw_base::ChangeMap;
use vw_mod_git::{ChangeSource, GitCli};
use vw_mod_tree::{BuildInput, ExpansionState, IgnoreRuleSet, OsDirSource, ViewPolicy, build};

const BUILD_RUNS: u32 = 3;

pub fn run(root: &Path) {
    let rules = IgnoreRuleSet::load(root);
    let expanded = ExpansionState::default();
    let nested = ViewPolicy { nesting: true, ..ViewPolicy::default() };

    let empty = ChangeMap::new();
    let full = build(&OsDirSource, &BuildInput { root, changes: &empty, rules: &rules, policy: nested, expanded: &expanded });
    let files = full.index.files().count();
    eprintln!("Root: {}", root.display());
    eprintln!("Visible files (fully nested): {}", files);

    let git = GitCli::new(root);
    let started = Instant::now();
    let changes = git.fetch_all();
    eprintln!("Change query: {:?} ({} changed files)", started.elapsed(), changes.len());

    for (label, policy) in [("collapsed", ViewPolicy::default()), ("nested", nested)] {
        let mut total = Duration::ZERO;
        let mut lines = 0;
        for _ in 0..BUILD_RUNS {
            let started = Instant::now();
            let snapshot =
                build(&OsDirSource, &BuildInput { root, changes: &changes, rules: &rules, policy, expanded: &expanded });
            total += started.elapsed();
            lines = snapshot.line_count();
        }
        eprintln!("Tree build ({}): {:?} avg over {} runs, {} lines", label, total / BUILD_RUNS, BUILD_RUNS, lines);
    }
}
