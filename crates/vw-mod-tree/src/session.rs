//! Selection-preserving rebuild coordinator.
//!
//! `TreeSession` owns the current tree, the cursor and every input the builder
//! reads. All state changes go through `&mut self`, so rebuilds are strictly
//! sequential. Asynchronous change fetches are tracked with tickets; a result
//! older than one already applied is dropped.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use vw_base::ChangeMap;
use vw_mod_files::{self as files, EntryKind, Mutation, MutationOutcome, MutationResult};

use crate::builder::{self, BuildInput, TreeSnapshot};
use crate::ignore_rules::IgnoreRuleSet;
use crate::source::{DirSource, OsDirSource};
use crate::types::{ExpansionState, NodeKind, ViewPolicy};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No tree built yet
    Initializing,
    Ready,
}

/// What to do with freshly fetched change metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshMode {
    /// Re-annotate the current lines; no filesystem walk
    AnnotationsOnly,
    /// Reload ignore rules and rebuild the whole tree
    Full,
}

/// Identifies one change fetch. Later fetches carry larger tickets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ChangeTicket(u64);

/// Target of a pending delete, captured before asking for confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteTarget {
    pub path: PathBuf,
    pub kind: EntryKind,
    /// Direct children, only counted for directories
    pub child_count: usize,
}

pub struct TreeSession<S: DirSource = OsDirSource> {
    root: PathBuf,
    source: S,
    rules: IgnoreRuleSet,
    changes: ChangeMap,
    policy: ViewPolicy,
    expanded: ExpansionState,
    snapshot: Option<TreeSnapshot>,
    cursor: usize,
    scroll: usize,
    viewport: usize,
    generation: u64,
    tickets_issued: u64,
    ticket_applied: u64,
}

impl TreeSession<OsDirSource> {
    pub fn open(root: impl Into<PathBuf>, policy: ViewPolicy) -> Self {
        let mut session = Self::new(root, OsDirSource, policy);
        session.rebuild();
        session
    }
}

impl<S: DirSource> TreeSession<S> {
    /// Session with no tree yet. Ignore rules are loaded immediately.
    pub fn new(root: impl Into<PathBuf>, source: S, policy: ViewPolicy) -> Self {
        let root = root.into();
        let rules = IgnoreRuleSet::load(&root);
        Self {
            root,
            source,
            rules,
            changes: ChangeMap::new(),
            policy,
            expanded: ExpansionState::default(),
            snapshot: None,
            cursor: 0,
            scroll: 0,
            viewport: 1,
            generation: 0,
            tickets_issued: 0,
            ticket_applied: 0,
        }
    }

    // ---- accessors ----

    pub fn phase(&self) -> Phase {
        if self.snapshot.is_some() { Phase::Ready } else { Phase::Initializing }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn policy(&self) -> ViewPolicy {
        self.policy
    }

    pub fn changes(&self) -> &ChangeMap {
        &self.changes
    }

    pub fn expanded(&self) -> &ExpansionState {
        &self.expanded
    }

    pub fn rules(&self) -> &IgnoreRuleSet {
        &self.rules
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn snapshot(&self) -> Option<&TreeSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    pub fn line_count(&self) -> usize {
        self.snapshot.as_ref().map_or(0, TreeSnapshot::line_count)
    }

    pub fn max_line(&self) -> usize {
        self.snapshot.as_ref().map_or(0, TreeSnapshot::max_line)
    }

    /// Entry under the cursor, files first.
    pub fn selected(&self) -> Option<(NodeKind, &str)> {
        self.snapshot.as_ref()?.index.path_at(self.cursor)
    }

    pub fn selected_file(&self) -> Option<&str> {
        self.snapshot.as_ref()?.index.file_at(self.cursor)
    }

    pub fn selected_dir(&self) -> Option<&str> {
        self.snapshot.as_ref()?.index.dir_at(self.cursor)
    }

    pub fn absolute(&self, relative: &str) -> PathBuf {
        if relative.is_empty() { self.root.clone() } else { self.root.join(relative) }
    }

    // ---- rebuild ----

    /// Rebuild the tree and move the cursor back onto the entry it pointed at.
    pub fn rebuild(&mut self) {
        let remembered = self.selected().map(|(_, path)| path.to_string());

        let input = BuildInput {
            root: &self.root,
            changes: &self.changes,
            rules: &self.rules,
            policy: self.policy,
            expanded: &self.expanded,
        };
        let mut snapshot = builder::build(&self.source, &input);
        self.generation += 1;
        snapshot.generation = self.generation;

        let line = remembered
            .as_deref()
            .and_then(|path| snapshot.index.find_file(path).or_else(|| snapshot.index.find_dir(path)))
            .unwrap_or(0);
        self.cursor = line.min(snapshot.max_line());
        self.snapshot = Some(snapshot);
        self.clamp_scroll();

        debug!(generation = self.generation, cursor = self.cursor, lines = self.line_count(), "rebuilt");
    }

    // ---- change metadata ----

    /// Reserve a ticket for a change fetch about to be dispatched.
    pub fn begin_change_fetch(&mut self) -> ChangeTicket {
        self.tickets_issued += 1;
        ChangeTicket(self.tickets_issued)
    }

    /// Install fetched metadata. Returns false when nothing changed.
    ///
    /// Metadata older than what is already applied is dropped, but a stale
    /// full refresh still reloads the rules and rebuilds with the newer data.
    pub fn apply_changes(&mut self, ticket: ChangeTicket, changes: ChangeMap, mode: RefreshMode) -> bool {
        if ticket.0 <= self.ticket_applied {
            info!(ticket = ticket.0, applied = self.ticket_applied, ?mode, "stale change data discarded");
            if mode == RefreshMode::AnnotationsOnly {
                return false;
            }
            self.rules = IgnoreRuleSet::load(&self.root);
            self.rebuild();
            return true;
        }
        self.ticket_applied = ticket.0;
        self.changes = changes;

        match mode {
            RefreshMode::AnnotationsOnly if self.snapshot.is_some() => {
                self.generation += 1;
                if let Some(snapshot) = self.snapshot.as_mut() {
                    snapshot.redecorate(&self.changes);
                    snapshot.generation = self.generation;
                }
            }
            RefreshMode::AnnotationsOnly => self.rebuild(),
            RefreshMode::Full => {
                self.rules = IgnoreRuleSet::load(&self.root);
                self.rebuild();
            }
        }
        true
    }

    // ---- policy toggles ----

    pub fn toggle_hidden(&mut self) -> bool {
        self.policy.show_hidden = !self.policy.show_hidden;
        self.rebuild();
        self.policy.show_hidden
    }

    pub fn toggle_rules(&mut self) -> bool {
        self.policy.respect_rules = !self.policy.respect_rules;
        self.rebuild();
        self.policy.respect_rules
    }

    /// Turning nesting on forgets every manual expansion.
    pub fn toggle_nesting(&mut self) -> bool {
        self.policy.nesting = !self.policy.nesting;
        if self.policy.nesting {
            self.expanded.clear();
        }
        self.rebuild();
        self.policy.nesting
    }

    // ---- per-directory expansion (ignored while nesting is on) ----

    /// Open or close the selected directory. Returns false if nothing changed.
    pub fn toggle_expand(&mut self) -> bool {
        if self.policy.nesting {
            return false;
        }
        let Some(dir) = self.selected_dir().map(str::to_string) else { return false };
        self.expanded.toggle(&dir);
        self.rebuild();
        true
    }

    pub fn expand_selected(&mut self) -> bool {
        if self.policy.nesting {
            return false;
        }
        let Some(dir) = self.selected_dir().map(str::to_string) else { return false };
        if self.expanded.contains(&dir) {
            return false;
        }
        self.expanded.expand(&dir);
        self.rebuild();
        true
    }

    pub fn collapse_selected(&mut self) -> bool {
        if self.policy.nesting {
            return false;
        }
        let Some(dir) = self.selected_dir().map(str::to_string) else { return false };
        if !self.expanded.contains(&dir) {
            return false;
        }
        self.expanded.collapse(&dir);
        self.rebuild();
        true
    }

    // ---- cursor movement (never rebuilds) ----

    pub fn set_viewport(&mut self, height: usize) {
        self.viewport = height.max(1);
        self.follow_cursor();
    }

    pub fn viewport(&self) -> usize {
        self.viewport
    }

    pub fn move_up(&mut self, lines: usize) {
        self.cursor = self.cursor.saturating_sub(lines);
        self.follow_cursor();
    }

    pub fn move_down(&mut self, lines: usize) {
        self.cursor = self.cursor.saturating_add(lines).min(self.max_line());
        self.follow_cursor();
    }

    pub fn page_up(&mut self, overlap: usize) {
        self.move_up(self.viewport.saturating_sub(overlap).max(1));
    }

    pub fn page_down(&mut self, overlap: usize) {
        self.move_down(self.viewport.saturating_sub(overlap).max(1));
    }

    pub fn home(&mut self) {
        self.cursor = 0;
        self.follow_cursor();
    }

    pub fn end(&mut self) {
        self.cursor = self.max_line();
        self.follow_cursor();
    }

    /// Jump to a rendered line (mouse click), clamped.
    pub fn select_line(&mut self, line: usize) {
        self.cursor = line.min(self.max_line());
        self.follow_cursor();
    }

    fn follow_cursor(&mut self) {
        if self.cursor < self.scroll {
            self.scroll = self.cursor;
        } else if self.cursor >= self.scroll + self.viewport {
            self.scroll = self.cursor + 1 - self.viewport;
        }
        self.clamp_scroll();
    }

    fn clamp_scroll(&mut self) {
        let max_scroll = self.line_count().saturating_sub(self.viewport);
        self.scroll = self.scroll.min(max_scroll);
        if self.cursor < self.scroll || self.cursor >= self.scroll + self.viewport {
            self.scroll = self.cursor.saturating_sub(self.viewport - 1).min(max_scroll);
        }
    }

    // ---- mutations ----

    /// Directory new entries are created in: the selected directory, the
    /// selected file's parent, or the root.
    pub fn create_target_dir(&self) -> PathBuf {
        if let Some(dir) = self.selected_dir() {
            return self.absolute(dir);
        }
        if let Some(file) = self.selected_file() {
            return self.absolute(file).parent().map(Path::to_path_buf).unwrap_or_else(|| self.root.clone());
        }
        self.root.clone()
    }

    /// Describe what `d` would delete, counting direct children of a directory.
    pub fn delete_target(&self) -> Option<DeleteTarget> {
        let (kind, rel) = self.selected()?;
        let path = self.absolute(rel);
        match kind {
            NodeKind::File => Some(DeleteTarget { path, kind: EntryKind::File, child_count: 0 }),
            NodeKind::Directory => {
                let child_count = files::count_children(&path).unwrap_or(0);
                Some(DeleteTarget { path, kind: EntryKind::Directory, child_count })
            }
        }
    }

    /// Run a mutation, then rebuild whatever the outcome.
    pub fn mutate(&mut self, mutation: &Mutation) -> MutationResult<MutationOutcome> {
        let result = files::execute(mutation);
        self.rebuild();
        result
    }
}
