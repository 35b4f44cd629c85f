//! End-to-end behaviour of a session over a real directory.

use std::cell::Cell;
use std::fs;
use std::io;
use std::path::Path;

use tempfile::TempDir;
use vw_base::{ChangeMap, NEW_FILE_MAGNITUDE, Theme};
use vw_mod_files::{EntryKind, Mutation};
use vw_mod_tree::render::plain_text;
use vw_mod_tree::{
    DirEntryInfo, DirSource, OsDirSource, RefreshMode, RenderCache, TreeLine, TreeSession, ViewPolicy,
};

/// Real listing plus a counter of directories read.
#[derive(Default)]
struct CountingSource {
    reads: Cell<usize>,
}

impl DirSource for CountingSource {
    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntryInfo>> {
        self.reads.set(self.reads.get() + 1);
        OsDirSource.read_dir(path)
    }
}

fn workspace() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.go"), "package a\n").unwrap();
    fs::write(dir.path().join("b.go"), "package b\n").unwrap();
    fs::write(dir.path().join("c.go"), "package c\n").unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("sub").join("d.go"), "package d\n").unwrap();
    dir
}

fn changes() -> ChangeMap {
    let mut map = ChangeMap::new();
    map.insert("b.go".to_string(), 2);
    map.insert("c.go".to_string(), NEW_FILE_MAGNITUDE);
    map
}

fn labels<S: DirSource>(session: &TreeSession<S>) -> Vec<String> {
    session.snapshot().unwrap().lines.iter().map(TreeLine::label).collect()
}

fn open_with_changes(dir: &TempDir) -> TreeSession {
    let mut session = TreeSession::open(dir.path(), ViewPolicy::default());
    let ticket = session.begin_change_fetch();
    assert!(session.apply_changes(ticket, changes(), RefreshMode::Full));
    session
}

#[test]
fn annotated_listing_and_expansion() {
    let dir = workspace();
    let mut session = open_with_changes(&dir);

    assert_eq!(labels(&session), vec!["a.go", "b.go (+2)", "c.go (new)", "sub/"]);
    let index = &session.snapshot().unwrap().index;
    assert_eq!(index.files().collect::<Vec<_>>(), vec![(0, "a.go"), (1, "b.go"), (2, "c.go")]);
    assert_eq!(index.dirs().collect::<Vec<_>>(), vec![(3, "sub")]);

    session.select_line(3);
    assert!(session.toggle_expand());
    assert_eq!(session.line_count(), 5);
    assert_eq!(session.snapshot().unwrap().index.file_at(4), Some("sub/d.go"));
}

#[test]
fn delete_relocates_cursor_by_identity() {
    let dir = workspace();
    let mut session = open_with_changes(&dir);
    session.select_line(1);
    assert_eq!(session.selected_file(), Some("b.go"));

    let result = session.mutate(&Mutation::Delete { path: dir.path().join("a.go"), kind: EntryKind::File });
    assert!(result.is_ok());
    assert_eq!(session.cursor(), 0);
    assert_eq!(session.selected_file(), Some("b.go"));
}

#[test]
fn selection_survives_policy_toggles() {
    let dir = workspace();
    fs::write(dir.path().join(".hidden"), "").unwrap();
    fs::write(dir.path().join(".gitignore"), "a.go\n").unwrap();
    let mut session = open_with_changes(&dir);
    session.select_line(2);
    let picked = session.selected_file().map(str::to_string);

    session.toggle_hidden();
    assert_eq!(session.selected_file(), picked.as_deref());
    session.toggle_rules();
    assert_eq!(session.selected_file(), picked.as_deref());
    session.toggle_nesting();
    assert_eq!(session.selected_file(), picked.as_deref());
    assert!(session.cursor() <= session.max_line());
}

#[test]
fn rules_toggle_round_trip_is_identical() {
    let dir = workspace();
    fs::write(dir.path().join(".gitignore"), "*.go\n").unwrap();
    let mut session = open_with_changes(&dir);
    let before = session.snapshot().unwrap().text();

    session.toggle_rules();
    assert_ne!(session.snapshot().unwrap().text(), before);
    session.toggle_rules();
    assert_eq!(session.snapshot().unwrap().text(), before);
}

#[test]
fn collapsed_directory_is_never_read() {
    let dir = workspace();
    fs::create_dir_all(dir.path().join("sub").join("deeper")).unwrap();
    let mut session = TreeSession::new(dir.path(), CountingSource::default(), ViewPolicy::default());
    session.rebuild();
    assert_eq!(session.source().reads.get(), 1);

    session.select_line(3);
    session.toggle_expand();
    // root + sub; sub/deeper stays collapsed
    assert_eq!(session.source().reads.get(), 3);
}

#[test]
fn render_is_pure_and_sized() {
    let dir = workspace();
    let session = open_with_changes(&dir);
    let snapshot = session.snapshot().unwrap();
    let mut cache = RenderCache::new();
    let first = plain_text(&cache.lines(snapshot, 2, Theme::default()));
    let mut other = RenderCache::new();
    let second = plain_text(&other.lines(snapshot, 2, Theme::default()));
    assert_eq!(first, second);
    assert_eq!(first.lines().count(), snapshot.line_count());
}

#[test]
fn create_collision_fails_and_preserves_content() {
    let dir = workspace();
    let mut session = open_with_changes(&dir);
    let result = session.mutate(&Mutation::Create { path: dir.path().join("b.go"), kind: EntryKind::File });
    assert!(result.is_err());
    assert_eq!(fs::read_to_string(dir.path().join("b.go")).unwrap(), "package b\n");
    assert_eq!(session.line_count(), 4);
}
