//! UI-facing state owned by the event loop.
//!
//! - `persistence` — SessionRecord load/save

pub mod persistence;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use vw_base::Theme;
use vw_mod_files::EntryKind;
use vw_mod_tree::{DeleteTarget, RenderCache, TreeSession};

use persistence::SessionRecord;

/// Which screen or prompt has the keyboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Startup,
    Help,
    Viewer,
    Create(EntryKind),
    ConfirmDelete(DeleteTarget),
}

/// Transient message shown in the header.
#[derive(Debug, Clone)]
pub struct Notice {
    pub text: String,
    pub is_error: bool,
    pub expires: Instant,
}

impl Notice {
    pub fn new(text: impl Into<String>, is_error: bool, ttl: Duration) -> Self {
        Self { text: text.into(), is_error, expires: Instant::now() + ttl }
    }

    pub fn expired(&self, now: Instant) -> bool {
        now >= self.expires
    }
}

pub struct State {
    pub root: PathBuf,
    pub session_id: String,
    pub session: TreeSession,
    pub render_cache: RenderCache,
    pub theme: Theme,
    pub mode: Mode,
    /// Name typed in the create prompt
    pub input: String,
    pub branch: Option<String>,
    pub account: Option<String>,
    pub status: Option<Notice>,
    /// "Copied: name" hint
    pub copy_hint: Option<Notice>,
    pub mouse_mode: bool,
    /// First terminal row of the tree area, for mouse clicks
    pub tree_top: u16,
    pub dirty: bool,
}

impl State {
    pub fn new(root: PathBuf, session_id: String, record: &SessionRecord, show_startup: bool) -> Self {
        let session = TreeSession::open(root.clone(), record.policy());
        Self {
            root,
            session_id,
            session,
            render_cache: RenderCache::new(),
            theme: Theme::at(record.theme_index),
            mode: if show_startup { Mode::Startup } else { Mode::Normal },
            input: String::new(),
            branch: None,
            account: None,
            status: None,
            copy_hint: None,
            mouse_mode: record.mouse_mode,
            tree_top: 0,
            dirty: true,
        }
    }

    /// Snapshot of what gets persisted.
    pub fn record(&self) -> SessionRecord {
        let mut record = SessionRecord { theme_index: self.theme.index(), mouse_mode: self.mouse_mode, ..Default::default() };
        record.set_policy(self.session.policy());
        record
    }

    /// Drop expired notices. Returns true if anything changed.
    pub fn expire_notices(&mut self, now: Instant) -> bool {
        let mut changed = false;
        if self.status.as_ref().is_some_and(|n| n.expired(now)) {
            self.status = None;
            changed = true;
        }
        if self.copy_hint.as_ref().is_some_and(|n| n.expired(now)) {
            self.copy_hint = None;
            changed = true;
        }
        changed
    }
}
