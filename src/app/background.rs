use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread;
use std::time::Instant;

use tracing::debug;

use vw_base::ChangeMap;
use vw_mod_git::{AccountSource, ChangeSource, GitCli};
use vw_mod_tree::{ChangeTicket, RefreshMode};

/// Results of jobs run off the event loop thread.
#[derive(Debug)]
pub enum JobResult {
    Changes { ticket: ChangeTicket, mode: RefreshMode, changes: ChangeMap },
    Branch(Option<String>),
    Account(Option<String>),
}

/// Fetch change metadata in the background; the ticket lets the session drop stale replies.
pub fn fetch_changes(source: Arc<dyn ChangeSource>, ticket: ChangeTicket, mode: RefreshMode, tx: Sender<JobResult>) {
    thread::spawn(move || {
        let started = Instant::now();
        let changes = source.fetch_all();
        debug!(?ticket, ?mode, files = changes.len(), elapsed_ms = started.elapsed().as_millis() as u64, "changes fetched");
        let _ = tx.send(JobResult::Changes { ticket, mode, changes });
    });
}

pub fn probe_branch(git: GitCli, tx: Sender<JobResult>) {
    thread::spawn(move || {
        let branch = if git.is_repo() { git.branch() } else { None };
        let _ = tx.send(JobResult::Branch(branch));
    });
}

/// First authenticated account, shown in the header.
pub fn probe_account(accounts: Arc<dyn AccountSource>, tx: Sender<JobResult>) {
    thread::spawn(move || {
        let account = accounts.list_accounts().into_iter().next();
        let _ = tx.send(JobResult::Account(account));
    });
}
