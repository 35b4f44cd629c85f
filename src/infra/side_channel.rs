//! One-way signals to the paired viewer through a shared key-value store.
//!
//! Writes are queued to one long-lived writer thread, so they land in the
//! order they were made. Failures are logged and otherwise ignored.

use std::process::{Command, Stdio};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use tracing::{debug, warn};

use vw_base::Theme;
use vw_base::config::CONFIG;

pub trait SideChannel: Send + Sync {
    fn set(&self, key: &str, value: &str) -> Result<(), String>;
}

/// The `skate` CLI (`skate set <key> <value>`).
#[derive(Debug, Clone)]
pub struct Skate {
    program: String,
}

impl Default for Skate {
    fn default() -> Self {
        Self { program: CONFIG.side_channel.program.clone() }
    }
}

impl SideChannel for Skate {
    fn set(&self, key: &str, value: &str) -> Result<(), String> {
        let status = Command::new(&self.program)
            .args(["set", key, value])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| format!("{}: {}", self.program, e))?;
        if status.success() { Ok(()) } else { Err(format!("{} exited with {}", self.program, status)) }
    }
}

/// `<prefix>@<session>`
pub fn slot(prefix: &str, session_id: &str) -> String {
    format!("{}@{}", prefix, session_id)
}

/// Handle to the writer thread. Dropping it lets the thread finish the queue and exit.
pub struct SideChannelWriter {
    tx: Sender<Vec<(String, String)>>,
    session_id: String,
}

impl SideChannelWriter {
    pub fn new(channel: Arc<dyn SideChannel>, session_id: impl Into<String>) -> Self {
        let (tx, rx) = mpsc::channel();
        if let Err(e) = thread::Builder::new().name("side-channel".to_string()).spawn(move || writer_loop(channel, rx)) {
            warn!(error = %e, "side channel writer not started");
        }
        Self { tx, session_id: session_id.into() }
    }

    /// Queue `pairs`; they are written in order after everything queued earlier.
    pub fn publish(&self, pairs: Vec<(String, String)>) {
        if self.tx.send(pairs).is_err() {
            debug!("side channel writer gone, signal dropped");
        }
    }

    pub fn publish_file(&self, path: String) {
        self.publish(vec![(slot(&CONFIG.side_channel.current_file, &self.session_id), path)]);
    }

    pub fn publish_theme(&self, theme: Theme) {
        let (bg, fg) = theme.header_codes();
        let keys = &CONFIG.side_channel;
        self.publish(vec![
            (slot(&keys.theme_bg, &self.session_id), bg.to_string()),
            (slot(&keys.theme_fg, &self.session_id), fg.to_string()),
        ]);
    }
}

fn writer_loop(channel: Arc<dyn SideChannel>, rx: Receiver<Vec<(String, String)>>) {
    for pairs in rx {
        for (key, value) in pairs {
            match channel.set(&key, &value) {
                Ok(()) => debug!(%key, "side channel updated"),
                Err(e) => warn!(%key, error = %e, "side channel write failed"),
            }
        }
    }
}
