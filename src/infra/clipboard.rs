use std::io::Write;
use std::process::{Command, Stdio};
use std::thread;

use tracing::{debug, warn};

/// Clipboard writers tried in order.
const CANDIDATES: &[(&str, &[&str])] =
    &[("pbcopy", &[]), ("wl-copy", &[]), ("xclip", &["-selection", "clipboard"]), ("xsel", &["--clipboard", "--input"])];

fn copy_with(program: &str, args: &[&str], text: &str) -> Result<(), String> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| e.to_string())?;
    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(text.as_bytes()).map_err(|e| e.to_string())?;
    }
    let status = child.wait().map_err(|e| e.to_string())?;
    if status.success() { Ok(()) } else { Err(format!("exited with {}", status)) }
}

/// Copy `text` to the system clipboard with the first tool that works.
pub fn copy(text: &str) -> Result<(), String> {
    let mut last_err = String::from("no clipboard tool found");
    for (program, args) in CANDIDATES {
        match copy_with(program, args, text) {
            Ok(()) => {
                debug!(program, "copied to clipboard");
                return Ok(());
            }
            Err(e) => last_err = format!("{}: {}", program, e),
        }
    }
    Err(last_err)
}

/// Best effort, off the event loop.
pub fn copy_in_background(text: String) {
    thread::spawn(move || {
        if let Err(e) = copy(&text) {
            warn!(error = %e, "clipboard copy failed");
        }
    });
}
