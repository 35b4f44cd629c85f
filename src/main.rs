mod app;
mod infra;
mod state;
mod ui;

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use crossterm::{
    ExecutableCommand,
    event::DisableMouseCapture,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use tracing::{error, info};

use app::App;
use infra::session_id::session_id;
use infra::side_channel::Skate;
use state::{State, persistence};
use vw_mod_git::{GhCli, GitCli};

/// Terminal file-tree browser with git change markers.
#[derive(Parser, Debug)]
#[command(name = "vinw", version, about)]
struct Cli {
    /// Directory to browse
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Time change queries and tree builds, print to stderr and exit
    #[arg(long)]
    benchmark: bool,

    /// Skip the session banner
    #[arg(long)]
    no_startup: bool,
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("vinw: {}", e);
        std::process::exit(1);
    }
}

/// Absolute root as typed; symlinks stay unresolved so the session id
/// matches what the viewer is started with.
fn watch_root(path: &Path) -> io::Result<PathBuf> {
    let root = std::path::absolute(path)?;
    if !root.is_dir() {
        return Err(io::Error::new(io::ErrorKind::NotFound, format!("not a directory: {}", root.display())));
    }
    Ok(root)
}

fn run(cli: Cli) -> io::Result<()> {
    let root = watch_root(&cli.path)?;

    if cli.benchmark {
        app::benchmark::run(&root);
        return Ok(());
    }

    let log_path = infra::logging::init();
    let id = session_id(&root);
    info!(root = %root.display(), session = %id, log = ?log_path, "starting");

    // Panic hook: put the terminal back before the default hook prints.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = io::stdout().execute(DisableMouseCapture);
        let _ = io::stdout().execute(LeaveAlternateScreen);
        error!(%info, "panic");
        default_hook(info);
    }));

    let record = persistence::load(&id);
    let state = State::new(root.clone(), id, &record, !cli.no_startup);

    enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    let mut app = App::new(state, GitCli::new(&root), Arc::new(GhCli), Arc::new(Skate::default()));
    let result = app.run(&mut terminal);

    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    info!("exiting");
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn watch_root_rejects_files() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("plain.txt");
        std::fs::write(&file, "").unwrap();
        assert_eq!(watch_root(&file).unwrap_err().kind(), io::ErrorKind::NotFound);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_root_keeps_its_own_id() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("target");
        std::fs::create_dir(&target).unwrap();
        let link = dir.path().join("link");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let root = watch_root(&link).unwrap();
        assert_eq!(root, link);
        assert_ne!(session_id(&root), session_id(&target));
    }
}
