use std::io;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

use crossterm::ExecutableCommand;
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture};
use ratatui::prelude::*;
use tracing::{debug, info, warn};

use vw_base::config::CONFIG;
use vw_mod_git::{AccountSource, ChangeSource, GitCli};
use vw_mod_tree::RefreshMode;

use crate::app::actions::{ActionResult, apply_action};
use crate::app::background::{JobResult, fetch_changes, probe_account, probe_branch};
use crate::app::events::handle_event;
use crate::infra::clipboard;
use crate::infra::side_channel::{SideChannel, SideChannelWriter};
use crate::state::{State, persistence};
use crate::ui;

pub struct App {
    pub state: State,
    changes: Arc<dyn ChangeSource>,
    git: GitCli,
    accounts: Arc<dyn AccountSource>,
    side_channel: SideChannelWriter,
    job_tx: Sender<JobResult>,
    job_rx: Receiver<JobResult>,
    /// Last periodic full refresh
    last_tick: Instant,
    last_render: Instant,
}

impl App {
    pub fn new(
        state: State,
        git: GitCli,
        accounts: Arc<dyn AccountSource>,
        side_channel: Arc<dyn SideChannel>,
    ) -> Self {
        let (job_tx, job_rx) = mpsc::channel();
        let side_channel = SideChannelWriter::new(side_channel, state.session_id.clone());
        Self {
            state,
            changes: Arc::new(git.clone()),
            git,
            accounts,
            side_channel,
            job_tx,
            job_rx,
            last_tick: Instant::now(),
            last_render: Instant::now(),
        }
    }

    pub fn run(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
        self.request_changes(RefreshMode::Full);
        probe_branch(self.git.clone(), self.job_tx.clone());
        probe_account(Arc::clone(&self.accounts), self.job_tx.clone());
        self.side_channel.publish_theme(self.state.theme);
        if self.state.mouse_mode {
            io::stdout().execute(EnableMouseCapture)?;
        }
        self.render(terminal)?;

        loop {
            // Input first, rendered right away
            if event::poll(CONFIG.refresh.event_poll())? {
                let evt = event::read()?;
                let Some(action) = handle_event(&evt, &self.state) else { break };
                let result = apply_action(&mut self.state, action);
                self.execute(result)?;
                self.render(terminal)?;
            }

            self.drain_jobs();

            if self.last_tick.elapsed() >= CONFIG.refresh.tick() {
                self.last_tick = Instant::now();
                self.request_changes(RefreshMode::Full);
            }

            if self.state.expire_notices(Instant::now()) {
                self.state.dirty = true;
            }

            if self.state.dirty
                && self.last_render.elapsed() >= Duration::from_millis(CONFIG.refresh.render_throttle_ms)
            {
                self.render(terminal)?;
            }
        }

        self.save();
        if self.state.mouse_mode {
            io::stdout().execute(DisableMouseCapture)?;
        }
        Ok(())
    }

    fn render(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
        terminal.draw(|frame| ui::render(frame, &mut self.state))?;
        self.state.dirty = false;
        self.last_render = Instant::now();
        Ok(())
    }

    fn request_changes(&mut self, mode: RefreshMode) {
        let ticket = self.state.session.begin_change_fetch();
        debug!(?ticket, ?mode, "change fetch requested");
        fetch_changes(Arc::clone(&self.changes), ticket, mode, self.job_tx.clone());
    }

    fn execute(&mut self, result: ActionResult) -> io::Result<()> {
        match result {
            ActionResult::Nothing => {}
            ActionResult::FetchChanges(mode) => self.request_changes(mode),
            ActionResult::PublishFile(path) => {
                info!(path = %path, "publishing selection");
                self.side_channel.publish_file(path);
            }
            ActionResult::BroadcastTheme => {
                self.side_channel.publish_theme(self.state.theme);
                self.save();
            }
            ActionResult::Copy(text) => clipboard::copy_in_background(text),
            ActionResult::Save => self.save(),
            ActionResult::SetMouseCapture(on) => {
                if on {
                    io::stdout().execute(EnableMouseCapture)?;
                } else {
                    io::stdout().execute(DisableMouseCapture)?;
                }
                self.save();
            }
        }
        Ok(())
    }

    fn save(&self) {
        if let Err(e) = persistence::save(&self.state.session_id, &self.state.record()) {
            warn!(error = %e, "session record not saved");
        }
    }

    fn drain_jobs(&mut self) {
        while let Ok(job) = self.job_rx.try_recv() {
            match job {
                JobResult::Changes { ticket, mode, changes } => {
                    if self.state.session.apply_changes(ticket, changes, mode) {
                        self.state.dirty = true;
                        if mode == RefreshMode::Full {
                            probe_branch(self.git.clone(), self.job_tx.clone());
                        }
                    } else {
                        debug!(?ticket, "stale annotations dropped");
                    }
                }
                JobResult::Branch(branch) => {
                    self.state.branch = branch;
                    self.state.dirty = true;
                }
                JobResult::Account(account) => {
                    self.state.account = account;
                    self.state.dirty = true;
                }
            }
        }
    }
}
