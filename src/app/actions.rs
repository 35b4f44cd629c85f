use std::path::Path;
use std::time::Duration;

use tracing::info;

use vw_base::Theme;
use vw_base::config::CONFIG;
use vw_base::constants::{NAME_CHAR_LIMIT, PAGE_OVERLAP};
use vw_mod_files::{EntryKind, Mutation, MutationResult, MutationOutcome};
use vw_mod_tree::{NodeKind, RefreshMode};

use crate::state::{Mode, Notice, State};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    None,
    MoveUp(usize),
    MoveDown(usize),
    PageUp,
    PageDown,
    Home,
    End,
    /// Mouse click on a terminal row
    ClickRow(u16),
    Expand,
    Collapse,
    ToggleHidden,
    ToggleRules,
    ToggleNesting,
    RefreshAnnotations,
    RefreshFull,
    SetTheme(Theme),
    ToggleHelp,
    ToggleViewer,
    Dismiss,
    CopyPath,
    CopyViewerCommand,
    /// Publish the selected file, or fold the selected directory
    Activate,
    BeginCreate(EntryKind),
    InputChar(char),
    InputBackspace,
    SubmitCreate,
    BeginDelete,
    ConfirmDelete,
    CancelPrompt,
    ToggleMouse,
}

/// Side effects the event loop runs after an action is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionResult {
    Nothing,
    FetchChanges(RefreshMode),
    PublishFile(String),
    BroadcastTheme,
    Copy(String),
    Save,
    SetMouseCapture(bool),
}

pub fn apply_action(state: &mut State, action: Action) -> ActionResult {
    state.dirty = true;
    match action {
        Action::None => {
            state.dirty = false;
            ActionResult::Nothing
        }
        Action::MoveUp(n) => {
            state.session.move_up(n);
            ActionResult::Nothing
        }
        Action::MoveDown(n) => {
            state.session.move_down(n);
            ActionResult::Nothing
        }
        Action::PageUp => {
            state.session.page_up(PAGE_OVERLAP);
            ActionResult::Nothing
        }
        Action::PageDown => {
            state.session.page_down(PAGE_OVERLAP);
            ActionResult::Nothing
        }
        Action::Home => {
            state.session.home();
            ActionResult::Nothing
        }
        Action::End => {
            state.session.end();
            ActionResult::Nothing
        }
        Action::ClickRow(row) => {
            let offset = row
                .checked_sub(state.tree_top)
                .map(usize::from)
                .filter(|&offset| offset < state.session.viewport());
            if let Some(offset) = offset {
                let line = state.session.scroll() + offset;
                state.session.select_line(line);
            }
            ActionResult::Nothing
        }
        Action::Expand => {
            state.session.expand_selected();
            ActionResult::Nothing
        }
        Action::Collapse => {
            state.session.collapse_selected();
            ActionResult::Nothing
        }
        Action::ToggleHidden => {
            let on = state.session.toggle_hidden();
            info!(on, "hidden entries toggled");
            ActionResult::Save
        }
        Action::ToggleRules => {
            let on = state.session.toggle_rules();
            info!(on, "ignore rules toggled");
            ActionResult::Save
        }
        Action::ToggleNesting => {
            let on = state.session.toggle_nesting();
            info!(on, "nesting toggled");
            ActionResult::Save
        }
        Action::RefreshAnnotations => ActionResult::FetchChanges(RefreshMode::AnnotationsOnly),
        Action::RefreshFull => ActionResult::FetchChanges(RefreshMode::Full),
        Action::SetTheme(theme) => {
            state.theme = theme;
            let ttl = Duration::from_secs(CONFIG.refresh.status_secs);
            state.status = Some(Notice::new(format!("Theme: {} ({})", theme.name(), theme.description()), false, ttl));
            ActionResult::BroadcastTheme
        }
        Action::ToggleHelp => {
            state.mode = if state.mode == Mode::Help { Mode::Normal } else { Mode::Help };
            ActionResult::Nothing
        }
        Action::ToggleViewer => {
            state.mode = if state.mode == Mode::Viewer { Mode::Normal } else { Mode::Viewer };
            ActionResult::Nothing
        }
        Action::Dismiss | Action::CancelPrompt => {
            state.mode = Mode::Normal;
            state.input.clear();
            ActionResult::Nothing
        }
        Action::CopyPath => {
            let Some((_, rel)) = state.session.selected() else { return ActionResult::Nothing };
            let path = state.session.absolute(rel);
            let name = file_name(&path);
            state.copy_hint =
                Some(Notice::new(format!("Copied: {}", name), false, Duration::from_secs(CONFIG.refresh.hint_secs)));
            ActionResult::Copy(path.display().to_string())
        }
        Action::CopyViewerCommand => {
            state.mode = Mode::Normal;
            ActionResult::Copy(viewer_command(&state.session_id))
        }
        Action::Activate => match state.session.selected().map(|(kind, rel)| (kind, rel.to_string())) {
            Some((NodeKind::File, rel)) => {
                let path = state.session.absolute(&rel);
                if path.is_file() { ActionResult::PublishFile(path.display().to_string()) } else { ActionResult::Nothing }
            }
            Some((NodeKind::Directory, _)) => {
                state.session.toggle_expand();
                ActionResult::Nothing
            }
            None => ActionResult::Nothing,
        },
        Action::BeginCreate(kind) => {
            state.input.clear();
            state.mode = Mode::Create(kind);
            ActionResult::Nothing
        }
        Action::InputChar(c) => {
            if state.input.chars().count() < NAME_CHAR_LIMIT && !c.is_control() {
                state.input.push(c);
            }
            ActionResult::Nothing
        }
        Action::InputBackspace => {
            state.input.pop();
            ActionResult::Nothing
        }
        Action::SubmitCreate => {
            let Mode::Create(kind) = state.mode.clone() else { return ActionResult::Nothing };
            let name = state.input.trim().to_string();
            state.mode = Mode::Normal;
            state.input.clear();
            if name.is_empty() {
                return ActionResult::Nothing;
            }
            let path = state.session.create_target_dir().join(&name);
            let result = state.session.mutate(&Mutation::Create { path, kind });
            report_mutation(state, result);
            ActionResult::FetchChanges(RefreshMode::AnnotationsOnly)
        }
        Action::BeginDelete => {
            if let Some(target) = state.session.delete_target() {
                state.mode = Mode::ConfirmDelete(target);
            }
            ActionResult::Nothing
        }
        Action::ConfirmDelete => {
            let Mode::ConfirmDelete(target) = std::mem::replace(&mut state.mode, Mode::Normal) else {
                return ActionResult::Nothing;
            };
            let result = state.session.mutate(&Mutation::Delete { path: target.path, kind: target.kind });
            report_mutation(state, result);
            ActionResult::FetchChanges(RefreshMode::AnnotationsOnly)
        }
        Action::ToggleMouse => {
            state.mouse_mode = !state.mouse_mode;
            ActionResult::SetMouseCapture(state.mouse_mode)
        }
    }
}

/// Outcome of a mutation goes to the header either way.
fn report_mutation(state: &mut State, result: MutationResult<MutationOutcome>) {
    let ttl = Duration::from_secs(CONFIG.refresh.status_secs);
    state.status = Some(match result {
        Ok(outcome) => Notice::new(outcome.describe(), false, ttl),
        Err(e) => Notice::new(e.to_string(), true, ttl),
    });
}

pub fn viewer_command(session_id: &str) -> String {
    format!("{} {}", CONFIG.viewer.command, session_id)
}

fn file_name(path: &Path) -> String {
    path.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::persistence::SessionRecord;
    use std::fs;
    use tempfile::TempDir;

    fn state(dir: &TempDir) -> State {
        fs::write(dir.path().join("a.txt"), "keep").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("inner.txt"), "").unwrap();
        State::new(dir.path().to_path_buf(), "abcd1234".into(), &SessionRecord::default(), false)
    }

    #[test]
    fn create_collision_surfaces_error() {
        let dir = TempDir::new().unwrap();
        let mut s = state(&dir);
        apply_action(&mut s, Action::BeginCreate(EntryKind::File));
        for c in "a.txt".chars() {
            apply_action(&mut s, Action::InputChar(c));
        }
        let result = apply_action(&mut s, Action::SubmitCreate);
        assert_eq!(result, ActionResult::FetchChanges(RefreshMode::AnnotationsOnly));
        let status = s.status.as_ref().unwrap();
        assert!(status.is_error);
        assert!(status.text.contains("already exists"));
        assert_eq!(s.mode, Mode::Normal);
        assert_eq!(fs::read_to_string(dir.path().join("a.txt")).unwrap(), "keep");
    }

    #[test]
    fn create_in_selected_directory() {
        let dir = TempDir::new().unwrap();
        let mut s = state(&dir);
        apply_action(&mut s, Action::End);
        apply_action(&mut s, Action::BeginCreate(EntryKind::Directory));
        for c in "made".chars() {
            apply_action(&mut s, Action::InputChar(c));
        }
        apply_action(&mut s, Action::SubmitCreate);
        assert!(dir.path().join("sub").join("made").is_dir());
        assert!(!s.status.as_ref().unwrap().is_error);
    }

    #[test]
    fn empty_name_cancels() {
        let dir = TempDir::new().unwrap();
        let mut s = state(&dir);
        apply_action(&mut s, Action::BeginCreate(EntryKind::File));
        apply_action(&mut s, Action::InputChar(' '));
        assert_eq!(apply_action(&mut s, Action::SubmitCreate), ActionResult::Nothing);
        assert!(s.status.is_none());
    }

    #[test]
    fn delete_needs_confirmation() {
        let dir = TempDir::new().unwrap();
        let mut s = state(&dir);
        apply_action(&mut s, Action::End);
        apply_action(&mut s, Action::BeginDelete);
        match &s.mode {
            Mode::ConfirmDelete(target) => assert_eq!(target.child_count, 1),
            other => panic!("unexpected mode {:?}", other),
        }
        apply_action(&mut s, Action::CancelPrompt);
        assert!(dir.path().join("sub").exists());

        apply_action(&mut s, Action::BeginDelete);
        apply_action(&mut s, Action::ConfirmDelete);
        assert!(!dir.path().join("sub").exists());
        assert_eq!(s.session.line_count(), 1);
    }

    #[test]
    fn activate_publishes_files_and_folds_directories() {
        let dir = TempDir::new().unwrap();
        let mut s = state(&dir);
        let expected = dir.path().join("a.txt").display().to_string();
        assert_eq!(apply_action(&mut s, Action::Activate), ActionResult::PublishFile(expected));

        apply_action(&mut s, Action::End);
        assert_eq!(apply_action(&mut s, Action::Activate), ActionResult::Nothing);
        assert_eq!(s.session.line_count(), 3);
    }

    #[test]
    fn theme_is_set_through_action() {
        let dir = TempDir::new().unwrap();
        let mut s = state(&dir);
        let next = s.theme.next();
        assert_eq!(apply_action(&mut s, Action::SetTheme(next)), ActionResult::BroadcastTheme);
        assert_eq!(s.theme, next);
        assert_eq!(s.record().theme_index, next.index());
        let status = s.status.as_ref().unwrap();
        assert!(status.text.contains(next.description()));
        assert!(!status.is_error);
    }

    #[test]
    fn clicks_only_land_inside_the_tree() {
        let dir = TempDir::new().unwrap();
        let mut s = state(&dir);
        s.tree_top = 1;
        s.session.set_viewport(4);

        apply_action(&mut s, Action::ClickRow(2));
        assert_eq!(s.session.cursor(), 1);
        // header row
        apply_action(&mut s, Action::ClickRow(0));
        assert_eq!(s.session.cursor(), 1);
        apply_action(&mut s, Action::ClickRow(1));
        assert_eq!(s.session.cursor(), 0);
        // footer row below the viewport
        apply_action(&mut s, Action::ClickRow(5));
        assert_eq!(s.session.cursor(), 0);
    }

    #[test]
    fn copy_sets_hint() {
        let dir = TempDir::new().unwrap();
        let mut s = state(&dir);
        let result = apply_action(&mut s, Action::CopyPath);
        assert_eq!(result, ActionResult::Copy(dir.path().join("a.txt").display().to_string()));
        assert_eq!(s.copy_hint.as_ref().unwrap().text, "Copied: a.txt");
    }
}
