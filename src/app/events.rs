use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind};

use vw_base::constants::SCROLL_WHEEL_LINES;
use vw_mod_files::EntryKind;

use crate::app::actions::Action;
use crate::state::{Mode, State};

/// Map a terminal event to an action. `None` means quit.
pub fn handle_event(event: &Event, state: &State) -> Option<Action> {
    match event {
        Event::Key(key) => {
            if key.kind != KeyEventKind::Press {
                return Some(Action::None);
            }
            if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                return None;
            }
            match &state.mode {
                Mode::Startup => handle_startup_key(key),
                Mode::Help => handle_help_key(key),
                Mode::Viewer => Some(handle_viewer_key(key)),
                Mode::Create(_) => Some(handle_prompt_key(key)),
                Mode::ConfirmDelete(_) => Some(handle_confirm_key(key)),
                Mode::Normal => handle_normal_key(key, state),
            }
        }
        Event::Mouse(mouse) if state.mouse_mode && state.mode == Mode::Normal => {
            let action = match mouse.kind {
                MouseEventKind::ScrollUp => Action::MoveUp(SCROLL_WHEEL_LINES),
                MouseEventKind::ScrollDown => Action::MoveDown(SCROLL_WHEEL_LINES),
                MouseEventKind::Down(MouseButton::Left) => Action::ClickRow(mouse.row),
                _ => Action::None,
            };
            Some(action)
        }
        _ => Some(Action::None),
    }
}

fn handle_startup_key(key: &KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Char('q') => None,
        KeyCode::Char('c') => Some(Action::CopyViewerCommand),
        _ => Some(Action::Dismiss),
    }
}

fn handle_help_key(key: &KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Char('q') => None,
        _ => Some(Action::Dismiss),
    }
}

fn handle_viewer_key(key: &KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('c') => Action::CopyViewerCommand,
        _ => Action::Dismiss,
    }
}

fn handle_prompt_key(key: &KeyEvent) -> Action {
    match key.code {
        KeyCode::Enter => Action::SubmitCreate,
        KeyCode::Esc => Action::CancelPrompt,
        KeyCode::Backspace => Action::InputBackspace,
        KeyCode::Char(c) => Action::InputChar(c),
        _ => Action::None,
    }
}

fn handle_confirm_key(key: &KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => Action::ConfirmDelete,
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Action::CancelPrompt,
        _ => Action::None,
    }
}

fn handle_normal_key(key: &KeyEvent, state: &State) -> Option<Action> {
    let action = match key.code {
        KeyCode::Char('q') => return None,
        KeyCode::Up | KeyCode::Char('k') => Action::MoveUp(1),
        KeyCode::Down | KeyCode::Char('j') => Action::MoveDown(1),
        KeyCode::Left | KeyCode::Char('h') => Action::Collapse,
        KeyCode::Right | KeyCode::Char('l') => Action::Expand,
        KeyCode::PageUp => Action::PageUp,
        KeyCode::PageDown => Action::PageDown,
        KeyCode::Home | KeyCode::Char('g') => Action::Home,
        KeyCode::End | KeyCode::Char('G') => Action::End,
        KeyCode::Enter | KeyCode::Char(' ') => Action::Activate,
        KeyCode::Char('u') => Action::ToggleHidden,
        KeyCode::Char('i') => Action::ToggleRules,
        KeyCode::Char('n') => Action::ToggleNesting,
        KeyCode::Char('r') => Action::RefreshAnnotations,
        KeyCode::Char('R') => Action::RefreshFull,
        KeyCode::Char('t') => Action::SetTheme(state.theme.next()),
        KeyCode::Char('T') => Action::SetTheme(state.theme.prev()),
        KeyCode::Char('?') => Action::ToggleHelp,
        KeyCode::Char('v') => Action::ToggleViewer,
        KeyCode::Char('c') => Action::CopyPath,
        KeyCode::Char('a') => Action::BeginCreate(EntryKind::File),
        KeyCode::Char('A') => Action::BeginCreate(EntryKind::Directory),
        KeyCode::Char('d') => Action::BeginDelete,
        KeyCode::Char('m') => Action::ToggleMouse,
        _ => Action::None,
    };
    Some(action)
}
