pub mod helpers;
mod overlays;

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};
use unicode_width::UnicodeWidthStr;

use vw_base::constants::{FOOTER_HEIGHT, HEADER_HEIGHT};
use vw_mod_tree::Phase;

use crate::state::{Mode, State};
use helpers::{on_off, shorten_home, truncate_to_width};

pub fn render(frame: &mut Frame, state: &mut State) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT), // Path, branch, notices
            Constraint::Min(1),                // Tree
            Constraint::Length(FOOTER_HEIGHT), // Toggles + keys
        ])
        .split(frame.area());

    render_header(frame, state, layout[0]);
    render_tree(frame, state, layout[1]);
    render_footer(frame, state, layout[2]);

    match state.mode.clone() {
        Mode::Normal => {}
        Mode::Startup => overlays::render_startup(frame, state),
        Mode::Help => overlays::render_help(frame, state),
        Mode::Viewer => overlays::render_viewer(frame, state),
        Mode::Create(kind) => overlays::render_create(frame, state, kind),
        Mode::ConfirmDelete(target) => overlays::render_confirm_delete(frame, state, &target),
    }
}

fn render_header(frame: &mut Frame, state: &State, area: Rect) {
    let home = dirs::home_dir();
    let mut left = format!(" {}", shorten_home(&state.root, home.as_deref()));
    if let Some(branch) = &state.branch {
        left.push_str(&format!("  ⎇ {}", branch));
    }
    if let Some(account) = &state.account {
        left.push_str(&format!("  @{}", account));
    }

    let header = state.theme.header();
    let notice = state.status.as_ref().or(state.copy_hint.as_ref());
    let right = notice.map(|n| format!("{} ", n.text)).unwrap_or_default();
    let width = area.width as usize;
    let right = truncate_to_width(&right, width / 2);
    let left = truncate_to_width(&left, width.saturating_sub(right.width()));
    let pad = width.saturating_sub(left.width() + right.width());

    let right_style = match notice {
        Some(n) if n.is_error => header.patch(state.theme.error()),
        _ => header,
    };
    let line = Line::from(vec![
        Span::styled(left, header),
        Span::styled(" ".repeat(pad), header),
        Span::styled(right, right_style),
    ]);
    frame.render_widget(Paragraph::new(line).style(header), area);
}

fn render_tree(frame: &mut Frame, state: &mut State, area: Rect) {
    state.tree_top = area.y;
    state.session.set_viewport(area.height as usize);

    let placeholder = match state.session.phase() {
        Phase::Initializing => Some("Initializing…"),
        Phase::Ready if state.session.line_count() == 0 => Some("(empty)"),
        Phase::Ready => None,
    };
    if let Some(text) = placeholder {
        let line = Line::from(Span::styled(format!(" {}", text), state.theme.guide()));
        frame.render_widget(Paragraph::new(line), area);
        return;
    }

    let cursor = state.session.cursor();
    let scroll = state.session.scroll();
    let Some(snapshot) = state.session.snapshot() else { return };
    let lines = state.render_cache.lines(snapshot, cursor, state.theme);
    let visible: Vec<Line> = lines.iter().skip(scroll).take(area.height as usize).cloned().collect();
    frame.render_widget(Paragraph::new(visible), area);
}

fn render_footer(frame: &mut Frame, state: &State, area: Rect) {
    let policy = state.session.policy();
    let footer = state.theme.footer();
    let key = Style::default().fg(state.theme.accent()).bold();

    let toggles = Line::from(vec![
        Span::raw(format!(
            " hidden: {} • ignore: {} • nest: {} • mouse: {} • theme: ",
            on_off(policy.show_hidden),
            on_off(policy.respect_rules),
            on_off(policy.nesting),
            on_off(state.mouse_mode),
        )),
        Span::styled(state.theme.name(), key),
    ]);

    let mut keys = Vec::new();
    for (k, what) in [("?", "help"), ("u", "hidden"), ("i", "ignore"), ("n", "nest"), ("t", "theme"), ("v", "viewer"), ("q", "quit")] {
        keys.push(Span::styled(format!(" {}", k), key));
        keys.push(Span::raw(format!(" {} ", what)));
    }

    let block = Block::default().borders(Borders::TOP).border_style(state.theme.guide()).style(footer);
    frame.render_widget(Paragraph::new(vec![toggles, Line::from(keys)]).block(block), area);
}
