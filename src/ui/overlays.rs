use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

use vw_base::Theme;
use vw_mod_files::EntryKind;
use vw_mod_tree::DeleteTarget;

use crate::app::actions::viewer_command;
use crate::state::State;
use crate::ui::helpers::{centered_rect, shorten_home};

const HELP_KEYS: &[(&str, &str)] = &[
    ("↑/k ↓/j", "move"),
    ("←/h →/l", "collapse / expand"),
    ("PgUp PgDn", "page"),
    ("g G", "top / bottom"),
    ("enter space", "open file in viewer, fold directory"),
    ("u", "toggle hidden entries"),
    ("i", "toggle ignore rules"),
    ("n", "toggle nesting (expand everything)"),
    ("r", "refresh change markers"),
    ("R", "full refresh"),
    ("t T", "next / previous theme"),
    ("a A", "new file / new directory"),
    ("d", "delete"),
    ("c", "copy path"),
    ("v", "viewer command"),
    ("m", "toggle mouse"),
    ("?", "help"),
    ("q", "quit"),
];

fn popup(frame: &mut Frame, theme: &Theme, title: &str, lines: Vec<Line<'static>>, width: u16) {
    let height = lines.len() as u16 + 2;
    let area = centered_rect(width, height, frame.area());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.accent()))
        .title(Span::styled(format!(" {} ", title), Style::default().fg(theme.accent()).bold()));
    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), area);
}

fn hint(text: &str) -> Line<'static> {
    Line::from(Span::styled(text.to_string(), Style::default().fg(Color::DarkGray)))
}

fn session_lines(session_id: &str) -> Vec<Line<'static>> {
    vec![
        Line::from(vec![Span::raw("Session ID: "), Span::styled(session_id.to_string(), Style::default().bold())]),
        Line::from(""),
        Line::from("To open the viewer, run in another terminal:"),
        Line::from(Span::styled(format!("  {}", viewer_command(session_id)), Style::default().bold())),
        Line::from(""),
    ]
}

pub fn render_startup(frame: &mut Frame, state: &State) {
    let mut lines = session_lines(&state.session_id);
    lines.push(hint("Press 'c' to copy the command, 'q' to quit, any other key to continue"));
    popup(frame, &state.theme, "vinw", lines, 64);
}

pub fn render_viewer(frame: &mut Frame, state: &State) {
    let mut lines = session_lines(&state.session_id);
    lines.push(hint("c: copy command • any other key: close"));
    popup(frame, &state.theme, "Viewer", lines, 64);
}

pub fn render_help(frame: &mut Frame, state: &State) {
    let key_style = Style::default().fg(state.theme.accent()).bold();
    let mut lines: Vec<Line<'static>> = HELP_KEYS
        .iter()
        .map(|(keys, what)| {
            Line::from(vec![Span::styled(format!("{:>12}  ", keys), key_style), Span::raw(what.to_string())])
        })
        .collect();
    lines.push(Line::from(""));
    lines.push(hint("any key: close • q: quit"));
    popup(frame, &state.theme, "Keys", lines, 56);
}

pub fn render_create(frame: &mut Frame, state: &State, kind: EntryKind) {
    let home = dirs::home_dir();
    let location = shorten_home(&state.session.create_target_dir(), home.as_deref());
    let lines = vec![
        Line::from(vec![Span::raw("Location: "), Span::styled(location, Style::default().fg(Color::DarkGray))]),
        Line::from(""),
        Line::from(vec![
            Span::raw("> "),
            Span::styled(state.input.clone(), Style::default().bold()),
            Span::styled("█", Style::default().fg(state.theme.accent())),
        ]),
        Line::from(""),
        hint("enter: create • esc: cancel"),
    ];
    popup(frame, &state.theme, &format!("New {}", kind.noun()), lines, 60);
}

pub fn render_confirm_delete(frame: &mut Frame, state: &State, target: &DeleteTarget) {
    let name = target.path.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();
    let mut lines = vec![
        Line::from(vec![
            Span::styled(format!("⚠ Delete {}? ", target.kind.noun()), state.theme.error()),
            Span::styled(name, Style::default().bold()),
        ]),
        Line::from(""),
    ];
    if target.kind == EntryKind::Directory {
        let warning = if target.child_count == 0 {
            "(empty directory)".to_string()
        } else {
            format!("contains {} item(s)", target.child_count)
        };
        lines.push(Line::from(Span::styled(warning, state.theme.error())));
        lines.push(Line::from(""));
    }
    lines.push(hint("y: confirm • n/esc: cancel"));
    popup(frame, &state.theme, "Delete", lines, 56);
}
