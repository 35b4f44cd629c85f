//! Memoized styled lines for the tree view.
//!
//! Two levels: per-line styling is cached per (tree generation, theme), and
//! the highlighted output per (tree generation, theme, cursor). Moving the
//! cursor only re-patches one line; scrolling or redrawing with nothing
//! changed returns the same `Rc`.

use std::rc::Rc;

use ratatui::style::Style;
use ratatui::text::{Line, Span};

use vw_base::Theme;

use crate::builder::TreeSnapshot;
use crate::types::{NodeKind, TreeLine};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BaseKey {
    generation: u64,
    theme: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OutputKey {
    base: BaseKey,
    cursor: usize,
}

#[derive(Default)]
pub struct RenderCache {
    base_key: Option<BaseKey>,
    base: Rc<Vec<Line<'static>>>,
    output_key: Option<OutputKey>,
    output: Rc<Vec<Line<'static>>>,
    /// Full recomputations, for tests and the benchmark
    recomputes: usize,
}

impl RenderCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Styled lines for `snapshot` with `cursor` highlighted.
    /// Always exactly `snapshot.line_count()` lines.
    pub fn lines(&mut self, snapshot: &TreeSnapshot, cursor: usize, theme: Theme) -> Rc<Vec<Line<'static>>> {
        let base_key = BaseKey { generation: snapshot.generation, theme: theme.index() };
        let key = OutputKey { base: base_key, cursor };
        if self.output_key == Some(key) {
            return Rc::clone(&self.output);
        }

        if self.base_key != Some(base_key) {
            self.base = Rc::new(snapshot.lines.iter().map(|l| styled_line(l, &theme)).collect());
            self.base_key = Some(base_key);
            self.recomputes += 1;
        }

        let mut output = (*self.base).clone();
        if let Some(selected) = output.get_mut(cursor) {
            *selected = highlighted(selected, &theme);
        }
        self.output = Rc::new(output);
        self.output_key = Some(key);
        Rc::clone(&self.output)
    }

    pub fn recomputes(&self) -> usize {
        self.recomputes
    }
}

fn styled_line(line: &TreeLine, theme: &Theme) -> Line<'static> {
    let mut spans = vec![Span::styled(line.prefix.clone(), theme.guide())];
    match line.kind {
        NodeKind::Directory => {
            spans.push(Span::styled(format!("{}{}", line.marker(), line.label()), theme.directory()));
        }
        NodeKind::File => {
            spans.push(Span::styled(line.name.clone(), theme.file()));
            if let Some(mark) = line.change {
                spans.push(Span::styled(mark.label(), theme.change()));
            }
        }
    }
    Line::from(spans)
}

/// Same text, selection style layered over every span.
fn highlighted(line: &Line<'static>, theme: &Theme) -> Line<'static> {
    let selected: Style = theme.selected();
    Line::from(
        line.spans
            .iter()
            .map(|span| Span::styled(span.content.clone(), span.style.patch(selected)))
            .collect::<Vec<_>>(),
    )
}

/// Plain text of rendered lines, joined with newlines.
pub fn plain_text(lines: &[Line<'_>]) -> String {
    lines
        .iter()
        .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}
