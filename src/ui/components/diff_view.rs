use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::engine::diff::{DiffKind, DiffRun};
use crate::ui::theme::{Theme, ThemeColors};

/// Shows an edit script: removed text struck through, added text underlined.
pub struct DiffView<'a> {
    runs: &'a [DiffRun],
    theme: &'a Theme,
    title: &'a str,
}

impl<'a> DiffView<'a> {
    pub fn new(runs: &'a [DiffRun], theme: &'a Theme, title: &'a str) -> Self {
        Self { runs, theme, title }
    }
}

fn run_style(kind: DiffKind, colors: &ThemeColors) -> Style {
    match kind {
        DiffKind::Equal => Style::default().fg(colors.text_equal()),
        DiffKind::Added => Style::default()
            .fg(colors.text_added())
            .bg(colors.text_added_bg())
            .add_modifier(Modifier::UNDERLINED),
        DiffKind::Removed => Style::default()
            .fg(colors.text_removed())
            .bg(colors.text_removed_bg())
            .add_modifier(Modifier::CROSSED_OUT),
    }
}

/// Whitespace-only changes are invisible once styled, so show them as `·`.
fn display_text(run: &DiffRun) -> String {
    if run.kind == DiffKind::Equal {
        return run.text.clone();
    }
    run.text
        .chars()
        .map(|ch| if ch == ' ' { '\u{00b7}' } else { ch })
        .collect()
}

fn diff_spans<'s>(runs: &[DiffRun], colors: &ThemeColors) -> Vec<Span<'s>> {
    runs.iter()
        .map(|run| Span::styled(display_text(run), run_style(run.kind, colors)))
        .collect()
}

impl Widget for DiffView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", self.title))
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));

        let legend = Line::from(vec![
            Span::styled("missing", run_style(DiffKind::Added, colors)),
            Span::styled("  ", Style::default()),
            Span::styled("extra", run_style(DiffKind::Removed, colors)),
        ]);

        let lines = vec![
            Line::from(diff_spans(self.runs, colors)),
            Line::from(""),
            legend,
        ];

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}
