use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::session::result::SessionSummary;
use crate::ui::theme::Theme;

pub struct SessionHeader<'a> {
    pub screen_title: &'a str,
    pub sentence_count: usize,
    pub summary: &'a SessionSummary,
    pub theme: &'a Theme,
}

pub fn header_info(sentence_count: usize, summary: &SessionSummary) -> String {
    let noun = if sentence_count == 1 { "sentence" } else { "sentences" };
    let mut info = format!(" {sentence_count} {noun}");
    if summary.total() > 0 {
        info.push_str(&format!(
            " | {}/{} correct ({:.0}%)",
            summary.correct_count(),
            summary.total(),
            summary.accuracy()
        ));
    }
    if summary.streak > 1 {
        info.push_str(&format!(" | streak {}", summary.streak));
    }
    info
}

impl Widget for SessionHeader<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let line = Line::from(vec![
            Span::styled(
                " recite ",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("| {} ", self.screen_title),
                Style::default().fg(colors.header_fg()),
            ),
            Span::styled(
                header_info(self.sentence_count, self.summary),
                Style::default().fg(colors.text_muted()),
            ),
        ]);

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.header_bg()));

        Paragraph::new(line).block(block).render(area, buf);
    }
}
