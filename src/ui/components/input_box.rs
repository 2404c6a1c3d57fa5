use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::ui::text_input::TextInput;
use crate::ui::theme::Theme;

/// Bordered editor for a `TextInput`, with a block cursor.
pub struct InputBox<'a> {
    input: &'a TextInput,
    theme: &'a Theme,
    title: &'a str,
    focused: bool,
}

impl<'a> InputBox<'a> {
    pub fn new(input: &'a TextInput, theme: &'a Theme, title: &'a str) -> Self {
        Self {
            input,
            theme,
            title,
            focused: true,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }
}

impl Widget for InputBox<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let text_style = Style::default().fg(colors.fg());
        let cursor_style = Style::default().fg(colors.cursor_fg()).bg(colors.cursor_bg());

        let (before, cursor_ch, after) = self.input.render_parts();

        // Lines are built by hand so the cursor survives embedded newlines.
        let mut lines: Vec<Line> = Vec::new();
        let mut current: Vec<Span> = Vec::new();
        for (i, part) in before.split('\n').enumerate() {
            if i > 0 {
                lines.push(Line::from(std::mem::take(&mut current)));
            }
            current.push(Span::styled(part.to_string(), text_style));
        }
        if self.focused {
            match cursor_ch {
                Some('\n') | None => current.push(Span::styled(" ", cursor_style)),
                Some(ch) => current.push(Span::styled(ch.to_string(), cursor_style)),
            }
        } else if let Some(ch) = cursor_ch.filter(|&c| c != '\n') {
            current.push(Span::styled(ch.to_string(), text_style));
        }
        let rest_starts_new_line = cursor_ch == Some('\n');
        for (i, part) in after.split('\n').enumerate() {
            if i > 0 || rest_starts_new_line {
                lines.push(Line::from(std::mem::take(&mut current)));
            }
            current.push(Span::styled(part.to_string(), text_style));
        }
        lines.push(Line::from(current));

        let border = if self.focused {
            colors.border_focused()
        } else {
            colors.border()
        };
        let block = Block::bordered()
            .title(format!(" {} ", self.title))
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(colors.bg()));

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}
