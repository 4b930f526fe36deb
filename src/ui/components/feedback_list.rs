use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use rust_i18n::t;

use lexdrill::session::education::FeedbackEntry;

use crate::ui::theme::Theme;

/// Recently missed words with their correct answers, newest first.
pub struct FeedbackList<'a> {
    pub entries: &'a [FeedbackEntry],
    pub theme: &'a Theme,
}

impl Widget for FeedbackList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(t!("education.feedback_title").to_string())
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        if self.entries.is_empty() {
            Paragraph::new(Line::from(Span::styled(
                t!("education.no_feedback").to_string(),
                Style::default().fg(colors.muted()),
            )))
            .render(inner, buf);
            return;
        }

        let lines: Vec<Line> = self
            .entries
            .iter()
            .rev()
            .take(inner.height as usize)
            .map(|entry| {
                Line::from(vec![
                    Span::styled(format!(" {}", entry.hint), Style::default().fg(colors.hint())),
                    Span::styled(" - ", Style::default().fg(colors.muted())),
                    Span::styled(entry.answers.as_str(), Style::default().fg(colors.fg())),
                ])
            })
            .collect();
        Paragraph::new(lines).render(inner, buf);
    }
}
