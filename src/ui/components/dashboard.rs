use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use rust_i18n::t;

use lexdrill::session::DrillKind;
use lexdrill::session::result::DrillResult;

use crate::ui::theme::Theme;

/// Headline figure for a result: words per minute for speed, accuracy otherwise.
pub fn headline(result: &DrillResult) -> String {
    match (result.kind, result.words_per_minute) {
        (DrillKind::Speed, Some(wpm)) => format!("{wpm:.1} {}", t!("result.wpm")),
        _ => format!("{:.1}%", result.accuracy),
    }
}

pub struct Dashboard<'a> {
    pub result: &'a DrillResult,
    pub previous: Option<&'a DrillResult>,
    pub theme: &'a Theme,
}

impl<'a> Dashboard<'a> {
    pub fn new(result: &'a DrillResult, previous: Option<&'a DrillResult>, theme: &'a Theme) -> Self {
        Self {
            result,
            previous,
            theme,
        }
    }

    fn row(&self, label: String, value: String, value_style: Style) -> Line<'static> {
        let colors = &self.theme.colors;
        Line::from(vec![
            Span::styled(format!("  {label:<12}"), Style::default().fg(colors.fg())),
            Span::styled(value, value_style),
        ])
    }
}

impl Widget for Dashboard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let result = self.result;

        let block = Block::bordered()
            .title(t!("result.title").to_string())
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(7),
                Constraint::Length(2),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(inner);

        Paragraph::new(Line::from(Span::styled(
            headline(result),
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .render(layout[0], buf);

        let acc_color = if result.accuracy >= 95.0 {
            colors.success()
        } else if result.accuracy >= 80.0 {
            colors.warning()
        } else {
            colors.error()
        };
        let plain = Style::default().fg(colors.fg());
        let mut rows = vec![
            self.row(
                t!("result.accuracy").to_string(),
                format!("{:.1}%", result.accuracy),
                Style::default().fg(acc_color).add_modifier(Modifier::BOLD),
            ),
            self.row(
                t!("result.correct").to_string(),
                format!("{}/{}", result.correct_count, result.total_attempts),
                plain,
            ),
            self.row(
                t!("result.errors").to_string(),
                result.error_count.to_string(),
                Style::default().fg(if result.error_count == 0 {
                    colors.success()
                } else {
                    colors.error()
                }),
            ),
            self.row(
                t!("result.skipped").to_string(),
                result.skipped_count.to_string(),
                plain,
            ),
            self.row(
                t!("result.words").to_string(),
                result.words_completed.to_string(),
                plain,
            ),
            self.row(
                t!("result.time").to_string(),
                format!("{:.1}s", result.time_spent_secs),
                plain,
            ),
        ];
        if let Some(wpm) = result.words_per_minute {
            rows.push(self.row(t!("result.wpm").to_string(), format!("{wpm:.1}"), plain));
        }
        Paragraph::new(rows).render(layout[1], buf);

        let note = if result.user_id.is_none() {
            Span::styled(t!("result.guest").to_string(), Style::default().fg(colors.warning()))
        } else if let Some(previous) = self.previous {
            Span::styled(
                t!("result.best", value = headline(previous)).to_string(),
                Style::default().fg(colors.muted()),
            )
        } else {
            Span::styled(t!("result.no_best").to_string(), Style::default().fg(colors.muted()))
        };
        Paragraph::new(Line::from(note))
            .alignment(Alignment::Center)
            .render(layout[2], buf);

        Paragraph::new(Line::from(Span::styled(
            t!("result.footer").to_string(),
            Style::default().fg(colors.accent()),
        )))
        .render(layout[4], buf);
    }
}
