use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};
use rust_i18n::t;

use crate::ui::answer_input::AnswerInput;
use crate::ui::theme::Theme;

/// How the previous answer went, shown under the input line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum AnswerStatus {
    #[default]
    None,
    Correct,
    /// Wrong, with the accepted answers shown.
    Wrong { answers: String },
    /// Wrong, answers withheld.
    Miss,
}

/// What sits below the hint: a typed answer, or a flashcard that may be revealed.
pub enum PromptBody<'a> {
    Typed(&'a AnswerInput),
    Card { revealed: Option<&'a str> },
}

pub struct WordPrompt<'a> {
    pub hint: &'a str,
    pub body: PromptBody<'a>,
    pub status: &'a AnswerStatus,
    pub review: bool,
    pub theme: &'a Theme,
}

impl WordPrompt<'_> {
    fn body_line(&self) -> Line<'_> {
        let colors = &self.theme.colors;
        match &self.body {
            PromptBody::Typed(input) => {
                let (before, cursor, after) = input.render_parts();
                let cursor_style = Style::default()
                    .fg(colors.input_cursor_fg())
                    .bg(colors.input_cursor_bg());
                Line::from(vec![
                    Span::styled("> ", Style::default().fg(colors.accent())),
                    Span::styled(before, Style::default().fg(colors.fg())),
                    Span::styled(cursor.map_or(" ".to_string(), String::from), cursor_style),
                    Span::styled(after, Style::default().fg(colors.fg())),
                ])
            }
            PromptBody::Card {
                revealed: Some(answers),
            } => Line::from(Span::styled(
                *answers,
                Style::default()
                    .fg(colors.answer_correct())
                    .add_modifier(Modifier::BOLD),
            )),
            PromptBody::Card { revealed: None } => Line::from(Span::styled(
                t!("flashcard.reveal").to_string(),
                Style::default().fg(colors.muted()),
            )),
        }
    }

    fn status_line(&self) -> Line<'_> {
        let colors = &self.theme.colors;
        match self.status {
            AnswerStatus::None => Line::from(""),
            AnswerStatus::Correct => Line::from(Span::styled(
                t!("education.correct").to_string(),
                Style::default().fg(colors.success()),
            )),
            AnswerStatus::Wrong { answers } => Line::from(Span::styled(
                t!("education.wrong", answers = answers).to_string(),
                Style::default().fg(colors.answer_incorrect()),
            )),
            AnswerStatus::Miss => Line::from(Span::styled(
                t!("drill.miss").to_string(),
                Style::default().fg(colors.answer_incorrect()),
            )),
        }
    }
}

impl Widget for WordPrompt<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let border = if self.review {
            colors.review()
        } else {
            colors.border_focused()
        };
        let mut block = Block::bordered()
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(colors.bg()));
        if self.review {
            block = block.title(format!(" {} ", t!("education.review")));
        }
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),
                Constraint::Length(2),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(1),
            ])
            .split(inner);

        Paragraph::new(Line::from(Span::styled(
            self.hint,
            Style::default()
                .fg(colors.hint())
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(layout[1], buf);

        Paragraph::new(self.body_line())
            .alignment(Alignment::Center)
            .render(layout[2], buf);

        Paragraph::new(self.status_line())
            .alignment(Alignment::Center)
            .render(layout[3], buf);
    }
}
