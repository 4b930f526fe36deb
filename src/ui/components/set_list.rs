use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use rust_i18n::t;

use lexdrill::session::GameMode;
use lexdrill::sets::{ALL_WORDS_ID, SetSelection, WordSet};

use crate::ui::theme::Theme;

/// Row ids in display order: the "all words" entry, then every stored set.
pub fn row_ids(sets: &[WordSet]) -> Vec<&str> {
    std::iter::once(ALL_WORDS_ID)
        .chain(sets.iter().map(|s| s.id.as_str()))
        .collect()
}

pub struct SetList<'a> {
    pub sets: &'a [WordSet],
    pub selection: &'a SetSelection,
    pub cursor: usize,
    pub mode: GameMode,
    pub theme: &'a Theme,
}

impl Widget for SetList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(t!("picker.title").to_string())
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Min(0)])
            .split(inner);

        let mode_label = match self.mode {
            GameMode::Education => t!("menu.education"),
            GameMode::Flashcard => t!("menu.flashcard"),
            GameMode::Accuracy => t!("menu.accuracy"),
            GameMode::Speed => t!("menu.speed"),
        };
        let mut header = vec![Span::styled(
            format!("  {mode_label}"),
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD),
        )];
        if self.mode.is_timed() {
            header.push(Span::styled(
                format!("  ({})", t!("picker.single_hint")),
                Style::default().fg(colors.muted()),
            ));
        }
        Paragraph::new(Line::from(header)).render(layout[0], buf);

        if self.sets.is_empty() {
            Paragraph::new(Line::from(Span::styled(
                format!("  {}", t!("picker.empty")),
                Style::default().fg(colors.warning()),
            )))
            .render(layout[1], buf);
            return;
        }

        let total_words: usize = self.sets.iter().map(|s| s.words.len()).sum();
        let rows = std::iter::once((ALL_WORDS_ID, t!("picker.all_words").to_string(), total_words))
            .chain(
                self.sets
                    .iter()
                    .map(|s| (s.id.as_str(), s.name.clone(), s.words.len())),
            );

        // Keep the cursor row on screen.
        let visible = layout[1].height as usize;
        let skip = (self.cursor + 1).saturating_sub(visible);

        let lines: Vec<Line> = rows
            .enumerate()
            .skip(skip)
            .take(visible)
            .map(|(i, (id, name, count))| {
                let is_cursor = i == self.cursor;
                let checked = if self.selection.contains(id) { "[x]" } else { "[ ]" };
                let indicator = if is_cursor { ">" } else { " " };
                let name_style = Style::default()
                    .fg(if is_cursor { colors.accent() } else { colors.fg() })
                    .add_modifier(if is_cursor {
                        Modifier::BOLD
                    } else {
                        Modifier::empty()
                    });
                Line::from(vec![
                    Span::styled(format!(" {indicator} {checked} "), name_style),
                    Span::styled(name, name_style),
                    Span::styled(
                        format!("  {}", t!("picker.words", count = count)),
                        Style::default().fg(colors.muted()),
                    ),
                ])
            })
            .collect();
        Paragraph::new(lines).render(layout[1], buf);
    }
}
