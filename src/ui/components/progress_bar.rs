use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, Widget};

use crate::ui::theme::Theme;

/// Horizontal gauge for a 0..=100 percentage with an optional detail suffix.
pub struct ProgressBar<'a> {
    pub label: String,
    pub percent: u8,
    pub detail: Option<String>,
    pub theme: &'a Theme,
}

impl<'a> ProgressBar<'a> {
    pub fn new(label: &str, percent: u8, theme: &'a Theme) -> Self {
        Self {
            label: label.to_string(),
            percent: percent.min(100),
            detail: None,
            theme,
        }
    }

    pub fn detail(mut self, detail: String) -> Self {
        self.detail = Some(detail);
        self
    }
}

impl Widget for ProgressBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", self.label))
            .border_style(Style::default().fg(colors.border()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let filled_width = (u32::from(self.percent) * u32::from(inner.width) / 100) as u16;
        let label = match &self.detail {
            Some(detail) => format!("{}%  {detail}", self.percent),
            None => format!("{}%", self.percent),
        };

        for x in inner.x..inner.x + inner.width {
            let style = if x < inner.x + filled_width {
                Style::default().fg(colors.bg()).bg(colors.bar_filled())
            } else {
                Style::default().fg(colors.fg()).bg(colors.bar_empty())
            };
            buf[(x, inner.y)].set_style(style);
        }

        let label_width = label.chars().count() as u16;
        let label_x = inner.x + (inner.width.saturating_sub(label_width)) / 2;
        buf.set_string(label_x, inner.y, &label, Style::default().fg(colors.fg()));
    }
}
