use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use rust_i18n::t;

use lexdrill::session::GameMode;

use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAction {
    Start(GameMode),
    PickSets,
    Settings,
}

pub struct MenuItem {
    pub key: char,
    pub action: MenuAction,
}

impl MenuItem {
    fn label(&self) -> String {
        match self.action {
            MenuAction::Start(GameMode::Education) => t!("menu.education").to_string(),
            MenuAction::Start(GameMode::Flashcard) => t!("menu.flashcard").to_string(),
            MenuAction::Start(GameMode::Accuracy) => t!("menu.accuracy").to_string(),
            MenuAction::Start(GameMode::Speed) => t!("menu.speed").to_string(),
            MenuAction::PickSets => t!("menu.sets").to_string(),
            MenuAction::Settings => t!("menu.settings").to_string(),
        }
    }

    fn description(&self, selection: &str) -> String {
        match self.action {
            MenuAction::Start(GameMode::Education) => t!("menu.education_desc").to_string(),
            MenuAction::Start(GameMode::Flashcard) => t!("menu.flashcard_desc").to_string(),
            MenuAction::Start(GameMode::Accuracy) => t!("menu.accuracy_desc").to_string(),
            MenuAction::Start(GameMode::Speed) => t!("menu.speed_desc").to_string(),
            MenuAction::PickSets => t!("menu.sets_desc", sets = selection).to_string(),
            MenuAction::Settings => t!("menu.settings_desc").to_string(),
        }
    }
}

pub struct Menu {
    pub items: Vec<MenuItem>,
    pub selected: usize,
}

impl Default for Menu {
    fn default() -> Self {
        Self::new()
    }
}

impl Menu {
    pub fn new() -> Self {
        let mut items: Vec<MenuItem> = GameMode::ALL
            .iter()
            .zip(['1', '2', '3', '4'])
            .map(|(mode, key)| MenuItem {
                key,
                action: MenuAction::Start(*mode),
            })
            .collect();
        items.push(MenuItem {
            key: 'p',
            action: MenuAction::PickSets,
        });
        items.push(MenuItem {
            key: 'c',
            action: MenuAction::Settings,
        });
        Self { items, selected: 0 }
    }

    pub fn next(&mut self) {
        self.selected = (self.selected + 1) % self.items.len();
    }

    pub fn prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        } else {
            self.selected = self.items.len() - 1;
        }
    }

    pub fn selected_action(&self) -> Option<MenuAction> {
        self.items.get(self.selected).map(|item| item.action)
    }

    pub fn action_for_key(&self, key: char) -> Option<MenuAction> {
        self.items.iter().find(|item| item.key == key).map(|item| item.action)
    }
}

/// The menu plus the label of the current set selection.
pub struct MenuView<'a> {
    pub menu: &'a Menu,
    pub selection_label: &'a str,
    pub theme: &'a Theme,
}

impl Widget for MenuView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(inner);

        let title_lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                t!("app.name").to_string(),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                t!("app.tagline").to_string(),
                Style::default().fg(colors.fg()),
            )),
        ];
        Paragraph::new(title_lines)
            .alignment(Alignment::Center)
            .render(layout[0], buf);

        let menu_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(
                self.menu
                    .items
                    .iter()
                    .map(|_| Constraint::Length(3))
                    .collect::<Vec<_>>(),
            )
            .split(layout[2]);

        for (i, item) in self.menu.items.iter().enumerate() {
            let is_selected = i == self.menu.selected;
            let indicator = if is_selected { ">" } else { " " };

            let label_text = format!(" {indicator} [{}] {}", item.key, item.label());
            let desc_text = format!("     {}", item.description(self.selection_label));

            let label_style = Style::default()
                .fg(if is_selected { colors.accent() } else { colors.fg() })
                .add_modifier(if is_selected {
                    Modifier::BOLD
                } else {
                    Modifier::empty()
                });

            let lines = vec![
                Line::from(Span::styled(label_text, label_style)),
                Line::from(Span::styled(desc_text, Style::default().fg(colors.muted()))),
            ];

            if i < menu_layout.len() {
                Paragraph::new(lines).render(menu_layout[i], buf);
            }
        }
    }
}
