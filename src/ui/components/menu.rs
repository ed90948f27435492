use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::session::SessionMode;
use crate::ui::theme::Theme;

pub struct MenuItem {
    pub label: String,
    /// Saved exam progress for this source is finished.
    pub completed: bool,
}

/// Source list plus the mode a session will start in.
pub struct Menu<'a> {
    pub items: Vec<MenuItem>,
    pub selected: usize,
    pub mode: SessionMode,
    pub theme: &'a Theme,
}

impl<'a> Menu<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self {
            items: Vec::new(),
            selected: 0,
            mode: SessionMode::Exam,
            theme,
        }
    }

    pub fn next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.selected = (self.selected + 1) % self.items.len();
    }

    pub fn prev(&mut self) {
        if self.items.is_empty() {
            return;
        }
        if self.selected > 0 {
            self.selected -= 1;
        } else {
            self.selected = self.items.len() - 1;
        }
    }
}

impl Widget for &Menu<'_> {
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
                Constraint::Length(2),
                Constraint::Min(0),
            ])
            .split(inner);

        let title_lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "wordtrainer",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Vocabulary Flashcards",
                Style::default().fg(colors.fg()),
            )),
        ];
        Paragraph::new(title_lines)
            .alignment(Alignment::Center)
            .render(layout[0], buf);

        let mode_spans: Vec<Span> = SessionMode::ALL
            .iter()
            .flat_map(|&mode| {
                let style = if mode == self.mode {
                    Style::default()
                        .fg(colors.bg())
                        .bg(colors.accent())
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(colors.text_muted())
                };
                [Span::styled(format!(" {} ", mode.label()), style), Span::raw("  ")]
            })
            .collect();
        Paragraph::new(Line::from(mode_spans))
            .alignment(Alignment::Center)
            .render(layout[1], buf);

        let list_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(
                self.items
                    .iter()
                    .map(|_| Constraint::Length(1))
                    .collect::<Vec<_>>(),
            )
            .split(layout[2]);

        for (i, item) in self.items.iter().enumerate() {
            let is_selected = i == self.selected;
            let indicator = if is_selected { ">" } else { " " };

            let mut spans = vec![Span::styled(
                format!(" {indicator} {}", item.label),
                Style::default()
                    .fg(if is_selected { colors.accent() } else { colors.fg() })
                    .add_modifier(if is_selected {
                        Modifier::BOLD
                    } else {
                        Modifier::empty()
                    }),
            )];
            if item.completed {
                spans.push(Span::styled(
                    "  \u{2713} done",
                    Style::default().fg(colors.success()),
                ));
            }

            if i < list_layout.len() {
                Paragraph::new(Line::from(spans)).render(list_layout[i], buf);
            }
        }
    }
}
