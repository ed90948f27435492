use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::session::card::CardView;
use crate::ui::theme::Theme;

pub struct WordCard<'a> {
    card: &'a CardView,
    position: (usize, usize),
    theme: &'a Theme,
}

impl<'a> WordCard<'a> {
    /// `position` is the 1-based card number and the roster size.
    pub fn new(card: &'a CardView, position: (usize, usize), theme: &'a Theme) -> Self {
        Self {
            card,
            position,
            theme,
        }
    }
}

fn language_label(language: &str) -> String {
    if language.is_empty() {
        String::new()
    } else {
        format!("[{language}]")
    }
}

impl Widget for WordCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let (number, total) = self.position;

        let block = Block::bordered()
            .title(format!(" Card {number}/{total} "))
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage(20),
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Min(0),
            ])
            .split(inner);

        let prompt = Paragraph::new(vec![
            Line::from(Span::styled(
                language_label(&self.card.prompt_language),
                Style::default().fg(colors.text_muted()),
            )),
            Line::from(Span::styled(
                self.card.prompt.as_str(),
                Style::default()
                    .fg(colors.prompt())
                    .add_modifier(Modifier::BOLD),
            )),
        ])
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
        prompt.render(layout[1], buf);

        let rule_width = (inner.width / 3) as usize;
        Paragraph::new(Line::from(Span::styled(
            "\u{2500}".repeat(rule_width),
            Style::default().fg(colors.border()),
        )))
        .alignment(Alignment::Center)
        .render(layout[2], buf);

        let answer_style = if self.card.concealed {
            Style::default()
                .fg(colors.concealed())
                .add_modifier(Modifier::DIM)
        } else {
            Style::default()
                .fg(colors.answer())
                .add_modifier(Modifier::BOLD)
        };
        let answer = Paragraph::new(vec![
            Line::from(Span::styled(
                language_label(&self.card.answer_language),
                Style::default().fg(colors.text_muted()),
            )),
            Line::from(Span::styled(self.card.answer.as_str(), answer_style)),
        ])
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
        answer.render(layout[3], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::words::WordItem;

    fn buffer_text(buf: &Buffer) -> String {
        buf.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_renders_prompt_and_revealed_answer() {
        let theme = Theme::default();
        let word = WordItem::new(3, "Haus", "house").with_languages("de", "en");
        let card = CardView::project(&word, false, false);

        let area = Rect::new(0, 0, 40, 14);
        let mut buf = Buffer::empty(area);
        WordCard::new(&card, (1, 5), &theme).render(area, &mut buf);

        let text = buffer_text(&buf);
        assert!(text.contains("Card 1/5"));
        assert!(text.contains("Haus"));
        assert!(text.contains("house"));
        assert!(text.contains("[de]"));
    }

    #[test]
    fn test_concealed_answer_is_not_shown_in_clear() {
        let theme = Theme::default();
        let word = WordItem::new(11, "gehen", "to walk around");
        let card = CardView::project(&word, false, true);
        assert_ne!(card.answer, "to walk around");

        let area = Rect::new(0, 0, 40, 14);
        let mut buf = Buffer::empty(area);
        WordCard::new(&card, (1, 1), &theme).render(area, &mut buf);

        assert!(!buffer_text(&buf).contains("to walk around"));
    }
}
