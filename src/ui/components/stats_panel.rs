use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::engine::stats::SessionStats;
use crate::ui::layout::format_clock;
use crate::ui::theme::Theme;

/// Session summary: counts, accuracy, response times and the words still
/// not known.
pub struct StatsPanel<'a> {
    title: &'a str,
    stats: &'a SessionStats,
    elapsed_secs: Option<u64>,
    high_score_secs: u64,
    theme: &'a Theme,
}

impl<'a> StatsPanel<'a> {
    pub fn new(title: &'a str, stats: &'a SessionStats, theme: &'a Theme) -> Self {
        Self {
            title,
            stats,
            elapsed_secs: None,
            high_score_secs: 0,
            theme,
        }
    }

    pub fn with_clock(mut self, elapsed_secs: Option<u64>, high_score_secs: u64) -> Self {
        self.elapsed_secs = elapsed_secs;
        self.high_score_secs = high_score_secs;
        self
    }
}

fn format_ms(ms: Option<f64>) -> String {
    match ms {
        Some(ms) => format!("{:.1}s", ms / 1000.0),
        None => "-".to_string(),
    }
}

impl Widget for StatsPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let stats = self.stats;

        let block = Block::bordered()
            .title(format!(" {} ", self.title))
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let label = Style::default().fg(colors.text_muted());
        let value = Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD);

        let accuracy_color = if stats.accuracy >= 90.0 {
            colors.success()
        } else if stats.accuracy >= 60.0 {
            colors.warning()
        } else {
            colors.error()
        };

        let mut lines = vec![
            Line::from(vec![
                Span::styled(" Words:     ", label),
                Span::styled(stats.total_words.to_string(), value),
            ]),
            Line::from(vec![
                Span::styled(" Correct:   ", label),
                Span::styled(
                    stats.correct_words.to_string(),
                    Style::default().fg(colors.success()),
                ),
                Span::styled("  Wrong: ", label),
                Span::styled(
                    stats.incorrect_words.to_string(),
                    Style::default().fg(colors.error()),
                ),
            ]),
            Line::from(vec![
                Span::styled(" Accuracy:  ", label),
                Span::styled(
                    format!("{:.1}%", stats.accuracy),
                    Style::default()
                        .fg(accuracy_color)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled(" Response:  ", label),
                Span::styled(
                    format!(
                        "{} / {} / {}",
                        format_ms(stats.quickest_ms.map(|ms| ms as f64)),
                        format_ms(stats.average_ms),
                        format_ms(stats.slowest_ms.map(|ms| ms as f64)),
                    ),
                    value,
                ),
            ]),
            Line::from(Span::styled("            fastest / avg / slowest", label)),
        ];

        if let Some(elapsed) = self.elapsed_secs {
            lines.push(Line::from(vec![
                Span::styled(" Time:      ", label),
                Span::styled(format_clock(elapsed), value),
                Span::styled(
                    format!("  best {}", format_clock(self.high_score_secs)),
                    label,
                ),
            ]));
        }

        if !stats.unknown_words.is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                " Still to learn:",
                Style::default().fg(colors.accent()),
            )));
            let room = (inner.height as usize).saturating_sub(lines.len());
            // Leave the last row for the overflow count.
            let shown = if stats.unknown_words.len() > room {
                room.saturating_sub(1)
            } else {
                stats.unknown_words.len()
            };
            for word in &stats.unknown_words[..shown] {
                lines.push(Line::from(vec![
                    Span::styled(format!("  {}", word.source), Style::default().fg(colors.prompt())),
                    Span::styled(" \u{2192} ", label),
                    Span::styled(word.target.clone(), Style::default().fg(colors.answer())),
                ]));
            }
            let hidden = stats.unknown_words.len() - shown;
            if hidden > 0 {
                lines.push(Line::from(Span::styled(format!("  +{hidden} more"), label)));
            }
        }

        Paragraph::new(lines).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ledger::ProgressLedger;
    use crate::engine::stats::compute_stats;
    use crate::words::WordItem;

    fn buffer_text(buf: &Buffer) -> String {
        buf.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_lists_unknown_words_with_overflow() {
        let mut ledger = ProgressLedger::default();
        for id in 1..=30 {
            let word = WordItem::new(id, &format!("w{id}"), &format!("t{id}"));
            ledger.record_answer(&word, id == 1, Some(1000));
        }
        let stats = compute_stats(&ledger);
        let theme = Theme::default();

        let area = Rect::new(0, 0, 50, 14);
        let mut buf = Buffer::empty(area);
        StatsPanel::new("Stats", &stats, &theme).render(area, &mut buf);

        let text = buffer_text(&buf);
        assert!(text.contains("Still to learn"));
        assert!(text.contains("more"));
        assert!(text.contains("3.3%"));
    }

    #[test]
    fn test_empty_stats_render_dashes() {
        let stats = compute_stats(&ProgressLedger::default());
        let theme = Theme::default();
        let area = Rect::new(0, 0, 50, 10);
        let mut buf = Buffer::empty(area);
        StatsPanel::new("Stats", &stats, &theme)
            .with_clock(Some(61), 125)
            .render(area, &mut buf);

        let text = buffer_text(&buf);
        assert!(text.contains("- / - / -"));
        assert!(text.contains("1:01"));
        assert!(text.contains("best 2:05"));
    }
}
