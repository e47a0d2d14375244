use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};
use unicode_width::UnicodeWidthStr;

use keydrill::keyboard::{normalize, KEYBOARD_ROWS};

const SPACE_BAR: &str = "         space         ";

/// On-screen keyboard: drilled keys lit, the next expected key highlighted
pub struct KeyboardWidget<'a> {
    active: &'a [char],
    expected: Option<char>,
}

impl<'a> KeyboardWidget<'a> {
    pub fn new(active: &'a [char], expected: Option<char>) -> Self {
        Self {
            active,
            expected: expected.map(normalize),
        }
    }

    fn style_for(&self, key: char) -> Style {
        if self.expected == Some(key) {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else if self.active.contains(&key) {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        }
    }

    fn row_line(&self, row: &[char]) -> Line<'static> {
        Line::from(
            row.iter()
                .map(|k| Span::styled(format!(" {k} "), self.style_for(*k)))
                .collect::<Vec<_>>(),
        )
    }
}

impl Widget for KeyboardWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default().borders(Borders::ALL);
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines: Vec<Line> = KEYBOARD_ROWS
            .iter()
            .map(|row| self.row_line(row))
            .collect();
        lines.push(Line::from(Span::styled(SPACE_BAR, self.style_for(' '))));

        let widest = lines.iter().map(Line::width).max().unwrap_or(0) as u16;
        let left = inner.x + inner.width.saturating_sub(widest) / 2;

        for (row, line) in lines.iter().enumerate() {
            let y = inner.y + row as u16;
            if y >= inner.bottom() {
                break;
            }
            // staggered like a physical board; the space bar sits centred
            let offset = if row < KEYBOARD_ROWS.len() {
                row as u16
            } else {
                widest.saturating_sub(SPACE_BAR.width() as u16) / 2
            };
            let x = (left + offset).min(inner.right());
            buf.set_line(x, y, line, inner.right() - x);
        }
    }
}
