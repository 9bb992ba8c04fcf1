//! Key hint line.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

const HINTS: [(&str, &str); 4] = [
    ("j/↓", "down"),
    ("k/↑", "up"),
    ("Enter", "toggle"),
    ("q", "quit"),
];

/// Bottom line listing the keys.
pub struct HelpLine;

impl HelpLine {
    /// Render the key hints.
    pub fn render(frame: &mut Frame, area: Rect) {
        let mut spans = vec![Span::raw(" ")];
        for (key, action) in HINTS {
            spans.push(Span::styled(key, Style::default().fg(Color::Cyan)));
            spans.push(Span::styled(
                format!(" {action}  "),
                Style::default().fg(Color::DarkGray),
            ));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}
