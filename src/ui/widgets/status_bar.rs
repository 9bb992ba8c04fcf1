//! Indicator line widget.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::ui::terminal::TrayModel;

/// The always-visible ticker line.
pub struct StatusBar;

impl StatusBar {
    /// Render the indicator text.
    pub fn render(frame: &mut Frame, area: Rect, model: &TrayModel) {
        let ticker = Span::styled(
            format!(" {} ", model.title),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );

        let updated = model
            .updated_at
            .map(|at| format!(" {} ", at.format("%H:%M:%S")))
            .unwrap_or_default();
        let updated = Span::styled(updated, Style::default().fg(Color::Gray));

        // Calculate padding for right-aligned update time
        let left_len = ticker.content.chars().count();
        let right_len = updated.content.chars().count();
        let padding = (area.width as usize).saturating_sub(left_len + right_len);

        let line = Line::from(vec![ticker, Span::raw(" ".repeat(padding)), updated]);
        let paragraph = Paragraph::new(line).style(Style::default().bg(Color::DarkGray));

        frame.render_widget(paragraph, area);
    }
}
