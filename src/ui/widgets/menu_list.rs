//! Tray menu widget.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
};

use crate::events::MenuEntry;
use crate::ui::terminal::TrayModel;

/// Menu list widget.
pub struct MenuList;

impl MenuList {
    /// Render the menu, or a loading note before it is installed.
    pub fn render(frame: &mut Frame, area: Rect, model: &TrayModel) {
        let block = Block::default()
            .title(" Menu ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));

        let Some(menu) = &model.menu else {
            let loading = List::new([ListItem::new(Line::from(Span::styled(
                "Loading tokens...",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::ITALIC),
            )))])
            .block(block);
            frame.render_widget(loading, area);
            return;
        };

        let rule_width = area.width.saturating_sub(4) as usize;
        let items: Vec<ListItem> = menu
            .entries()
            .iter()
            .map(|entry| match entry {
                MenuEntry::Item(item) => {
                    let mut spans = vec![Span::raw(format!("{:<8}", item.label))];
                    if !item.tooltip.is_empty() {
                        spans.push(Span::styled(
                            format!(" {}", item.tooltip),
                            Style::default().fg(Color::DarkGray),
                        ));
                    }
                    ListItem::new(Line::from(spans))
                }
                MenuEntry::Separator => ListItem::new(Line::from(Span::styled(
                    "─".repeat(rule_width),
                    Style::default().fg(Color::DarkGray),
                ))),
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("▶ ");

        let mut state = ListState::default();
        state.select(model.selected_entry_index());

        frame.render_stateful_widget(list, area, &mut state);
    }
}
