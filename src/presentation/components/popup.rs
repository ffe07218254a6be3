use ratatui::{
    Frame,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, List, ListItem, ListState},
};
use unicode_width::UnicodeWidthStr;

use crate::form::PickerState;

use super::layout::centered_in;

pub fn render_popup(frame: &mut Frame<'_>, popup: &PickerState) {
    let options = popup.options();
    if options.is_empty() {
        return;
    }
    let max_width = options
        .iter()
        .map(|option| UnicodeWidthStr::width(option.as_str()))
        .max()
        .unwrap_or(10)
        .max(popup.title().len()) as u16;
    let width_limit = frame.area().width.saturating_sub(2).max(1);
    let width = (max_width.saturating_add(6)).min(width_limit);
    let height = options
        .len()
        .saturating_add(2)
        .min(frame.area().height as usize) as u16;
    let area = centered_in(frame.area(), width, height.max(3));
    frame.render_widget(Clear, area);

    let items: Vec<ListItem<'static>> = options
        .iter()
        .map(|option| ListItem::new(option.clone()))
        .collect();
    let mut state = ListState::default();
    state.select(Some(popup.selected().min(options.len().saturating_sub(1))));

    let list = List::new(items)
        .block(
            Block::default()
                .title(popup.title().to_string())
                .borders(Borders::ALL),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("» ");

    frame.render_stateful_widget(list, area, &mut state);
}
