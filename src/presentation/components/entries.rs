use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::domain::{DataLinkConfig, DataSourceRef};

use super::super::view::UiContext;

pub fn render_entries(frame: &mut Frame<'_>, area: Rect, ctx: &UiContext<'_>) {
    let title = match ctx.title {
        Some(title) => format!("{title} ({})", ctx.links.len()),
        None => format!("Data links ({})", ctx.links.len()),
    };
    if ctx.links.is_empty() {
        let placeholder =
            Paragraph::new("No entries").block(Block::default().title(title).borders(Borders::ALL));
        frame.render_widget(placeholder, area);
        return;
    }

    let items: Vec<ListItem<'static>> = ctx
        .links
        .iter()
        .enumerate()
        .map(|(index, link)| ListItem::new(entry_lines(index, link, ctx.datasources)))
        .collect();
    let mut state = ListState::default();
    state.select(Some(ctx.selected.min(ctx.links.len() - 1)));

    let list = List::new(items)
        .block(Block::default().title(title).borders(Borders::ALL))
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("» ");
    frame.render_stateful_widget(list, area, &mut state);
}

fn entry_lines(index: usize, link: &DataLinkConfig, datasources: &[DataSourceRef]) -> Vec<Line<'static>> {
    let name = if link.field.is_empty() {
        "<unnamed>".to_string()
    } else {
        link.field.clone()
    };
    let target = match link.datasource_uid() {
        Some(uid) => {
            let label = datasources
                .iter()
                .find(|ds| ds.uid == uid)
                .map(|ds| ds.display_name().to_string())
                .unwrap_or_else(|| uid.to_string());
            Span::styled(format!("  → {label}"), Style::default().fg(Color::Magenta))
        }
        None if !link.url_text().is_empty() => Span::styled(
            format!("  ↗ {}", link.url_text()),
            Style::default().fg(Color::Gray),
        ),
        None => Span::styled("  (no target)", Style::default().fg(Color::DarkGray)),
    };
    vec![
        Line::from(vec![
            Span::styled(format!("{}. ", index + 1), Style::default().fg(Color::DarkGray)),
            Span::styled(name, Style::default().add_modifier(Modifier::BOLD)),
        ]),
        Line::from(target),
    ]
}
