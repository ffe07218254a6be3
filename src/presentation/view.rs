use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    widgets::{Block, Borders, Paragraph},
};

use crate::{
    domain::{DataLinkConfig, DataSourceRef},
    form::DataLinkEditor,
};

use super::components::{render_editor, render_entries, render_footer, render_popup};

pub struct UiContext<'a> {
    pub title: Option<&'a str>,
    pub links: &'a [DataLinkConfig],
    pub selected: usize,
    pub editor: Option<&'a DataLinkEditor>,
    pub datasources: &'a [DataSourceRef],
    pub status_message: &'a str,
    pub dirty: bool,
    pub help: Option<&'a str>,
    pub toggle_labels: ToggleLabels<'a>,
}

#[derive(Debug, Clone, Copy)]
pub struct ToggleLabels<'a> {
    pub on: &'a str,
    pub off: &'a str,
}

pub fn draw(frame: &mut Frame<'_>, ctx: UiContext<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(7), Constraint::Length(4)])
        .split(frame.area());
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(32), Constraint::Min(20)])
        .split(chunks[0]);

    render_entries(frame, body[0], &ctx);

    let value = ctx.links.get(ctx.selected);
    match (ctx.editor, value) {
        (Some(editor), Some(value)) => {
            render_editor(frame, body[1], editor, value, &ctx);
            if let Some(popup) = editor.popup() {
                render_popup(frame, popup);
            }
        }
        _ => render_editor_placeholder(frame, body[1]),
    }

    render_footer(frame, chunks[1], &ctx);
}

fn render_editor_placeholder(frame: &mut Frame<'_>, area: Rect) {
    let placeholder = Paragraph::new("No data links. Press Ctrl+N to add one.")
        .block(Block::default().title("Data link").borders(Borders::ALL));
    frame.render_widget(placeholder, area);
}
