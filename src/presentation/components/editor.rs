use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::{
    domain::{DataLinkConfig, DataSourceRef},
    form::{Control, DataLinkEditor},
};

use super::super::view::{ToggleLabels, UiContext};

pub fn render_editor(
    frame: &mut Frame<'_>,
    area: Rect,
    editor: &DataLinkEditor,
    value: &DataLinkConfig,
    ctx: &UiContext<'_>,
) {
    let content_width = area.width.saturating_sub(6);
    let focused = editor.focused();
    let controls = editor.controls();
    let mut items = Vec::with_capacity(controls.len());
    let mut cursor_hint: Option<CursorHint> = None;
    let mut line_offset = 0usize;

    for control in &controls {
        let render = build_control_render(
            *control,
            editor,
            value,
            ctx.datasources,
            ctx.toggle_labels,
            *control == focused,
            content_width,
        );
        if let Some(mut hint) = render.cursor_hint {
            hint.line_offset += line_offset;
            cursor_hint = Some(hint);
        }
        line_offset += render.lines.len();
        items.push(ListItem::new(render.lines));
    }

    let mut list_state = ListState::default();
    list_state.select(controls.iter().position(|control| *control == focused));

    let title = if value.field.is_empty() {
        "Data link".to_string()
    } else {
        format!("Data link: {}", value.field)
    };
    let list = List::new(items)
        .block(Block::default().title(title).borders(Borders::ALL))
        .highlight_symbol("» ");
    frame.render_stateful_widget(list, area, &mut list_state);

    if editor.popup().is_some() {
        return;
    }
    if let Some(cursor) = cursor_hint {
        let inner_height = area.height.saturating_sub(2) as usize;
        if list_state.offset() == 0 && cursor.line_offset < inner_height {
            let cursor_y = area.y + 1 + cursor.line_offset as u16;
            let cursor_x = area
                .x
                .saturating_add(1)
                .saturating_add(2)
                .saturating_add(cursor.column_offset)
                .saturating_add(cursor.value_width);
            frame.set_cursor_position((cursor_x, cursor_y));
        }
    }
}

struct ControlRender {
    lines: Vec<Line<'static>>,
    cursor_hint: Option<CursorHint>,
}

struct CursorHint {
    line_offset: usize,
    column_offset: u16,
    value_width: u16,
}

fn control_label(control: Control, editor: &DataLinkEditor) -> &'static str {
    match control {
        Control::Field => "Field",
        Control::Url => editor.url_label(),
        Control::UrlLabel => "URL Label",
        Control::Delete => "Remove",
        Control::InternalLink => "Internal Link",
        Control::DataSource => "Data source",
    }
}

fn build_control_render(
    control: Control,
    editor: &DataLinkEditor,
    value: &DataLinkConfig,
    datasources: &[DataSourceRef],
    toggle_labels: ToggleLabels<'_>,
    is_selected: bool,
    max_width: u16,
) -> ControlRender {
    let mut lines = Vec::new();
    let label_style = if is_selected {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    };
    lines.push(Line::from(Span::styled(
        control_label(control, editor),
        label_style,
    )));

    let mut cursor_hint = None;
    match control {
        Control::Field | Control::Url | Control::UrlLabel => {
            let (text, placeholder) = match control {
                Control::Field => (value.field.as_str(), None),
                Control::Url => (value.url_text(), Some(editor.url_placeholder())),
                _ => (value.url_display_label_text(), None),
            };
            let (visible, width) = clamp_tail(text, max_width.max(4) as usize);
            let span = if visible.is_empty() {
                Span::styled(
                    placeholder.unwrap_or_default().to_string(),
                    Style::default().fg(Color::DarkGray),
                )
            } else {
                Span::styled(visible, Style::default().fg(Color::White))
            };
            if is_selected {
                let border_width = span.width().max(width as usize) + 2;
                let border_style = Style::default().fg(Color::Yellow);
                lines.push(Line::from(Span::styled(
                    format!("┌{}┐", "─".repeat(border_width)),
                    border_style,
                )));
                let value_line_index = lines.len();
                let pad = border_width.saturating_sub(span.width() + 2);
                lines.push(Line::from(vec![
                    Span::styled("│ ", border_style),
                    span.patch_style(Style::default().add_modifier(Modifier::BOLD)),
                    Span::raw(" ".repeat(pad)),
                    Span::styled(" │", border_style),
                ]));
                lines.push(Line::from(Span::styled(
                    format!("└{}┘", "─".repeat(border_width)),
                    border_style,
                )));
                cursor_hint = Some(CursorHint {
                    line_offset: value_line_index,
                    column_offset: 2,
                    value_width: width,
                });
            } else {
                lines.push(Line::from(vec![Span::raw("  "), span]));
            }
        }
        Control::Delete => {
            let style = if is_selected {
                Style::default()
                    .fg(Color::White)
                    .bg(Color::Red)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Red)
            };
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled("[ × Remove field ]", style),
            ]));
        }
        Control::InternalLink => {
            let (mark, label, color) = if editor.show_internal_link() {
                ("[x]", toggle_labels.on, Color::Green)
            } else {
                ("[ ]", toggle_labels.off, Color::Gray)
            };
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(format!("{mark} {label}"), Style::default().fg(color)),
            ]));
        }
        Control::DataSource => {
            let (text, style) = match value.datasource_uid() {
                Some(uid) => (
                    datasources
                        .iter()
                        .find(|ds| ds.uid == uid)
                        .map(|ds| ds.display_name().to_string())
                        .unwrap_or_else(|| uid.to_string()),
                    Style::default().fg(Color::Magenta),
                ),
                None => (
                    "Choose a data source".to_string(),
                    Style::default().fg(Color::DarkGray),
                ),
            };
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(format!("{text} ▾"), style),
            ]));
        }
    }

    if let Some(tooltip) = control.tooltip() {
        let style = Style::default()
            .fg(Color::Gray)
            .add_modifier(Modifier::ITALIC);
        for row in textwrap::wrap(tooltip, max_width.max(12) as usize) {
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(row.into_owned(), style),
            ]));
        }
    }

    ControlRender { lines, cursor_hint }
}

/// Keeps the end of `value` visible so the cursor stays on screen.
fn clamp_tail(value: &str, max_width: usize) -> (String, u16) {
    let full = UnicodeWidthStr::width(value);
    if full <= max_width {
        return (value.to_string(), full as u16);
    }
    let mut kept = Vec::new();
    let mut width = 1usize;
    for ch in value.chars().rev() {
        let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
        if width + ch_width > max_width {
            break;
        }
        width += ch_width;
        kept.push(ch);
    }
    let mut result = String::from("…");
    result.extend(kept.into_iter().rev());
    (result, width as u16)
}

#[cfg(test)]
mod tests {
    use super::clamp_tail;

    #[test]
    fn short_values_are_untouched() {
        assert_eq!(clamp_tail("msg", 10), ("msg".to_string(), 3));
    }

    #[test]
    fn long_values_keep_their_tail() {
        let (visible, width) = clamp_tail("http://example.com/${__value.raw}", 10);
        assert_eq!(visible, "…alue.raw}");
        assert_eq!(width, 10);
    }
}
