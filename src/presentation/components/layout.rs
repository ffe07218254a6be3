use ratatui::layout::Rect;

/// Centers a `width` x `height` box inside `area`, shrinking it to fit.
pub fn centered_in(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
