mod editor;
mod entries;
mod footer;
mod layout;
mod popup;

pub use editor::render_editor;
pub use entries::render_entries;
pub use footer::render_footer;
pub use popup::render_popup;
