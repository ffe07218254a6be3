mod datalink_ui;
mod keymap;
mod options;
mod runtime;
mod status;
mod terminal;

pub use datalink_ui::DataLinkUI;
pub use options::UiOptions;
