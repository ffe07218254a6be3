mod components;
mod view;

pub use view::{ToggleLabels, UiContext, draw};
