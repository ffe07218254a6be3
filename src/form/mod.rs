mod editor;
mod picker;
mod text;
mod visibility;

pub use editor::{
    Control, DataLinkEditor, EXTERNAL_URL_PLACEHOLDER, EditorOutcome, EditorProps,
    FIELD_TOOLTIP, INTERNAL_URL_PLACEHOLDER, URL_LABEL_TOOLTIP,
};
pub use picker::{PickerKind, PickerState};
pub use visibility::{InternalLinkVisibility, reconcile};
