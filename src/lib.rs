#![deny(rust_2018_idioms)]

mod app;
mod domain;
mod form;
mod io;
mod presentation;

pub use app::{DataLinkUI, UiOptions};
pub use domain::{
    DataLinkConfig, DataSourceRef, DocumentShape, LinkDocument, SuggestionOrigin,
    VariableSuggestion,
};
pub use form::{
    Control, DataLinkEditor, EXTERNAL_URL_PLACEHOLDER, EditorOutcome, EditorProps, FIELD_TOOLTIP,
    INTERNAL_URL_PLACEHOLDER, InternalLinkVisibility, PickerKind, PickerState, URL_LABEL_TOOLTIP,
    reconcile,
};
pub use io::{
    DocumentFormat, OutputDestination, OutputOptions, emit, parse_document_str,
    parse_link_document, parse_link_document_str, serialize_document,
};

pub mod prelude {
    pub use super::{
        DataLinkConfig, DataLinkEditor, DataLinkUI, EditorOutcome, EditorProps, UiOptions,
    };
}
