mod format;
mod input;
mod output;

pub use format::DocumentFormat;
pub use input::{parse_document_str, parse_link_document, parse_link_document_str};
pub use output::{OutputDestination, OutputOptions, emit, serialize_document};
