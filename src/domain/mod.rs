mod datasource;
mod document;
mod link;
mod suggestion;

pub use datasource::DataSourceRef;
pub use document::{DocumentShape, LinkDocument};
pub use link::DataLinkConfig;
pub use suggestion::{SuggestionOrigin, VariableSuggestion};
