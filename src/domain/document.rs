use serde::{Deserialize, Serialize, Serializer};

use super::{DataLinkConfig, DataSourceRef, VariableSuggestion};

/// How a document was laid out when it was read. Serialization writes it
/// back the same way.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DocumentShape {
    /// `{"dataLinks": [...], "datasources": [...], "suggestions": [...]}`
    #[default]
    Document,
    /// A bare `[...]` of data links.
    List,
}

/// The document edited by the command-line front end: the list of data
/// links together with the context the editors need.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkDocument {
    #[serde(default)]
    pub data_links: Vec<DataLinkConfig>,
    #[serde(default)]
    pub datasources: Vec<DataSourceRef>,
    #[serde(default)]
    pub suggestions: Vec<VariableSuggestion>,
    #[serde(skip)]
    pub shape: DocumentShape,
}

impl LinkDocument {
    pub fn new(data_links: Vec<DataLinkConfig>) -> Self {
        Self {
            data_links,
            ..Self::default()
        }
    }

    /// A document read from a bare list; it serializes back to a list.
    pub fn list(data_links: Vec<DataLinkConfig>) -> Self {
        Self {
            data_links,
            shape: DocumentShape::List,
            ..Self::default()
        }
    }

    pub fn with_data_links(mut self, data_links: Vec<DataLinkConfig>) -> Self {
        self.data_links = data_links;
        self
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DocumentBody<'a> {
    data_links: &'a [DataLinkConfig],
    #[serde(skip_serializing_if = "is_empty")]
    datasources: &'a [DataSourceRef],
    #[serde(skip_serializing_if = "is_empty")]
    suggestions: &'a [VariableSuggestion],
}

fn is_empty<T>(items: &&[T]) -> bool {
    items.is_empty()
}

impl Serialize for LinkDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.shape {
            DocumentShape::List => self.data_links.serialize(serializer),
            DocumentShape::Document => DocumentBody {
                data_links: &self.data_links,
                datasources: &self.datasources,
                suggestions: &self.suggestions,
            }
            .serialize(serializer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn list_documents_serialize_as_lists() {
        let document = LinkDocument::list(vec![DataLinkConfig::new("msg")])
            .with_data_links(vec![DataLinkConfig::new("message")]);
        assert_eq!(
            serde_json::to_value(&document).unwrap(),
            json!([{"field": "message"}])
        );
    }

    #[test]
    fn full_documents_skip_empty_context() {
        let document = LinkDocument::new(vec![DataLinkConfig::new("msg")]);
        assert_eq!(
            serde_json::to_value(&document).unwrap(),
            json!({"dataLinks": [{"field": "msg"}]})
        );
    }
}
