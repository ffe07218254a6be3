use anyhow::{Context, Result, bail};
use serde_json::Value;

use crate::domain::{DataLinkConfig, LinkDocument};

use super::DocumentFormat;

/// Parse structured data in any supported format into a `serde_json::Value`.
pub fn parse_document_str(contents: &str, format: DocumentFormat) -> Result<Value> {
    match format {
        DocumentFormat::Json => {
            serde_json::from_str::<Value>(contents).with_context(|| "failed to parse JSON document")
        }
        #[cfg(feature = "yaml")]
        DocumentFormat::Yaml => {
            serde_yaml::from_str::<Value>(contents).with_context(|| "failed to parse YAML document")
        }
        #[cfg(feature = "toml")]
        DocumentFormat::Toml => contents
            .parse::<toml::Value>()
            .with_context(|| "failed to parse TOML document")
            .and_then(|value| {
                serde_json::to_value(value).context("failed to convert TOML to JSON")
            }),
    }
}

/// Interpret a parsed value as a [`LinkDocument`]. A bare array is read as
/// the `dataLinks` list with no catalogue and no suggestions, and keeps the
/// list shape when written back.
pub fn parse_link_document(value: Value) -> Result<LinkDocument> {
    match value {
        Value::Array(_) => {
            let links: Vec<DataLinkConfig> =
                serde_json::from_value(value).context("failed to read data link list")?;
            Ok(LinkDocument::list(links))
        }
        Value::Object(_) => {
            serde_json::from_value(value).context("failed to read data link document")
        }
        Value::Null => Ok(LinkDocument::default()),
        other => bail!(
            "expected a data link list or document, found {}",
            value_kind(&other)
        ),
    }
}

pub fn parse_link_document_str(contents: &str, format: DocumentFormat) -> Result<LinkDocument> {
    parse_document_str(contents, format).and_then(parse_link_document)
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DocumentShape;
    use serde_json::json;

    #[test]
    fn parse_json_documents() {
        let raw = "{\"enabled\":true}";
        let parsed = parse_document_str(raw, DocumentFormat::Json).unwrap();
        assert_eq!(parsed["enabled"], Value::Bool(true));
    }

    #[test]
    fn bare_arrays_become_link_lists() {
        let document = parse_link_document(json!([
            {"field": "traceId", "datasourceUid": "tempo"},
            {"field": "msg", "url": "http://example.com/${__value.raw}"}
        ]))
        .unwrap();
        assert_eq!(document.data_links.len(), 2);
        assert!(document.data_links[0].is_internal());
        assert!(document.datasources.is_empty());
        assert_eq!(document.shape, DocumentShape::List);
    }

    #[test]
    fn full_documents_carry_catalogue_and_suggestions() {
        let document = parse_link_document(json!({
            "dataLinks": [{"field": "traceId"}],
            "datasources": [{"uid": "tempo", "name": "Tempo", "type": "tempo", "tracing": true}],
            "suggestions": [{"value": "__value.raw", "label": "Raw value", "origin": "value"}]
        }))
        .unwrap();
        assert_eq!(document.datasources[0].plugin_type, "tempo");
        assert!(document.datasources[0].tracing);
        assert_eq!(document.suggestions[0].token(), "${__value.raw}");
    }

    #[test]
    fn scalars_are_rejected() {
        let err = parse_link_document(json!("links")).unwrap_err();
        assert!(err.to_string().contains("a string"));
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn parse_yaml_documents() {
        let raw = "dataLinks:\n  - field: traceId\n    datasourceUid: tempo\n";
        let document = parse_link_document_str(raw, DocumentFormat::Yaml).unwrap();
        assert_eq!(document.data_links[0].datasource_uid(), Some("tempo"));
    }

    #[cfg(feature = "toml")]
    #[test]
    fn parse_toml_documents() {
        let raw = "[[dataLinks]]\nfield = \"msg\"\nurl = \"http://example.com\"\n";
        let document = parse_link_document_str(raw, DocumentFormat::Toml).unwrap();
        assert_eq!(document.data_links[0].url_text(), "http://example.com");
    }
}
