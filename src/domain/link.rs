use serde::{Deserialize, Serialize};

/// One data link rule: a log field name or pattern mapped either to an
/// external URL template or, when `datasource_uid` is set, to another data
/// source.
///
/// Values are never edited in place by the editor. Every edit produces a
/// replacement through one of the `with_*` methods.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataLinkConfig {
    #[serde(default)]
    pub field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_display_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datasource_uid: Option<String>,
}

impl DataLinkConfig {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            ..Self::default()
        }
    }

    pub fn with_field(&self, field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            ..self.clone()
        }
    }

    pub fn with_url(&self, url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..self.clone()
        }
    }

    pub fn with_url_display_label(&self, label: impl Into<String>) -> Self {
        Self {
            url_display_label: Some(label.into()),
            ..self.clone()
        }
    }

    pub fn with_datasource_uid(&self, uid: Option<String>) -> Self {
        Self {
            datasource_uid: uid,
            ..self.clone()
        }
    }

    /// The referenced data source uid, treating an empty string as absent.
    pub fn datasource_uid(&self) -> Option<&str> {
        self.datasource_uid.as_deref().filter(|uid| !uid.is_empty())
    }

    pub fn is_internal(&self) -> bool {
        self.datasource_uid().is_some()
    }

    pub fn url_text(&self) -> &str {
        self.url.as_deref().unwrap_or_default()
    }

    pub fn url_display_label_text(&self) -> &str {
        self.url_display_label.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn overrides_leave_the_source_untouched() {
        let original = DataLinkConfig {
            field: "msg".into(),
            url: Some("http://example.com/${__value.raw}".into()),
            url_display_label: Some("Open".into()),
            datasource_uid: None,
        };
        let renamed = original.with_field("message");
        assert_eq!(original.field, "msg");
        assert_eq!(renamed.field, "message");
        assert_eq!(renamed.url, original.url);
        assert_eq!(renamed.url_display_label, original.url_display_label);
    }

    #[test]
    fn empty_uid_counts_as_absent() {
        let link = DataLinkConfig::new("traceId").with_datasource_uid(Some(String::new()));
        assert_eq!(link.datasource_uid(), None);
        assert!(!link.is_internal());
    }

    #[test]
    fn serializes_camel_case_and_skips_missing_optionals() {
        let link = DataLinkConfig::new("traceId").with_datasource_uid(Some("tempo".into()));
        let value = serde_json::to_value(&link).unwrap();
        assert_eq!(value, json!({"field": "traceId", "datasourceUid": "tempo"}));
    }

    #[test]
    fn deserializes_partial_documents() {
        let link: DataLinkConfig =
            serde_json::from_value(json!({"urlDisplayLabel": "View"})).unwrap();
        assert_eq!(link.field, "");
        assert_eq!(link.url_display_label.as_deref(), Some("View"));
        assert_eq!(link.url_text(), "");
    }
}
