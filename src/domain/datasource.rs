use serde::{Deserialize, Serialize};

/// A data source the picker can offer as an internal link target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSourceRef {
    pub uid: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub plugin_type: String,
    #[serde(default)]
    pub tracing: bool,
}

impl DataSourceRef {
    pub fn new(uid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_type(mut self, plugin_type: impl Into<String>) -> Self {
        self.plugin_type = plugin_type.into();
        self
    }

    pub fn with_tracing(mut self, tracing: bool) -> Self {
        self.tracing = tracing;
        self
    }

    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.uid
        } else {
            &self.name
        }
    }
}
