use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SuggestionOrigin {
    #[default]
    Value,
    Field,
    Series,
    Fields,
    Template,
    BuiltIn,
}

/// A variable token that can be inserted into the URL/query template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableSuggestion {
    pub value: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    #[serde(default)]
    pub origin: SuggestionOrigin,
}

impl VariableSuggestion {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            documentation: None,
            origin: SuggestionOrigin::default(),
        }
    }

    pub fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = Some(documentation.into());
        self
    }

    pub fn with_origin(mut self, origin: SuggestionOrigin) -> Self {
        self.origin = origin;
        self
    }

    /// The `${__value.raw}` token offered for every log field.
    pub fn raw_value() -> Self {
        Self::new("__value.raw", "Raw value")
            .with_documentation("Raw value of the field")
            .with_origin(SuggestionOrigin::Value)
    }

    /// The text written into the template when this suggestion is chosen.
    pub fn token(&self) -> String {
        format!("${{{}}}", self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_wraps_value_in_interpolation_braces() {
        assert_eq!(VariableSuggestion::raw_value().token(), "${__value.raw}");
    }

    #[test]
    fn origin_uses_kebab_case_names() {
        let parsed: SuggestionOrigin = serde_json::from_str("\"built-in\"").unwrap();
        assert_eq!(parsed, SuggestionOrigin::BuiltIn);
    }
}
