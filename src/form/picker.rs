use crate::domain::{DataLinkConfig, DataSourceRef, VariableSuggestion};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerKind {
    Suggestions,
    DataSources,
}

/// A single-choice list shown over the editor. `values` holds what the
/// choice writes back; `options` is what the user sees. `typed_trigger`
/// records that a suggestion list was opened by typing `$`, which the
/// chosen token then replaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerState {
    kind: PickerKind,
    title: String,
    options: Vec<String>,
    values: Vec<String>,
    selected: usize,
    typed_trigger: bool,
}

impl PickerState {
    pub(crate) fn suggestions(
        suggestions: &[VariableSuggestion],
        typed_trigger: bool,
    ) -> Option<Self> {
        if suggestions.is_empty() {
            return None;
        }
        let options = suggestions
            .iter()
            .map(|suggestion| match suggestion.documentation.as_deref() {
                Some(doc) if !doc.is_empty() => {
                    format!("{}  {}  ({doc})", suggestion.token(), suggestion.label)
                }
                _ => format!("{}  {}", suggestion.token(), suggestion.label),
            })
            .collect();
        let values = suggestions.iter().map(VariableSuggestion::token).collect();
        Some(Self {
            kind: PickerKind::Suggestions,
            title: "Suggestions".to_string(),
            options,
            values,
            selected: 0,
            typed_trigger,
        })
    }

    /// Lists tracing data sources, preselecting the one `value` points at.
    pub(crate) fn datasources(datasources: &[DataSourceRef], value: &DataLinkConfig) -> Option<Self> {
        let candidates: Vec<&DataSourceRef> = tracing_datasources(datasources).collect();
        if candidates.is_empty() {
            return None;
        }
        let selected = value
            .datasource_uid()
            .and_then(|uid| candidates.iter().position(|ds| ds.uid == uid))
            .unwrap_or(0);
        Some(Self {
            kind: PickerKind::DataSources,
            title: "Data source".to_string(),
            options: candidates
                .iter()
                .map(|ds| ds.display_name().to_string())
                .collect(),
            values: candidates.iter().map(|ds| ds.uid.clone()).collect(),
            selected,
            typed_trigger: false,
        })
    }

    pub(crate) fn typed_trigger(&self) -> bool {
        self.typed_trigger
    }

    pub fn kind(&self) -> PickerKind {
        self.kind
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_value(&self) -> Option<&str> {
        self.values.get(self.selected).map(String::as_str)
    }

    pub(crate) fn select_previous(&mut self) {
        if self.options.is_empty() {
            return;
        }
        if self.selected == 0 {
            self.selected = self.options.len().saturating_sub(1);
        } else {
            self.selected -= 1;
        }
    }

    pub(crate) fn select_next(&mut self) {
        if self.options.is_empty() {
            return;
        }
        self.selected = (self.selected + 1) % self.options.len();
    }
}

pub(crate) fn tracing_datasources(
    datasources: &[DataSourceRef],
) -> impl Iterator<Item = &DataSourceRef> {
    datasources.iter().filter(|ds| ds.tracing)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalogue() -> Vec<DataSourceRef> {
        vec![
            DataSourceRef::new("loki", "Loki").with_type("loki"),
            DataSourceRef::new("tempo", "Tempo")
                .with_type("tempo")
                .with_tracing(true),
            DataSourceRef::new("jaeger", "")
                .with_type("jaeger")
                .with_tracing(true),
        ]
    }

    #[test]
    fn datasource_picker_only_lists_tracing_sources() {
        let picker = PickerState::datasources(&catalogue(), &DataLinkConfig::new("traceId"))
            .expect("tracing sources available");
        assert_eq!(picker.options(), ["Tempo".to_string(), "jaeger".to_string()]);
        assert_eq!(picker.selected_value(), Some("tempo"));
    }

    #[test]
    fn datasource_picker_preselects_current_uid() {
        let value = DataLinkConfig::new("traceId").with_datasource_uid(Some("jaeger".into()));
        let picker = PickerState::datasources(&catalogue(), &value).unwrap();
        assert_eq!(picker.selected(), 1);
    }

    #[test]
    fn empty_inputs_produce_no_picker() {
        assert!(PickerState::suggestions(&[], true).is_none());
        let only_logs = vec![DataSourceRef::new("loki", "Loki")];
        assert!(PickerState::datasources(&only_logs, &DataLinkConfig::default()).is_none());
    }

    #[test]
    fn selection_wraps_in_both_directions() {
        let mut picker = PickerState::datasources(&catalogue(), &DataLinkConfig::default()).unwrap();
        picker.select_previous();
        assert_eq!(picker.selected(), 1);
        picker.select_next();
        assert_eq!(picker.selected(), 0);
    }

    #[test]
    fn suggestion_picker_remembers_how_it_was_opened() {
        let suggestions = [VariableSuggestion::raw_value()];
        let typed = PickerState::suggestions(&suggestions, true).unwrap();
        assert!(typed.typed_trigger());
        assert_eq!(typed.selected_value(), Some("${__value.raw}"));
        let requested = PickerState::suggestions(&suggestions, false).unwrap();
        assert!(!requested.typed_trigger());
    }
}
