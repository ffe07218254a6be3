use std::sync::atomic::{AtomicUsize, Ordering};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

use crate::domain::{DataLinkConfig, DataSourceRef, VariableSuggestion};

use super::{
    picker::{PickerKind, PickerState},
    text::{apply_text_edit, insert_token},
    visibility::InternalLinkVisibility,
};

static NEXT_EDITOR_ID: AtomicUsize = AtomicUsize::new(1);

pub const FIELD_TOOLTIP: &str =
    "Can be exact field name or a regex pattern that will match on the field name.";
pub const URL_LABEL_TOOLTIP: &str = "Use to override the button label.";
pub const INTERNAL_URL_PLACEHOLDER: &str = "${__value.raw}";
pub const EXTERNAL_URL_PLACEHOLDER: &str = "http://example.com/${__value.raw}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Field,
    Url,
    UrlLabel,
    Delete,
    InternalLink,
    DataSource,
}

impl Control {
    pub fn tooltip(self) -> Option<&'static str> {
        match self {
            Control::Field | Control::Url => Some(FIELD_TOOLTIP),
            Control::UrlLabel => Some(URL_LABEL_TOOLTIP),
            _ => None,
        }
    }

    pub fn is_text(self) -> bool {
        matches!(self, Control::Field | Control::Url | Control::UrlLabel)
    }
}

/// What the editor needs from its host on every key press. `value` is the
/// authoritative config; the editor never keeps a copy of it.
#[derive(Debug, Clone, Copy)]
pub struct EditorProps<'a> {
    pub value: &'a DataLinkConfig,
    pub suggestions: &'a [VariableSuggestion],
    pub datasources: &'a [DataSourceRef],
}

impl<'a> EditorProps<'a> {
    pub fn new(value: &'a DataLinkConfig) -> Self {
        Self {
            value,
            suggestions: &[],
            datasources: &[],
        }
    }

    pub fn with_suggestions(mut self, suggestions: &'a [VariableSuggestion]) -> Self {
        self.suggestions = suggestions;
        self
    }

    pub fn with_datasources(mut self, datasources: &'a [DataSourceRef]) -> Self {
        self.datasources = datasources;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorOutcome {
    /// A complete replacement for the edited config.
    Changed(DataLinkConfig),
    /// The user asked to remove this entry.
    Deleted,
    /// Message for the host's status line; the value is unchanged.
    Notice(&'static str),
    Handled,
    Ignored,
}

/// Form editing one data link. Holds only UI state: the internal link
/// visibility flag, the focused control and an optional popup.
#[derive(Debug, Clone)]
pub struct DataLinkEditor {
    id: String,
    visibility: InternalLinkVisibility,
    focus: Control,
    popup: Option<PickerState>,
}

impl DataLinkEditor {
    pub fn new(value: &DataLinkConfig) -> Self {
        let id = format!(
            "datalink-{}",
            NEXT_EDITOR_ID.fetch_add(1, Ordering::Relaxed)
        );
        Self {
            id,
            visibility: InternalLinkVisibility::new(value.datasource_uid()),
            focus: Control::Field,
            popup: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Redraw hook: reconciles the visibility flag with the value's uid.
    pub fn sync(&mut self, value: &DataLinkConfig) {
        if self.visibility.observe(value.datasource_uid()) {
            debug!(
                editor = %self.id,
                show = self.visibility.is_shown(),
                "internal link mode changed outside the editor"
            );
            self.after_visibility_change();
        }
    }

    pub fn show_internal_link(&self) -> bool {
        self.visibility.is_shown()
    }

    pub fn controls(&self) -> Vec<Control> {
        let mut controls = vec![
            Control::Field,
            Control::Delete,
            Control::Url,
            Control::UrlLabel,
            Control::InternalLink,
        ];
        if self.show_internal_link() {
            controls.push(Control::DataSource);
        }
        controls
    }

    pub fn focused(&self) -> Control {
        self.focus
    }

    pub fn focus(&mut self, control: Control) -> bool {
        if self.controls().contains(&control) {
            self.focus = control;
            true
        } else {
            false
        }
    }

    pub fn focus_next(&mut self) {
        self.focus_step(1);
    }

    pub fn focus_prev(&mut self) {
        self.focus_step(-1);
    }

    pub fn focus_step(&mut self, delta: i32) {
        let controls = self.controls();
        let len = controls.len() as i32;
        let current = controls
            .iter()
            .position(|control| *control == self.focus)
            .unwrap_or(0) as i32;
        let next = (current + delta).rem_euclid(len);
        self.focus = controls[next as usize];
    }

    pub fn url_label(&self) -> &'static str {
        if self.show_internal_link() {
            "Query"
        } else {
            "URL"
        }
    }

    pub fn url_placeholder(&self) -> &'static str {
        if self.show_internal_link() {
            INTERNAL_URL_PLACEHOLDER
        } else {
            EXTERNAL_URL_PLACEHOLDER
        }
    }

    pub fn popup(&self) -> Option<&PickerState> {
        self.popup.as_ref()
    }

    pub fn close_popup(&mut self) {
        self.popup = None;
    }

    pub fn handle_key(&mut self, props: EditorProps<'_>, key: &KeyEvent) -> EditorOutcome {
        if self.popup.is_some() {
            return self.handle_popup_key(props, key);
        }
        let outcome = match self.focus {
            Control::Field => match apply_text_edit(&props.value.field, key) {
                Some(text) => EditorOutcome::Changed(props.value.with_field(text)),
                None => EditorOutcome::Ignored,
            },
            Control::Url => self.handle_url_key(props, key),
            Control::UrlLabel => {
                match apply_text_edit(props.value.url_display_label_text(), key) {
                    Some(text) => EditorOutcome::Changed(props.value.with_url_display_label(text)),
                    None => EditorOutcome::Ignored,
                }
            }
            Control::Delete => {
                if is_activation(key) {
                    EditorOutcome::Deleted
                } else {
                    EditorOutcome::Ignored
                }
            }
            Control::InternalLink => match key.code {
                KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right => {
                    self.toggle_internal_link(props.value)
                }
                _ => EditorOutcome::Ignored,
            },
            Control::DataSource => {
                if is_activation(key) {
                    self.open_datasource_picker(props)
                } else {
                    EditorOutcome::Ignored
                }
            }
        };
        self.log_outcome(&outcome);
        outcome
    }

    /// Flips internal link mode. Turning it off clears the uid on the value
    /// first; turning it on leaves the value alone until a pick is made.
    pub fn toggle_internal_link(&mut self, value: &DataLinkConfig) -> EditorOutcome {
        if self.visibility.is_shown() {
            let cleared = value.with_datasource_uid(None);
            self.visibility.set(false);
            self.after_visibility_change();
            EditorOutcome::Changed(cleared)
        } else {
            self.visibility.set(true);
            EditorOutcome::Handled
        }
    }

    fn handle_url_key(&mut self, props: EditorProps<'_>, key: &KeyEvent) -> EditorOutcome {
        if key.code == KeyCode::Char(' ') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return match PickerState::suggestions(props.suggestions, false) {
                Some(picker) => {
                    self.popup = Some(picker);
                    EditorOutcome::Handled
                }
                None => EditorOutcome::Notice("No suggestions available"),
            };
        }
        let Some(text) = apply_text_edit(props.value.url_text(), key) else {
            return EditorOutcome::Ignored;
        };
        if key.code == KeyCode::Char('$') {
            self.popup = PickerState::suggestions(props.suggestions, true);
        }
        EditorOutcome::Changed(props.value.with_url(text))
    }

    fn open_datasource_picker(&mut self, props: EditorProps<'_>) -> EditorOutcome {
        match PickerState::datasources(props.datasources, props.value) {
            Some(picker) => {
                self.popup = Some(picker);
                EditorOutcome::Handled
            }
            None => EditorOutcome::Notice("No tracing data sources available"),
        }
    }

    fn handle_popup_key(&mut self, props: EditorProps<'_>, key: &KeyEvent) -> EditorOutcome {
        let Some(popup) = self.popup.as_mut() else {
            return EditorOutcome::Ignored;
        };
        match key.code {
            KeyCode::Esc => {
                self.popup = None;
                EditorOutcome::Handled
            }
            KeyCode::Up => {
                popup.select_previous();
                EditorOutcome::Handled
            }
            KeyCode::Down | KeyCode::Tab => {
                popup.select_next();
                EditorOutcome::Handled
            }
            KeyCode::Enter => {
                let kind = popup.kind();
                let replace_trigger = popup.typed_trigger();
                let choice = popup.selected_value().map(str::to_owned);
                self.popup = None;
                let Some(choice) = choice else {
                    return EditorOutcome::Handled;
                };
                let outcome = match kind {
                    PickerKind::Suggestions => EditorOutcome::Changed(
                        props.value.with_url(insert_token(
                            props.value.url_text(),
                            &choice,
                            replace_trigger,
                        )),
                    ),
                    PickerKind::DataSources => {
                        EditorOutcome::Changed(props.value.with_datasource_uid(Some(choice)))
                    }
                };
                self.log_outcome(&outcome);
                outcome
            }
            // Typing continues in the URL input and dismisses the suggestions.
            KeyCode::Char(_) | KeyCode::Backspace
                if popup.kind() == PickerKind::Suggestions
                    && !key
                        .modifiers
                        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.popup = None;
                let outcome = self.handle_url_key(props, key);
                self.log_outcome(&outcome);
                outcome
            }
            _ => EditorOutcome::Handled,
        }
    }

    fn after_visibility_change(&mut self) {
        if !self.show_internal_link() {
            if self.focus == Control::DataSource {
                self.focus = Control::InternalLink;
            }
            if matches!(self.popup.as_ref().map(PickerState::kind), Some(PickerKind::DataSources)) {
                self.popup = None;
            }
        }
    }

    fn log_outcome(&self, outcome: &EditorOutcome) {
        match outcome {
            EditorOutcome::Changed(value) => {
                debug!(editor = %self.id, control = ?self.focus, value = ?value, "data link changed");
            }
            EditorOutcome::Deleted => debug!(editor = %self.id, "data link removed"),
            _ => {}
        }
    }
}

fn is_activation(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Enter | KeyCode::Char(' '))
}
