use anyhow::{Result, anyhow};
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use ratatui::layout::Rect;
use tracing::{debug, info};

use crate::{
    domain::{DataLinkConfig, DataSourceRef, VariableSuggestion},
    form::{DataLinkEditor, EditorOutcome, EditorProps},
    presentation::{self, ToggleLabels, UiContext},
};

use super::{
    keymap::{KeyAction, Keymap, KeymapContext, default_keymap},
    options::UiOptions,
    status::StatusLine,
    terminal::TerminalGuard,
};

/// Owns the list of data links and one editor per entry. Editors report
/// outcomes; only this type replaces, appends or removes entries.
pub(crate) struct App {
    links: Vec<DataLinkConfig>,
    /// Last saved value of each entry, index-aligned with `links`. `None`
    /// for entries added since the last save.
    saved: Vec<Option<DataLinkConfig>>,
    /// The list as of the last save, used for the dirty flag.
    baseline: Vec<DataLinkConfig>,
    editors: Vec<DataLinkEditor>,
    selected: usize,
    suggestions: Vec<VariableSuggestion>,
    datasources: Vec<DataSourceRef>,
    title: Option<String>,
    options: UiOptions,
    keymap: &'static Keymap,
    status: StatusLine,
    dirty: bool,
    exit_armed: bool,
    should_quit: bool,
    result: Option<Vec<DataLinkConfig>>,
}

impl App {
    pub fn new(links: Vec<DataLinkConfig>, options: UiOptions) -> Self {
        let editors = links.iter().map(DataLinkEditor::new).collect();
        Self {
            saved: links.iter().cloned().map(Some).collect(),
            baseline: links.clone(),
            links,
            editors,
            selected: 0,
            suggestions: Vec::new(),
            datasources: Vec::new(),
            title: None,
            options,
            keymap: default_keymap(),
            status: StatusLine::new(),
            dirty: false,
            exit_armed: false,
            should_quit: false,
            result: None,
        }
    }

    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title;
        self
    }

    pub fn with_suggestions(mut self, suggestions: Vec<VariableSuggestion>) -> Self {
        self.suggestions = suggestions;
        self
    }

    pub fn with_datasources(mut self, datasources: Vec<DataSourceRef>) -> Self {
        self.datasources = datasources;
        self
    }

    pub fn run(&mut self) -> Result<Vec<DataLinkConfig>> {
        let mut terminal = TerminalGuard::new()?;
        while !self.should_quit {
            self.sync_editors();
            terminal.draw(|frame| self.draw(frame))?;
            if !event::poll(self.options.tick_rate)? {
                continue;
            }
            match event::read()? {
                Event::Key(key) => self.handle_key(key),
                Event::Resize(width, height) => {
                    terminal.resize(Rect::new(0, 0, width, height))?;
                }
                Event::Mouse(_) | Event::FocusGained | Event::FocusLost | Event::Paste(_) => {}
            }
        }

        self.result
            .take()
            .ok_or_else(|| anyhow!("user exited without saving"))
    }

    /// Hands every editor the current value of its entry so internal link
    /// mode follows uid changes made outside the editor.
    fn sync_editors(&mut self) {
        for (editor, link) in self.editors.iter_mut().zip(&self.links) {
            editor.sync(link);
        }
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let help = self.current_help_text();
        presentation::draw(
            frame,
            UiContext {
                title: self.title.as_deref(),
                links: &self.links,
                selected: self.selected,
                editor: self.editors.get(self.selected),
                datasources: &self.datasources,
                status_message: self.status.message(),
                dirty: self.dirty,
                help: help.as_deref(),
                toggle_labels: ToggleLabels {
                    on: &self.options.toggle_on_label,
                    off: &self.options.toggle_off_label,
                },
            },
        );
    }

    fn current_help_text(&self) -> Option<String> {
        if !self.options.show_help {
            return None;
        }
        self.keymap.help_text(self.keymap_context())
    }

    fn keymap_context(&self) -> KeymapContext {
        match self.editors.get(self.selected) {
            Some(editor) if editor.popup().is_some() => KeymapContext::Popup,
            _ => KeymapContext::Default,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        let action = self
            .keymap
            .classify(&key, self.keymap_context())
            .unwrap_or(KeyAction::Forward);
        if !matches!(action, KeyAction::Quit) {
            self.exit_armed = false;
        }
        match action {
            KeyAction::Save => self.on_save(),
            KeyAction::Quit => self.on_exit(),
            KeyAction::ResetStatus => self.status.ready(),
            KeyAction::FieldStep(delta) => {
                if let Some(editor) = self.editors.get_mut(self.selected) {
                    editor.focus_step(delta);
                }
            }
            KeyAction::EntryStep(delta) => self.select_entry(delta),
            KeyAction::AddEntry => self.add_entry(),
            KeyAction::RevertEntry => self.revert_entry(),
            KeyAction::Forward => self.forward_to_editor(&key),
        }
    }

    fn forward_to_editor(&mut self, key: &KeyEvent) {
        let index = self.selected;
        let (Some(editor), Some(value)) = (self.editors.get_mut(index), self.links.get(index))
        else {
            return;
        };
        let props = EditorProps::new(value)
            .with_suggestions(&self.suggestions)
            .with_datasources(&self.datasources);
        let outcome = editor.handle_key(props, key);
        let popup_open = editor.popup().is_some();
        self.apply_outcome(index, outcome);
        if popup_open {
            self.status.choosing();
        }
    }

    pub(crate) fn apply_outcome(&mut self, index: usize, outcome: EditorOutcome) {
        match outcome {
            EditorOutcome::Changed(value) => {
                if let Some(slot) = self.links.get_mut(index) {
                    *slot = value;
                    self.dirty = true;
                    self.status.value_updated();
                }
            }
            EditorOutcome::Deleted => self.remove_entry(index),
            EditorOutcome::Notice(message) => self.status.set_raw(message),
            EditorOutcome::Handled | EditorOutcome::Ignored => {}
        }
    }

    /// Replaces an entry from outside its editor, the way a reload or revert
    /// would. The editor reconciles on the next sync.
    pub(crate) fn replace_entry(&mut self, index: usize, value: DataLinkConfig) {
        if let Some(slot) = self.links.get_mut(index) {
            *slot = value;
            self.dirty = self.links != self.baseline;
        }
    }

    fn remove_entry(&mut self, index: usize) {
        if index >= self.links.len() {
            return;
        }
        let removed = self.links.remove(index);
        self.saved.remove(index);
        let editor = self.editors.remove(index);
        debug!(editor = %editor.id(), field = %removed.field, "removed data link entry");
        if self.selected >= self.links.len() {
            self.selected = self.links.len().saturating_sub(1);
        }
        self.dirty = true;
        self.status.entry_removed();
    }

    fn add_entry(&mut self) {
        let link = DataLinkConfig::default();
        self.editors.push(DataLinkEditor::new(&link));
        self.saved.push(None);
        self.links.push(link);
        self.selected = self.links.len() - 1;
        self.dirty = true;
        self.status.entry_added();
    }

    fn revert_entry(&mut self) {
        let index = self.selected;
        let Some(saved) = self.saved.get(index).cloned().flatten() else {
            self.status.set_raw("Nothing saved for this entry yet");
            return;
        };
        self.replace_entry(index, saved);
        self.status.entry_reverted();
    }

    fn select_entry(&mut self, delta: i32) {
        if self.links.is_empty() {
            return;
        }
        let len = self.links.len() as i32;
        self.selected = (self.selected as i32 + delta).rem_euclid(len) as usize;
        if let Some(editor) = self.editors.get_mut(self.selected) {
            editor.close_popup();
        }
    }

    fn on_save(&mut self) {
        self.saved = self.links.iter().cloned().map(Some).collect();
        self.baseline = self.links.clone();
        self.result = Some(self.links.clone());
        self.dirty = false;
        self.exit_armed = false;
        info!(count = self.links.len(), "data links saved");
        self.status.saved();
    }

    fn on_exit(&mut self) {
        if self.options.confirm_exit && self.dirty && !self.exit_armed {
            self.exit_armed = true;
            self.status.pending_exit();
            return;
        }
        info!(saved = self.result.is_some(), "leaving data link editor");
        self.should_quit = true;
    }
}

#[cfg(test)]
impl App {
    pub(crate) fn links(&self) -> &[DataLinkConfig] {
        &self.links
    }

    pub(crate) fn editor(&self, index: usize) -> Option<&DataLinkEditor> {
        self.editors.get(index)
    }

    pub(crate) fn sync_for_test(&mut self) {
        self.sync_editors();
    }

    pub(crate) fn handle_key_for_test(&mut self, key: KeyEvent) {
        self.handle_key(key)
    }

    pub(crate) fn draw_for_test(&self, frame: &mut ratatui::Frame<'_>) {
        self.draw(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};
    use ratatui::{Terminal, backend::TestBackend};

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    fn sample_app() -> App {
        let links = vec![
            DataLinkConfig::new("msg").with_url("http://example.com/${__value.raw}"),
            DataLinkConfig::new("traceId").with_datasource_uid(Some("tempo".into())),
        ];
        App::new(links, UiOptions::default()).with_datasources(vec![
            DataSourceRef::new("tempo", "Tempo").with_tracing(true),
        ])
    }

    fn rendered(app: &App) -> String {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| app.draw_for_test(frame)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn typing_replaces_the_selected_entry() {
        let mut app = sample_app();
        app.handle_key_for_test(key(KeyCode::Char('s'), KeyModifiers::NONE));
        assert_eq!(app.links()[0].field, "msgs");
        assert_eq!(app.links()[1].field, "traceId");
        assert!(app.dirty);
    }

    #[test]
    fn delete_removes_entry_and_editor() {
        let mut app = sample_app();
        app.handle_key_for_test(key(KeyCode::Tab, KeyModifiers::NONE));
        app.handle_key_for_test(key(KeyCode::Enter, KeyModifiers::NONE));
        assert_eq!(app.links().len(), 1);
        assert_eq!(app.links()[0].field, "traceId");
        assert!(app.editor(1).is_none());
        assert!(app.editor(0).unwrap().show_internal_link());
    }

    #[test]
    fn reverting_an_entry_resyncs_internal_mode() {
        let mut app = sample_app();
        app.replace_entry(1, DataLinkConfig::new("traceId"));
        app.sync_for_test();
        assert!(!app.editor(1).unwrap().show_internal_link());

        app.select_entry(1);
        app.handle_key_for_test(key(KeyCode::Char('r'), KeyModifiers::CONTROL));
        app.sync_for_test();
        assert_eq!(app.links()[1].datasource_uid(), Some("tempo"));
        assert!(app.editor(1).unwrap().show_internal_link());
        assert!(!app.dirty);
    }

    #[test]
    fn add_entry_selects_a_blank_link() {
        let mut app = sample_app();
        app.handle_key_for_test(key(KeyCode::Char('n'), KeyModifiers::CONTROL));
        assert_eq!(app.links().len(), 3);
        assert_eq!(app.selected, 2);
        assert_eq!(app.links()[2], DataLinkConfig::default());
    }

    #[test]
    fn quit_with_unsaved_changes_needs_confirmation() {
        let mut app = sample_app();
        app.handle_key_for_test(key(KeyCode::Char('x'), KeyModifiers::NONE));
        app.handle_key_for_test(key(KeyCode::Char('q'), KeyModifiers::CONTROL));
        assert!(!app.should_quit);
        app.handle_key_for_test(key(KeyCode::Char('q'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
        assert!(app.result.is_none());
    }

    #[test]
    fn save_keeps_result_for_exit() {
        let mut app = sample_app();
        app.handle_key_for_test(key(KeyCode::Char('x'), KeyModifiers::NONE));
        app.handle_key_for_test(key(KeyCode::Char('s'), KeyModifiers::CONTROL));
        assert_eq!(
            app.status.message(),
            "Data links saved. Press Ctrl+Q to exit."
        );
        app.handle_key_for_test(key(KeyCode::Char('q'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
        let saved = app.result.as_ref().expect("saved links");
        assert_eq!(saved[0].field, "msgx");
    }

    #[test]
    fn renders_url_label_for_external_and_query_for_internal() {
        let mut app = sample_app();
        app.sync_for_test();
        let external = rendered(&app);
        assert!(external.contains("URL"));
        assert!(!external.contains("Query"));
        assert!(external.contains("Data link: msg"));
        assert!(!external.contains("datalink-"));

        app.select_entry(1);
        let internal = rendered(&app);
        assert!(internal.contains("Query"));
        assert!(internal.contains("Tempo"));
    }

    #[test]
    fn revert_after_delete_uses_the_entry_own_saved_value() {
        let mut app = sample_app();
        app.handle_key_for_test(key(KeyCode::Tab, KeyModifiers::NONE));
        app.handle_key_for_test(key(KeyCode::Enter, KeyModifiers::NONE));
        assert_eq!(app.links().len(), 1);

        app.replace_entry(0, DataLinkConfig::new("spanId"));
        app.handle_key_for_test(key(KeyCode::Char('r'), KeyModifiers::CONTROL));
        app.sync_for_test();
        assert_eq!(app.links().len(), 1);
        assert_eq!(app.links()[0].field, "traceId");
        assert_eq!(app.links()[0].datasource_uid(), Some("tempo"));
        assert!(app.editor(0).unwrap().show_internal_link());
        assert!(app.dirty);
    }

    #[test]
    fn revert_on_an_unsaved_entry_leaves_it_alone() {
        let mut app = sample_app();
        app.handle_key_for_test(key(KeyCode::Char('n'), KeyModifiers::CONTROL));
        app.handle_key_for_test(key(KeyCode::Char('a'), KeyModifiers::NONE));
        app.handle_key_for_test(key(KeyCode::Char('r'), KeyModifiers::CONTROL));
        assert_eq!(app.links()[2].field, "a");
        assert_eq!(app.status.message(), "Nothing saved for this entry yet");
        assert_eq!(app.links()[1].field, "traceId");
    }

    #[test]
    fn entries_added_then_saved_can_be_reverted() {
        let mut app = sample_app();
        app.handle_key_for_test(key(KeyCode::Char('n'), KeyModifiers::CONTROL));
        app.handle_key_for_test(key(KeyCode::Char('a'), KeyModifiers::NONE));
        app.handle_key_for_test(key(KeyCode::Char('s'), KeyModifiers::CONTROL));
        app.handle_key_for_test(key(KeyCode::Char('b'), KeyModifiers::NONE));
        app.handle_key_for_test(key(KeyCode::Char('r'), KeyModifiers::CONTROL));
        assert_eq!(app.links()[2].field, "a");
        assert!(!app.dirty);
    }

    #[test]
    fn selection_stays_in_range_after_deleting_the_last_entry() {
        let mut app = sample_app();
        app.select_entry(1);
        assert!(app.editors[1].focus(crate::form::Control::Delete));
        app.handle_key_for_test(key(KeyCode::Enter, KeyModifiers::NONE));
        assert_eq!(app.selected, 0);
        assert_eq!(app.links()[0].field, "msg");
        app.sync_for_test();
        assert!(!app.editor(0).unwrap().show_internal_link());
    }
}
