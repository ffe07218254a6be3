use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::Deserialize;
use std::sync::LazyLock;

macro_rules! keymap_source {
    () => {
        include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/keymap/default.keymap.json"
        ))
    };
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum KeymapContext {
    Default,
    Popup,
}

impl KeymapContext {
    fn from_str(raw: &str) -> Option<Self> {
        match raw {
            "default" => Some(KeymapContext::Default),
            "popup" => Some(KeymapContext::Popup),
            _ => None,
        }
    }
}

/// Host-level commands. `Forward` hands the key to the focused editor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum KeyAction {
    Save,
    Quit,
    ResetStatus,
    FieldStep(i32),
    EntryStep(i32),
    AddEntry,
    RevertEntry,
    Forward,
}

#[derive(Deserialize)]
struct RawEntry {
    id: String,
    description: String,
    contexts: Vec<String>,
    action: RawAction,
    combos: Vec<String>,
}

#[derive(Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
enum RawAction {
    Save,
    Quit,
    ResetStatus,
    FieldStep { delta: i32 },
    EntryStep { delta: i32 },
    AddEntry,
    RevertEntry,
    Forward,
}

impl RawAction {
    fn into_action(self) -> KeyAction {
        match self {
            RawAction::Save => KeyAction::Save,
            RawAction::Quit => KeyAction::Quit,
            RawAction::ResetStatus => KeyAction::ResetStatus,
            RawAction::FieldStep { delta } => KeyAction::FieldStep(delta),
            RawAction::EntryStep { delta } => KeyAction::EntryStep(delta),
            RawAction::AddEntry => KeyAction::AddEntry,
            RawAction::RevertEntry => KeyAction::RevertEntry,
            RawAction::Forward => KeyAction::Forward,
        }
    }
}

struct KeyBinding {
    action: KeyAction,
    contexts: Vec<KeymapContext>,
    combos: Vec<KeyPattern>,
    snippet: String,
}

impl KeyBinding {
    fn from_raw(raw: RawEntry) -> Result<Self, String> {
        let contexts = raw
            .contexts
            .iter()
            .filter_map(|ctx| KeymapContext::from_str(ctx))
            .collect::<Vec<_>>();
        if contexts.is_empty() {
            return Err(format!(
                "keymap entry {} must declare at least one context",
                raw.id
            ));
        }
        let combos = raw
            .combos
            .iter()
            .map(|combo| {
                KeyPattern::parse(combo)
                    .map_err(|err| format!("failed to parse combo '{combo}' for {}: {err}", raw.id))
            })
            .collect::<Result<Vec<_>, _>>()?;
        if combos.is_empty() {
            return Err(format!("keymap entry {} must declare combos", raw.id));
        }
        let combos_display = combos
            .iter()
            .map(|pattern| pattern.display.clone())
            .collect::<Vec<_>>()
            .join("/");
        let snippet = format!("{combos_display} {}", raw.description);
        Ok(Self {
            action: raw.action.into_action(),
            contexts,
            combos,
            snippet,
        })
    }

    fn matches(&self, key: &KeyEvent, context: KeymapContext) -> Option<KeyAction> {
        if !self.contexts.contains(&context) {
            return None;
        }
        self.combos
            .iter()
            .find(|pattern| pattern.matches(key))
            .map(|_| self.action)
    }
}

struct KeyPattern {
    matcher: CodeMatcher,
    required: KeyModifiers,
    allow_shift: bool,
    display: String,
}

impl KeyPattern {
    fn parse(spec: &str) -> Result<Self, String> {
        let display = spec.trim().to_string();
        if display.is_empty() {
            return Err("combo cannot be empty".into());
        }
        let mut tokens = display
            .split('+')
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>();
        let Some(key_token) = tokens.pop() else {
            return Err("combo must contain key".into());
        };
        let matcher = CodeMatcher::from_token(key_token)?;
        let mut required = KeyModifiers::empty();
        for token in tokens {
            match token.to_lowercase().as_str() {
                "ctrl" | "control" => required |= KeyModifiers::CONTROL,
                "shift" => required |= KeyModifiers::SHIFT,
                "alt" => required |= KeyModifiers::ALT,
                other => {
                    return Err(format!("unsupported modifier '{other}'"));
                }
            }
        }
        let allow_shift = matcher.allows_extra_shift() && !required.contains(KeyModifiers::SHIFT);
        Ok(Self {
            matcher,
            required,
            allow_shift,
            display,
        })
    }

    fn matches(&self, key: &KeyEvent) -> bool {
        if !self.matcher.matches(&key.code) {
            return false;
        }
        if !key.modifiers.contains(self.required) {
            return false;
        }
        let extra = key.modifiers.difference(self.required);
        if self.allow_shift {
            (extra - KeyModifiers::SHIFT).is_empty()
        } else {
            extra.is_empty()
        }
    }
}

#[derive(Clone)]
enum CodeMatcher {
    Literal(KeyCode),
    Alpha(char),
}

impl CodeMatcher {
    fn from_token(token: &str) -> Result<Self, String> {
        let normalized = token.to_lowercase();
        let matcher = match normalized.as_str() {
            "tab" => CodeMatcher::Literal(KeyCode::Tab),
            "backtab" => CodeMatcher::Literal(KeyCode::BackTab),
            "enter" => CodeMatcher::Literal(KeyCode::Enter),
            "esc" | "escape" => CodeMatcher::Literal(KeyCode::Esc),
            "space" => CodeMatcher::Literal(KeyCode::Char(' ')),
            "left" => CodeMatcher::Literal(KeyCode::Left),
            "right" => CodeMatcher::Literal(KeyCode::Right),
            "up" => CodeMatcher::Literal(KeyCode::Up),
            "down" => CodeMatcher::Literal(KeyCode::Down),
            "pageup" => CodeMatcher::Literal(KeyCode::PageUp),
            "pagedown" => CodeMatcher::Literal(KeyCode::PageDown),
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) => CodeMatcher::Alpha(ch),
                    _ => return Err(format!("unsupported key '{token}'")),
                }
            }
        };
        Ok(matcher)
    }

    fn matches(&self, code: &KeyCode) -> bool {
        match (self, code) {
            (CodeMatcher::Literal(expected), actual) => actual == expected,
            (CodeMatcher::Alpha(expected), KeyCode::Char(actual)) => {
                actual.to_ascii_lowercase() == *expected
            }
            _ => false,
        }
    }

    fn allows_extra_shift(&self) -> bool {
        matches!(
            self,
            CodeMatcher::Alpha(_) | CodeMatcher::Literal(KeyCode::BackTab)
        )
    }
}

/// Parsed bindings plus the per-context help lines derived from them.
pub(crate) struct Keymap {
    bindings: Vec<KeyBinding>,
}

impl Keymap {
    pub(crate) fn from_json(source: &str) -> Result<Self, String> {
        let raw_entries: Vec<RawEntry> =
            serde_json::from_str(source).map_err(|err| format!("invalid keymap: {err}"))?;
        let bindings = raw_entries
            .into_iter()
            .map(KeyBinding::from_raw)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { bindings })
    }

    pub(crate) fn classify(&self, key: &KeyEvent, context: KeymapContext) -> Option<KeyAction> {
        self.bindings
            .iter()
            .find_map(|binding| binding.matches(key, context))
    }

    pub(crate) fn help_text(&self, context: KeymapContext) -> Option<String> {
        let snippets = self
            .bindings
            .iter()
            .filter(|binding| binding.contexts.contains(&context))
            .map(|binding| binding.snippet.clone())
            .collect::<Vec<_>>();
        if snippets.is_empty() {
            None
        } else {
            Some(snippets.join(" • "))
        }
    }
}

static DEFAULT_KEYMAP: LazyLock<Keymap> = LazyLock::new(|| {
    Keymap::from_json(keymap_source!()).expect("invalid keymap/default.keymap.json")
});

pub(crate) fn default_keymap() -> &'static Keymap {
    &DEFAULT_KEYMAP
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn ctrl_s_saves_in_every_context() {
        let keymap = default_keymap();
        let save = key(KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert_eq!(
            keymap.classify(&save, KeymapContext::Default),
            Some(KeyAction::Save)
        );
        assert_eq!(
            keymap.classify(&save, KeymapContext::Popup),
            Some(KeyAction::Save)
        );
    }

    #[test]
    fn arrows_step_fields_outside_popups_only() {
        let keymap = default_keymap();
        let down = key(KeyCode::Down, KeyModifiers::NONE);
        assert_eq!(
            keymap.classify(&down, KeymapContext::Default),
            Some(KeyAction::FieldStep(1))
        );
        assert_eq!(
            keymap.classify(&down, KeymapContext::Popup),
            Some(KeyAction::Forward)
        );
    }

    #[test]
    fn shift_tab_steps_back() {
        let keymap = default_keymap();
        let back = key(KeyCode::BackTab, KeyModifiers::SHIFT);
        assert_eq!(
            keymap.classify(&back, KeymapContext::Default),
            Some(KeyAction::FieldStep(-1))
        );
    }

    #[test]
    fn ctrl_arrows_step_entries() {
        let keymap = default_keymap();
        let next = key(KeyCode::Down, KeyModifiers::CONTROL);
        assert_eq!(
            keymap.classify(&next, KeymapContext::Default),
            Some(KeyAction::EntryStep(1))
        );
    }

    #[test]
    fn plain_characters_are_unbound() {
        let keymap = default_keymap();
        let typed = key(KeyCode::Char('n'), KeyModifiers::NONE);
        assert_eq!(keymap.classify(&typed, KeymapContext::Default), None);
    }

    #[test]
    fn help_text_lists_context_bindings() {
        let help = default_keymap()
            .help_text(KeymapContext::Popup)
            .expect("popup help");
        assert!(help.contains("Ctrl+S save"));
        assert!(help.contains("Esc close"));
        assert!(!help.contains("add link"));
    }

    #[test]
    fn rejects_entries_without_contexts() {
        let source = r#"[{"id":"x","description":"x","contexts":["nowhere"],"action":{"kind":"save"},"combos":["Ctrl+S"]}]"#;
        assert!(Keymap::from_json(source).is_err());
    }

    #[test]
    fn rejects_unknown_modifiers() {
        assert!(KeyPattern::parse("Hyper+S").is_err());
        assert!(KeyPattern::parse("").is_err());
    }
}
