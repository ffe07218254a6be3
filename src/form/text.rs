use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Applies a key press to a bound text value, returning the replacement text
/// or `None` when the key does not change it.
pub(crate) fn apply_text_edit(current: &str, key: &KeyEvent) -> Option<String> {
    match key.code {
        KeyCode::Char(ch) => {
            if key.modifiers.contains(KeyModifiers::CONTROL)
                || key.modifiers.contains(KeyModifiers::ALT)
            {
                return None;
            }
            let mut next = current.to_string();
            next.push(ch);
            Some(next)
        }
        KeyCode::Backspace => {
            if current.is_empty() {
                return None;
            }
            let mut next = current.to_string();
            next.pop();
            Some(next)
        }
        KeyCode::Delete => (!current.is_empty()).then(String::new),
        _ => None,
    }
}

/// Appends `token` to `template`. With `replace_trigger` the `$` that opened
/// the suggestion list is consumed first.
pub(crate) fn insert_token(template: &str, token: &str, replace_trigger: bool) -> String {
    let base = if replace_trigger {
        template.strip_suffix('$').unwrap_or(template)
    } else {
        template
    };
    format!("{base}{token}")
}
