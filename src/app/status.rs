#[derive(Debug, Clone)]
pub struct StatusLine {
    message: String,
}

pub const READY_STATUS: &str = "Ready. Press Ctrl+S to save.";

impl Default for StatusLine {
    fn default() -> Self {
        Self {
            message: READY_STATUS.to_string(),
        }
    }
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_raw(&mut self, msg: impl Into<String>) {
        self.message = msg.into();
    }

    pub fn ready(&mut self) {
        self.message = READY_STATUS.to_string();
    }

    pub fn value_updated(&mut self) {
        self.message = "Value updated".to_string();
    }

    pub fn entry_added(&mut self) {
        self.message = "Added data link".to_string();
    }

    pub fn entry_removed(&mut self) {
        self.message = "Removed data link".to_string();
    }

    pub fn entry_reverted(&mut self) {
        self.message = "Reverted data link to last saved state".to_string();
    }

    pub fn choosing(&mut self) {
        self.message = "Use ↑/↓ and Enter to choose, Esc to close".to_string();
    }

    pub fn saved(&mut self) {
        self.message = "Data links saved. Press Ctrl+Q to exit.".to_string();
    }

    pub fn pending_exit(&mut self) {
        self.message = "Unsaved changes. Press Ctrl+Q again to quit without saving.".to_string();
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
