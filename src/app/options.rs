use std::{borrow::Cow, time::Duration};

/// Runtime knobs for the interactive host.
#[derive(Debug, Clone)]
pub struct UiOptions {
    pub tick_rate: Duration,
    pub confirm_exit: bool,
    pub show_help: bool,
    pub toggle_on_label: Cow<'static, str>,
    pub toggle_off_label: Cow<'static, str>,
}

impl Default for UiOptions {
    fn default() -> Self {
        Self {
            tick_rate: Duration::from_millis(250),
            confirm_exit: true,
            show_help: true,
            toggle_on_label: Cow::Borrowed("on"),
            toggle_off_label: Cow::Borrowed("off"),
        }
    }
}

impl UiOptions {
    pub fn with_help(mut self, show: bool) -> Self {
        self.show_help = show;
        self
    }

    pub fn with_confirm_exit(mut self, confirm: bool) -> Self {
        self.confirm_exit = confirm;
        self
    }

    pub fn with_tick_rate(mut self, tick_rate: Duration) -> Self {
        self.tick_rate = tick_rate;
        self
    }

    pub fn with_toggle_labels(
        mut self,
        on: impl Into<Cow<'static, str>>,
        off: impl Into<Cow<'static, str>>,
    ) -> Self {
        self.toggle_on_label = on.into();
        self.toggle_off_label = off.into();
        self
    }
}
