use tracing::trace;

/// Reconciles the "show internal link" flag against an out-of-band change of
/// the referenced data source uid.
///
/// Only the two transitions absent -> present and present -> absent can
/// force the flag, and each forced value makes its own condition false on the
/// next pass. Every other combination returns `show` unchanged, so a user who
/// switched internal mode on before picking a data source keeps that choice.
pub fn reconcile(previous: Option<&str>, current: Option<&str>, show: bool) -> bool {
    let was_present = is_present(previous);
    let is_now_present = is_present(current);
    if !was_present && is_now_present && !show {
        return true;
    }
    if was_present && !is_now_present && show {
        return false;
    }
    show
}

fn is_present(uid: Option<&str>) -> bool {
    uid.is_some_and(|uid| !uid.is_empty())
}

/// Editor-local visibility flag plus the uid observed on the previous pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternalLinkVisibility {
    show: bool,
    previous_uid: Option<String>,
}

impl InternalLinkVisibility {
    pub fn new(uid: Option<&str>) -> Self {
        Self {
            show: is_present(uid),
            previous_uid: uid.map(str::to_owned),
        }
    }

    pub fn is_shown(&self) -> bool {
        self.show
    }

    pub fn set(&mut self, show: bool) {
        self.show = show;
    }

    /// Applies [`reconcile`] against the cached uid, then caches `current`.
    /// Returns `true` when the flag was forced.
    pub fn observe(&mut self, current: Option<&str>) -> bool {
        let next = reconcile(self.previous_uid.as_deref(), current, self.show);
        let forced = next != self.show;
        if forced {
            trace!(
                previous = ?self.previous_uid,
                current = ?current,
                show = next,
                "internal link visibility forced"
            );
        }
        self.show = next;
        if self.previous_uid.as_deref() != current {
            self.previous_uid = current.map(str::to_owned);
        }
        forced
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_flag_follows_uid_presence() {
        assert!(InternalLinkVisibility::new(Some("ds1")).is_shown());
        assert!(!InternalLinkVisibility::new(None).is_shown());
        assert!(!InternalLinkVisibility::new(Some("")).is_shown());
    }

    #[test]
    fn uid_appearing_forces_flag_on() {
        assert!(reconcile(None, Some("ds2"), false));
        let mut state = InternalLinkVisibility::new(None);
        assert!(state.observe(Some("ds2")));
        assert!(state.is_shown());
    }

    #[test]
    fn uid_disappearing_forces_flag_off() {
        assert!(!reconcile(Some("ds2"), None, true));
        let mut state = InternalLinkVisibility::new(Some("ds2"));
        assert!(state.observe(None));
        assert!(!state.is_shown());
    }

    #[test]
    fn manual_flag_survives_while_uid_stays_absent() {
        let mut state = InternalLinkVisibility::new(None);
        state.set(true);
        assert!(!state.observe(None));
        assert!(!state.observe(None));
        assert!(state.is_shown());
    }

    #[test]
    fn switching_between_uids_leaves_flag_alone() {
        assert!(reconcile(Some("ds1"), Some("ds2"), true));
        assert!(!reconcile(Some("ds1"), Some("ds2"), false));
    }

    #[test]
    fn correction_is_stable_on_the_next_pass() {
        let mut state = InternalLinkVisibility::new(None);
        assert!(state.observe(Some("ds2")));
        assert!(!state.observe(Some("ds2")));
        assert!(state.is_shown());
    }
}
