use iconbar_core::EventGroup;
use std::collections::BTreeMap;
use tracing::debug;

/// Result of lifting one group's suspension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resume {
    /// The group was not suspended; nothing changed.
    Unchanged,
    /// The group was lifted but others still hold the gate.
    StillPaused,
    /// The last suspension was lifted: run one recomputation now, whether or
    /// not any were requested while paused.
    Resumed {
        /// Recomputations were requested while paused.
        was_dirty: bool,
    },
}

/// Reference-counted suspension of recomputation, keyed by event group.
///
/// Each group is either idle or suspended; repeated begins or ends for the
/// same group are no-ops, so overlapping transitions can neither leak nor
/// double-release a suspension.
#[derive(Debug, Clone)]
pub struct PauseGate {
    states: BTreeMap<EventGroup, bool>,
    active: usize,
    dirty:  bool,
}

impl Default for PauseGate {
    fn default() -> Self {
        Self {
            states: EventGroup::ALL.into_iter().map(|g| (g, false)).collect(),
            active: 0,
            dirty:  false,
        }
    }
}

impl PauseGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Suspend on behalf of `group`.  Returns `true` if the group was idle.
    pub fn begin(&mut self, group: EventGroup) -> bool {
        let state = self.states.entry(group).or_insert(false);
        if *state {
            return false;
        }
        *state = true;
        self.active += 1;
        debug!(%group, active = self.active, "recomputation suspended");
        true
    }

    /// Lift `group`'s suspension.
    pub fn end(&mut self, group: EventGroup) -> Resume {
        let state = self.states.entry(group).or_insert(false);
        if !*state {
            return Resume::Unchanged;
        }
        *state = false;
        self.active -= 1;
        debug!(%group, active = self.active, "suspension lifted");

        if self.active > 0 {
            return Resume::StillPaused;
        }
        Resume::Resumed {
            was_dirty: std::mem::take(&mut self.dirty),
        }
    }

    /// Ask to recompute now.  Returns `false` and remembers the request if
    /// any group holds the gate.
    pub fn request(&mut self) -> bool {
        if self.is_paused() {
            self.dirty = true;
            return false;
        }
        true
    }

    pub fn is_paused(&self) -> bool {
        self.active > 0
    }

    /// Number of groups currently suspended.
    pub fn active_count(&self) -> usize {
        self.active
    }

    pub fn is_suspended(&self, group: EventGroup) -> bool {
        self.states.get(&group).copied().unwrap_or(false)
    }

    /// A recomputation was requested while paused and has not run yet.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use EventGroup::*;

    #[test]
    fn starts_idle() {
        let gate = PauseGate::new();
        assert!(!gate.is_paused());
        assert_eq!(gate.active_count(), 0);
        assert!(EventGroup::ALL.iter().all(|&g| !gate.is_suspended(g)));
    }

    #[test]
    fn duplicate_begin_is_idempotent() {
        let mut gate = PauseGate::new();
        assert!(gate.begin(UtilityTrayOpening));
        assert!(!gate.begin(UtilityTrayOpening));
        assert_eq!(gate.active_count(), 1);
        assert_eq!(gate.end(UtilityTrayOpening), Resume::Resumed { was_dirty: false });
        assert!(!gate.is_paused());
    }

    #[test]
    fn end_without_begin_is_noop() {
        let mut gate = PauseGate::new();
        assert_eq!(gate.end(CardView), Resume::Unchanged);
        assert_eq!(gate.active_count(), 0);
    }

    #[test]
    fn overlapping_groups_resume_once() {
        let mut gate = PauseGate::new();
        gate.begin(SheetsGesture);
        gate.begin(CardView);
        assert_eq!(gate.end(SheetsGesture), Resume::StillPaused);
        assert_eq!(gate.end(SheetsGesture), Resume::Unchanged);
        assert!(gate.is_paused());
        assert!(matches!(gate.end(CardView), Resume::Resumed { .. }));
        assert_eq!(gate.end(CardView), Resume::Unchanged);
    }

    #[test]
    fn requests_while_paused_mark_dirty() {
        let mut gate = PauseGate::new();
        assert!(gate.request());
        assert!(!gate.is_dirty());

        gate.begin(Marionette);
        assert!(!gate.request());
        assert!(!gate.request());
        assert!(gate.is_dirty());

        assert_eq!(gate.end(Marionette), Resume::Resumed { was_dirty: true });
        assert!(!gate.is_dirty());
    }
}
