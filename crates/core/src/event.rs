use crate::error::IconBarError;
use crate::icon::{IconHandle, IconKind};
use std::fmt;
use std::str::FromStr;

/// All events that flow into the layout engine.
///
/// Sources:
/// - Icon subsystem        → `Lifecycle`, `Geometry`
/// - Shell / window manager → `Environment`
/// - Transitions (tray, card view, sheet gestures) → `GroupBegin`, `GroupEnd`
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// An icon was created, shown, hidden, rendered or changed.
    Lifecycle { id: IconKind, kind: LifecycleKind },
    /// An icon's rendered width changed.
    Geometry { id: IconKind },
    /// Viewport, sibling chrome or lock mode may have changed.
    Environment,
    /// Suspend recomputation for `group`.
    GroupBegin(EventGroup),
    /// Lift the suspension held by `group`.
    GroupEnd(EventGroup),
}

/// What happened to an icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleKind {
    /// The icon subsystem created the icon; binds the live handle to its slot.
    Created(IconHandle),
    /// The owner wants the icon shown.
    Shown,
    /// The owner no longer wants the icon shown.
    Hidden,
    /// The icon element was inserted into the bar.
    Rendered,
    /// Content changed without a visibility change.
    Changed,
}

/// Named reason for suspending recomputation.
///
/// Several raw shell events may map onto one group; see the IPC crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventGroup {
    UtilityTrayOpening,
    UtilityTrayClosing,
    CardView,
    SheetsGesture,
    Marionette,
}

impl EventGroup {
    pub const ALL: [Self; 5] = [
        Self::UtilityTrayOpening,
        Self::UtilityTrayClosing,
        Self::CardView,
        Self::SheetsGesture,
        Self::Marionette,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::UtilityTrayOpening => "utilitytrayopening",
            Self::UtilityTrayClosing => "utilitytrayclosing",
            Self::CardView           => "cardview",
            Self::SheetsGesture      => "sheetsgesture",
            Self::Marionette         => "marionette",
        }
    }
}

impl fmt::Display for EventGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventGroup {
    type Err = IconBarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|group| group.as_str() == s)
            .ok_or_else(|| IconBarError::UnknownEventGroup(s.to_string()))
    }
}
