use crate::icon::{IconHandle, IconKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Horizontal padding of the bar (`padding: 0 3px` on both sides).
pub const BAR_PADDING: f64 = 6.0;

/// Padding plus margin between the minimized bar and the sibling chrome.
pub const INTER_ELEMENT_GAP: f64 = 8.0;

/// Round a fractional pixel value the same way everywhere.
///
/// Icon widths and budgets must share one rounding rule, otherwise icons
/// sitting exactly on the boundary flicker between shown and hidden.
pub fn round_px(value: f64) -> i32 {
    value.round() as i32
}

/// How an icon's width is determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidthPolicy {
    /// The icon never changes size.
    Fixed(u32),
    /// Derived from rendered geometry (clock, operator name, …).
    Dynamic,
}

impl WidthPolicy {
    pub fn is_dynamic(self) -> bool {
        matches!(self, Self::Dynamic)
    }
}

/// Registry entry for one icon kind.
#[derive(Debug, Clone, PartialEq)]
pub struct IconSlot {
    pub id: IconKind,
    /// Lower = higher priority = hidden last.
    pub order: i32,
    pub width: WidthPolicy,
    /// Width last reported/measured for a dynamic icon.
    pub cached_width: Option<u32>,
    /// Live icon, if the icon subsystem has created it yet.
    pub attached: Option<IconHandle>,
    /// Whether the icon's owner wants it shown at all.
    pub visible: bool,
}

impl IconSlot {
    pub fn new(id: IconKind, order: i32, width: WidthPolicy) -> Self {
        Self {
            id,
            order,
            width,
            cached_width: None,
            attached: None,
            visible: false,
        }
    }
}

/// Budget for the minimized bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MinimizedBudget {
    Width(i32),
    /// Sibling chrome is maximized: the minimized bar is not width-constrained.
    Unconstrained,
}

/// Width budgets for both bar renderings.  Either may be negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Budgets {
    pub maximized: i32,
    pub minimized: MinimizedBudget,
}

/// Icons hidden for space reasons, per rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HideSets {
    pub hidden_in_maximized: BTreeSet<IconKind>,
    pub hidden_in_minimized: BTreeSet<IconKind>,
}

impl HideSets {
    pub fn is_empty(&self) -> bool {
        self.hidden_in_maximized.is_empty() && self.hidden_in_minimized.is_empty()
    }
}

/// Bar-level presentation derived from the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Appearance {
    /// Show the full-width rendering regardless of chrome state.
    pub maximized: bool,
}
