pub mod error;
pub mod event;
pub mod host;
pub mod icon;
pub mod state;

pub use error::{IconBarError, Result};
pub use event::{EngineEvent, EventGroup, LifecycleKind};
pub use host::{
    ChromeProvider, ChromeState, Host, IconGeometrySource, LockModeProvider, ViewportProvider,
    VisibilitySink,
};
pub use icon::{ElementGeometry, IconHandle, IconKind};
pub use state::{
    round_px, Appearance, Budgets, HideSets, IconSlot, MinimizedBudget, WidthPolicy, BAR_PADDING,
    INTER_ELEMENT_GAP,
};
