use crate::error::Result;
use crate::icon::{ElementGeometry, IconHandle, IconKind};
use crate::state::{Appearance, HideSets};

/// Current display width (changes on rotation or layout-mode change).
pub trait ViewportProvider {
    fn viewport_width(&self) -> f64;
}

/// State of the sibling chrome (title/search bar) of the top-most window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChromeState {
    /// No chrome, or no measurable title element.
    Absent,
    /// The home screen is top-most: no chrome, and the bar is shown maximized.
    Homescreen,
    /// Chrome is expanded; the minimized bar is not width-constrained.
    Maximized,
    /// Chrome is collapsed and its title element occupies `width` pixels.
    Minimized { width: f64 },
}

pub trait ChromeProvider {
    /// Fails with [`IconBarError::NoActiveWindow`](crate::IconBarError::NoActiveWindow)
    /// when there is no top-most window to ask.
    fn chrome(&self) -> Result<ChromeState>;
}

/// Lock screen / attention screen: the bar is always shown maximized.
pub trait LockModeProvider {
    fn always_maximized(&self) -> bool;
}

/// Looks up the rendered element of a live icon owned by the icon subsystem.
pub trait IconGeometrySource {
    /// `None` when the handle is stale or the icon has no renderable element.
    fn geometry(&self, handle: IconHandle) -> Option<ElementGeometry>;
}

/// Receives the engine's decisions for both bar renderings.
pub trait VisibilitySink {
    /// Called once per completed recomputation pass with the full hide-sets.
    fn apply_visibility(&mut self, hidden: &HideSets);

    fn apply_appearance(&mut self, _appearance: Appearance) {}

    /// Display order of a freshly rendered icon.
    fn apply_order(&mut self, _id: IconKind, _order: i32) {}
}

/// Everything the engine consumes from and reports to the shell.
pub trait Host:
    ViewportProvider + ChromeProvider + LockModeProvider + IconGeometrySource + VisibilitySink
{
}

impl<T> Host for T where
    T: ViewportProvider + ChromeProvider + LockModeProvider + IconGeometrySource + VisibilitySink
{
}
