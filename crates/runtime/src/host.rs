use iconbar_core::{
    Appearance, ChromeProvider, ChromeState, ElementGeometry, HideSets, IconBarError,
    IconGeometrySource, IconHandle, IconKind, LockModeProvider, Result, ViewportProvider,
    VisibilitySink,
};
use iconbar_ipc::WindowChange;
use serde::Serialize;
use std::collections::HashMap;
use std::io::Write;
use tracing::warn;

/// One line of engine output.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Output<'a> {
    Visibility(&'a HideSets),
    Appearance(Appearance),
    Order { id: IconKind, order: i32 },
}

/// Shell state reconstructed from the event stream.
///
/// Stands in for the window manager and the icon subsystem: it owns the
/// live icons (the engine only keeps their handles) and writes every
/// decision the engine makes to `out` as one JSON object per line.
#[derive(Debug)]
pub struct SimHost<W: Write> {
    viewport:    f64,
    /// `None` while no window is top-most.
    window:      Option<ChromeState>,
    locked:      bool,
    attention:   bool,
    icons:       HashMap<IconHandle, Option<ElementGeometry>>,
    next_handle: u64,
    out:         W,
}

impl<W: Write> SimHost<W> {
    /// Start on the home screen (no chrome) with the given viewport width.
    pub fn new(viewport: f64, out: W) -> Self {
        Self {
            viewport,
            window: Some(ChromeState::Absent),
            locked: false,
            attention: false,
            icons: HashMap::new(),
            next_handle: 1,
            out,
        }
    }

    /// Register a live icon, allocating a handle if the shell sent none.
    pub fn create_icon(&mut self, handle: Option<IconHandle>) -> IconHandle {
        let handle = handle.unwrap_or_else(|| {
            while self.icons.contains_key(&IconHandle(self.next_handle)) {
                self.next_handle += 1;
            }
            IconHandle(self.next_handle)
        });
        self.icons.insert(handle, None);
        handle
    }

    pub fn set_geometry(&mut self, handle: IconHandle, geometry: Option<ElementGeometry>) {
        self.icons.insert(handle, geometry);
    }

    pub fn apply_change(&mut self, change: WindowChange) {
        match change {
            WindowChange::Resized(width) => self.viewport = width,
            WindowChange::Opened(chrome) => self.window = Some(chrome),
            WindowChange::Transition => self.window = None,
            WindowChange::ChromeCollapsed(width) => {
                self.window = Some(ChromeState::Minimized { width });
            }
            WindowChange::ChromeExpanded => self.window = Some(ChromeState::Maximized),
            WindowChange::LockScreen(locked) => self.locked = locked,
            WindowChange::Attention(open) => self.attention = open,
            WindowChange::Refresh => {}
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, output: &Output<'_>) {
        let written = serde_json::to_writer(&mut self.out, output)
            .map_err(std::io::Error::from)
            .and_then(|()| writeln!(self.out))
            .and_then(|()| self.out.flush());
        if let Err(e) = written {
            warn!("Cannot write engine output: {e}");
        }
    }
}

impl<W: Write> ViewportProvider for SimHost<W> {
    fn viewport_width(&self) -> f64 {
        self.viewport
    }
}

impl<W: Write> ChromeProvider for SimHost<W> {
    fn chrome(&self) -> Result<ChromeState> {
        self.window.ok_or(IconBarError::NoActiveWindow)
    }
}

impl<W: Write> LockModeProvider for SimHost<W> {
    fn always_maximized(&self) -> bool {
        self.locked || self.attention
    }
}

impl<W: Write> IconGeometrySource for SimHost<W> {
    fn geometry(&self, handle: IconHandle) -> Option<ElementGeometry> {
        self.icons.get(&handle).copied().flatten()
    }
}

impl<W: Write> VisibilitySink for SimHost<W> {
    fn apply_visibility(&mut self, hidden: &HideSets) {
        self.emit(&Output::Visibility(hidden));
    }

    fn apply_appearance(&mut self, appearance: Appearance) {
        self.emit(&Output::Appearance(appearance));
    }

    fn apply_order(&mut self, id: IconKind, order: i32) {
        self.emit(&Output::Order { id, order });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocates_unused_handles() {
        let mut host = SimHost::new(360.0, Vec::new());
        host.create_icon(Some(IconHandle(1)));
        let fresh = host.create_icon(None);
        assert_ne!(fresh, IconHandle(1));
        assert_ne!(host.create_icon(None), IconHandle(1));
    }

    #[test]
    fn transition_means_no_active_window() {
        let mut host = SimHost::new(360.0, Vec::new());
        host.apply_change(WindowChange::Transition);
        assert!(matches!(host.chrome(), Err(IconBarError::NoActiveWindow)));
        host.apply_change(WindowChange::ChromeCollapsed(120.0));
        assert_eq!(host.chrome().unwrap(), ChromeState::Minimized { width: 120.0 });
    }

    #[test]
    fn visibility_is_written_as_json_line() {
        let mut host = SimHost::new(360.0, Vec::new());
        let mut hidden = HideSets::default();
        hidden.hidden_in_minimized.insert(IconKind::Wifi);
        host.apply_visibility(&hidden);

        let out = String::from_utf8(host.into_inner()).unwrap();
        assert_eq!(
            out,
            "{\"type\":\"visibility\",\"hidden_in_maximized\":[],\"hidden_in_minimized\":[\"wifi\"]}\n"
        );
    }
}
