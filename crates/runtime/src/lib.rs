//! Event loop for `iconbar`.
//!
//! Wires the layout engine to its collaborators:
//! - shell event stream (stdin or unix socket) → engine events
//! - simulated shell host (viewport, chrome, lock mode, icon geometry)
//! - config file watcher (layout constants reload on change)
//!
//! Events are dispatched one at a time on a single-threaded runtime.

pub mod host;

pub use host::SimHost;

use iconbar_config::{default_path, load as load_config, IconBarConfig};
use iconbar_core::{ChromeState, EngineEvent, EventGroup, LifecycleKind, Result};
use iconbar_ipc::{EventSource, IconAction, ShellEvent, ShellListener, WindowChange};
use iconbar_layout::{Engine, PriorityTable};
use std::io::Write;
use std::path::Path;
use tracing::{debug, info, warn};

/// Start the engine on the default config.  Returns when the event stream ends.
pub fn run() -> Result<()> {
    let path = default_path();
    let config = load_config(&path)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(event_loop(config, &path))
}

async fn event_loop(config: IconBarConfig, path: &Path) -> Result<()> {
    let table = PriorityTable::with_overrides(&config.icon_overrides()?);
    let mut engine = Engine::new(&table, config.layout);
    let mut host = SimHost::new(config.viewport.width, std::io::stdout());

    let source = EventSource::from_config(config.ipc.socket.as_deref());
    let mut events = ShellListener::new(source).spawn();
    let (_watcher, mut reloads) = iconbar_config::ConfigWatcher::spawn(path);

    // Initial layout so the bar isn't unfitted until the first event arrives.
    engine.dispatch(EngineEvent::Environment, &mut host);

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(event) => handle_event(&mut engine, &mut host, event),
                None => {
                    info!("Shell event stream closed");
                    break;
                }
            },
            Some(()) = reloads.recv() => reload(&mut engine, &mut host, &config, path),
        }
    }

    info!("{} layout passes", engine.passes());
    Ok(())
}

/// Apply one shell event to the host state and dispatch the matching
/// engine event(s).
pub fn handle_event<W: Write>(engine: &mut Engine<'_>, host: &mut SimHost<W>, event: ShellEvent) {
    match event {
        ShellEvent::Icon { id, action } => {
            let kind = match action {
                IconAction::Created(handle) => LifecycleKind::Created(host.create_icon(handle)),
                IconAction::Shown => LifecycleKind::Shown,
                IconAction::Hidden => LifecycleKind::Hidden,
                IconAction::Rendered => LifecycleKind::Rendered,
                IconAction::Changed => LifecycleKind::Changed,
                IconAction::WidthChanged(geometry) => {
                    match engine.registry().get(id).and_then(|slot| slot.attached) {
                        Some(handle) => host.set_geometry(handle, geometry),
                        None => debug!("Width of '{id}' changed before it was created"),
                    }
                    engine.dispatch(EngineEvent::Geometry { id }, host);
                    return;
                }
            };
            engine.dispatch(EngineEvent::Lifecycle { id, kind }, host);
        }
        ShellEvent::Window(change) => {
            host.apply_change(change);
            engine.dispatch(EngineEvent::Environment, host);
        }
        ShellEvent::Begin(group) => {
            engine.dispatch(EngineEvent::GroupBegin(group), host);
        }
        ShellEvent::End(group) => {
            engine.dispatch(EngineEvent::GroupEnd(group), host);
        }
        ShellEvent::HomescreenOpened => {
            host.apply_change(WindowChange::Opened(ChromeState::Homescreen));
            engine.dispatch(EngineEvent::Environment, host);
            // The sheet gesture may have ended without telling us.
            engine.dispatch(EngineEvent::GroupEnd(EventGroup::SheetsGesture), host);
        }
        ShellEvent::Unknown(line) => debug!("Ignoring shell event: {line}"),
    }
}

fn reload<W: Write>(engine: &mut Engine<'_>, host: &mut SimHost<W>, current: &IconBarConfig, path: &Path) {
    match load_config(path) {
        Ok(cfg) => {
            info!("Config reloaded");
            if cfg.icons != current.icons {
                warn!("Icon priority overrides changed; restart to apply them");
            }
            engine.set_layout(cfg.layout);
            engine.dispatch(EngineEvent::Environment, host);
        }
        Err(e) => warn!("Config reload failed: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iconbar_config::LayoutConfig;
    use iconbar_ipc::parse_event;

    fn feed<W: Write>(engine: &mut Engine<'_>, host: &mut SimHost<W>, lines: &[&str]) {
        for line in lines {
            handle_event(engine, host, parse_event(line).unwrap());
        }
    }

    fn visibility_lines(out: Vec<u8>) -> Vec<serde_json::Value> {
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str::<serde_json::Value>(l).unwrap())
            .filter(|v| v["type"] == "visibility")
            .collect()
    }

    #[test]
    fn narrow_screen_hides_low_priority_icons() {
        let table = PriorityTable::default();
        let mut engine = Engine::new(&table, LayoutConfig::default());
        // 70 - 6 = 64px: time (40) + battery (29) already overflow.
        let mut host = SimHost::new(70.0, Vec::new());

        feed(&mut engine, &mut host, &[
            "iconcreated>>time",
            "iconwidthchanged>>time,36,2,2",
            "iconshown>>time",
            "iconcreated>>battery",
            "iconshown>>battery",
            "iconcreated>>wifi",
            "iconshown>>wifi",
        ]);

        let last = visibility_lines(host.into_inner()).pop().unwrap();
        assert_eq!(last["hidden_in_maximized"], serde_json::json!(["battery", "wifi"]));
    }

    #[test]
    fn utility_tray_defers_until_opened() {
        let table = PriorityTable::default();
        let mut engine = Engine::new(&table, LayoutConfig::default());
        let mut host = SimHost::new(360.0, Vec::new());

        feed(&mut engine, &mut host, &[
            "iconcreated>>wifi",
            "utilitytraywillshow",
            "iconshown>>wifi",
            "system-resize>>20",
        ]);
        let passes = engine.passes();

        feed(&mut engine, &mut host, &["utility-tray-overlayopened"]);
        assert_eq!(engine.passes(), passes + 1);

        let last = visibility_lines(host.into_inner()).pop().unwrap();
        assert_eq!(last["hidden_in_maximized"], serde_json::json!(["wifi"]));
    }

    #[test]
    fn homescreen_recovers_from_missed_gesture_end() {
        let table = PriorityTable::default();
        let mut engine = Engine::new(&table, LayoutConfig::default());
        let mut host = SimHost::new(360.0, Vec::new());

        feed(&mut engine, &mut host, &["sheets-gesture-begin", "appopening"]);
        assert!(engine.gate().is_paused());

        feed(&mut engine, &mut host, &["homescreenopened"]);
        assert!(!engine.gate().is_paused());
        assert_eq!(engine.passes(), 1);
    }

    #[test]
    fn homescreen_maximizes_bar() {
        let table = PriorityTable::default();
        let mut engine = Engine::new(&table, LayoutConfig::default());
        let mut host = SimHost::new(360.0, Vec::new());

        feed(&mut engine, &mut host, &["appopened>>collapsed,100"]);
        assert_eq!(engine.appearance().map(|a| a.maximized), Some(false));

        feed(&mut engine, &mut host, &["homescreenopened"]);
        assert_eq!(engine.appearance().map(|a| a.maximized), Some(true));
    }

    #[test]
    fn collapsed_chrome_narrows_minimized_bar() {
        let table = PriorityTable::default();
        let mut engine = Engine::new(&table, LayoutConfig::default());
        let mut host = SimHost::new(360.0, Vec::new());

        // 360 - 6 - 300 - 8 = 46px next to the title: battery (29) fits, wifi (20) doesn't.
        feed(&mut engine, &mut host, &[
            "iconcreated>>battery",
            "iconshown>>battery",
            "iconcreated>>wifi",
            "iconshown>>wifi",
            "appopened>>collapsed,300",
        ]);

        let last = visibility_lines(host.into_inner()).pop().unwrap();
        assert_eq!(last["hidden_in_maximized"], serde_json::json!([]));
        assert_eq!(last["hidden_in_minimized"], serde_json::json!(["wifi"]));
    }
}
