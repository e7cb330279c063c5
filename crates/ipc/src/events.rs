use iconbar_core::{ChromeState, ElementGeometry, EventGroup, IconBarError, IconHandle, IconKind, Result};

/// Events read from the shell's event stream.
#[derive(Debug, Clone, PartialEq)]
pub enum ShellEvent {
    Icon { id: IconKind, action: IconAction },
    Window(WindowChange),
    Begin(EventGroup),
    End(EventGroup),
    /// Home screen reached: ends any sheet gesture whose end event was missed,
    /// and replaces the top-most window.
    HomescreenOpened,
    /// An event we don't handle — carries the raw line for debugging.
    Unknown(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IconAction {
    /// `None` lets the receiver allocate a handle.
    Created(Option<IconHandle>),
    Shown,
    Hidden,
    Rendered,
    Changed,
    /// New element geometry; `None` = element no longer measurable.
    WidthChanged(Option<ElementGeometry>),
}

/// Changes to the display environment of the bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WindowChange {
    /// Viewport width changed (rotation, software home button).
    Resized(f64),
    /// A new top-most window with the given chrome.
    Opened(ChromeState),
    /// A window transition started; there is no top-most window until it ends.
    Transition,
    /// Chrome of the current window collapsed; title occupies `width` px.
    ChromeCollapsed(f64),
    ChromeExpanded,
    LockScreen(bool),
    Attention(bool),
    /// Something changed that only needs a refit.
    Refresh,
}

/// Parse a raw event line into a typed [`ShellEvent`].
///
/// Events have the format `event_name>>event_data`; the `>>data` part may be
/// omitted.  An icon identifier outside the known set yields
/// [`IconBarError::UnknownIconKind`], malformed payloads [`IconBarError::Ipc`].
pub fn parse_event(line: &str) -> Result<ShellEvent> {
    let line = line.trim();
    let (event, data) = line.split_once(">>").unwrap_or((line, ""));
    let data = data.trim();

    let event = match event {
        "iconcreated" => {
            let (kind, handle) = split_first(data);
            let handle = handle.map(|h| parse_num::<u64>(event, h).map(IconHandle)).transpose()?;
            icon(kind, IconAction::Created(handle))?
        }
        "iconshown" => icon(data, IconAction::Shown)?,
        "iconhidden" => icon(data, IconAction::Hidden)?,
        "iconrendered" => icon(data, IconAction::Rendered)?,
        "iconchanged" => icon(data, IconAction::Changed)?,
        "iconwidthchanged" => {
            let (kind, rest) = split_first(data);
            let geometry = rest.map(|g| parse_geometry(event, g)).transpose()?;
            icon(kind, IconAction::WidthChanged(geometry))?
        }

        "system-resize" => window(WindowChange::Resized(parse_num(event, data)?)),
        "appopened" | "activityopened" | "hierarchytopmostwindowchanged" => {
            window(WindowChange::Opened(parse_chrome(event, data)?))
        }
        "appopening" | "homescreenopening" => window(WindowChange::Transition),
        "appchromecollapsed" => window(WindowChange::ChromeCollapsed(parse_num(event, data)?)),
        "appchromeexpanded" => window(WindowChange::ChromeExpanded),
        "lockscreen-appopened" => window(WindowChange::LockScreen(true)),
        "lockscreen-appclosing" => window(WindowChange::LockScreen(false)),
        "attentionopened" => window(WindowChange::Attention(true)),
        "attentionclosed" => window(WindowChange::Attention(false)),
        "activitydestroyed" | "stackchanged" | "rocketbar-deactivated" => {
            window(WindowChange::Refresh)
        }
        "homescreenopened" => ShellEvent::HomescreenOpened,

        "groupbegin" => ShellEvent::Begin(data.parse()?),
        "groupend" => ShellEvent::End(data.parse()?),
        raw => match suspension(raw) {
            Some((group, true)) => ShellEvent::Begin(group),
            Some((group, false)) => ShellEvent::End(group),
            None => ShellEvent::Unknown(line.to_string()),
        },
    };

    Ok(event)
}

/// Map a raw transition event to its group and whether it begins (`true`)
/// or ends (`false`) the suspension.
///
/// `utility-tray-abortclose` ends the *opening* group and
/// `utility-tray-abortopen` the *closing* one: an aborted close leaves the
/// tray open, as if an opening had just completed.
pub fn suspension(raw: &str) -> Option<(EventGroup, bool)> {
    use EventGroup::*;

    let mapped = match raw {
        "utilitytraywillshow" => (UtilityTrayOpening, true),
        "utility-tray-overlayopened" | "utility-tray-abortclose" => (UtilityTrayOpening, false),
        "utilitytraywillhide" => (UtilityTrayClosing, true),
        "utility-tray-overlayclosed" | "utility-tray-abortopen" => (UtilityTrayClosing, false),
        "cardviewshown" => (CardView, true),
        "cardviewclosed" => (CardView, false),
        "sheets-gesture-begin" => (SheetsGesture, true),
        "sheets-gesture-end" => (SheetsGesture, false),
        _ => return None,
    };
    Some(mapped)
}

fn icon(kind: &str, action: IconAction) -> Result<ShellEvent> {
    Ok(ShellEvent::Icon {
        id: kind.parse()?,
        action,
    })
}

fn window(change: WindowChange) -> ShellEvent {
    ShellEvent::Window(change)
}

/// `"a,b,c"` → `("a", Some("b,c"))`.
fn split_first(data: &str) -> (&str, Option<&str>) {
    match data.split_once(',') {
        Some((first, rest)) => (first.trim(), Some(rest.trim())),
        None => (data, None),
    }
}

fn parse_num<T: std::str::FromStr>(event: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| IconBarError::Ipc(format!("{event}: invalid number '{raw}'")))
}

/// `content[,margin_left,margin_right]`; missing margins are zero.
fn parse_geometry(event: &str, data: &str) -> Result<ElementGeometry> {
    let mut parts = data.split(',');
    let mut next = || -> Result<f64> {
        parts.next().map_or(Ok(0.0), |p| parse_num(event, p))
    };
    Ok(ElementGeometry {
        content_width: next()?,
        margin_left:   next()?,
        margin_right:  next()?,
    })
}

/// `""`/`none` → no chrome, `homescreen`, `expanded`, or `collapsed,<title width>`.
fn parse_chrome(event: &str, data: &str) -> Result<ChromeState> {
    let (mode, width) = split_first(data);
    match (mode, width) {
        ("" | "none", _) => Ok(ChromeState::Absent),
        ("expanded", _) => Ok(ChromeState::Maximized),
        ("homescreen", _) => Ok(ChromeState::Homescreen),
        ("collapsed", Some(width)) => Ok(ChromeState::Minimized {
            width: parse_num(event, width)?,
        }),
        _ => Err(IconBarError::Ipc(format!("{event}: invalid chrome state '{data}'"))),
    }
}
