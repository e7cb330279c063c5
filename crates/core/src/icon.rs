use crate::error::IconBarError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Every icon kind the status bar knows about.
///
/// The set is closed: icons are defined at build time and an identifier
/// outside this list is a programming error on the sender's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IconKind {
    EmergencyCallback,
    Battery,
    Recording,
    AirplaneMode,
    Wifi,
    MobileConnection,
    Time,
    Debugging,
    Download,
    Geolocation,
    NetworkActivity,
    Tethering,
    BluetoothTransfer,
    Bluetooth,
    Nfc,
    Usb,
    Alarm,
    BluetoothHeadphone,
    Mute,
    CallForwardings,
    Playing,
    Headphone,
    Operator,
}

impl IconKind {
    /// All kinds, in priority-table definition order.
    pub const ALL: [Self; 23] = [
        Self::EmergencyCallback,
        Self::Battery,
        Self::Recording,
        Self::AirplaneMode,
        Self::Wifi,
        Self::MobileConnection,
        Self::Time,
        Self::Debugging,
        Self::Download,
        Self::Geolocation,
        Self::NetworkActivity,
        Self::Tethering,
        Self::BluetoothTransfer,
        Self::Bluetooth,
        Self::Nfc,
        Self::Usb,
        Self::Alarm,
        Self::BluetoothHeadphone,
        Self::Mute,
        Self::CallForwardings,
        Self::Playing,
        Self::Headphone,
        Self::Operator,
    ];

    /// Dash-separated identifier used on the wire and in config files.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EmergencyCallback  => "emergency-callback",
            Self::Battery            => "battery",
            Self::Recording          => "recording",
            Self::AirplaneMode       => "airplane-mode",
            Self::Wifi               => "wifi",
            Self::MobileConnection   => "mobile-connection",
            Self::Time               => "time",
            Self::Debugging          => "debugging",
            Self::Download           => "download",
            Self::Geolocation        => "geolocation",
            Self::NetworkActivity    => "network-activity",
            Self::Tethering          => "tethering",
            Self::BluetoothTransfer  => "bluetooth-transfer",
            Self::Bluetooth          => "bluetooth",
            Self::Nfc                => "nfc",
            Self::Usb                => "usb",
            Self::Alarm              => "alarm",
            Self::BluetoothHeadphone => "bluetooth-headphone",
            Self::Mute               => "mute",
            Self::CallForwardings    => "call-forwardings",
            Self::Playing            => "playing",
            Self::Headphone          => "headphone",
            Self::Operator           => "operator",
        }
    }
}

impl fmt::Display for IconKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IconKind {
    type Err = IconBarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| IconBarError::UnknownIconKind(s.to_string()))
    }
}

/// Non-owning key for a live icon held by the external icon subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IconHandle(pub u64);

/// Rendered geometry of an icon element, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ElementGeometry {
    pub content_width: f64,
    pub margin_left:   f64,
    pub margin_right:  f64,
}

impl ElementGeometry {
    /// Content width plus both margins, unrounded.
    pub fn outer_width(&self) -> f64 {
        self.content_width + self.margin_left + self.margin_right
    }
}
