use iconbar_core::{IconBarError, IconKind, Result, WidthPolicy, BAR_PADDING, INTER_ELEMENT_GAP};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Root configuration structure parsed from `iconbar.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IconBarConfig {
    /// Layout constants shared by both bar renderings.
    pub layout: LayoutConfig,
    /// Per-icon overrides of the built-in priority table (key = icon kind).
    pub icons: BTreeMap<String, IconOverride>,
    /// Where shell events come from.
    pub ipc: IpcConfig,
    /// Initial display state of the simulated host.
    pub viewport: ViewportConfig,
}

impl IconBarConfig {
    /// Resolve the string-keyed icon overrides against the closed set of kinds.
    pub fn icon_overrides(&self) -> Result<Vec<(IconKind, IconOverride)>> {
        self.icons
            .iter()
            .map(|(name, ov)| {
                let kind = name
                    .parse::<IconKind>()
                    .map_err(|_| IconBarError::Config(format!("[icons.{name}]: unknown icon kind")))?;
                Ok((kind, *ov))
            })
            .collect()
    }
}

/// Bar styling constants that feed the width budgets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Total horizontal padding of the bar, both sides combined.
    pub bar_padding: f64,
    /// Gap between the minimized bar and the sibling chrome.
    pub inter_element_gap: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            bar_padding:       BAR_PADDING,
            inter_element_gap: INTER_ELEMENT_GAP,
        }
    }
}

/// Override for one priority-table entry; unset fields keep the defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IconOverride {
    pub order: Option<i32>,
    pub width: Option<WidthSetting>,
}

/// `width = 20` or `width = "dynamic"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WidthSetting {
    Px(u32),
    Keyword(WidthKeyword),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidthKeyword {
    Dynamic,
}

impl From<WidthSetting> for WidthPolicy {
    fn from(setting: WidthSetting) -> Self {
        match setting {
            WidthSetting::Px(px) => WidthPolicy::Fixed(px),
            WidthSetting::Keyword(WidthKeyword::Dynamic) => WidthPolicy::Dynamic,
        }
    }
}

/// Shell event source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IpcConfig {
    /// Unix socket streaming `name>>data` lines.  `None` = read stdin.
    pub socket: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Display width in CSS pixels at startup.
    pub width: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self { width: 360.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let cfg: IconBarConfig = toml::from_str("").unwrap();
        assert_eq!(cfg, IconBarConfig::default());
        assert_eq!(cfg.layout.bar_padding, BAR_PADDING);
    }

    #[test]
    fn parse_icon_overrides() {
        let cfg: IconBarConfig = toml::from_str(
            r#"
            [layout]
            bar_padding = 10.0

            [icons.wifi]
            order = 1

            [icons.battery]
            width = "dynamic"

            [icons.mute]
            width = 24
            "#,
        )
        .unwrap();

        assert_eq!(cfg.layout.bar_padding, 10.0);
        assert_eq!(cfg.layout.inter_element_gap, INTER_ELEMENT_GAP);

        let overrides = cfg.icon_overrides().unwrap();
        assert_eq!(overrides.len(), 3);
        let battery = overrides.iter().find(|(k, _)| *k == IconKind::Battery).unwrap();
        assert_eq!(battery.1.width.map(WidthPolicy::from), Some(WidthPolicy::Dynamic));
        let mute = overrides.iter().find(|(k, _)| *k == IconKind::Mute).unwrap();
        assert_eq!(mute.1.width.map(WidthPolicy::from), Some(WidthPolicy::Fixed(24)));
    }

    #[test]
    fn unknown_icon_override_is_rejected() {
        let cfg: IconBarConfig = toml::from_str("[icons.jetpack]\norder = 4\n").unwrap();
        assert!(matches!(cfg.icon_overrides(), Err(IconBarError::Config(_))));
    }
}
