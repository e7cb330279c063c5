pub mod schema;
pub mod watcher;

pub use schema::{
    IconBarConfig, IconOverride, IpcConfig, LayoutConfig, ViewportConfig, WidthKeyword,
    WidthSetting,
};
pub use watcher::ConfigWatcher;

use iconbar_core::{IconBarError, Result};
use std::path::{Path, PathBuf};

/// Load configuration from a TOML file.  Returns `IconBarConfig::default()`
/// if the file doesn't exist so the engine always has sensible defaults.
pub fn load(path: impl AsRef<Path>) -> Result<IconBarConfig> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::warn!(
            "Config file not found at '{}'; using defaults.",
            path.display()
        );
        return Ok(IconBarConfig::default());
    }

    let raw = std::fs::read_to_string(path)
        .map_err(|e| IconBarError::Config(format!("cannot read '{}': {e}", path.display())))?;

    let config: IconBarConfig =
        toml::from_str(&raw).map_err(|e| IconBarError::Config(format!("TOML parse error: {e}")))?;

    // Surface unknown icon kinds at load time rather than at first use.
    config.icon_overrides()?;
    Ok(config)
}

/// Return the default config path, honouring `$XDG_CONFIG_HOME`.
pub fn default_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("iconbar").join("iconbar.toml")
}
