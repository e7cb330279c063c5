use thiserror::Error;

/// Top-level error type used across the entire engine.
#[derive(Debug, Error)]
pub enum IconBarError {
    /// An event or config entry named an icon outside the closed set of kinds.
    #[error("unknown icon kind: {0}")]
    UnknownIconKind(String),

    #[error("unknown event group: {0}")]
    UnknownEventGroup(String),

    /// No top-level window is available to answer a budget/appearance query.
    #[error("no active window")]
    NoActiveWindow,

    #[error("config error: {0}")]
    Config(String),

    #[error("IPC error: {0}")]
    Ipc(String),

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

pub type Result<T, E = IconBarError> = std::result::Result<T, E>;
