pub mod client;
pub mod events;

pub use client::{EventSource, ShellListener};
pub use events::{parse_event, IconAction, ShellEvent, WindowChange};
