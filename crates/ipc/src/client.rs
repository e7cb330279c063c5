use crate::events::{parse_event, ShellEvent};
use iconbar_core::{IconBarError, Result};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::net::UnixStream;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Where shell event lines come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventSource {
    Stdin,
    /// Unix socket streaming `name>>data` lines.
    Socket(PathBuf),
}

impl EventSource {
    /// Use `socket` when configured, otherwise stdin.  `$ICONBAR_SOCKET`
    /// overrides both.
    pub fn from_config(socket: Option<&str>) -> Self {
        std::env::var("ICONBAR_SOCKET")
            .ok()
            .or_else(|| socket.map(str::to_string))
            .map_or(Self::Stdin, |path| Self::Socket(PathBuf::from(path)))
    }
}

/// Streams typed [`ShellEvent`]s from an [`EventSource`].
///
/// Lines that fail to parse (unknown icon kinds, malformed payloads) are
/// logged and dropped; they never reach the receiver.
pub struct ShellListener {
    source: EventSource,
}

impl ShellListener {
    pub fn new(source: EventSource) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &EventSource {
        &self.source
    }

    /// Spawn a background task that reads from the source and forwards
    /// events on the returned channel, in arrival order.
    ///
    /// Stdin closes the channel at EOF; a socket is reconnected every 2s
    /// after it drops.
    pub fn spawn(self) -> mpsc::Receiver<ShellEvent> {
        let (tx, rx) = mpsc::channel(32);

        match self.source {
            EventSource::Stdin => {
                tokio::spawn(async move {
                    info!("Reading shell events from stdin");
                    if let Err(e) = forward_lines(tokio::io::stdin(), &tx).await {
                        warn!("Stdin event stream failed: {e}");
                    }
                    debug!("Stdin closed");
                });
            }
            EventSource::Socket(path) => {
                tokio::spawn(async move {
                    loop {
                        match UnixStream::connect(&path).await {
                            Ok(stream) => {
                                info!("Connected to shell event socket {}", path.display());
                                if forward_lines(stream, &tx).await.is_err() && tx.is_closed() {
                                    return; // all receivers dropped
                                }
                                warn!("Shell event connection lost; reconnecting in 2s…");
                            }
                            Err(e) => {
                                error!("Cannot connect to {}: {e}; retrying in 2s…", path.display());
                            }
                        }

                        if tx.is_closed() {
                            return;
                        }
                        tokio::time::sleep(tokio::time::Duration::from_secs(2)).await;
                    }
                });
            }
        }

        rx
    }
}

/// Forward parsed lines from `reader` until EOF.
async fn forward_lines<R>(reader: R, tx: &mpsc::Sender<ShellEvent>) -> Result<()>
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match parse_event(&line) {
            Ok(event) => {
                tx.send(event)
                    .await
                    .map_err(|_| IconBarError::Ipc("event receiver dropped".into()))?;
            }
            Err(e) => warn!("Dropping shell event '{line}': {e}"),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::IconAction;
    use iconbar_core::IconKind;

    #[tokio::test]
    async fn forwards_parsed_lines_and_skips_bad_ones() {
        let input: &[u8] = b"iconshown>>wifi\n\niconshown>>jetpack\nsystem-resize>>320\n";
        let (tx, mut rx) = mpsc::channel(8);

        forward_lines(input, &tx).await.unwrap();
        drop(tx);

        assert_eq!(
            rx.recv().await,
            Some(ShellEvent::Icon { id: IconKind::Wifi, action: IconAction::Shown })
        );
        assert!(matches!(rx.recv().await, Some(ShellEvent::Window(_))));
        assert_eq!(rx.recv().await, None);
    }

    #[test]
    fn configured_socket_is_used() {
        if std::env::var_os("ICONBAR_SOCKET").is_some() {
            return;
        }
        assert_eq!(EventSource::from_config(None), EventSource::Stdin);
        assert_eq!(
            EventSource::from_config(Some("/run/shell.sock")),
            EventSource::Socket(PathBuf::from("/run/shell.sock"))
        );
    }
}
