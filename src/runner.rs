use crate::clipboard::ClipboardBackend;
use std::sync::Arc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    CopyToClipboard { payload: String },
    PasteFromClipboard,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    CopyFinished(Result<(), String>),
    PasteFinished(Result<String, String>),
}

/// Execute one clipboard command and report its outcome.
pub async fn run_clipboard_command(
    cmd: AppCommand,
    clipboard: &dyn ClipboardBackend,
    tx: &UnboundedSender<AppEvent>,
) {
    let event = match cmd {
        AppCommand::CopyToClipboard { payload } => {
            debug!("Writing {} bytes to clipboard", payload.len());
            AppEvent::CopyFinished(clipboard.write_text(payload).await.map_err(|e| e.to_string()))
        }
        AppCommand::PasteFromClipboard => {
            debug!("Reading clipboard");
            AppEvent::PasteFinished(clipboard.read_text().await.map_err(|e| e.to_string()))
        }
    };
    let _ = tx.send(event);
}

/// Worker loop: runs until every command sender is dropped.
pub async fn run_worker(
    mut rx: UnboundedReceiver<AppCommand>,
    tx: UnboundedSender<AppEvent>,
    clipboard: Arc<dyn ClipboardBackend>,
) {
    while let Some(cmd) = rx.recv().await {
        run_clipboard_command(cmd, clipboard.as_ref(), &tx).await;
    }
    debug!("Clipboard worker stopped");
}
