use crate::error::{ScenarioPadError, ScenarioPadResult};
use async_trait::async_trait;
use std::sync::mpsc as std_mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use tokio::sync::oneshot;

#[async_trait]
pub trait ClipboardBackend: Send + Sync {
    async fn write_text(&self, text: String) -> ScenarioPadResult<()>;
    async fn read_text(&self) -> ScenarioPadResult<String>;
}

enum Request {
    Write(String, oneshot::Sender<ScenarioPadResult<()>>),
    Read(oneshot::Sender<ScenarioPadResult<String>>),
}

/// The desktop clipboard, owned by a dedicated thread for the whole session
/// so copied text stays available after the call returns.
#[derive(Clone)]
pub struct SystemClipboard {
    tx: std_mpsc::Sender<Request>,
}

impl SystemClipboard {
    pub fn new() -> ScenarioPadResult<Self> {
        let (tx, rx) = std_mpsc::channel::<Request>();
        let (ready_tx, ready_rx) = std_mpsc::channel::<ScenarioPadResult<()>>();

        thread::Builder::new()
            .name("clipboard".into())
            .spawn(move || {
                let mut clipboard = match arboard::Clipboard::new() {
                    Ok(c) => {
                        let _ = ready_tx.send(Ok(()));
                        c
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(ScenarioPadError::clipboard(e.to_string())));
                        return;
                    }
                };
                while let Ok(req) = rx.recv() {
                    match req {
                        Request::Write(text, reply) => {
                            let result = clipboard
                                .set_text(text)
                                .map_err(|e| ScenarioPadError::clipboard(e.to_string()));
                            let _ = reply.send(result);
                        }
                        Request::Read(reply) => {
                            let result = clipboard
                                .get_text()
                                .map_err(|e| ScenarioPadError::clipboard(e.to_string()));
                            let _ = reply.send(result);
                        }
                    }
                }
            })?;

        ready_rx
            .recv()
            .map_err(|_| ScenarioPadError::clipboard("clipboard thread exited"))??;
        Ok(Self { tx })
    }

    fn send(&self, req: Request) -> ScenarioPadResult<()> {
        self.tx
            .send(req)
            .map_err(|_| ScenarioPadError::clipboard("clipboard thread exited"))
    }
}

#[async_trait]
impl ClipboardBackend for SystemClipboard {
    async fn write_text(&self, text: String) -> ScenarioPadResult<()> {
        let (reply, rx) = oneshot::channel();
        self.send(Request::Write(text, reply))?;
        rx.await
            .map_err(|_| ScenarioPadError::clipboard("clipboard thread dropped the request"))?
    }

    async fn read_text(&self) -> ScenarioPadResult<String> {
        let (reply, rx) = oneshot::channel();
        self.send(Request::Read(reply))?;
        rx.await
            .map_err(|_| ScenarioPadError::clipboard("clipboard thread dropped the request"))?
    }
}

/// Process-local clipboard for sessions without a desktop clipboard.
#[derive(Clone, Default)]
pub struct MemoryClipboard {
    contents: Arc<Mutex<Option<String>>>,
    fail_reads: bool,
    fail_writes: bool,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn with_contents(text: &str) -> Self {
        let clipboard = Self::new();
        if let Ok(mut contents) = clipboard.contents.lock() {
            *contents = Some(text.to_string());
        }
        clipboard
    }

    #[cfg(test)]
    pub fn failing() -> Self {
        Self {
            fail_reads: true,
            fail_writes: true,
            ..Self::default()
        }
    }

    #[cfg(test)]
    pub fn contents(&self) -> Option<String> {
        self.contents.lock().ok().and_then(|c| c.clone())
    }
}

#[async_trait]
impl ClipboardBackend for MemoryClipboard {
    async fn write_text(&self, text: String) -> ScenarioPadResult<()> {
        if self.fail_writes {
            return Err(ScenarioPadError::clipboard("write denied"));
        }
        let mut contents = self
            .contents
            .lock()
            .map_err(|_| ScenarioPadError::clipboard("clipboard lock poisoned"))?;
        *contents = Some(text);
        Ok(())
    }

    async fn read_text(&self) -> ScenarioPadResult<String> {
        if self.fail_reads {
            return Err(ScenarioPadError::clipboard("read denied"));
        }
        let contents = self
            .contents
            .lock()
            .map_err(|_| ScenarioPadError::clipboard("clipboard lock poisoned"))?;
        contents
            .clone()
            .ok_or_else(|| ScenarioPadError::clipboard("clipboard is empty"))
    }
}
