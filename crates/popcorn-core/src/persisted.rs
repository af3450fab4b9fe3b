//! In-memory state mirrored into a [`KeyValueStore`].
//!
//! Reads happen once, on [`PersistedState::init`]. Every later change is
//! applied in memory immediately and re-serialized to the store by a
//! dedicated writer thread, so callers never wait on disk I/O.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::{mpsc, oneshot};

use crate::storage::KeyValueStore;

/// Commands sent to the writer thread.
enum WriteCommand {
    Write(Vec<u8>),
    Flush(oneshot::Sender<()>),
}

/// A value that survives restarts.
///
/// Corrupt or missing stored data falls back to the default; the
/// corruption is logged and never surfaced to the caller.
pub struct PersistedState<T> {
    key: String,
    value: T,
    tx: mpsc::UnboundedSender<WriteCommand>,
}

impl<T> PersistedState<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn init(store: Arc<dyn KeyValueStore>, key: impl Into<String>, default: T) -> Self {
        let key = key.into();
        let value = match store.get(&key) {
            Ok(Some(bytes)) => match serde_json::from_slice::<T>(&bytes) {
                Ok(value) => value,
                Err(e) => {
                    tracing::warn!(key = %key, "Stored value is corrupt, using default: {e}");
                    default
                }
            },
            Ok(None) => default,
            Err(e) => {
                tracing::warn!(key = %key, "Failed to read stored value, using default: {e}");
                default
            }
        };

        let (tx, rx) = mpsc::unbounded_channel();
        let writer_key = key.clone();
        if let Err(e) = std::thread::Builder::new()
            .name(format!("persist-{key}"))
            .spawn(move || writer_loop(store, writer_key, rx))
        {
            tracing::error!(key = %key, "Failed to spawn persistence thread: {e}");
        }

        let state = Self { key, value, tx };
        state.schedule_write();
        state
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    /// Replace the value.
    pub fn set(&mut self, value: T) {
        self.value = value;
        self.schedule_write();
    }

    /// Replace the value with a function of the previous one.
    pub fn update(&mut self, f: impl FnOnce(&T) -> T) {
        let next = f(&self.value);
        self.set(next);
    }

    /// Resolves once every write scheduled so far has reached the store.
    pub async fn flush(&self) {
        self.flush_handle().flush().await;
    }

    /// A detached handle for flushing from a task that cannot borrow the
    /// state, e.g. on window close.
    pub fn flush_handle(&self) -> FlushHandle {
        FlushHandle {
            tx: self.tx.clone(),
        }
    }

    fn schedule_write(&self) {
        match serde_json::to_vec(&self.value) {
            Ok(bytes) => {
                if self.tx.send(WriteCommand::Write(bytes)).is_err() {
                    tracing::warn!(key = %self.key, "Persistence thread is gone, change not saved");
                }
            }
            Err(e) => tracing::warn!(key = %self.key, "Failed to serialize state: {e}"),
        }
    }
}

/// Waits for the writer thread of one [`PersistedState`] to catch up.
#[derive(Clone)]
pub struct FlushHandle {
    tx: mpsc::UnboundedSender<WriteCommand>,
}

impl FlushHandle {
    /// Resolves once every write scheduled before this call has reached the
    /// store. Returns immediately if the writer thread is gone.
    pub async fn flush(self) {
        let (reply, rx) = oneshot::channel();
        if self.tx.send(WriteCommand::Flush(reply)).is_ok() {
            let _ = rx.await;
        }
    }
}

fn writer_loop(
    store: Arc<dyn KeyValueStore>,
    key: String,
    mut rx: mpsc::UnboundedReceiver<WriteCommand>,
) {
    let mut last_written: Option<Vec<u8>> = None;

    while let Some(cmd) = rx.blocking_recv() {
        match cmd {
            WriteCommand::Write(bytes) => {
                if last_written.as_deref() == Some(bytes.as_slice()) {
                    continue;
                }
                match store.set(&key, &bytes) {
                    Ok(()) => last_written = Some(bytes),
                    Err(e) => tracing::warn!(key = %key, "Failed to persist state: {e}"),
                }
            }
            WriteCommand::Flush(reply) => {
                let _ = reply.send(());
            }
        }
    }
    tracing::debug!(key = %key, "persistence thread stopped");
}
