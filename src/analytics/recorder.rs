//! Fire-and-forget click event persistence.
//!
//! The redirect path must never block on, retry, or surface analytics
//! writes. Events go through a bounded mpsc channel into a background
//! writer task; a full channel drops the event with a warning, and write
//! failures are logged and swallowed.

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::models::ClickEvent;
use crate::storage::Storage;

enum RecorderMessage {
    Record(ClickEvent),
    Shutdown,
}

#[derive(Clone)]
pub struct ClickRecorder {
    tx: mpsc::Sender<RecorderMessage>,
}

impl ClickRecorder {
    /// Spawn the writer task and return the recording handle.
    pub fn new(storage: Arc<dyn Storage>, buffer_size: usize) -> Self {
        let (tx, mut rx) = mpsc::channel(buffer_size);

        tokio::spawn(async move {
            while let Some(msg) = rx.recv().await {
                match msg {
                    RecorderMessage::Record(event) => {
                        if let Err(err) = storage.append_event(&event).await {
                            warn!(
                                short_code = %event.short_code,
                                error = %err,
                                "failed to persist click event"
                            );
                        }
                    }
                    RecorderMessage::Shutdown => {
                        info!("click recorder received shutdown signal");
                        break;
                    }
                }
            }
        });

        Self { tx }
    }

    /// Submit an event without awaiting persistence. Never blocks; a full
    /// buffer drops the event.
    pub fn record(&self, event: ClickEvent) {
        if self.tx.try_send(RecorderMessage::Record(event)).is_err() {
            warn!("click event buffer full, dropping event");
        }
    }

    /// Drain pending events and stop the writer task. Messages are handled
    /// in order, so everything submitted before this call is persisted
    /// first.
    pub async fn shutdown(&self) {
        let _ = self.tx.send(RecorderMessage::Shutdown).await;
    }
}
