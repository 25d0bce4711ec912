//! Single consumer for queued webhook events.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::downloader::SubtitleDownloader;
use crate::plex::PlexWebhookEvent;

/// A webhook event waiting for the processor.
#[derive(Debug, Clone, Serialize)]
pub struct QueuedEvent {
    pub id: Uuid,
    pub received_at: DateTime<Utc>,
    pub event: PlexWebhookEvent,
}

impl QueuedEvent {
    pub fn new(event: PlexWebhookEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            received_at: Utc::now(),
            event,
        }
    }
}

impl From<PlexWebhookEvent> for QueuedEvent {
    fn from(event: PlexWebhookEvent) -> Self {
        Self::new(event)
    }
}

/// Bounded event queue: the sender goes to the webhook route, the receiver
/// to an [`EventProcessor`].
pub fn event_queue(capacity: usize) -> (mpsc::Sender<QueuedEvent>, mpsc::Receiver<QueuedEvent>) {
    mpsc::channel(capacity)
}

/// Handles queued events one at a time, each to completion.
pub struct EventProcessor {
    downloader: Arc<SubtitleDownloader>,
    events_rx: mpsc::Receiver<QueuedEvent>,
    shutdown_rx: mpsc::Receiver<()>,
}

impl EventProcessor {
    pub fn new(
        downloader: Arc<SubtitleDownloader>,
        events_rx: mpsc::Receiver<QueuedEvent>,
        shutdown_rx: mpsc::Receiver<()>,
    ) -> Self {
        Self {
            downloader,
            events_rx,
            shutdown_rx,
        }
    }

    /// Process events until shutdown is signalled or every sender is gone.
    pub async fn run(mut self) {
        tracing::info!("Event processor started");

        loop {
            tokio::select! {
                biased;

                _ = self.shutdown_rx.recv() => {
                    tracing::info!("Event processor shutting down");
                    break;
                }
                queued = self.events_rx.recv() => match queued {
                    Some(queued) => self.process(queued).await,
                    None => {
                        tracing::info!("Event queue closed");
                        break;
                    }
                },
            }
        }
    }

    async fn process(&self, queued: QueuedEvent) {
        let QueuedEvent {
            id,
            received_at,
            event,
        } = queued;
        let waited = Utc::now().signed_duration_since(received_at);
        tracing::debug!(
            "Processing event {} ({}) after {}ms in queue",
            id,
            event.event,
            waited.num_milliseconds()
        );

        match self.downloader.handle_event(&event).await {
            Ok(()) => tracing::debug!("Event {} ({}) handled", id, event.event),
            Err(e) if e.is_not_found() => {
                tracing::info!("Event {} ({}): {}", id, event.event, e)
            }
            Err(e) => tracing::warn!("Event {} ({}) failed: {}", id, event.event, e),
        }
    }
}
