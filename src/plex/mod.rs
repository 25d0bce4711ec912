//! Plex media server integration.
//!
//! The orchestrator only sees [`VideoSource`]; [`PlexClient`] implements it
//! over the Plex HTTP API.

mod client;
pub mod episodes;
pub mod events;
mod wire;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use subscout_common::{AccountId, PartId, PlaybackSession, Result, StreamId, Video};

pub use client::PlexClient;
pub use episodes::next_episode;
pub use events::{EventKind, PlexWebhookEvent};

/// The media server operations subscout needs.
///
/// `as_user` selects whose view is changed; `None` means the server owner.
#[async_trait]
pub trait VideoSource: Send + Sync {
    /// Load the item at `key`. `Ok(None)` when the server does not know it.
    async fn fetch_video(&self, key: &str) -> Result<Option<Video>>;

    /// Reload `video` so its parts and streams are current.
    async fn refresh_metadata(&self, video: &Video) -> Result<Video>;

    /// Every episode of a show or season, in server order.
    async fn list_episodes(&self, container: &Video) -> Result<Vec<Video>>;

    async fn list_active_sessions(&self) -> Result<Vec<PlaybackSession>>;

    async fn set_selected_subtitle_track(
        &self,
        part: PartId,
        track: StreamId,
        as_user: Option<AccountId>,
    ) -> Result<()>;

    async fn clear_selected_subtitle_track(
        &self,
        part: PartId,
        as_user: Option<AccountId>,
    ) -> Result<()>;

    /// Attach a subtitle file readable by the server to `video`'s metadata.
    async fn upload_subtitle_file(&self, video: &Video, path: &Path) -> Result<()>;

    /// Owner-level default subtitle for `part`.
    async fn set_default_subtitle_track(&self, part: PartId, track: StreamId) -> Result<()> {
        self.set_selected_subtitle_track(part, track, None).await
    }

    async fn reset_default_subtitle_track(&self, part: PartId) -> Result<()> {
        self.clear_selected_subtitle_track(part, None).await
    }

    /// Root directories of every library section.
    async fn library_locations(&self) -> Result<Vec<PathBuf>>;

    /// Webhook URLs registered on the owner's account.
    async fn webhooks(&self) -> Result<Vec<String>>;

    /// Register `url`; returns the webhook list afterwards.
    async fn add_webhook(&self, url: &str) -> Result<Vec<String>>;
}
