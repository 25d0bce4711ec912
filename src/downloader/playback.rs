//! Carry a viewer's subtitle choice to the next episode.

use subscout_common::{AccountId, Result, SubtitleTrack, Video};

use super::SubtitleDownloader;
use crate::plex::{next_episode, PlexWebhookEvent};
use crate::subtitles::find_matches;

impl SubtitleDownloader {
    pub(super) async fn handle_playback(&self, event: &PlexWebhookEvent) -> Result<()> {
        if !self.propagate {
            tracing::trace!("Next-episode propagation disabled, ignoring {}", event.event);
            return Ok(());
        }

        let Some(metadata) = &event.metadata else {
            return Ok(());
        };
        if metadata.kind.as_deref() != Some("episode") {
            tracing::trace!("Ignoring playback of {:?}", metadata.kind);
            return Ok(());
        }
        let (Some(account_id), Some(guid)) = (event.account_id(), metadata.guid.as_deref()) else {
            tracing::debug!("Playback event without account or guid, ignoring");
            return Ok(());
        };

        let sessions = self.source.list_active_sessions().await?;
        let Some(session) = sessions
            .into_iter()
            .find(|s| s.account_id == account_id && s.guid.as_deref() == Some(guid))
        else {
            tracing::info!("No active session for account {} playing {}", account_id, guid);
            return Ok(());
        };

        let Some(current) = self.resolve_video(&session.video_key).await? else {
            tracing::info!("Playing video {} could not be retrieved", session.video_key);
            return Ok(());
        };

        let Some(next) = self.find_next_episode(&current).await? else {
            tracing::info!("No episode after {}, nothing to propagate", current);
            return Ok(());
        };

        match session.selected_subtitle {
            Some(track) => self.select_matching_track(&next, &track, account_id).await,
            None => self.clear_selection(&next, account_id).await,
        }
    }

    /// The episode after `current`, freshly reloaded. A show or episode that
    /// is gone from the server means there is no next episode.
    pub async fn find_next_episode(&self, current: &Video) -> Result<Option<Video>> {
        let episodes = match self.source.list_episodes(current).await {
            Ok(episodes) => episodes,
            Err(e) if e.is_not_found() => {
                tracing::info!("Episodes of {} could not be listed: {}", current, e);
                return Ok(None);
            }
            Err(e) => return Err(e),
        };
        let Some(next) = next_episode(current, &episodes) else {
            return Ok(None);
        };
        match self.source.refresh_metadata(next).await {
            Ok(fresh) => Ok(Some(fresh)),
            Err(e) if e.is_not_found() => {
                tracing::info!("Next episode {} vanished: {}", next, e);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Viewer watches without subtitles: turn them off on `next` as well.
    async fn clear_selection(&self, next: &Video, account_id: AccountId) -> Result<()> {
        tracing::info!(
            "Account {} has no subtitle selected, clearing selection on {}",
            account_id,
            next
        );
        for part in &next.parts {
            self.source
                .clear_selected_subtitle_track(part.id, Some(account_id))
                .await?;
        }
        Ok(())
    }

    /// Download missing subtitles for `next`, then select the track closest
    /// to `reference` for the viewer.
    async fn select_matching_track(
        &self,
        next: &Video,
        reference: &SubtitleTrack,
        account_id: AccountId,
    ) -> Result<()> {
        if let Err(e) = self.download_missing(next).await {
            tracing::warn!("Subtitle download for {} failed: {}", next, e);
        }
        let next = match self.source.refresh_metadata(next).await {
            Ok(fresh) => fresh,
            Err(e) if e.is_not_found() => {
                tracing::info!("{} vanished before a subtitle could be selected: {}", next, e);
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        let matches = find_matches(reference, &next);
        if matches.is_empty() {
            tracing::info!(
                "No subtitle on {} matches {:?} selected by account {}",
                next,
                reference.display_title,
                account_id
            );
            return Ok(());
        }

        for (part_id, track) in matches {
            tracing::info!(
                "Selecting subtitle {} ({:?}) on part {} for account {}",
                track.id,
                track.display_title,
                part_id,
                account_id
            );
            self.source
                .set_selected_subtitle_track(part_id, track.id, Some(account_id))
                .await?;
        }
        Ok(())
    }
}
