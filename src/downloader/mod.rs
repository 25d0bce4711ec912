//! Runs the subtitle pipeline for webhook events.
//!
//! `library.new` (and the manual `check-video` command) resolve the item,
//! expand shows and seasons into episodes, find the languages each episode
//! lacks, search the providers, pick one subtitle per language, and store the
//! winners next to the media or in Plex's metadata. Playback events carry the
//! viewer's subtitle choice over to the next episode (see [`playback`]).

mod playback;

use std::path::Path;
use std::sync::Arc;

use subscout_common::{Error, LanguageCode, Result, Video};

use crate::config::{Config, SubtitleDestination};
use crate::plex::{EventKind, PlexWebhookEvent, VideoSource};
use crate::providers::SubtitleProvider;
use crate::subtitles::{CandidateRanker, DescriptorBuilder, GapAnalyzer, Selection};

/// Counts from one pipeline run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DownloadSummary {
    /// Leaf videos checked for missing languages.
    pub checked: usize,
    /// Videos that lacked at least one language.
    pub missing: usize,
    /// Subtitle files written or uploaded.
    pub saved: usize,
    /// Videos whose search or save failed.
    pub failed: usize,
}

impl DownloadSummary {
    fn merge(&mut self, other: DownloadSummary) {
        self.checked += other.checked;
        self.missing += other.missing;
        self.saved += other.saved;
        self.failed += other.failed;
    }
}

pub struct SubtitleDownloader {
    source: Arc<dyn VideoSource>,
    provider: Arc<dyn SubtitleProvider>,
    gaps: GapAnalyzer,
    descriptors: DescriptorBuilder,
    ranker: CandidateRanker,
    destination: SubtitleDestination,
    propagate: bool,
}

impl SubtitleDownloader {
    pub fn new(
        config: &Config,
        source: Arc<dyn VideoSource>,
        provider: Arc<dyn SubtitleProvider>,
    ) -> Self {
        let format_priority = config.format_priority();
        Self {
            source,
            provider,
            gaps: GapAnalyzer::new(config.languages.clone(), format_priority.clone()),
            descriptors: DescriptorBuilder::new(config.providers.enabled.clone()),
            ranker: CandidateRanker::new(format_priority),
            destination: config.subtitle_destination,
            propagate: config.propagate_to_next_episode,
        }
    }

    /// Dispatch one webhook event. Unhandled event types are ignored.
    pub async fn handle_event(&self, event: &PlexWebhookEvent) -> Result<()> {
        tracing::debug!("Handling webhook event {}", event.event);

        match event.kind() {
            EventKind::LibraryNew => self.handle_library_new(event).await,
            kind if kind.is_playback() => self.handle_playback(event).await,
            _ => {
                tracing::trace!("Ignoring webhook event {}", event.event);
                Ok(())
            }
        }
    }

    async fn handle_library_new(&self, event: &PlexWebhookEvent) -> Result<()> {
        let Some(metadata) = &event.metadata else {
            return Err(Error::invalid_input("library.new event without Metadata"));
        };
        tracing::info!(
            "New library item: title={:?}, type={:?}, section={:?}",
            metadata.title,
            metadata.kind,
            metadata.library_section_title
        );

        let Some(key) = metadata.key.as_deref() else {
            return Err(Error::invalid_input("library.new event without a metadata key"));
        };
        self.check_video(key).await.map(|_| ())
    }

    /// Fill missing subtitle languages for the item at `key`.
    pub async fn check_video(&self, key: &str) -> Result<DownloadSummary> {
        match self.resolve_video(key).await? {
            Some(video) => self.download_missing(&video).await,
            None => {
                tracing::info!("Video {} could not be retrieved, nothing to do", key);
                Ok(DownloadSummary::default())
            }
        }
    }

    /// Load the item at `key`. Show keys ending in `/children` are
    /// normalized to the show itself.
    pub async fn resolve_video(&self, key: &str) -> Result<Option<Video>> {
        let key = key.strip_suffix("/children").unwrap_or(key);
        self.source.fetch_video(key).await
    }

    /// Run the pipeline for `video`, or for every episode of a show or season.
    pub async fn download_missing(&self, video: &Video) -> Result<DownloadSummary> {
        let leaves = self.leaf_videos(video).await?;
        let mut summary = DownloadSummary {
            checked: leaves.len(),
            ..Default::default()
        };

        let missing: Vec<(Video, Vec<LanguageCode>)> = leaves
            .into_iter()
            .filter_map(|v| {
                let langs = self.gaps.missing_for(&v);
                (!langs.is_empty()).then_some((v, langs))
            })
            .collect();

        summary.missing = missing.len();
        tracing::info!(
            "Found {} videos missing subtitles under {}",
            missing.len(),
            video
        );
        if missing.is_empty() {
            tracing::info!("No subtitles to download for {}", video);
            return Ok(summary);
        }

        for (leaf, languages) in &missing {
            summary.merge(self.download_for(leaf, languages).await);
        }

        tracing::info!(
            "Finished {}: {} subtitles saved, {} videos failed",
            video,
            summary.saved,
            summary.failed
        );
        Ok(summary)
    }

    /// Leaf videos under `video`, each freshly reloaded.
    async fn leaf_videos(&self, video: &Video) -> Result<Vec<Video>> {
        if video.is_leaf() {
            return Ok(vec![video.clone()]);
        }

        let episodes = match self.source.list_episodes(video).await {
            Ok(episodes) => episodes,
            Err(e) if e.is_not_found() => {
                tracing::info!("No episodes listed under {}: {}", video, e);
                return Ok(vec![]);
            }
            Err(e) => return Err(e),
        };
        let mut leaves = Vec::with_capacity(episodes.len());
        for episode in &episodes {
            match self.source.refresh_metadata(episode).await {
                Ok(fresh) => leaves.push(fresh),
                Err(e) => tracing::warn!("Skipping {}: refresh failed: {}", episode, e),
            }
        }
        Ok(leaves)
    }

    /// Search, select, and store subtitles for a single video. Failures are
    /// logged and counted; they never abort sibling videos.
    async fn download_for(&self, video: &Video, languages: &[LanguageCode]) -> DownloadSummary {
        let mut summary = DownloadSummary::default();

        let selection = match self.select(video, languages).await {
            Ok(selection) => selection,
            Err(e) => {
                tracing::warn!("Subtitle search failed for {}: {}", video, e);
                summary.failed = 1;
                return summary;
            }
        };
        if selection.is_empty() {
            tracing::info!("No suitable subtitles found for {}", video);
            return summary;
        }

        let stored = match self.destination {
            SubtitleDestination::WithMedia => self.save_with_media(&selection).await,
            SubtitleDestination::Metadata => self.upload_to_metadata(video, &selection).await,
        };
        match stored {
            Ok(count) => summary.saved = count,
            Err(e) => {
                tracing::warn!("Failed to store subtitles for {}: {}", video, e);
                summary.failed = 1;
            }
        }
        summary
    }

    async fn select(&self, video: &Video, languages: &[LanguageCode]) -> Result<Selection> {
        let descriptor = self.descriptors.build(video)?;
        let candidates = self
            .provider
            .search_candidates(&descriptor, languages)
            .await?;
        tracing::debug!(
            "{} candidates for {} in {:?}",
            candidates.len(),
            descriptor.file_name(),
            languages.iter().map(LanguageCode::as_str).collect::<Vec<_>>()
        );
        Ok(self
            .ranker
            .select_for(descriptor, languages, candidates, self.provider.as_ref()))
    }

    /// Sidecar files in the video's directory.
    async fn save_with_media(&self, selection: &Selection) -> Result<usize> {
        let directory = selection
            .descriptor
            .file_path
            .parent()
            .unwrap_or_else(|| Path::new("."));

        for candidate in &selection.subtitles {
            let path = self
                .provider
                .save_subtitle_file(&selection.descriptor, candidate, directory)
                .await?;
            tracing::info!("Saved subtitle {:?}", path);
        }
        Ok(selection.subtitles.len())
    }

    /// Save to a temporary directory, then upload into Plex's metadata.
    ///
    /// Plex makes an uploaded subtitle the default, so the previous default
    /// is put back afterwards (or the default cleared when there was none).
    async fn upload_to_metadata(&self, video: &Video, selection: &Selection) -> Result<usize> {
        let tempdir = tempfile::tempdir()?;
        let part_id = selection.descriptor.part_id;
        let original_default = video.default_subtitle_track().cloned();

        let mut uploaded = 0;
        for candidate in &selection.subtitles {
            let path = self
                .provider
                .save_subtitle_file(&selection.descriptor, candidate, tempdir.path())
                .await?;

            tracing::debug!("Uploading subtitle {:?} to {}", path, video);
            self.source.upload_subtitle_file(video, &path).await?;
            uploaded += 1;

            let restored = match &original_default {
                Some(track) => self.source.set_default_subtitle_track(part_id, track.id).await,
                None => self.source.reset_default_subtitle_track(part_id).await,
            };
            // Best effort: the upload itself succeeded.
            if let Err(e) = restored {
                tracing::debug!("{}", Error::RestoreDefaultTrack(e.to_string()));
            }
        }
        Ok(uploaded)
    }
}
