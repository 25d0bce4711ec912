//! Shared test harness for integration tests.
//!
//! Provides in-memory doubles for the two collaborator seams:
//! [`FakeVideoSource`] records every write it receives and
//! [`FakeProvider`] serves canned candidates per video key.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::Mutex;

use subscout::config::Config;
use subscout::plex::VideoSource;
use subscout::providers::provider::subtitle_file_name;
use subscout::providers::{CandidateMetadata, SubtitleCandidate, SubtitleProvider};
use subscout::subtitles::VideoDescriptor;
use subscout_common::{
    AccountId, Error, LanguageCode, MediaPart, PartId, PlaybackSession, Result, StreamId,
    SubtitleTrack, Video, VideoKind,
};

/// Writes observed by [`FakeVideoSource`], in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Select {
        part: PartId,
        track: StreamId,
        user: Option<AccountId>,
    },
    Clear {
        part: PartId,
        user: Option<AccountId>,
    },
    Upload {
        key: String,
        file_name: String,
        existed: bool,
    },
    SetDefault {
        part: PartId,
        track: StreamId,
    },
    ResetDefault {
        part: PartId,
    },
    AddWebhook(String),
}

#[derive(Default)]
pub struct FakeVideoSource {
    pub videos: Mutex<HashMap<String, Video>>,
    /// Episodes per show key.
    pub episodes: Mutex<HashMap<String, Vec<Video>>>,
    pub sessions: Mutex<Vec<PlaybackSession>>,
    pub calls: Mutex<Vec<Call>>,
    pub failing_refresh: Mutex<HashSet<String>>,
    pub fail_restore: Mutex<bool>,
    pub locations: Mutex<Vec<PathBuf>>,
    pub webhooks: Mutex<Vec<String>>,
    next_stream_id: Mutex<i64>,
}

impl FakeVideoSource {
    pub fn new() -> Self {
        Self {
            next_stream_id: Mutex::new(1000),
            ..Default::default()
        }
    }

    pub fn add_video(&self, video: Video) {
        self.videos.lock().insert(video.key.clone(), video);
    }

    /// Register `episodes` under `show_key` and as individual videos.
    pub fn add_show(&self, show: Video, episodes: Vec<Video>) {
        for episode in &episodes {
            self.add_video(episode.clone());
        }
        self.episodes.lock().insert(show.key.clone(), episodes);
        self.add_video(show);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn video(&self, key: &str) -> Video {
        self.videos.lock()[key].clone()
    }
}

#[async_trait]
impl VideoSource for FakeVideoSource {
    async fn fetch_video(&self, key: &str) -> Result<Option<Video>> {
        Ok(self.videos.lock().get(key).cloned())
    }

    async fn refresh_metadata(&self, video: &Video) -> Result<Video> {
        if self.failing_refresh.lock().contains(&video.key) {
            return Err(Error::media_server(format!("refresh of {} failed", video.key)));
        }
        self.videos
            .lock()
            .get(&video.key)
            .cloned()
            .ok_or_else(|| Error::not_found(video.key.clone()))
    }

    async fn list_episodes(&self, container: &Video) -> Result<Vec<Video>> {
        let key = match container.kind {
            VideoKind::Episode => container.show_key.clone().unwrap_or_default(),
            _ => container.key.clone(),
        };
        let stored = self
            .episodes
            .lock()
            .get(&key)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("episodes of {}", key)))?;
        // Listings carry no streams; callers must refresh.
        Ok(stored
            .into_iter()
            .map(|mut e| {
                for part in &mut e.parts {
                    part.subtitle_tracks.clear();
                }
                e
            })
            .collect())
    }

    async fn list_active_sessions(&self) -> Result<Vec<PlaybackSession>> {
        Ok(self.sessions.lock().clone())
    }

    async fn set_selected_subtitle_track(
        &self,
        part: PartId,
        track: StreamId,
        as_user: Option<AccountId>,
    ) -> Result<()> {
        self.calls.lock().push(Call::Select {
            part,
            track,
            user: as_user,
        });
        Ok(())
    }

    async fn clear_selected_subtitle_track(
        &self,
        part: PartId,
        as_user: Option<AccountId>,
    ) -> Result<()> {
        self.calls.lock().push(Call::Clear {
            part,
            user: as_user,
        });
        Ok(())
    }

    /// Attaches a new default track named after the file, like Plex does.
    async fn upload_subtitle_file(&self, video: &Video, path: &Path) -> Result<()> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.calls.lock().push(Call::Upload {
            key: video.key.clone(),
            file_name: file_name.clone(),
            existed: path.exists(),
        });

        let mut parts: Vec<&str> = file_name.rsplitn(3, '.').collect();
        parts.reverse();
        let (lang, format) = match parts.as_slice() {
            [_, lang, format] => (lang.to_string(), format.to_string()),
            _ => return Ok(()),
        };

        let id = {
            let mut next = self.next_stream_id.lock();
            *next += 1;
            *next
        };
        if let Some(stored) = self.videos.lock().get_mut(&video.key) {
            if let Some(part) = stored.parts.first_mut() {
                for t in &mut part.subtitle_tracks {
                    t.default = false;
                }
                part.subtitle_tracks.push(SubtitleTrack {
                    id: StreamId(id),
                    language: language_name(&lang).map(str::to_string),
                    language_code: Some(LanguageCode::new(&lang)),
                    format: Some(format),
                    default: true,
                    ..Default::default()
                });
            }
        }
        Ok(())
    }

    async fn set_default_subtitle_track(&self, part: PartId, track: StreamId) -> Result<()> {
        self.calls.lock().push(Call::SetDefault { part, track });
        if *self.fail_restore.lock() {
            return Err(Error::media_server("default stream rejected"));
        }
        Ok(())
    }

    async fn reset_default_subtitle_track(&self, part: PartId) -> Result<()> {
        self.calls.lock().push(Call::ResetDefault { part });
        if *self.fail_restore.lock() {
            return Err(Error::media_server("default stream rejected"));
        }
        Ok(())
    }

    async fn library_locations(&self) -> Result<Vec<PathBuf>> {
        Ok(self.locations.lock().clone())
    }

    async fn webhooks(&self) -> Result<Vec<String>> {
        Ok(self.webhooks.lock().clone())
    }

    async fn add_webhook(&self, url: &str) -> Result<Vec<String>> {
        self.calls.lock().push(Call::AddWebhook(url.to_string()));
        let mut hooks = self.webhooks.lock();
        hooks.push(url.to_string());
        Ok(hooks.clone())
    }
}

/// Provider serving canned candidates per video key.
#[derive(Default)]
pub struct FakeProvider {
    pub candidates: Mutex<HashMap<String, Vec<SubtitleCandidate>>>,
    pub failing: Mutex<HashSet<String>>,
    pub searches: Mutex<Vec<(String, Vec<LanguageCode>)>>,
}

impl FakeProvider {
    pub fn add(&self, video_key: &str, candidate: SubtitleCandidate) {
        self.candidates
            .lock()
            .entry(video_key.to_string())
            .or_default()
            .push(candidate);
    }

    pub fn fail_for(&self, video_key: &str) {
        self.failing.lock().insert(video_key.to_string());
    }
}

#[async_trait]
impl SubtitleProvider for FakeProvider {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn search_candidates(
        &self,
        descriptor: &VideoDescriptor,
        languages: &[LanguageCode],
    ) -> Result<Vec<SubtitleCandidate>> {
        self.searches
            .lock()
            .push((descriptor.video_key.clone(), languages.to_vec()));
        if self.failing.lock().contains(&descriptor.video_key) {
            return Err(Error::provider("search timed out"));
        }
        Ok(self
            .candidates
            .lock()
            .get(&descriptor.video_key)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter(|c| languages.contains(&c.language))
            .collect())
    }

    fn relevance_score(&self, candidate: &SubtitleCandidate, _descriptor: &VideoDescriptor) -> u32 {
        candidate
            .metadata
            .title
            .as_deref()
            .and_then(|t| t.strip_prefix("score:"))
            .and_then(|s| s.parse().ok())
            .unwrap_or(0)
    }

    async fn save_subtitle_file(
        &self,
        descriptor: &VideoDescriptor,
        candidate: &SubtitleCandidate,
        directory: &Path,
    ) -> Result<PathBuf> {
        let path = directory.join(subtitle_file_name(descriptor, candidate));
        tokio::fs::write(&path, format!("1\n00:00:01,000 --> 00:00:02,000\n{}\n", candidate.id))
            .await?;
        Ok(path)
    }
}

fn language_name(code: &str) -> Option<&'static str> {
    match code {
        "eng" => Some("English"),
        "spa" => Some("Spanish"),
        "fre" => Some("French"),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

pub fn test_config() -> Config {
    let mut config = Config::default();
    config.plex.token = "owner-token".to_string();
    config.languages = vec![LanguageCode::new("eng"), LanguageCode::new("spa")];
    config
}

/// Candidate with a relevance encoded for [`FakeProvider::relevance_score`].
pub fn candidate(id: &str, lang: &str, format: &str, score: u32) -> SubtitleCandidate {
    SubtitleCandidate {
        provider: "fake".to_string(),
        id: id.to_string(),
        language: LanguageCode::new(lang),
        file_name: format!("{}.{}", id, format),
        display_title: None,
        provider_title: None,
        metadata: CandidateMetadata {
            title: Some(format!("score:{}", score)),
            ..Default::default()
        },
    }
}

pub fn track(id: i64, lang: &str, code: &str, format: &str) -> SubtitleTrack {
    SubtitleTrack {
        id: StreamId(id),
        language: Some(lang.to_string()),
        language_code: Some(LanguageCode::new(code)),
        format: Some(format.to_string()),
        ..Default::default()
    }
}

pub fn movie(id: i64, dir: &Path, tracks: Vec<SubtitleTrack>) -> Video {
    Video {
        key: format!("/library/metadata/{}", id),
        rating_key: id.to_string(),
        kind: VideoKind::Movie,
        title: format!("Movie {}", id),
        year: Some(1999),
        show_title: None,
        show_key: None,
        season_number: None,
        episode_number: None,
        guid: Some(format!("plex://movie/{}", id)),
        guids: Vec::new(),
        parts: vec![MediaPart {
            id: PartId(id * 10),
            file: dir.join(format!("Movie {}.mkv", id)),
            size: 1024,
            subtitle_tracks: tracks,
        }],
    }
}

pub fn show(id: i64) -> Video {
    Video {
        key: format!("/library/metadata/{}", id),
        rating_key: id.to_string(),
        kind: VideoKind::Show,
        title: "The Show".to_string(),
        year: None,
        show_title: None,
        show_key: None,
        season_number: None,
        episode_number: None,
        guid: Some(format!("plex://show/{}", id)),
        guids: Vec::new(),
        parts: Vec::new(),
    }
}

pub fn episode(
    id: i64,
    show_id: i64,
    season: u32,
    index: u32,
    dir: &Path,
    tracks: Vec<SubtitleTrack>,
) -> Video {
    Video {
        key: format!("/library/metadata/{}", id),
        rating_key: id.to_string(),
        kind: VideoKind::Episode,
        title: format!("Episode {}", index),
        year: None,
        show_title: Some("The Show".to_string()),
        show_key: Some(format!("/library/metadata/{}", show_id)),
        season_number: Some(season),
        episode_number: Some(index),
        guid: Some(format!("plex://episode/{}", id)),
        guids: Vec::new(),
        parts: vec![MediaPart {
            id: PartId(id * 10),
            file: dir.join(format!("The Show - S{:02}E{:02}.mkv", season, index)),
            size: 1024,
            subtitle_tracks: tracks,
        }],
    }
}
