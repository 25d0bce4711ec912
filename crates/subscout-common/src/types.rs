//! Core type definitions for library videos, subtitle tracks, and sessions.
//!
//! These are the media-server side of the model: what subscout reads from Plex
//! and hands to the selection engine. Provider-side types live in the main
//! crate.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::ids::{AccountId, PartId, StreamId};

/// Kind of library item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoKind {
    /// A single movie.
    Movie,
    /// A TV series (show).
    Show,
    /// A season within a show.
    Season,
    /// A single episode within a season.
    Episode,
}

impl VideoKind {
    /// Parse the `type` attribute Plex uses for metadata items.
    pub fn from_plex(kind: &str) -> Option<Self> {
        match kind {
            "movie" => Some(Self::Movie),
            "show" => Some(Self::Show),
            "season" => Some(Self::Season),
            "episode" => Some(Self::Episode),
            _ => None,
        }
    }

    /// Whether this kind has media parts of its own.
    pub fn is_leaf(self) -> bool {
        matches!(self, Self::Movie | Self::Episode)
    }
}

impl fmt::Display for VideoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Movie => write!(f, "movie"),
            Self::Show => write!(f, "show"),
            Self::Season => write!(f, "season"),
            Self::Episode => write!(f, "episode"),
        }
    }
}

/// A subtitle language code as Plex reports it (ISO 639-2, e.g. `eng`).
///
/// Codes are trimmed and lowercased on construction so config values and
/// server values compare equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct LanguageCode(String);

impl LanguageCode {
    /// Create a normalized language code.
    pub fn new(code: impl AsRef<str>) -> Self {
        Self(code.as_ref().trim().to_lowercase())
    }

    /// The normalized code.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for LanguageCode {
    fn from(code: String) -> Self {
        Self::new(code)
    }
}

impl From<&str> for LanguageCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl From<LanguageCode> for String {
    fn from(code: LanguageCode) -> Self {
        code.0
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An existing subtitle stream on a media part.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtitleTrack {
    /// Stream id on the media server.
    pub id: StreamId,
    /// Human language name (e.g. "English").
    pub language: Option<String>,
    /// ISO 639-2 code (e.g. `eng`).
    pub language_code: Option<LanguageCode>,
    /// IETF tag (e.g. `en-US`).
    pub language_tag: Option<String>,
    /// Subtitle format / codec (e.g. `srt`, `ass`, `pgs`).
    pub format: Option<String>,
    /// Display title computed by the server.
    pub display_title: Option<String>,
    /// Title set by whoever provided the track.
    pub title: Option<String>,
    /// Transcode decision tag (e.g. `burn`, `copy`).
    pub decision: Option<String>,
    /// Location tag (e.g. `direct`, `segments-video`).
    pub location: Option<String>,
    /// Owner-level default flag.
    pub default: bool,
    /// Selected for the requesting user.
    pub selected: bool,
}

/// A single physical file of a video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaPart {
    /// Part id on the media server.
    pub id: PartId,
    /// Absolute path of the file as the media server sees it.
    pub file: PathBuf,
    /// File size in bytes.
    pub size: u64,
    /// Existing subtitle streams.
    pub subtitle_tracks: Vec<SubtitleTrack>,
}

/// A library item: movie, episode, or a show/season container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    /// Metadata key (e.g. `/library/metadata/123`).
    pub key: String,
    /// Numeric rating key as a string.
    pub rating_key: String,
    /// Item kind.
    pub kind: VideoKind,
    /// Item title (episode title for episodes).
    pub title: String,
    /// Release year.
    pub year: Option<u16>,
    /// Show title (episodes only).
    pub show_title: Option<String>,
    /// Show metadata key (episodes and seasons).
    pub show_key: Option<String>,
    /// Season number (episodes only).
    pub season_number: Option<u32>,
    /// Episode number within the season (episodes only).
    pub episode_number: Option<u32>,
    /// Primary guid (`plex://episode/...`).
    pub guid: Option<String>,
    /// External guids (`imdb://tt0111161`, `tmdb://278`, ...).
    pub guids: Vec<String>,
    /// Media parts, in server order.
    pub parts: Vec<MediaPart>,
}

impl Video {
    /// The first part of the first media, used to describe the video.
    pub fn primary_part(&self) -> Option<&MediaPart> {
        self.parts.first()
    }

    /// All subtitle tracks across every part.
    pub fn subtitle_tracks(&self) -> impl Iterator<Item = &SubtitleTrack> {
        self.parts.iter().flat_map(|p| p.subtitle_tracks.iter())
    }

    /// The owner-level default subtitle track, if any.
    pub fn default_subtitle_track(&self) -> Option<&SubtitleTrack> {
        self.subtitle_tracks().find(|t| t.default)
    }

    /// The IMDb id from the external guids, without the `imdb://` prefix.
    pub fn imdb_id(&self) -> Option<&str> {
        self.guids
            .iter()
            .find_map(|g| g.strip_prefix("imdb://"))
            .filter(|id| !id.is_empty())
    }

    /// Whether this video has media parts of its own.
    pub fn is_leaf(&self) -> bool {
        self.kind.is_leaf()
    }
}

impl fmt::Display for Video {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.show_title, self.season_number, self.episode_number) {
            (Some(show), Some(season), Some(episode)) => write!(
                f,
                "{} S{:02}E{:02} '{}' ({})",
                show, season, episode, self.title, self.key
            ),
            _ => write!(f, "'{}' ({})", self.title, self.key),
        }
    }
}

/// Read-only snapshot of an active playback session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackSession {
    /// Account of the viewer.
    pub account_id: AccountId,
    /// Metadata key of the video being played.
    pub video_key: String,
    /// Guid of the video being played.
    pub guid: Option<String>,
    /// Subtitle track currently selected by the viewer, if any.
    pub selected_subtitle: Option<SubtitleTrack>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn episode() -> Video {
        Video {
            key: "/library/metadata/10".to_string(),
            rating_key: "10".to_string(),
            kind: VideoKind::Episode,
            title: "Pilot".to_string(),
            year: Some(2008),
            show_title: Some("Breaking Bad".to_string()),
            show_key: Some("/library/metadata/1".to_string()),
            season_number: Some(1),
            episode_number: Some(1),
            guid: Some("plex://episode/abc".to_string()),
            guids: vec!["tmdb://62085".to_string(), "imdb://tt0959621".to_string()],
            parts: vec![],
        }
    }

    #[test]
    fn test_video_kind_from_plex() {
        assert_eq!(VideoKind::from_plex("movie"), Some(VideoKind::Movie));
        assert_eq!(VideoKind::from_plex("season"), Some(VideoKind::Season));
        assert_eq!(VideoKind::from_plex("track"), None);
        assert!(VideoKind::Episode.is_leaf());
        assert!(!VideoKind::Show.is_leaf());
    }

    #[test]
    fn test_language_code_normalizes() {
        assert_eq!(LanguageCode::new(" ENG "), LanguageCode::new("eng"));
        assert_eq!(LanguageCode::from("Spa").as_str(), "spa");
    }

    #[test]
    fn test_imdb_id_from_guids() {
        assert_eq!(episode().imdb_id(), Some("tt0959621"));

        let mut video = episode();
        video.guids.clear();
        assert_eq!(video.imdb_id(), None);
    }

    #[test]
    fn test_video_display() {
        assert_eq!(
            episode().to_string(),
            "Breaking Bad S01E01 'Pilot' (/library/metadata/10)"
        );
    }
}
