//! JSON shapes returned by the Plex server, mapped onto domain types.

use std::path::PathBuf;

use serde::Deserialize;
use subscout_common::{
    AccountId, LanguageCode, MediaPart, PartId, PlaybackSession, StreamId, SubtitleTrack, Video,
    VideoKind,
};

/// Plex stream type for subtitles.
const SUBTITLE_STREAM: u8 = 3;

#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    #[serde(rename = "MediaContainer")]
    pub media_container: T,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct MetadataContainer {
    #[serde(rename = "Metadata", default)]
    pub metadata: Vec<WireMetadata>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SectionContainer {
    #[serde(rename = "Directory", default)]
    pub directories: Vec<WireSection>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireSection {
    #[serde(rename = "Location", default)]
    pub locations: Vec<WireLocation>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireLocation {
    pub path: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireWebhook {
    pub url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireMetadata {
    pub rating_key: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub title: String,
    pub year: Option<u16>,
    pub guid: Option<String>,
    pub index: Option<u32>,
    pub parent_index: Option<u32>,
    pub parent_title: Option<String>,
    pub parent_key: Option<String>,
    pub grandparent_title: Option<String>,
    pub grandparent_key: Option<String>,
    #[serde(rename = "Guid", default)]
    pub guids: Vec<WireGuid>,
    #[serde(rename = "Media", default)]
    pub media: Vec<WireMedia>,
    /// Present on session listings only.
    #[serde(rename = "User")]
    pub user: Option<WireUser>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireGuid {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireUser {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireMedia {
    #[serde(rename = "Part", default)]
    pub parts: Vec<WirePart>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WirePart {
    pub id: i64,
    pub file: Option<String>,
    pub size: Option<u64>,
    #[serde(rename = "Stream", default)]
    pub streams: Vec<WireStream>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireStream {
    pub id: i64,
    pub stream_type: u8,
    pub language: Option<String>,
    pub language_code: Option<String>,
    pub language_tag: Option<String>,
    pub codec: Option<String>,
    pub format: Option<String>,
    pub display_title: Option<String>,
    pub title: Option<String>,
    pub decision: Option<String>,
    pub location: Option<String>,
    #[serde(default)]
    pub default: bool,
    #[serde(default)]
    pub selected: bool,
}

impl WireStream {
    fn into_track(self) -> SubtitleTrack {
        SubtitleTrack {
            id: StreamId(self.id),
            language: self.language,
            language_code: self.language_code.map(LanguageCode::from),
            language_tag: self.language_tag,
            // External subtitles carry `format`; embedded ones only `codec`.
            format: self.format.or(self.codec).map(|f| f.to_lowercase()),
            display_title: self.display_title,
            title: self.title,
            decision: self.decision,
            location: self.location,
            default: self.default,
            selected: self.selected,
        }
    }
}

impl WireMetadata {
    /// Map onto a [`Video`]. Unknown item types yield `None`.
    pub fn into_video(self) -> Option<Video> {
        let kind = VideoKind::from_plex(&self.kind)?;
        let key = format!("/library/metadata/{}", self.rating_key);

        let (show_title, show_key, season_number, episode_number) = match kind {
            VideoKind::Episode => (
                self.grandparent_title,
                self.grandparent_key,
                self.parent_index,
                self.index,
            ),
            VideoKind::Season => (self.parent_title, self.parent_key, self.index, None),
            VideoKind::Movie | VideoKind::Show => (None, None, None, None),
        };

        let parts = self
            .media
            .into_iter()
            .flat_map(|m| m.parts)
            .map(|part| MediaPart {
                id: PartId(part.id),
                file: PathBuf::from(part.file.unwrap_or_default()),
                size: part.size.unwrap_or(0),
                subtitle_tracks: part
                    .streams
                    .into_iter()
                    .filter(|s| s.stream_type == SUBTITLE_STREAM)
                    .map(WireStream::into_track)
                    .collect(),
            })
            .collect();

        Some(Video {
            key,
            rating_key: self.rating_key,
            kind,
            title: self.title,
            year: self.year,
            show_title,
            show_key,
            season_number,
            episode_number,
            guid: self.guid,
            guids: self.guids.into_iter().map(|g| g.id).collect(),
            parts,
        })
    }

    /// Map a `/status/sessions` entry onto a [`PlaybackSession`].
    pub fn into_session(self) -> Option<PlaybackSession> {
        let account_id = AccountId(self.user.as_ref()?.id.parse().ok()?);
        let video_key = format!("/library/metadata/{}", self.rating_key);
        let selected_subtitle = self
            .media
            .into_iter()
            .flat_map(|m| m.parts)
            .flat_map(|p| p.streams)
            .find(|s| s.stream_type == SUBTITLE_STREAM)
            .map(WireStream::into_track);

        Some(PlaybackSession {
            account_id,
            video_key,
            guid: self.guid,
            selected_subtitle,
        })
    }
}
