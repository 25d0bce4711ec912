//! Webhook events Plex posts as the `payload` field of a multipart form.

use serde::{Deserialize, Serialize};
use subscout_common::{AccountId, Error, Result};

/// The event kinds subscout reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    LibraryNew,
    MediaPlay,
    MediaResume,
    Other(String),
}

impl EventKind {
    pub fn parse(event: &str) -> Self {
        match event {
            "library.new" => Self::LibraryNew,
            "media.play" => Self::MediaPlay,
            "media.resume" => Self::MediaResume,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn is_playback(&self) -> bool {
        matches!(self, Self::MediaPlay | Self::MediaResume)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PlexWebhookEvent {
    pub event: String,
    #[serde(rename = "Account", default)]
    pub account: Option<EventAccount>,
    #[serde(rename = "Metadata", default)]
    pub metadata: Option<EventMetadata>,
    #[serde(rename = "Player", default)]
    pub player: Option<EventPlayer>,
    #[serde(rename = "Server", default)]
    pub server: Option<EventServer>,
}

impl PlexWebhookEvent {
    /// Parse the JSON `payload` of a webhook request.
    pub fn from_json(payload: &str) -> Result<Self> {
        serde_json::from_str(payload)
            .map_err(|e| Error::invalid_input(format!("malformed webhook payload: {}", e)))
    }

    pub fn kind(&self) -> EventKind {
        EventKind::parse(&self.event)
    }

    pub fn account_id(&self) -> Option<AccountId> {
        self.account.as_ref().and_then(|a| a.id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct EventAccount {
    pub id: Option<AccountId>,
    pub title: Option<String>,
    pub thumb: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMetadata {
    pub key: Option<String>,
    pub rating_key: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub title: Option<String>,
    pub grandparent_title: Option<String>,
    pub library_section_title: Option<String>,
    pub library_section_type: Option<String>,
    pub guid: Option<String>,
    pub year: Option<u16>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPlayer {
    pub local: Option<bool>,
    pub public_address: Option<String>,
    pub title: Option<String>,
    pub uuid: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct EventServer {
    pub title: Option<String>,
    pub uuid: Option<String>,
}
