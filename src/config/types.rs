use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use subscout_common::LanguageCode;

use crate::subtitles::FormatPriority;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Subtitle languages every video should have, in preference order.
    #[serde(default = "default_languages")]
    pub languages: Vec<LanguageCode>,

    /// Allowed subtitle formats, highest priority first. Unset or empty means
    /// every format is allowed with equal priority.
    #[serde(default)]
    pub format_priority: Option<Vec<String>>,

    #[serde(default)]
    pub subtitle_destination: SubtitleDestination,

    /// Carry the viewer's subtitle choice over to the next episode on play/resume.
    #[serde(default)]
    pub propagate_to_next_episode: bool,

    /// Default log filter when neither `RUST_LOG` nor `--verbose` is given.
    #[serde(default)]
    pub log_level: Option<String>,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub plex: PlexConfig,

    #[serde(default)]
    pub providers: ProvidersConfig,
}

fn default_languages() -> Vec<LanguageCode> {
    vec![LanguageCode::new("eng")]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            languages: default_languages(),
            format_priority: None,
            subtitle_destination: SubtitleDestination::default(),
            propagate_to_next_episode: false,
            log_level: None,
            server: ServerConfig::default(),
            plex: PlexConfig::default(),
            providers: ProvidersConfig::default(),
        }
    }
}

impl Config {
    pub fn format_priority(&self) -> FormatPriority {
        FormatPriority::from_config(self.format_priority.as_deref())
    }
}

/// Where downloaded subtitles end up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubtitleDestination {
    /// Sidecar file next to the video.
    #[default]
    WithMedia,
    /// Uploaded into the media server's metadata store.
    Metadata,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Check the Plex account's webhook list at startup and add ours if missing
    #[serde(default = "default_register_webhook")]
    pub register_webhook: bool,

    /// Maximum number of events waiting to be processed
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8686
}
fn default_register_webhook() -> bool {
    true
}
fn default_queue_capacity() -> usize {
    64
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            register_webhook: default_register_webhook(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlexConfig {
    #[serde(default = "default_plex_url")]
    pub base_url: String,

    /// Owner token (X-Plex-Token)
    #[serde(default)]
    pub token: String,

    /// Per-account tokens used when acting on behalf of a viewer, keyed by
    /// account id. Viewers without an entry fall back to the owner token.
    #[serde(default)]
    pub user_tokens: HashMap<String, String>,

    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_plex_timeout")]
    pub timeout_secs: u64,
}

fn default_plex_url() -> String {
    "http://localhost:32400".to_string()
}
fn default_plex_timeout() -> u64 {
    30
}

impl Default for PlexConfig {
    fn default() -> Self {
        Self {
            base_url: default_plex_url(),
            token: String::new(),
            user_tokens: HashMap::new(),
            timeout_secs: default_plex_timeout(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProvidersConfig {
    /// Enabled provider names. Also selects which content hashes are computed.
    #[serde(default = "default_enabled_providers")]
    pub enabled: Vec<String>,

    #[serde(default)]
    pub local: LocalProviderConfig,
}

fn default_enabled_providers() -> Vec<String> {
    vec!["local".to_string()]
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled_providers(),
            local: LocalProviderConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LocalProviderConfig {
    /// Directories scanned for subtitle files
    #[serde(default)]
    pub paths: Vec<PathBuf>,

    /// Seconds before the directory index is rebuilt (default: 300)
    #[serde(default = "default_index_ttl")]
    pub index_ttl_secs: u64,
}

fn default_index_ttl() -> u64 {
    300
}

impl Default for LocalProviderConfig {
    fn default() -> Self {
        Self {
            paths: Vec::new(),
            index_ttl_secs: default_index_ttl(),
        }
    }
}
