//! Provider-agnostic description of a library video.

use std::collections::BTreeMap;
use std::path::PathBuf;

use subscout_common::{Error, PartId, Result, Video, VideoKind};

use super::hash::hash_function;

/// Files larger than this get content hashes (10 MiB).
pub const HASH_THRESHOLD_BYTES: u64 = 10 * 1024 * 1024;

/// What the video is, in the terms providers search by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptorKind {
    Movie {
        title: String,
        year: Option<u16>,
    },
    Episode {
        series: String,
        season: u32,
        episode: u32,
        title: String,
    },
}

/// Immutable description of one physical media part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoDescriptor {
    /// Metadata key of the video this part belongs to.
    pub video_key: String,
    pub part_id: PartId,
    pub kind: DescriptorKind,
    pub file_path: PathBuf,
    pub size: u64,
    /// IMDb id (`tt...`), when the server knows it.
    pub imdb_id: Option<String>,
    /// Content hash per provider name.
    pub hashes: BTreeMap<String, String>,
}

impl VideoDescriptor {
    pub fn is_episode(&self) -> bool {
        matches!(self.kind, DescriptorKind::Episode { .. })
    }

    /// File name without directory, for logs and sidecar naming.
    pub fn file_name(&self) -> String {
        self.file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Builds descriptors, hashing large local files for the enabled providers.
#[derive(Debug, Clone)]
pub struct DescriptorBuilder {
    providers: Vec<String>,
    hash_threshold: u64,
}

impl DescriptorBuilder {
    pub fn new(providers: Vec<String>) -> Self {
        Self {
            providers,
            hash_threshold: HASH_THRESHOLD_BYTES,
        }
    }

    pub fn with_hash_threshold(mut self, bytes: u64) -> Self {
        self.hash_threshold = bytes;
        self
    }

    /// Describe the first part of `video`.
    ///
    /// Fails with `NotFound` when the video has no media part and with
    /// `InvalidInput` for containers or episodes without numbering.
    pub fn build(&self, video: &Video) -> Result<VideoDescriptor> {
        let part = video
            .primary_part()
            .ok_or_else(|| Error::not_found(format!("media part for {}", video)))?;

        let kind = match video.kind {
            VideoKind::Episode => DescriptorKind::Episode {
                series: video.show_title.clone().ok_or_else(|| {
                    Error::invalid_input(format!("episode {} has no show title", video.key))
                })?,
                season: video.season_number.ok_or_else(|| {
                    Error::invalid_input(format!("episode {} has no season number", video.key))
                })?,
                episode: video.episode_number.ok_or_else(|| {
                    Error::invalid_input(format!("episode {} has no episode number", video.key))
                })?,
                title: video.title.clone(),
            },
            VideoKind::Movie => DescriptorKind::Movie {
                title: video.title.clone(),
                year: video.year,
            },
            VideoKind::Show | VideoKind::Season => {
                return Err(Error::invalid_input(format!(
                    "cannot describe {} {}",
                    video.kind, video.key
                )))
            }
        };

        let hashes = if part.size > self.hash_threshold && part.file.is_file() {
            self.compute_hashes(&part.file)
        } else {
            BTreeMap::new()
        };

        Ok(VideoDescriptor {
            video_key: video.key.clone(),
            part_id: part.id,
            kind,
            file_path: part.file.clone(),
            size: part.size,
            imdb_id: video.imdb_id().map(str::to_string),
            hashes,
        })
    }

    fn compute_hashes(&self, path: &std::path::Path) -> BTreeMap<String, String> {
        let mut hashes = BTreeMap::new();
        for provider in &self.providers {
            let Some(hash_fn) = hash_function(provider) else {
                continue;
            };
            match hash_fn(path) {
                Ok(hash) => {
                    hashes.insert(provider.clone(), hash);
                }
                Err(e) => tracing::warn!("Failed to hash {:?} for {}: {}", path, provider, e),
            }
        }
        hashes
    }
}
