//! Trait definition and types for subtitle providers.
//!
//! This module defines the [`SubtitleProvider`] trait every subtitle backend
//! implements, along with the [`SubtitleCandidate`] type a search returns.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use subscout_common::paths::subtitle_format;
use subscout_common::{LanguageCode, Result};

use super::score::compute_score;
use crate::subtitles::VideoDescriptor;

// ---------------------------------------------------------------------------
// Candidates
// ---------------------------------------------------------------------------

/// Descriptive metadata a provider knows about a candidate, compared against
/// a [`VideoDescriptor`] to compute its relevance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateMetadata {
    /// Movie or episode title.
    pub title: Option<String>,
    /// Series title (episodes).
    pub series: Option<String>,
    pub season: Option<u32>,
    pub episode: Option<u32>,
    pub year: Option<u16>,
    /// IMDb id (`tt...`).
    pub imdb_id: Option<String>,
    /// Content hash of the video this subtitle was made for.
    pub hash: Option<String>,
}

/// A subtitle a provider can deliver. Produced by a search, consumed by
/// ranking, discarded after selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtitleCandidate {
    /// Name of the provider that returned this candidate (e.g. "local").
    pub provider: String,
    /// Provider handle used to fetch the content.
    pub id: String,
    pub language: LanguageCode,
    /// Original file name; the format is derived from its extension.
    pub file_name: String,
    pub display_title: Option<String>,
    pub provider_title: Option<String>,
    pub metadata: CandidateMetadata,
}

impl SubtitleCandidate {
    /// Subtitle format: the file extension, lowercased.
    pub fn format(&self) -> Option<String> {
        subtitle_format(Path::new(&self.file_name))
    }
}

// ---------------------------------------------------------------------------
// Provider trait
// ---------------------------------------------------------------------------

/// Async trait that all subtitle providers must implement.
///
/// Search is per descriptor so that a failure for one video never affects
/// its siblings.
#[async_trait]
pub trait SubtitleProvider: Send + Sync {
    /// Short, lowercase identifier for this provider (e.g. `"local"`).
    fn name(&self) -> &'static str;

    /// Raw candidates for `descriptor` in any of `languages`, unranked.
    async fn search_candidates(
        &self,
        descriptor: &VideoDescriptor,
        languages: &[LanguageCode],
    ) -> Result<Vec<SubtitleCandidate>>;

    /// How well `candidate` matches `descriptor`; higher is better.
    fn relevance_score(&self, candidate: &SubtitleCandidate, descriptor: &VideoDescriptor) -> u32 {
        compute_score(candidate, descriptor)
    }

    /// Write the subtitle content into `directory`, named after the video.
    /// Returns the path of the written file.
    async fn save_subtitle_file(
        &self,
        descriptor: &VideoDescriptor,
        candidate: &SubtitleCandidate,
        directory: &Path,
    ) -> Result<PathBuf>;
}

/// File name for a saved subtitle: `<video stem>.<language>.<format>`.
pub fn subtitle_file_name(descriptor: &VideoDescriptor, candidate: &SubtitleCandidate) -> String {
    let stem = descriptor
        .file_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "subtitle".to_string());
    let format = candidate.format().unwrap_or_else(|| "srt".to_string());
    format!("{}.{}.{}", stem, candidate.language, format)
}
