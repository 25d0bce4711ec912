//! Which requested subtitle languages a video still lacks.

use subscout_common::{LanguageCode, SubtitleTrack, Video};

use super::FormatPriority;

/// Requested languages not covered by any qualifying existing track.
///
/// Tracks whose format the priority list excludes are ignored as if absent.
/// The result keeps request order and never repeats a language.
pub fn missing_languages<'a>(
    tracks: impl IntoIterator<Item = &'a SubtitleTrack>,
    requested: &[LanguageCode],
    format_priority: &FormatPriority,
) -> Vec<LanguageCode> {
    let mut missing: Vec<LanguageCode> = Vec::with_capacity(requested.len());
    for lang in requested {
        if !missing.contains(lang) {
            missing.push(lang.clone());
        }
    }

    for track in tracks {
        if !format_priority.permits(track.format.as_deref()) {
            continue;
        }
        if let Some(code) = &track.language_code {
            missing.retain(|lang| lang != code);
        }
    }

    missing
}

/// Language gap analysis with the configured language set and format policy.
#[derive(Debug, Clone)]
pub struct GapAnalyzer {
    languages: Vec<LanguageCode>,
    format_priority: FormatPriority,
}

impl GapAnalyzer {
    pub fn new(languages: Vec<LanguageCode>, format_priority: FormatPriority) -> Self {
        Self {
            languages,
            format_priority,
        }
    }

    /// Languages requested for `video`. Uniform today.
    pub fn requested_for(&self, _video: &Video) -> &[LanguageCode] {
        &self.languages
    }

    /// Requested languages `video` is missing, across all of its parts.
    pub fn missing_for(&self, video: &Video) -> Vec<LanguageCode> {
        let missing = missing_languages(
            video.subtitle_tracks(),
            self.requested_for(video),
            &self.format_priority,
        );
        tracing::debug!(
            "{} has {} subtitle tracks, missing languages: {:?}",
            video,
            video.subtitle_tracks().count(),
            missing.iter().map(LanguageCode::as_str).collect::<Vec<_>>()
        );
        missing
    }
}
