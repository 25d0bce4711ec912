//! Provider-agnostic relevance between a candidate and a video.
//!
//! Each attribute the candidate shares with the descriptor adds its weight.
//! A content hash match identifies the exact file, so it alone decides the
//! score.

use super::provider::SubtitleCandidate;
use crate::subtitles::{DescriptorKind, VideoDescriptor};

pub const EPISODE_HASH: u32 = 359;
pub const EPISODE_SERIES: u32 = 180;
pub const EPISODE_SEASON: u32 = 30;
pub const EPISODE_NUMBER: u32 = 30;

pub const MOVIE_HASH: u32 = 119;
pub const MOVIE_TITLE: u32 = 60;
pub const MOVIE_YEAR: u32 = 30;

pub const IMDB_ID: u32 = 10;

/// Relevance of `candidate` to `descriptor`; higher is better.
pub fn compute_score(candidate: &SubtitleCandidate, descriptor: &VideoDescriptor) -> u32 {
    let meta = &candidate.metadata;

    let hash_matches = meta.hash.as_deref().is_some_and(|hash| {
        descriptor
            .hashes
            .values()
            .any(|h| h.eq_ignore_ascii_case(hash))
    });

    let imdb = match (&meta.imdb_id, &descriptor.imdb_id) {
        (Some(a), Some(b)) if a.eq_ignore_ascii_case(b) => IMDB_ID,
        _ => 0,
    };

    match &descriptor.kind {
        DescriptorKind::Episode {
            series,
            season,
            episode,
            ..
        } => {
            if hash_matches {
                return EPISODE_HASH;
            }
            let mut score = imdb;
            if meta.series.as_deref().is_some_and(|s| same_title(s, series)) {
                score += EPISODE_SERIES;
            }
            if meta.season == Some(*season) {
                score += EPISODE_SEASON;
            }
            if meta.episode == Some(*episode) {
                score += EPISODE_NUMBER;
            }
            score
        }
        DescriptorKind::Movie { title, year } => {
            if hash_matches {
                return MOVIE_HASH;
            }
            let mut score = imdb;
            if meta.title.as_deref().is_some_and(|t| same_title(t, title)) {
                score += MOVIE_TITLE;
            }
            if year.is_some() && meta.year == *year {
                score += MOVIE_YEAR;
            }
            score
        }
    }
}

/// Case-insensitive title comparison ignoring punctuation and separators.
pub fn same_title(a: &str, b: &str) -> bool {
    let a = normalize_title(a);
    !a.is_empty() && a == normalize_title(b)
}

pub fn normalize_title(title: &str) -> String {
    title
        .chars()
        .map(|c| if c.is_alphanumeric() { c.to_ascii_lowercase() } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::CandidateMetadata;
    use std::collections::BTreeMap;
    use subscout_common::{LanguageCode, PartId};

    fn episode_descriptor() -> VideoDescriptor {
        VideoDescriptor {
            video_key: "/library/metadata/9".to_string(),
            part_id: PartId(9),
            kind: DescriptorKind::Episode {
                series: "The Office (US)".to_string(),
                season: 2,
                episode: 3,
                title: "Office Olympics".to_string(),
            },
            file_path: "/tv/office/s02e03.mkv".into(),
            size: 0,
            imdb_id: None,
            hashes: BTreeMap::from([("local".to_string(), "00ff00ff00ff00ff".to_string())]),
        }
    }

    fn movie_descriptor() -> VideoDescriptor {
        VideoDescriptor {
            kind: DescriptorKind::Movie {
                title: "Heat".to_string(),
                year: Some(1995),
            },
            imdb_id: Some("tt0113277".to_string()),
            hashes: BTreeMap::new(),
            ..episode_descriptor()
        }
    }

    fn candidate(metadata: CandidateMetadata) -> SubtitleCandidate {
        SubtitleCandidate {
            provider: "local".to_string(),
            id: "x".to_string(),
            language: LanguageCode::new("eng"),
            file_name: "x.srt".to_string(),
            display_title: None,
            provider_title: None,
            metadata,
        }
    }

    #[test]
    fn test_episode_full_match() {
        let c = candidate(CandidateMetadata {
            series: Some("the office us".to_string()),
            season: Some(2),
            episode: Some(3),
            ..Default::default()
        });
        assert_eq!(
            compute_score(&c, &episode_descriptor()),
            EPISODE_SERIES + EPISODE_SEASON + EPISODE_NUMBER
        );
    }

    #[test]
    fn test_episode_wrong_episode_scores_lower() {
        let right = candidate(CandidateMetadata {
            series: Some("The Office (US)".to_string()),
            season: Some(2),
            episode: Some(3),
            ..Default::default()
        });
        let wrong = candidate(CandidateMetadata {
            episode: Some(4),
            ..right.metadata.clone()
        });
        let d = episode_descriptor();
        assert!(compute_score(&right, &d) > compute_score(&wrong, &d));
    }

    #[test]
    fn test_hash_match_short_circuits() {
        let c = candidate(CandidateMetadata {
            hash: Some("00FF00FF00FF00FF".to_string()),
            ..Default::default()
        });
        assert_eq!(compute_score(&c, &episode_descriptor()), EPISODE_HASH);
    }

    #[test]
    fn test_movie_title_year_imdb() {
        let c = candidate(CandidateMetadata {
            title: Some("Heat".to_string()),
            year: Some(1995),
            imdb_id: Some("tt0113277".to_string()),
            ..Default::default()
        });
        assert_eq!(
            compute_score(&c, &movie_descriptor()),
            MOVIE_TITLE + MOVIE_YEAR + IMDB_ID
        );

        let c = candidate(CandidateMetadata {
            title: Some("Heat".to_string()),
            year: Some(1986),
            ..Default::default()
        });
        assert_eq!(compute_score(&c, &movie_descriptor()), MOVIE_TITLE);
    }

    #[test]
    fn test_normalize_title() {
        assert_eq!(normalize_title("The.Office_(US)"), "the office us");
        assert!(!same_title("", ""));
    }
}
