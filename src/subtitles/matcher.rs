//! Finds the track on another video that best matches a selected track.

use std::collections::BTreeMap;

use subscout_common::{PartId, SubtitleTrack, Video};

pub const LANGUAGE_WEIGHT: u32 = 5;
pub const LANGUAGE_CODE_WEIGHT: u32 = 2;
pub const LANGUAGE_TAG_WEIGHT: u32 = 2;
pub const FORMAT_WEIGHT: u32 = 2;
pub const DISPLAY_TITLE_WEIGHT: u32 = 1;
pub const PROVIDER_TITLE_WEIGHT: u32 = 1;
pub const DECISION_WEIGHT: u32 = 1;
pub const LOCATION_WEIGHT: u32 = 1;

/// Weighted attribute similarity between two tracks.
///
/// An attribute absent on both sides counts as equal.
pub fn similarity(reference: &SubtitleTrack, candidate: &SubtitleTrack) -> u32 {
    let weigh = |equal: bool, weight: u32| if equal { weight } else { 0 };

    weigh(reference.language == candidate.language, LANGUAGE_WEIGHT)
        + weigh(
            reference.language_code == candidate.language_code,
            LANGUAGE_CODE_WEIGHT,
        )
        + weigh(
            reference.language_tag == candidate.language_tag,
            LANGUAGE_TAG_WEIGHT,
        )
        + weigh(reference.format == candidate.format, FORMAT_WEIGHT)
        + weigh(
            reference.display_title == candidate.display_title,
            DISPLAY_TITLE_WEIGHT,
        )
        + weigh(reference.title == candidate.title, PROVIDER_TITLE_WEIGHT)
        + weigh(reference.decision == candidate.decision, DECISION_WEIGHT)
        + weigh(reference.location == candidate.location, LOCATION_WEIGHT)
}

/// Best equivalent of `reference` on each part of `target`.
///
/// Only tracks in the reference's language are considered. The first track
/// with the highest score wins. Parts without such a track are left out.
pub fn find_matches(reference: &SubtitleTrack, target: &Video) -> BTreeMap<PartId, SubtitleTrack> {
    let mut matches = BTreeMap::new();

    for part in &target.parts {
        let mut best: Option<(u32, &SubtitleTrack)> = None;
        for track in &part.subtitle_tracks {
            if track.language != reference.language {
                continue;
            }
            let score = similarity(reference, track);
            if best.map_or(true, |(top, _)| score > top) {
                best = Some((score, track));
            }
        }

        if let Some((score, track)) = best {
            tracing::trace!(
                "Part {} matched stream {} with score {}",
                part.id,
                track.id,
                score
            );
            matches.insert(part.id, track.clone());
        }
    }

    matches
}
