//! Next-episode lookup.

use subscout_common::Video;

/// The episode after `current` among `episodes`.
///
/// The next index in the same season wins; otherwise the lowest index of the
/// following season. `None` after a series finale or when `current` is not
/// numbered.
pub fn next_episode<'a>(current: &Video, episodes: &'a [Video]) -> Option<&'a Video> {
    let season = current.season_number?;
    let index = current.episode_number?;

    let in_season = |s: u32| {
        episodes
            .iter()
            .filter(move |e| e.season_number == Some(s) && e.episode_number.is_some())
    };

    if let Some(next) = in_season(season).find(|e| e.episode_number == Some(index + 1)) {
        return Some(next);
    }

    in_season(season + 1).min_by_key(|e| e.episode_number)
}
