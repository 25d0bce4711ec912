//! Path utilities for subtitle files.

use std::path::Path;

/// List of recognised subtitle file extensions.
const SUBTITLE_EXTENSIONS: &[&str] = &["srt", "ass", "ssa", "sub", "vtt", "smi", "idx"];

/// Check if a path has a subtitle file extension.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use subscout_common::paths::is_subtitle_file;
///
/// assert!(is_subtitle_file(Path::new("movie.en.srt")));
/// assert!(!is_subtitle_file(Path::new("video.mkv")));
/// ```
pub fn is_subtitle_file(path: &Path) -> bool {
    subtitle_format(path)
        .map(|ext| SUBTITLE_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// The subtitle format of a file: its extension, lowercased, without the dot.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use subscout_common::paths::subtitle_format;
///
/// assert_eq!(subtitle_format(Path::new("Show.S01E01.eng.SRT")).as_deref(), Some("srt"));
/// assert_eq!(subtitle_format(Path::new("no_extension")), None);
/// ```
pub fn subtitle_format(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// Get the list of subtitle file extensions.
pub fn subtitle_extensions() -> &'static [&'static str] {
    SUBTITLE_EXTENSIONS
}
