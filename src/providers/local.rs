//! Subtitle provider backed by local directories of subtitle files.
//!
//! Files are identified by name. The last dot-separated segment before the
//! extension is the language (`Show.S01E02.eng.srt`, `Heat.1995.en.ass`); the
//! rest is parsed for series/season/episode, title/year, an IMDb id, or a
//! 16-digit OpenSubtitles hash (`0123456789abcdef.eng.srt`). Files without a
//! recognisable language are skipped.

use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::RwLock;
use regex::Regex;
use subscout_common::paths::is_subtitle_file;
use subscout_common::{Error, LanguageCode, Result};
use walkdir::WalkDir;

use super::provider::{subtitle_file_name, CandidateMetadata, SubtitleCandidate, SubtitleProvider};
use super::score::same_title;
use crate::config::LocalProviderConfig;
use crate::subtitles::{DescriptorKind, VideoDescriptor};

static EPISODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(.*?)[\s._-]*s(\d{1,2})[\s._-]*e(\d{1,3})").expect("valid episode regex")
});
static YEAR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.*?)[\s._(\[-]*((?:19|20)\d{2})(?:\D|$)").expect("valid year regex")
});
static IMDB_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(tt\d{7,8})\b").expect("valid imdb regex"));
static HASH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-fA-F]{16}$").expect("valid hash regex"));

/// ISO 639-1 codes mapped to the ISO 639-2/B codes Plex reports.
const ALPHA2_TO_ALPHA3: &[(&str, &str)] = &[
    ("ar", "ara"),
    ("cs", "cze"),
    ("da", "dan"),
    ("de", "ger"),
    ("el", "gre"),
    ("en", "eng"),
    ("es", "spa"),
    ("fi", "fin"),
    ("fr", "fre"),
    ("he", "heb"),
    ("hu", "hun"),
    ("it", "ita"),
    ("ja", "jpn"),
    ("ko", "kor"),
    ("nl", "dut"),
    ("no", "nor"),
    ("pl", "pol"),
    ("pt", "por"),
    ("ro", "rum"),
    ("ru", "rus"),
    ("sv", "swe"),
    ("tr", "tur"),
    ("zh", "chi"),
];

/// A subtitle file found in one of the configured directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedSubtitle {
    pub path: PathBuf,
    pub language: LanguageCode,
    pub metadata: CandidateMetadata,
}

struct CachedIndex {
    built_at: Instant,
    entries: Arc<Vec<IndexedSubtitle>>,
}

pub struct LocalDirectoryProvider {
    paths: Vec<PathBuf>,
    ttl: Duration,
    index: RwLock<Option<CachedIndex>>,
}

impl LocalDirectoryProvider {
    pub fn new(config: &LocalProviderConfig) -> Self {
        Self {
            paths: config.paths.clone(),
            ttl: Duration::from_secs(config.index_ttl_secs),
            index: RwLock::new(None),
        }
    }

    /// Current index, rebuilt when older than the configured TTL.
    async fn entries(&self) -> Result<Arc<Vec<IndexedSubtitle>>> {
        let fresh = self
            .index
            .read()
            .as_ref()
            .filter(|cached| cached.built_at.elapsed() < self.ttl)
            .map(|cached| cached.entries.clone());
        if let Some(entries) = fresh {
            return Ok(entries);
        }

        let paths = self.paths.clone();
        let entries = tokio::task::spawn_blocking(move || build_index(&paths))
            .await
            .map_err(|e| Error::provider(format!("subtitle index task failed: {}", e)))?;
        let entries = Arc::new(entries);

        tracing::debug!("Indexed {} local subtitle files", entries.len());
        *self.index.write() = Some(CachedIndex {
            built_at: Instant::now(),
            entries: entries.clone(),
        });
        Ok(entries)
    }
}

#[async_trait]
impl SubtitleProvider for LocalDirectoryProvider {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn search_candidates(
        &self,
        descriptor: &VideoDescriptor,
        languages: &[LanguageCode],
    ) -> Result<Vec<SubtitleCandidate>> {
        let entries = self.entries().await?;
        Ok(entries
            .iter()
            .filter(|e| languages.contains(&e.language))
            .filter(|e| is_relevant(&e.metadata, descriptor))
            .map(|e| to_candidate(e, self.name()))
            .collect())
    }

    async fn save_subtitle_file(
        &self,
        descriptor: &VideoDescriptor,
        candidate: &SubtitleCandidate,
        directory: &Path,
    ) -> Result<PathBuf> {
        tokio::fs::create_dir_all(directory).await?;
        let dest = directory.join(subtitle_file_name(descriptor, candidate));
        tokio::fs::copy(&candidate.id, &dest).await.map_err(|e| {
            Error::provider(format!(
                "failed to copy {} to {}: {}",
                candidate.id,
                dest.display(),
                e
            ))
        })?;
        Ok(dest)
    }
}

fn build_index(paths: &[PathBuf]) -> Vec<IndexedSubtitle> {
    let mut entries = Vec::new();
    for root in paths {
        if !root.exists() {
            tracing::warn!("Local subtitle path does not exist: {:?}", root);
            continue;
        }
        for entry in WalkDir::new(root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !entry.file_type().is_file() || !is_subtitle_file(path) {
                continue;
            }
            match parse_subtitle_file_name(path) {
                Some((language, metadata)) => entries.push(IndexedSubtitle {
                    path: path.to_path_buf(),
                    language,
                    metadata,
                }),
                None => tracing::trace!("No language in subtitle file name: {:?}", path),
            }
        }
    }
    entries
}

/// Language and descriptive metadata encoded in a subtitle file name.
pub fn parse_subtitle_file_name(path: &Path) -> Option<(LanguageCode, CandidateMetadata)> {
    let stem = path.file_stem()?.to_str()?;
    let (rest, lang) = stem.rsplit_once('.')?;
    let language = parse_language(lang)?;

    let mut metadata = CandidateMetadata {
        imdb_id: IMDB_RE
            .captures(rest)
            .map(|c| c[1].to_lowercase()),
        ..Default::default()
    };

    if HASH_RE.is_match(rest) {
        metadata.hash = Some(rest.to_lowercase());
    } else if let Some(caps) = EPISODE_RE.captures(rest) {
        metadata.series = Some(clean_title(&caps[1])).filter(|s| !s.is_empty());
        metadata.season = caps[2].parse().ok();
        metadata.episode = caps[3].parse().ok();
    } else if let Some(caps) = YEAR_RE.captures(rest) {
        metadata.title = Some(clean_title(&caps[1])).filter(|s| !s.is_empty());
        metadata.year = caps[2].parse().ok();
    } else {
        metadata.title = Some(clean_title(rest)).filter(|s| !s.is_empty());
    }

    Some((language, metadata))
}

fn parse_language(segment: &str) -> Option<LanguageCode> {
    let segment = segment.to_lowercase();
    if !segment.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    match segment.len() {
        2 => ALPHA2_TO_ALPHA3
            .iter()
            .find(|(a2, _)| *a2 == segment)
            .map(|(_, a3)| LanguageCode::new(a3)),
        3 => Some(LanguageCode::new(segment)),
        _ => None,
    }
}

fn clean_title(raw: &str) -> String {
    raw.replace(['.', '_'], " ")
        .trim_matches(|c: char| c.is_whitespace() || c == '-' || c == '(' || c == '[')
        .to_string()
}

fn is_relevant(meta: &CandidateMetadata, descriptor: &VideoDescriptor) -> bool {
    if let Some(hash) = &meta.hash {
        return descriptor
            .hashes
            .values()
            .any(|h| h.eq_ignore_ascii_case(hash));
    }
    if let (Some(a), Some(b)) = (&meta.imdb_id, &descriptor.imdb_id) {
        if a.eq_ignore_ascii_case(b) {
            return true;
        }
    }
    match &descriptor.kind {
        DescriptorKind::Episode {
            series,
            season,
            episode,
            ..
        } => {
            meta.season == Some(*season)
                && meta.episode == Some(*episode)
                && meta.series.as_deref().is_some_and(|s| same_title(s, series))
        }
        DescriptorKind::Movie { title, .. } => {
            meta.title.as_deref().is_some_and(|t| same_title(t, title))
        }
    }
}

fn to_candidate(entry: &IndexedSubtitle, provider: &str) -> SubtitleCandidate {
    let file_name = entry
        .path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    SubtitleCandidate {
        provider: provider.to_string(),
        id: entry.path.to_string_lossy().into_owned(),
        language: entry.language.clone(),
        provider_title: entry
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned()),
        display_title: None,
        file_name,
        metadata: entry.metadata.clone(),
    }
}
