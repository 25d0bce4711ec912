//! Picks at most one subtitle candidate per requested language.

use std::cmp::Reverse;

use subscout_common::LanguageCode;

use super::{FormatPriority, VideoDescriptor};
use crate::providers::{SubtitleCandidate, SubtitleProvider};

/// Candidates chosen for one video, at most one per language, in request order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub descriptor: VideoDescriptor,
    pub subtitles: Vec<SubtitleCandidate>,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.subtitles.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct CandidateRanker {
    format_priority: FormatPriority,
}

impl CandidateRanker {
    pub fn new(format_priority: FormatPriority) -> Self {
        Self { format_priority }
    }

    /// Best candidate for each of `languages`.
    ///
    /// Candidates in formats the priority list excludes are dropped. The rest
    /// are ordered by format rank, then relevance, both descending; the sort
    /// is stable so equal candidates keep provider order. Languages without a
    /// candidate are left out.
    pub fn select_best<F>(
        &self,
        languages: &[LanguageCode],
        candidates: Vec<SubtitleCandidate>,
        relevance: F,
    ) -> Vec<SubtitleCandidate>
    where
        F: Fn(&SubtitleCandidate) -> u32,
    {
        let mut ranked: Vec<(usize, u32, SubtitleCandidate)> = candidates
            .into_iter()
            .filter_map(|c| {
                let rank = self.format_priority.rank(c.format().as_deref())?;
                let score = relevance(&c);
                Some((rank, score, c))
            })
            .collect();

        ranked.sort_by_key(|(rank, score, _)| (Reverse(*rank), Reverse(*score)));

        let mut chosen: Vec<SubtitleCandidate> = Vec::new();
        for lang in languages {
            if chosen.iter().any(|c| &c.language == lang) {
                continue;
            }
            if let Some((_, _, c)) = ranked.iter().find(|(_, _, c)| &c.language == lang) {
                chosen.push(c.clone());
            }
        }
        chosen
    }

    /// [`select_best`](Self::select_best) scored by `provider`.
    pub fn select_for(
        &self,
        descriptor: VideoDescriptor,
        languages: &[LanguageCode],
        candidates: Vec<SubtitleCandidate>,
        provider: &dyn SubtitleProvider,
    ) -> Selection {
        let subtitles = self.select_best(languages, candidates, |c| {
            provider.relevance_score(c, &descriptor)
        });
        tracing::debug!(
            "Selected {} subtitles for {}",
            subtitles.len(),
            descriptor.video_key
        );
        Selection {
            descriptor,
            subtitles,
        }
    }
}
