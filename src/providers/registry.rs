//! Provider registry for managing multiple [`SubtitleProvider`] implementations.
//!
//! The [`ProviderRegistry`] aggregates the enabled providers and is itself a
//! [`SubtitleProvider`]: searches fan out to every provider and are merged,
//! saves are routed back to the provider that produced the candidate.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use subscout_common::{Error, LanguageCode, Result};

use super::provider::{SubtitleCandidate, SubtitleProvider};
use crate::subtitles::VideoDescriptor;

/// A registry that manages multiple [`SubtitleProvider`] implementations.
///
/// Providers are stored in registration order, and merged search results keep
/// that order. A provider whose search fails is logged and skipped so the
/// others can still contribute.
///
/// # Examples
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use subscout::providers::ProviderRegistry;
///
/// let mut registry = ProviderRegistry::new();
/// registry.register(Arc::new(local_provider));
///
/// let candidates = registry.search_candidates(&descriptor, &languages).await?;
/// ```
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn SubtitleProvider>>,
}

impl ProviderRegistry {
    /// Create an empty registry with no providers.
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Register a new subtitle provider.
    pub fn register(&mut self, provider: Arc<dyn SubtitleProvider>) {
        self.providers.push(provider);
    }

    /// Look up a provider by its [`SubtitleProvider::name`].
    pub fn get(&self, name: &str) -> Option<&dyn SubtitleProvider> {
        self.providers
            .iter()
            .find(|p| p.name() == name)
            .map(|p| p.as_ref())
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SubtitleProvider for ProviderRegistry {
    fn name(&self) -> &'static str {
        "registry"
    }

    async fn search_candidates(
        &self,
        descriptor: &VideoDescriptor,
        languages: &[LanguageCode],
    ) -> Result<Vec<SubtitleCandidate>> {
        let mut all = Vec::new();
        let mut failures = Vec::new();

        for provider in &self.providers {
            match provider.search_candidates(descriptor, languages).await {
                Ok(found) => {
                    tracing::debug!(
                        "Provider '{}' returned {} candidates for {}",
                        provider.name(),
                        found.len(),
                        descriptor.file_name()
                    );
                    all.extend(found);
                }
                Err(e) => {
                    tracing::warn!(
                        "Provider '{}' search failed for {}: {}",
                        provider.name(),
                        descriptor.file_name(),
                        e
                    );
                    failures.push(e);
                }
            }
        }

        // Only an error when nobody could answer.
        if !failures.is_empty() && failures.len() == self.providers.len() {
            return Err(Error::provider(format!(
                "all providers failed for {}: {}",
                descriptor.file_name(),
                failures
                    .iter()
                    .map(|e| e.to_string())
                    .collect::<Vec<_>>()
                    .join("; ")
            )));
        }

        Ok(all)
    }

    fn relevance_score(&self, candidate: &SubtitleCandidate, descriptor: &VideoDescriptor) -> u32 {
        match self.get(&candidate.provider) {
            Some(provider) => provider.relevance_score(candidate, descriptor),
            None => super::score::compute_score(candidate, descriptor),
        }
    }

    async fn save_subtitle_file(
        &self,
        descriptor: &VideoDescriptor,
        candidate: &SubtitleCandidate,
        directory: &Path,
    ) -> Result<PathBuf> {
        let provider = self.get(&candidate.provider).ok_or_else(|| {
            Error::provider(format!("unknown provider '{}'", candidate.provider))
        })?;
        provider
            .save_subtitle_file(descriptor, candidate, directory)
            .await
    }
}
