//! Subtitle provider system.
//!
//! Providers turn a [`VideoDescriptor`](crate::subtitles::VideoDescriptor)
//! into raw subtitle candidates and can save a chosen candidate to disk.
//!
//! # Module layout
//!
//! - [`provider`] -- Trait definition and candidate types.
//! - [`score`] -- Default relevance scoring.
//! - [`registry`] -- Fan-out over every enabled provider.
//! - [`local`] -- Provider backed by local subtitle directories.

pub mod local;
pub mod provider;
pub mod registry;
pub mod score;

use std::sync::Arc;

pub use local::LocalDirectoryProvider;
pub use provider::{CandidateMetadata, SubtitleCandidate, SubtitleProvider};
pub use registry::ProviderRegistry;

use crate::config::Config;

/// Provider names accepted in `providers.enabled`.
pub const KNOWN_PROVIDERS: &[&str] = &["local"];

/// Registry holding every provider enabled in `config`, in configured order.
pub fn build_registry(config: &Config) -> ProviderRegistry {
    let mut registry = ProviderRegistry::new();
    for name in &config.providers.enabled {
        match name.as_str() {
            "local" => registry.register(Arc::new(LocalDirectoryProvider::new(
                &config.providers.local,
            ))),
            other => tracing::warn!("Ignoring unknown subtitle provider: {}", other),
        }
    }
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_registry_from_config() {
        let config = Config::default();
        let registry = build_registry(&config);
        assert_eq!(registry.len(), 1);
        assert!(registry.get("local").is_some());
    }

    #[test]
    fn test_unknown_providers_are_skipped() {
        let mut config = Config::default();
        config.providers.enabled = vec!["addic7ed".to_string()];
        assert!(build_registry(&config).is_empty());
    }
}
