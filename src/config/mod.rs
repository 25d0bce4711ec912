mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./config.toml",
        "./subscout.toml",
        "~/.config/subscout/config.toml",
        "/etc/subscout/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.server.port == 0 {
        anyhow::bail!("Server port cannot be 0");
    }

    if config.server.queue_capacity == 0 {
        anyhow::bail!("Server queue capacity cannot be 0");
    }

    if config.languages.is_empty() {
        anyhow::bail!("At least one subtitle language must be configured");
    }

    if config.plex.base_url.trim().is_empty() {
        anyhow::bail!("Plex base_url cannot be empty");
    }

    if config.plex.token.trim().is_empty() {
        anyhow::bail!("Plex token cannot be empty");
    }

    if config.providers.enabled.is_empty() {
        anyhow::bail!("At least one subtitle provider must be enabled");
    }

    for name in &config.providers.enabled {
        if !crate::providers::KNOWN_PROVIDERS.contains(&name.as_str()) {
            anyhow::bail!("Unknown subtitle provider '{}'", name);
        }
    }

    if config.providers.enabled.iter().any(|p| p == "local") {
        if config.providers.local.paths.is_empty() {
            anyhow::bail!("Provider 'local' is enabled but has no paths");
        }
        for path in &config.providers.local.paths {
            if !path.exists() {
                tracing::warn!("Local subtitle path does not exist: {:?}", path);
            }
        }
    }

    Ok(())
}
