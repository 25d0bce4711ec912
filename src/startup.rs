//! Checks run once before the webhook receiver starts.

use std::path::Path;

use subscout_common::Result;

use crate::plex::VideoSource;

/// Whether every library location exists and is readable and writable.
/// Each problem is logged.
pub async fn check_library_permissions(source: &dyn VideoSource) -> Result<bool> {
    tracing::debug!("Checking library permissions");

    let mut all_ok = true;
    for location in source.library_locations().await? {
        if !location.exists() {
            tracing::error!("Library directory {:?} does not exist", location);
            all_ok = false;
        } else if !is_read_write(&location) {
            tracing::error!("Cannot read/write library directory {:?}", location);
            all_ok = false;
        }
    }
    Ok(all_ok)
}

#[cfg(unix)]
fn is_read_write(path: &Path) -> bool {
    use nix::unistd::{access, AccessFlags};
    access(path, AccessFlags::R_OK | AccessFlags::W_OK).is_ok()
}

#[cfg(not(unix))]
fn is_read_write(path: &Path) -> bool {
    std::fs::metadata(path)
        .map(|m| !m.permissions().readonly())
        .unwrap_or(false)
}

/// Make sure `url` is registered as a webhook, adding it when missing.
/// Returns whether it is registered afterwards.
pub async fn ensure_webhook_registered(source: &dyn VideoSource, url: &str) -> Result<bool> {
    tracing::info!("Checking if webhook url {} has been added to Plex", url);
    if source.webhooks().await?.iter().any(|u| u == url) {
        tracing::info!("Webhook url {} is registered", url);
        return Ok(true);
    }

    tracing::info!("Adding webhook url {} to Plex", url);
    let registered = source.add_webhook(url).await?.iter().any(|u| u == url);
    if registered {
        tracing::info!("Webhook url successfully added");
    } else {
        tracing::error!(
            "Could not add webhook url {}; add it manually in the Plex dashboard",
            url
        );
    }
    Ok(registered)
}
