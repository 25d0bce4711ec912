use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use subscout_common::{AccountId, Error, PartId, PlaybackSession, Result, StreamId, Video, VideoKind};

use super::wire::{Envelope, MetadataContainer, SectionContainer, WireMetadata, WireWebhook};
use super::VideoSource;
use crate::config::PlexConfig;

const PLEX_TV_URL: &str = "https://plex.tv";

/// Thin JSON client for the handful of Plex endpoints subscout uses.
pub struct PlexClient {
    client: Client,
    base_url: String,
    plex_tv_url: String,
    token: String,
    user_tokens: HashMap<String, String>,
}

impl PlexClient {
    pub fn new(config: &PlexConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build HTTP client with timeout: {}", e);
                Client::new()
            });

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            plex_tv_url: PLEX_TV_URL.to_string(),
            token: config.token.clone(),
            user_tokens: config.user_tokens.clone(),
        }
    }

    /// Point account-level calls (webhooks) at another plex.tv host.
    pub fn with_plex_tv_url(mut self, url: &str) -> Self {
        self.plex_tv_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Token to act as `user`; the owner token when none is configured.
    fn token_for(&self, user: Option<AccountId>) -> &str {
        user.and_then(|id| self.user_tokens.get(&id.to_string()))
            .map(String::as_str)
            .unwrap_or(self.token.as_str())
    }

    fn request(&self, method: reqwest::Method, path: &str, token: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
            .header("Accept", "application/json")
            .header("X-Plex-Token", token)
    }

    async fn send(&self, request: RequestBuilder, what: &str) -> Result<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| Error::media_server(format!("{}: {}", what, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::media_server(format!("{} ({}): {}", what, status, body)));
        }
        Ok(response)
    }

    async fn json<T: DeserializeOwned>(response: Response, what: &str) -> Result<T> {
        response
            .json()
            .await
            .map_err(|e| Error::media_server(format!("{}: invalid response: {}", what, e)))
    }

    async fn get_metadata(&self, path: &str) -> Result<Option<Vec<WireMetadata>>> {
        let what = format!("GET {}", path);
        let response = self
            .request(reqwest::Method::GET, path, &self.token)
            .send()
            .await
            .map_err(|e| Error::media_server(format!("{}: {}", what, e)))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::media_server(format!("{} ({}): {}", what, status, body)));
        }

        let envelope: Envelope<MetadataContainer> = Self::json(response, &what).await?;
        Ok(Some(envelope.media_container.metadata))
    }

    /// Select `stream` on `part`; stream 0 clears the selection.
    async fn select_stream(&self, part: PartId, stream: i64, token: &str) -> Result<()> {
        let path = format!("/library/parts/{}", part);
        let request = self
            .request(reqwest::Method::PUT, &path, token)
            .query(&[("subtitleStreamID", stream.to_string()), ("allParts", "1".to_string())]);
        self.send(request, &format!("PUT {}", path)).await?;
        Ok(())
    }

    fn account_request(&self, method: reqwest::Method) -> RequestBuilder {
        self.client
            .request(method, format!("{}/api/v2/user/webhooks", self.plex_tv_url))
            .header("Accept", "application/json")
            .header("X-Plex-Token", &self.token)
    }
}

#[async_trait]
impl VideoSource for PlexClient {
    async fn fetch_video(&self, key: &str) -> Result<Option<Video>> {
        let Some(items) = self.get_metadata(key).await? else {
            return Ok(None);
        };
        Ok(items.into_iter().next().and_then(WireMetadata::into_video))
    }

    async fn refresh_metadata(&self, video: &Video) -> Result<Video> {
        self.fetch_video(&video.key)
            .await?
            .ok_or_else(|| Error::not_found(format!("video {}", video.key)))
    }

    async fn list_episodes(&self, container: &Video) -> Result<Vec<Video>> {
        let key = match container.kind {
            VideoKind::Show | VideoKind::Season => container.key.as_str(),
            VideoKind::Episode => container
                .show_key
                .as_deref()
                .ok_or_else(|| Error::not_found(format!("show of {}", container)))?,
            VideoKind::Movie => return Ok(Vec::new()),
        };

        let path = format!("{}/allLeaves", key);
        let items = self
            .get_metadata(&path)
            .await?
            .ok_or_else(|| Error::not_found(format!("episodes of {}", container)))?;

        Ok(items
            .into_iter()
            .filter_map(WireMetadata::into_video)
            .filter(|v| v.kind == VideoKind::Episode)
            .collect())
    }

    async fn list_active_sessions(&self) -> Result<Vec<PlaybackSession>> {
        let items = self.get_metadata("/status/sessions").await?.unwrap_or_default();
        Ok(items
            .into_iter()
            .filter_map(WireMetadata::into_session)
            .collect())
    }

    async fn set_selected_subtitle_track(
        &self,
        part: PartId,
        track: StreamId,
        as_user: Option<AccountId>,
    ) -> Result<()> {
        self.select_stream(part, track.0, self.token_for(as_user)).await
    }

    async fn clear_selected_subtitle_track(
        &self,
        part: PartId,
        as_user: Option<AccountId>,
    ) -> Result<()> {
        self.select_stream(part, 0, self.token_for(as_user)).await
    }

    async fn upload_subtitle_file(&self, video: &Video, path: &Path) -> Result<()> {
        let endpoint = format!("/library/metadata/{}/subtitles", video.rating_key);
        let request = self
            .request(reqwest::Method::POST, &endpoint, &self.token)
            .query(&[("url", path.to_string_lossy())]);
        self.send(request, &format!("POST {}", endpoint)).await?;
        Ok(())
    }

    async fn library_locations(&self) -> Result<Vec<PathBuf>> {
        let what = "GET /library/sections";
        let request = self.request(reqwest::Method::GET, "/library/sections", &self.token);
        let response = self.send(request, what).await?;
        let envelope: Envelope<SectionContainer> = Self::json(response, what).await?;

        Ok(envelope
            .media_container
            .directories
            .into_iter()
            .flat_map(|d| d.locations)
            .map(|l| PathBuf::from(l.path))
            .collect())
    }

    async fn webhooks(&self) -> Result<Vec<String>> {
        let what = "GET plex.tv webhooks";
        let response = self
            .send(self.account_request(reqwest::Method::GET), what)
            .await?;
        let hooks: Vec<WireWebhook> = Self::json(response, what).await?;
        Ok(hooks.into_iter().map(|h| h.url).collect())
    }

    async fn add_webhook(&self, url: &str) -> Result<Vec<String>> {
        let mut urls = self.webhooks().await?;
        if urls.iter().any(|u| u == url) {
            return Ok(urls);
        }
        urls.push(url.to_string());

        let form: Vec<(&str, &str)> = urls.iter().map(|u| ("urls[]", u.as_str())).collect();
        let request = self.account_request(reqwest::Method::POST).form(&form);
        self.send(request, "POST plex.tv webhooks").await?;

        self.webhooks().await
    }
}
