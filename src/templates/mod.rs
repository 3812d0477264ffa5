//! Reference playlist loading.
//!
//! Master and media templates come from the config, either inline or as URLs.
//! Remote ones are fetched through a [`PlaylistFetcher`] and memoized in a
//! [`TemplateCache`] owned by the caller.

mod cache;

pub use cache::TemplateCache;

use async_trait::async_trait;
use hlsclip_common::{Error, Result};
use hlsclip_media::hls::{parse_master, parse_media};
use hlsclip_media::{MasterPlaylist, MediaTemplateSet, SegmentTemplate};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{TemplateRef, TemplatesConfig};

/// Fetches playlist text from a URL.
#[async_trait]
pub trait PlaylistFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// [`PlaylistFetcher`] over plain HTTP GET.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build HTTP client with timeout: {}", e);
                Client::new()
            });

        Self { client }
    }
}

#[async_trait]
impl PlaylistFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::remote(format!("GET {url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::remote(format!("GET {url} returned {status}")));
        }

        response
            .text()
            .await
            .map_err(|e| Error::remote(format!("reading {url}: {e}")))
    }
}

/// Resolves the configured master and media templates.
pub struct TemplateSource {
    config: TemplatesConfig,
    fetcher: Arc<dyn PlaylistFetcher>,
    cache: Arc<TemplateCache>,
}

impl TemplateSource {
    pub fn new(
        config: TemplatesConfig,
        fetcher: Arc<dyn PlaylistFetcher>,
        cache: Arc<TemplateCache>,
    ) -> Self {
        Self {
            config,
            fetcher,
            cache,
        }
    }

    /// Reference to the best-quality rendition directory.
    pub fn best_quality(&self) -> &str {
        &self.config.best_quality
    }

    /// Cache backing remote templates.
    pub fn cache(&self) -> &TemplateCache {
        &self.cache
    }

    /// The reference master playlist.
    pub async fn master(&self) -> Result<MasterPlaylist> {
        let text = self.load("master", self.config.master.as_ref()).await?;
        parse_master(&text)
    }

    /// The shared media template plus every per-variant override.
    pub async fn media_set(&self) -> Result<MediaTemplateSet> {
        let text = self.load("media", self.config.media.as_ref()).await?;
        let mut set = MediaTemplateSet::shared(SegmentTemplate::parse(&text)?);

        for (variant, template) in &self.config.media_overrides {
            let text = self.load(variant, Some(template)).await?;
            let playlist = parse_media(&text)?;
            set = set.with_override(variant.clone(), SegmentTemplate::from_playlist(&playlist)?);
        }

        Ok(set)
    }

    async fn load(&self, name: &str, template: Option<&TemplateRef>) -> Result<Arc<str>> {
        match template {
            None => Err(Error::internal(format!("no {name} template configured"))),
            Some(TemplateRef::Inline(text)) => Ok(Arc::from(text.as_str())),
            Some(TemplateRef::Remote { url }) => {
                if let Some(text) = self.cache.get(url) {
                    tracing::trace!(template = name, url = %url, "Template cache hit");
                    return Ok(text);
                }

                tracing::debug!(template = name, url = %url, "Fetching template");
                let text = self.fetcher.fetch(url).await?;
                Ok(self.cache.insert(url, text))
            }
        }
    }
}
