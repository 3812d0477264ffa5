//! Entry point shared by the HTTP server and the CLI.

use hlsclip_common::{uri, Result, TimeRange};
use hlsclip_media::{combine_master, combine_media, plan, MasterPlaylist, MediaPlaylist};
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::dispatch::{
    AggregateDispatchError, DispatchReport, Dispatcher, HttpObjectStore, HttpWorker, ObjectStore,
    Worker,
};
use crate::jobs::{JobDeriver, TranscodeJob, VariantOptions};
use crate::templates::{HttpFetcher, PlaylistFetcher, TemplateCache, TemplateSource};
use crate::thumbs::{self, ThumbnailJob};

/// Playlists, jobs, and dispatch for one configuration.
pub struct ClipService {
    config: Arc<Config>,
    templates: TemplateSource,
    deriver: JobDeriver,
    dispatcher: Dispatcher,
}

impl ClipService {
    /// Build a service talking HTTP to every collaborator.
    pub fn from_config(config: Config) -> Self {
        let timeout = Duration::from_secs(config.worker.timeout_secs);
        let fetcher = Arc::new(HttpFetcher::new(timeout));
        let store = Arc::new(HttpObjectStore::new(
            config.storage.storage_prefix.clone(),
            config.storage.public_prefix.clone(),
            timeout,
        ));
        let worker = Arc::new(HttpWorker::new(&config.worker));

        Self::new(config, fetcher, store, worker)
    }

    pub fn new(
        config: Config,
        fetcher: Arc<dyn PlaylistFetcher>,
        store: Arc<dyn ObjectStore>,
        worker: Arc<dyn Worker>,
    ) -> Self {
        let cache = Arc::new(TemplateCache::new(
            config.cache.max_entries,
            config.cache.ttl_secs,
        ));
        let templates = TemplateSource::new(config.templates.clone(), fetcher, cache);
        let deriver = JobDeriver::new(
            VariantOptions::from_config(&config.variants),
            config.templates.best_quality.clone(),
            config.storage.storage_prefix.clone(),
        );
        let dispatcher = Dispatcher::new(store, worker, config.dispatch.concurrency);

        Self {
            config: Arc::new(config),
            templates,
            deriver,
            dispatcher,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn templates(&self) -> &TemplateSource {
        &self.templates
    }

    /// One media playlist covering every range, in order.
    ///
    /// A range keyed by a variant playlist URI uses that variant's template.
    pub async fn media_playlist(&self, ranges: &[TimeRange]) -> Result<MediaPlaylist> {
        let templates = self.templates.media_set().await?;

        let clipped = ranges
            .iter()
            .map(|range| {
                let variant = if range.key.ends_with(".m3u8") {
                    uri::parent_name(&range.key).unwrap_or_default()
                } else {
                    ""
                };
                plan(range, templates.for_variant(variant))
            })
            .collect::<Result<Vec<_>>>()?;

        combine_media(&clipped, &self.config.storage.public_prefix)
    }

    /// Master playlist whose variants point back at the media playlist.
    pub async fn master_playlist(&self, ranges: &[TimeRange]) -> Result<MasterPlaylist> {
        for range in ranges {
            range.validate()?;
        }
        let master = self.templates.master().await?;
        combine_master(&master, ranges, &self.config.storage.public_prefix)
    }

    /// Transcode jobs needed to serve every range in every variant.
    pub async fn jobs(&self, ranges: &[TimeRange]) -> Result<Vec<TranscodeJob>> {
        let master = self.templates.master().await?;
        let templates = self.templates.media_set().await?;
        self.deriver.derive_jobs(ranges, &master, &templates)
    }

    /// Run jobs on the worker, skipping outputs that already exist.
    pub async fn dispatch(
        &self,
        jobs: &[TranscodeJob],
    ) -> std::result::Result<DispatchReport, AggregateDispatchError> {
        self.dispatcher.dispatch(jobs).await
    }

    pub fn thumbnail_uris(&self, ranges: &[TimeRange]) -> Vec<String> {
        thumbs::combined_uris(
            ranges,
            &self.config.thumbnails,
            &self.config.storage.public_prefix,
        )
    }

    pub fn thumbnail_jobs(&self, ranges: &[TimeRange]) -> Vec<ThumbnailJob> {
        thumbs::thumbnail_jobs(
            ranges,
            &self.config.thumbnails,
            &self.config.storage.storage_prefix,
        )
    }
}
