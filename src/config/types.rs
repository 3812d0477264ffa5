use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub templates: TemplatesConfig,

    /// Encoder options per variant name, as one ffmpeg-style string.
    #[serde(default)]
    pub variants: BTreeMap<String, String>,

    #[serde(default)]
    pub thumbnails: ThumbnailConfig,

    #[serde(default)]
    pub worker: WorkerConfig,

    #[serde(default)]
    pub dispatch: DispatchConfig,

    #[serde(default)]
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Where segments live, as seen by players and by the worker.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Prefix for playback URLs (e.g. `https://cdn.example.com/bucket/`)
    #[serde(default)]
    pub public_prefix: String,

    /// Prefix for worker input/output locations (e.g. `s3://bucket/`)
    #[serde(default)]
    pub storage_prefix: String,
}

/// A playlist template, given inline or fetched from a URL.
///
/// ```toml
/// media = "#EXTM3U\n..."
/// master = { url = "https://cdn.example.com/reference/master.m3u8" }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum TemplateRef {
    Inline(String),
    Remote { url: String },
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TemplatesConfig {
    /// Reference master playlist listing every quality variant
    #[serde(default)]
    pub master: Option<TemplateRef>,

    /// One-segment reference media playlist shared by all variants
    #[serde(default)]
    pub media: Option<TemplateRef>,

    /// Media templates for variants whose segmentation differs
    #[serde(default)]
    pub media_overrides: BTreeMap<String, TemplateRef>,

    /// Relative reference from any segment to the best-quality rendition
    /// directory, used as transcode input
    #[serde(default = "default_best_quality")]
    pub best_quality: String,
}

fn default_best_quality() -> String {
    "../540p_3500k".to_string()
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            master: None,
            media: None,
            media_overrides: BTreeMap::new(),
            best_quality: default_best_quality(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ThumbnailConfig {
    /// Key of the first thumbnail of an asset, relative to its source key
    #[serde(default = "default_thumb_template")]
    pub template: String,

    /// Name prefix of combined thumbnail strips
    #[serde(default = "default_thumb_prefix")]
    pub combined_prefix: String,

    /// Seconds of video covered by each thumbnail
    #[serde(default = "default_thumb_duration")]
    pub duration_secs: f64,
}

fn default_thumb_template() -> String {
    "thumbs/thumb.0000000.jpg".to_string()
}
fn default_thumb_prefix() -> String {
    "thumbs/thumb".to_string()
}
fn default_thumb_duration() -> f64 {
    20.0
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            template: default_thumb_template(),
            combined_prefix: default_thumb_prefix(),
            duration_secs: default_thumb_duration(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WorkerConfig {
    /// Base URL of the function runtime
    #[serde(default = "default_worker_endpoint")]
    pub endpoint: String,

    /// Name of the function performing the trims
    #[serde(default = "default_worker_function")]
    pub function: String,

    /// Timeout for worker invocations and existence checks
    #[serde(default = "default_worker_timeout")]
    pub timeout_secs: u64,
}

fn default_worker_endpoint() -> String {
    "http://127.0.0.1:9000".to_string()
}
fn default_worker_function() -> String {
    "hlsClip".to_string()
}
fn default_worker_timeout() -> u64 {
    300
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            endpoint: default_worker_endpoint(),
            function: default_worker_function(),
            timeout_secs: default_worker_timeout(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DispatchConfig {
    /// Maximum jobs in flight at once
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

fn default_concurrency() -> usize {
    8
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_entries")]
    pub max_entries: usize,

    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
}

fn default_cache_entries() -> usize {
    64
}
fn default_cache_ttl() -> u64 {
    300
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: default_cache_entries(),
            ttl_secs: default_cache_ttl(),
        }
    }
}
