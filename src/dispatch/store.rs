//! Existence checks against the object store.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

use hlsclip_common::uri;

/// Whether an output object is already there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Existence {
    Present,
    Absent,
    /// The check itself failed; the reason is kept for logging.
    Unknown(String),
}

/// Answers whether a job output already exists.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn exists(&self, uri: &str) -> Existence;
}

/// [`ObjectStore`] that issues `HEAD` requests on the public URL of an object.
pub struct HttpObjectStore {
    client: Client,
    storage_prefix: String,
    public_prefix: String,
}

impl HttpObjectStore {
    pub fn new(
        storage_prefix: impl Into<String>,
        public_prefix: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build HTTP client with timeout: {}", e);
                Client::new()
            });

        Self {
            client,
            storage_prefix: storage_prefix.into(),
            public_prefix: public_prefix.into(),
        }
    }

    /// Public URL of a storage location.
    pub fn public_url(&self, uri: &str) -> String {
        uri::rebase(uri, &self.storage_prefix, &self.public_prefix)
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn exists(&self, uri: &str) -> Existence {
        let url = self.public_url(uri);
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Existence::Unknown(format!("no public URL for {uri}"));
        }

        match self.client.head(&url).send().await {
            Ok(response) if response.status().is_success() => Existence::Present,
            // S3 answers 403 for missing keys when the caller cannot list the bucket
            Ok(response)
                if matches!(
                    response.status(),
                    StatusCode::NOT_FOUND | StatusCode::GONE | StatusCode::FORBIDDEN
                ) =>
            {
                Existence::Absent
            }
            Ok(response) => Existence::Unknown(format!("HEAD {url} returned {}", response.status())),
            Err(e) => Existence::Unknown(format!("HEAD {url}: {e}")),
        }
    }
}
