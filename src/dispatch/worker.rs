//! Remote worker invocation.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use hlsclip_common::{Error, Result};

use crate::config::WorkerConfig;
use crate::jobs::TranscodeJob;

/// Header set by the function runtime when the function itself failed.
pub const FUNCTION_ERROR_HEADER: &str = "x-function-error";

/// Runs one transcode job to completion.
#[async_trait]
pub trait Worker: Send + Sync {
    async fn invoke(&self, job: &TranscodeJob) -> Result<()>;
}

/// [`Worker`] that posts jobs to a function runtime over HTTP.
pub struct HttpWorker {
    client: Client,
    url: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FunctionErrorBody {
    error_message: String,
}

impl HttpWorker {
    pub fn new(config: &WorkerConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build HTTP client with timeout: {}", e);
                Client::new()
            });

        Self {
            client,
            url: format!(
                "{}/functions/{}/invocations",
                config.endpoint.trim_end_matches('/'),
                config.function
            ),
        }
    }

    /// Invocation URL.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Worker for HttpWorker {
    async fn invoke(&self, job: &TranscodeJob) -> Result<()> {
        let response = self
            .client
            .post(&self.url)
            .json(job)
            .send()
            .await
            .map_err(|e| Error::remote(format!("invoking worker for {}: {e}", job.output_uri)))?;

        let status = response.status();
        let function_error = response.headers().contains_key(FUNCTION_ERROR_HEADER);

        if status.is_success() && !function_error {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<FunctionErrorBody>(&body)
            .map(|parsed| parsed.error_message)
            .unwrap_or_else(|_| {
                let trimmed = body.trim();
                if trimmed.is_empty() {
                    format!("worker returned {status}")
                } else {
                    trimmed.to_string()
                }
            });

        Err(Error::worker_execution(message))
    }
}
