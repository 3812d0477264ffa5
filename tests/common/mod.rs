//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which builds a [`ClipService`] from inline
//! templates, with a wiremock server standing in for both the object store
//! and the worker. The [`TestHarness::with_server`] constructor starts Axum on
//! a random port for HTTP-level testing.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::net::SocketAddr;

use hlsclip::config::{Config, TemplateRef};
use hlsclip::server::{create_router, AppContext};
use hlsclip::service::ClipService;
use wiremock::MockServer;

pub const MASTER: &str = "#EXTM3U
#EXT-X-VERSION:3
#EXT-X-STREAM-INF:BANDWIDTH=590320,AVERAGE-BANDWIDTH=590320,CODECS=\"avc1.4d401f,mp4a.40.2\",RESOLUTION=480x270,FRAME-RATE=25.000
playlist/270p_400k/playlist.m3u8
#EXT-X-STREAM-INF:BANDWIDTH=3800419,AVERAGE-BANDWIDTH=3800419,CODECS=\"avc1.4d401f,mp4a.40.2\",RESOLUTION=960x540,FRAME-RATE=25.000
playlist/540p_3500k/playlist.m3u8
";

pub const MEDIA: &str = "#EXTM3U
#EXT-X-VERSION:3
#EXT-X-TARGETDURATION:8
#EXT-X-MEDIA-SEQUENCE:1
#EXT-X-PLAYLIST-TYPE:VOD
#EXTINF:6.000,
playlist_00001.ts
#EXT-X-ENDLIST
";

pub const STORAGE: &str = "s3://clips/";

/// `test-cases/#t=7,13`, URL-encoded for a query string.
pub const RANGE_7_13: &str = "test-cases%2F%23t%3D7%2C13";

/// Configuration pointing storage and worker at `mock_uri`.
pub fn test_config(mock_uri: &str) -> Config {
    let mut config = Config::default();
    config.storage.storage_prefix = STORAGE.to_string();
    config.storage.public_prefix = format!("{mock_uri}/clips/");
    config.templates.master = Some(TemplateRef::Inline(MASTER.to_string()));
    config.templates.media = Some(TemplateRef::Inline(MEDIA.to_string()));
    config.variants = BTreeMap::from([
        (
            "270p_400k".to_string(),
            "-preset veryfast -b:v 400k -s 480x270".to_string(),
        ),
        (
            "540p_3500k".to_string(),
            "-preset veryfast -b:v 3500k -s 960x540".to_string(),
        ),
    ]);
    config.worker.endpoint = mock_uri.to_string();
    config.worker.timeout_secs = 5;
    config
}

/// Test harness wrapping a fully-constructed [`AppContext`].
pub struct TestHarness {
    pub ctx: AppContext,
    pub mock: MockServer,
}

impl TestHarness {
    /// Create a new harness backed by a fresh mock server.
    pub async fn new() -> Self {
        let mock = MockServer::start().await;
        let config = test_config(&mock.uri());
        Self::with_config(config, mock)
    }

    /// Create a harness with a custom configuration.
    pub fn with_config(config: Config, mock: MockServer) -> Self {
        let ctx = AppContext::new(ClipService::from_config(config));
        Self { ctx, mock }
    }

    /// Public prefix playlists are rendered with.
    pub fn public_prefix(&self) -> String {
        format!("{}/clips/", self.mock.uri())
    }

    /// Start an Axum server on a random port and return the harness together
    /// with the bound socket address.
    pub async fn with_server() -> (Self, SocketAddr) {
        let harness = Self::new().await;
        let app = create_router(harness.ctx.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        (harness, addr)
    }
}
