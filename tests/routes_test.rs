//! Integration tests for the playlist, thumbnail, and job routes.

mod common;

use common::{TestHarness, RANGE_7_13};
use serde_json::{json, Value};
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, ResponseTemplate};

const INVOCATIONS: &str = "/functions/hlsClip/invocations";

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_check() {
    let (_h, addr) = TestHarness::with_server().await;
    let resp = reqwest::get(format!("http://{addr}/health")).await.unwrap();
    assert_eq!(resp.status(), 200);
}

// ---------------------------------------------------------------------------
// Playlists
// ---------------------------------------------------------------------------

#[tokio::test]
async fn master_playlist_points_at_media_route() {
    let (h, addr) = TestHarness::with_server().await;
    let resp = reqwest::get(format!("http://{addr}/hls?range={RANGE_7_13}"))
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["content-type"], "application/x-mpegurl");
    assert_eq!(resp.headers()["access-control-allow-origin"], "*");

    let body = resp.text().await.unwrap();
    assert!(body.starts_with("#EXTM3U\n"));
    assert!(body.contains("#EXT-X-STREAM-INF:BANDWIDTH=590320"));
    assert!(body.contains("RESOLUTION=960x540"));

    let variant_uris: Vec<&str> = body.lines().filter(|l| l.starts_with('?')).collect();
    assert_eq!(variant_uris.len(), 2);

    let decoded = hlsclip_common::RangeQuery::parse(variant_uris[0]).unwrap();
    assert_eq!(decoded.kind, hlsclip_common::PlaylistKind::Media);
    assert_eq!(
        decoded.ranges[0].key,
        format!("{}test-cases/playlist/270p_400k/playlist.m3u8", h.public_prefix())
    );
    assert_eq!(decoded.ranges[0].start, 7.0);
    assert_eq!(decoded.ranges[0].end, 13.0);
}

#[tokio::test]
async fn media_playlist_lists_clipped_segments() {
    let (h, addr) = TestHarness::with_server().await;
    let resp = reqwest::get(format!("http://{addr}/hls?type=media&range={RANGE_7_13}"))
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["content-type"], "application/x-mpegurl");

    let prefix = h.public_prefix();
    let expected = format!(
        "#EXTM3U
#EXT-X-VERSION:3
#EXT-X-TARGETDURATION:8
#EXT-X-MEDIA-SEQUENCE:1
#EXT-X-PLAYLIST-TYPE:VOD
#EXTINF:5.0000,
{prefix}test-cases/playlist_00002--clip--1--6.ts
#EXTINF:1.0000,
{prefix}test-cases/playlist_00003--clip--0--1.ts
#EXT-X-ENDLIST
"
    );
    assert_eq!(resp.text().await.unwrap(), expected);
}

#[tokio::test]
async fn media_playlist_follows_master_variant_link() {
    let (_h, addr) = TestHarness::with_server().await;

    let master = reqwest::get(format!("http://{addr}/hls?range={RANGE_7_13}"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    let link = master.lines().find(|l| l.starts_with('?')).unwrap();

    let media = reqwest::get(format!("http://{addr}/hls{link}"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(media.contains("test-cases/playlist/270p_400k/playlist_00002--clip--1--6.ts"));
    assert!(media.contains("test-cases/playlist/270p_400k/playlist_00003--clip--0--1.ts"));
    assert!(media.ends_with("#EXT-X-ENDLIST\n"));
}

#[tokio::test]
async fn multiple_ranges_are_separated_by_discontinuity() {
    let (_h, addr) = TestHarness::with_server().await;
    let resp = reqwest::get(format!(
        "http://{addr}/hls?type=media&range={RANGE_7_13}&range=test-cases%2F%23t%3D20%2C26"
    ))
    .await
    .unwrap();

    let body = resp.text().await.unwrap();
    assert_eq!(body.matches("#EXT-X-DISCONTINUITY").count(), 1);
    assert_eq!(body.matches("#EXTINF").count(), 4);
}

#[tokio::test]
async fn playlist_without_ranges_is_rejected() {
    let (_h, addr) = TestHarness::with_server().await;
    let resp = reqwest::get(format!("http://{addr}/hls")).await.unwrap();
    assert_eq!(resp.status(), 400);

    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["code"], "invalid_input");
}

#[tokio::test]
async fn playlist_with_inverted_range_is_rejected() {
    let (_h, addr) = TestHarness::with_server().await;
    let resp = reqwest::get(format!(
        "http://{addr}/hls?type=media&range=test-cases%2F%23t%3D13%2C7"
    ))
    .await
    .unwrap();
    assert_eq!(resp.status(), 400);

    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["code"], "invalid_range");
}

#[tokio::test]
async fn playlist_with_unknown_type_is_rejected() {
    let (_h, addr) = TestHarness::with_server().await;
    let resp = reqwest::get(format!("http://{addr}/hls?type=audio&range={RANGE_7_13}"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

// ---------------------------------------------------------------------------
// Thumbnails
// ---------------------------------------------------------------------------

#[tokio::test]
async fn thumbnail_urls() {
    let (h, addr) = TestHarness::with_server().await;
    let resp = reqwest::get(format!(
        "http://{addr}/thumbs?range=test-cases%2F%23t%3D200%2C500&range={RANGE_7_13}"
    ))
    .await
    .unwrap();

    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["access-control-allow-origin"], "*");

    let uris: Vec<String> = resp.json().await.unwrap();
    let prefix = h.public_prefix();
    assert_eq!(
        uris,
        vec![
            format!("{prefix}test-cases/thumbs/thumb--combine--200--500.jpg"),
            format!("{prefix}test-cases/thumbs/thumb--combine--7--13.jpg"),
        ]
    );
}

// ---------------------------------------------------------------------------
// Jobs
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_jobs() {
    let (_h, addr) = TestHarness::with_server().await;
    let resp = reqwest::get(format!("http://{addr}/jobs?range={RANGE_7_13}"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let jobs: Vec<Value> = resp.json().await.unwrap();
    assert_eq!(jobs.len(), 4);

    assert_eq!(
        jobs[0]["inputUri"],
        "s3://clips/test-cases/playlist/540p_3500k/playlist_00002.ts"
    );
    assert_eq!(
        jobs[0]["outputUri"],
        "s3://clips/test-cases/playlist/270p_400k/playlist_00002--clip--1--6.ts"
    );
    assert_eq!(jobs[0]["relativeStart"], 1.0);
    assert_eq!(jobs[0]["relativeEnd"], 6.0);
    assert_eq!(
        jobs[0]["outputOptions"],
        json!(["-preset veryfast", "-b:v 400k", "-s 480x270"])
    );
    assert_eq!(
        jobs[1]["outputUri"],
        "s3://clips/test-cases/playlist/270p_400k/playlist_00003--clip--0--1.ts"
    );
    assert_eq!(
        jobs[2]["outputUri"],
        "s3://clips/test-cases/playlist/540p_3500k/playlist_00002--clip--1--6.ts"
    );
}

#[tokio::test]
async fn dispatch_invokes_worker_for_missing_outputs() {
    let (h, addr) = TestHarness::with_server().await;

    Mock::given(method("HEAD"))
        .and(path_regex(r"^/clips/test-cases/playlist/.+--clip--.+\.ts$"))
        .respond_with(ResponseTemplate::new(404))
        .expect(4)
        .mount(&h.mock)
        .await;
    Mock::given(method("POST"))
        .and(path(INVOCATIONS))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(4)
        .mount(&h.mock)
        .await;

    let resp = reqwest::Client::new()
        .post(format!("http://{addr}/jobs"))
        .json(&json!({ "ranges": [{ "key": "test-cases/", "start": 7, "end": 13 }] }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["jobs"], 4);
    assert_eq!(json["invoked"], 4);
    assert_eq!(json["skipped"], 0);
    assert_eq!(json["unverified"], 0);
}

#[tokio::test]
async fn dispatch_skips_existing_outputs() {
    let (h, addr) = TestHarness::with_server().await;

    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&h.mock)
        .await;
    Mock::given(method("POST"))
        .and(path(INVOCATIONS))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&h.mock)
        .await;

    let resp = reqwest::Client::new()
        .post(format!("http://{addr}/jobs"))
        .json(&json!({ "ranges": [{ "key": "test-cases/", "start": 7, "end": 13 }] }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["invoked"], 0);
    assert_eq!(json["skipped"], 4);
}

#[tokio::test]
async fn dispatch_reports_worker_failures() {
    let (h, addr) = TestHarness::with_server().await;

    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&h.mock)
        .await;
    Mock::given(method("POST"))
        .and(path(INVOCATIONS))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-function-error", "Unhandled")
                .set_body_json(json!({ "errorMessage": "ffmpeg exited with 1" })),
        )
        .mount(&h.mock)
        .await;

    let resp = reqwest::Client::new()
        .post(format!("http://{addr}/jobs"))
        .json(&json!({ "ranges": [{ "key": "test-cases/", "start": 7, "end": 13 }] }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 502);

    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["code"], "dispatch_failed");
    let failures = json["failures"].as_array().unwrap();
    assert_eq!(failures.len(), 4);
    assert!(failures[0]["error"]
        .as_str()
        .unwrap()
        .contains("ffmpeg exited with 1"));
    assert!(json["error"].as_str().unwrap().starts_with("4 job(s) failed"));
}

#[tokio::test]
async fn dispatch_without_ranges_is_rejected() {
    let (_h, addr) = TestHarness::with_server().await;

    let resp = reqwest::Client::new()
        .post(format!("http://{addr}/jobs"))
        .json(&json!({ "ranges": [] }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}
