//! Combined thumbnail strips.
//!
//! Assets carry one thumbnail every `duration_secs`. A clip gets a single strip
//! combining the thumbnails it covers, stored next to the asset under a name
//! derived from the clip bounds.

use hlsclip_common::{format_offset, uri, TimeRange};
use serde::{Deserialize, Serialize};

use crate::config::ThumbnailConfig;

/// Work order for one combined strip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThumbnailJob {
    pub input: String,
    pub output: String,
    pub from_index: u64,
    pub to_index: u64,
}

/// Key of the combined strip for `range`.
pub fn combined_key(range: &TimeRange, config: &ThumbnailConfig) -> String {
    let name = format!(
        "{}--combine--{}--{}.jpg",
        config.combined_prefix,
        format_offset(range.start),
        format_offset(range.end)
    );
    uri::resolve(&range.key, &name)
}

/// Playback URLs of the combined strips, one per range.
pub fn combined_uris(ranges: &[TimeRange], config: &ThumbnailConfig, public_prefix: &str) -> Vec<String> {
    ranges
        .iter()
        .map(|range| uri::prefixed(public_prefix, &combined_key(range, config)))
        .collect()
}

/// Strip jobs, one per range.
pub fn thumbnail_jobs(
    ranges: &[TimeRange],
    config: &ThumbnailConfig,
    storage_prefix: &str,
) -> Vec<ThumbnailJob> {
    ranges
        .iter()
        .map(|range| ThumbnailJob {
            input: uri::prefixed(storage_prefix, &uri::resolve(&range.key, &config.template)),
            output: uri::prefixed(storage_prefix, &combined_key(range, config)),
            from_index: (range.start / config.duration_secs).ceil() as u64,
            to_index: (range.end / config.duration_secs).ceil() as u64,
        })
        .collect()
}
