//! Segment naming templates.
//!
//! Canonical renditions are cut into fixed-duration segments whose names differ
//! only by a zero-padded index (`playlist_00001.ts`, `playlist_00002.ts`, ...).
//! A one-segment reference playlist is enough to recover that scheme, and with
//! it the name and timing of every other segment in the rendition.

use hlsclip_common::{Error, Result};
use std::collections::HashMap;
use tracing::warn;

use crate::hls::{parse_media, MediaPlaylist};

/// Naming scheme and timing of a fixed-duration segmented rendition.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentTemplate {
    /// Everything before the index digits, directory included.
    pub uri_prefix: String,
    /// Width of the zero-padded index.
    pub index_width: usize,
    /// Index of the reference segment.
    pub base_index: u64,
    /// Native duration of every segment, in seconds.
    pub segment_duration: f64,
    /// Everything after the index digits.
    pub uri_suffix: String,
    /// Header metadata carried over into clipped playlists.
    pub header: MediaPlaylist,
}

impl SegmentTemplate {
    /// Parse a reference media playlist and extract its template.
    pub fn parse(text: &str) -> Result<Self> {
        Self::from_playlist(&parse_media(text)?)
    }

    /// Extract the template from an already parsed reference playlist.
    pub fn from_playlist(playlist: &MediaPlaylist) -> Result<Self> {
        let first = playlist
            .segments
            .first()
            .ok_or_else(|| Error::malformed_template("reference playlist has no segments"))?;

        if playlist.segments.len() > 1 {
            warn!(
                segments = playlist.segments.len(),
                "Reference playlist has more than one segment, using the first"
            );
        }

        if !first.duration.is_finite() || first.duration <= 0.0 {
            return Err(Error::malformed_template(format!(
                "segment '{}' has non-positive duration {}",
                first.uri, first.duration
            )));
        }

        let (uri_prefix, digits, uri_suffix) = split_index(&first.uri)?;
        let base_index = digits.parse::<u64>().map_err(|_| {
            Error::malformed_template(format!("index '{digits}' in '{}' is too large", first.uri))
        })?;

        Ok(Self {
            uri_prefix: uri_prefix.to_string(),
            index_width: digits.len(),
            base_index,
            segment_duration: first.duration,
            uri_suffix: uri_suffix.to_string(),
            header: playlist.header_only(),
        })
    }

    /// URI (relative to the media playlist) of the segment at `index`.
    pub fn segment_uri(&self, index: u64) -> String {
        format!(
            "{}{:0width$}{}",
            self.uri_prefix,
            index,
            self.uri_suffix,
            width = self.index_width
        )
    }
}

/// Split a segment URI into prefix, index digits, and suffix.
///
/// Only the file name is searched, so digits in directory names
/// (`1080p/seg_001.ts`) stay in the prefix.
fn split_index(segment_uri: &str) -> Result<(&str, &str, &str)> {
    let name_start = segment_uri.rfind('/').map(|pos| pos + 1).unwrap_or(0);
    let name = &segment_uri[name_start..];
    let digits_start = name
        .find(|c: char| c.is_ascii_digit())
        .ok_or_else(|| {
            Error::malformed_template(format!("no index digits in segment name '{name}'"))
        })?;
    let digits_len = name[digits_start..]
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(name.len() - digits_start);

    let start = name_start + digits_start;
    let end = start + digits_len;
    Ok((
        &segment_uri[..start],
        &segment_uri[start..end],
        &segment_uri[end..],
    ))
}

/// Shared media template plus per-variant overrides.
#[derive(Debug, Clone)]
pub struct MediaTemplateSet {
    shared: SegmentTemplate,
    overrides: HashMap<String, SegmentTemplate>,
}

impl MediaTemplateSet {
    /// One template for every variant.
    pub fn shared(template: SegmentTemplate) -> Self {
        Self {
            shared: template,
            overrides: HashMap::new(),
        }
    }

    /// Use `template` for the variant called `variant`.
    pub fn with_override(mut self, variant: impl Into<String>, template: SegmentTemplate) -> Self {
        self.overrides.insert(variant.into(), template);
        self
    }

    /// Template for a variant, falling back to the shared one.
    pub fn for_variant(&self, variant: &str) -> &SegmentTemplate {
        self.overrides.get(variant).unwrap_or(&self.shared)
    }

    /// The template used when no override applies.
    pub fn default_template(&self) -> &SegmentTemplate {
        &self.shared
    }
}
