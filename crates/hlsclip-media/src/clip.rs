//! Clip planning.
//!
//! Maps a requested `[start, end)` window onto the fixed-duration segments of a
//! rendition. Segments lying fully inside the window are reused as they are;
//! the first and last ones are usually cut, and get a derived output name that
//! encodes the cut so the same sub-segment always maps to the same object.

use hlsclip_common::{format_offset, round4, uri, Error, Result, TimeRange};
use serde::Serialize;

use crate::hls::{MediaPlaylist, SegmentEntry};
use crate::template::SegmentTemplate;

/// Marker between a segment stem and its trim offsets.
pub const CLIP_MARKER: &str = "--clip--";

/// Most segments a single range may span.
pub const MAX_SEGMENTS_PER_RANGE: u64 = 100_000;

/// Segment offsets past this are rejected before any integer conversion.
const MAX_SEGMENT_OFFSET: f64 = 1e12;

/// One segment of a clipped playlist.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentDescriptor {
    /// Segment index as it appears in the segment name.
    pub index: u64,
    /// Absolute start of the native segment window.
    pub segment_start: f64,
    /// Absolute start of the kept part.
    pub clip_start: f64,
    /// Absolute end of the kept part.
    pub clip_end: f64,
    /// Trim start, relative to the segment.
    pub relative_start: f64,
    /// Trim end, relative to the segment.
    pub relative_end: f64,
    /// `relative_end - relative_start`, rounded.
    pub duration: f64,
    /// Whether the segment has to be physically cut.
    pub needs_clip: bool,
    /// Key of the native segment.
    pub source_uri: String,
    /// Key the playlist references: the cut segment, or the native one.
    pub output_uri: String,
}

/// Ordered segments covering one range, plus the header they inherit.
#[derive(Debug, Clone)]
pub struct ClippedPlaylist {
    pub range: TimeRange,
    pub header: MediaPlaylist,
    pub segments: Vec<SegmentDescriptor>,
}

impl ClippedPlaylist {
    /// Segments that need a transcode job.
    pub fn clips(&self) -> impl Iterator<Item = &SegmentDescriptor> {
        self.segments.iter().filter(|segment| segment.needs_clip)
    }

    /// Sum of segment durations.
    pub fn total_duration(&self) -> f64 {
        round4(self.segments.iter().map(|s| s.duration).sum())
    }

    /// Playable media playlist with every key put under `public_prefix`.
    pub fn to_media_playlist(&self, public_prefix: &str) -> MediaPlaylist {
        let mut playlist = self.header.header_only();
        playlist.segments = self
            .segments
            .iter()
            .map(|segment| {
                SegmentEntry::new(segment.duration, uri::prefixed(public_prefix, &segment.output_uri))
            })
            .collect();
        playlist
    }
}

/// Plan the segments covering `range` in a rendition described by `template`.
///
/// Bounds are resolved at 0.1 ms: both are rounded to 4 decimals first, the
/// same precision [`TimeRange::to_fragment`] writes. A range that collapses
/// under that rounding, or that spans more than [`MAX_SEGMENTS_PER_RANGE`]
/// segments, is rejected.
///
/// Segment keys are resolved against `range.key`. The index is not checked
/// against the real length of the rendition.
pub fn plan(range: &TimeRange, template: &SegmentTemplate) -> Result<ClippedPlaylist> {
    range.validate()?;

    let start = round4(range.start);
    let end = round4(range.end);
    if end <= start {
        return Err(Error::invalid_range(format!(
            "{range} is shorter than 0.0001s"
        )));
    }

    let duration = template.segment_duration;
    let (first_offset, last_offset) = segment_bounds(start, end, duration).ok_or_else(|| {
        Error::invalid_range(format!(
            "end {:e} of '{}' lies beyond the last addressable segment",
            range.end, range.key
        ))
    })?;
    let length = last_offset - first_offset;
    if length > MAX_SEGMENTS_PER_RANGE {
        return Err(Error::invalid_range(format!(
            "{range} spans {length} segments (at most {MAX_SEGMENTS_PER_RANGE})"
        )));
    }
    if template.base_index.checked_add(last_offset).is_none() {
        return Err(Error::invalid_range(format!(
            "{range} overflows the segment index"
        )));
    }

    let segments = (0..length)
        .map(|i| {
            let offset = first_offset + i;
            let segment_start = offset as f64 * duration;

            let mut relative_start = 0.0;
            let mut relative_end = duration;
            if i == 0 {
                relative_start = start - segment_start;
            }
            if i == length - 1 {
                relative_end = end - segment_start;
            }
            let relative_start = offset_of(relative_start);
            let relative_end = offset_of(relative_end);
            let needs_clip = relative_start != 0.0 || relative_end != round4(duration);

            let source_uri =
                uri::resolve(&range.key, &template.segment_uri(template.base_index + offset));
            let output_uri = clip_output_uri(&source_uri, relative_start, relative_end, needs_clip);

            SegmentDescriptor {
                index: template.base_index + offset,
                segment_start: round4(segment_start),
                clip_start: round4(segment_start + relative_start),
                clip_end: round4(segment_start + relative_end),
                relative_start,
                relative_end,
                duration: round4(relative_end - relative_start),
                needs_clip,
                source_uri,
                output_uri,
            }
        })
        .collect();

    Ok(ClippedPlaylist {
        range: range.clone(),
        header: template.header.header_only(),
        segments,
    })
}

/// Half-open offsets `[first, last)` of the segments `[start, end)` touches.
///
/// A segment the window only grazes by less than 0.1 ms is left out, so no
/// zero-length entry is planned at either edge.
fn segment_bounds(start: f64, end: f64, duration: f64) -> Option<(u64, u64)> {
    if end / duration > MAX_SEGMENT_OFFSET {
        return None;
    }

    let mut first = (start / duration).floor() as u64;
    if round4(start - (first + 1) as f64 * duration) >= 0.0 {
        first += 1;
    }

    let mut last = (end / duration).ceil() as u64;
    if last > first + 1 && round4(end - (last - 1) as f64 * duration) <= 0.0 {
        last -= 1;
    }

    Some((first, last.max(first + 1)))
}

/// Rounded offset, with `-0.0` collapsed to `0.0`.
fn offset_of(value: f64) -> f64 {
    round4(value) + 0.0
}

/// Output key of a segment cut to `[relative_start, relative_end)`.
///
/// Uncut segments keep their source key.
pub fn clip_output_uri(
    source_uri: &str,
    relative_start: f64,
    relative_end: f64,
    needs_clip: bool,
) -> String {
    if !needs_clip {
        return source_uri.to_string();
    }

    let name_start = source_uri.rfind('/').map(|pos| pos + 1).unwrap_or(0);
    let (dir, name) = source_uri.split_at(name_start);
    let (stem, extension) = uri::split_extension(name);

    format!(
        "{dir}{stem}{CLIP_MARKER}{}--{}{extension}",
        format_offset(relative_start),
        format_offset(relative_end)
    )
}
