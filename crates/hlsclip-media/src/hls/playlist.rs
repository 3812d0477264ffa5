//! HLS playlist structures.

use hlsclip_common::uri;
use std::fmt;

/// Media playlist for a single rendition.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaPlaylist {
    /// `#EXT-X-VERSION`, omitted when absent.
    pub version: Option<usize>,
    /// Target duration in seconds.
    pub target_duration: u64,
    /// Media sequence number.
    pub media_sequence: u64,
    /// Playlist type (VOD or EVENT).
    pub playlist_type: Option<PlaylistType>,
    /// Whether `#EXT-X-INDEPENDENT-SEGMENTS` is present.
    pub independent_segments: bool,
    /// Init segment URI.
    pub init_uri: Option<String>,
    /// Segment entries.
    pub segments: Vec<SegmentEntry>,
    /// Whether this is an ended playlist.
    pub ended: bool,
}

impl MediaPlaylist {
    /// Same header, no segments.
    pub fn header_only(&self) -> Self {
        Self {
            segments: Vec::new(),
            ..self.clone()
        }
    }

    /// Sum of all segment durations.
    pub fn total_duration(&self) -> f64 {
        self.segments.iter().map(|s| s.duration).sum()
    }

    /// Render to M3U8 string.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for MediaPlaylist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "#EXTM3U")?;
        if let Some(version) = self.version {
            writeln!(f, "#EXT-X-VERSION:{version}")?;
        }
        writeln!(f, "#EXT-X-TARGETDURATION:{}", self.target_duration)?;
        writeln!(f, "#EXT-X-MEDIA-SEQUENCE:{}", self.media_sequence)?;

        match self.playlist_type {
            Some(PlaylistType::Vod) => writeln!(f, "#EXT-X-PLAYLIST-TYPE:VOD")?,
            Some(PlaylistType::Event) => writeln!(f, "#EXT-X-PLAYLIST-TYPE:EVENT")?,
            None => {}
        }

        if self.independent_segments {
            writeln!(f, "#EXT-X-INDEPENDENT-SEGMENTS")?;
        }

        if let Some(ref init_uri) = self.init_uri {
            writeln!(f, "#EXT-X-MAP:URI=\"{init_uri}\"")?;
        }

        for segment in &self.segments {
            if segment.discontinuity {
                writeln!(f, "#EXT-X-DISCONTINUITY")?;
            }
            match segment.title {
                Some(ref title) => writeln!(f, "#EXTINF:{:.4},{}", segment.duration, title)?,
                None => writeln!(f, "#EXTINF:{:.4},", segment.duration)?,
            }
            writeln!(f, "{}", segment.uri)?;
        }

        if self.ended {
            writeln!(f, "#EXT-X-ENDLIST")?;
        }

        Ok(())
    }
}

/// Playlist type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaylistType {
    Vod,
    Event,
}

/// A segment entry in the playlist.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentEntry {
    /// Duration in seconds.
    pub duration: f64,
    /// Segment URI.
    pub uri: String,
    /// Optional title.
    pub title: Option<String>,
    /// Discontinuity before this segment.
    pub discontinuity: bool,
}

impl SegmentEntry {
    pub fn new(duration: f64, uri: impl Into<String>) -> Self {
        Self {
            duration,
            uri: uri.into(),
            title: None,
            discontinuity: false,
        }
    }
}

/// Master playlist with multiple renditions.
#[derive(Debug, Clone, PartialEq)]
pub struct MasterPlaylist {
    /// `#EXT-X-VERSION`, omitted when absent.
    pub version: Option<usize>,
    /// Whether `#EXT-X-INDEPENDENT-SEGMENTS` is present.
    pub independent_segments: bool,
    /// Stream variants.
    pub streams: Vec<StreamInfo>,
}

impl MasterPlaylist {
    /// Render to M3U8 string.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for MasterPlaylist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "#EXTM3U")?;
        if let Some(version) = self.version {
            writeln!(f, "#EXT-X-VERSION:{version}")?;
        }
        if self.independent_segments {
            writeln!(f, "#EXT-X-INDEPENDENT-SEGMENTS")?;
        }

        for stream in &self.streams {
            write!(f, "#EXT-X-STREAM-INF:BANDWIDTH={}", stream.bandwidth)?;

            if let Some(average) = stream.average_bandwidth {
                write!(f, ",AVERAGE-BANDWIDTH={average}")?;
            }
            if let Some(ref codecs) = stream.codecs {
                write!(f, ",CODECS=\"{codecs}\"")?;
            }
            if let Some((width, height)) = stream.resolution {
                write!(f, ",RESOLUTION={width}x{height}")?;
            }
            if let Some(frame_rate) = stream.frame_rate {
                write!(f, ",FRAME-RATE={frame_rate:.3}")?;
            }

            writeln!(f)?;
            writeln!(f, "{}", stream.uri)?;
        }

        Ok(())
    }
}

/// Stream variant information.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamInfo {
    /// Media playlist URI, relative to the master.
    pub uri: String,
    /// Bandwidth in bits per second.
    pub bandwidth: u64,
    /// Average bandwidth in bits per second.
    pub average_bandwidth: Option<u64>,
    /// Codec string (e.g., "avc1.4d401f,mp4a.40.2").
    pub codecs: Option<String>,
    /// Video width and height.
    pub resolution: Option<(u64, u64)>,
    /// Frame rate.
    pub frame_rate: Option<f64>,
}

impl StreamInfo {
    /// Variant name: the directory holding the media playlist.
    ///
    /// `playlist/270p_400k/playlist.m3u8` is named `270p_400k`. A playlist at
    /// the root falls back to its file stem.
    pub fn variant_name(&self) -> &str {
        uri::parent_name(&self.uri)
            .unwrap_or_else(|| uri::split_extension(uri::file_name(&self.uri)).0)
    }

    /// Same variant pointing somewhere else.
    pub fn with_uri(&self, uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            ..self.clone()
        }
    }
}
