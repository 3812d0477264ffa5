//! Hlsclip-Media: HLS playlists, segment templates, and clip planning
//!
//! This crate holds the pure, synchronous core of hlsclip. Nothing here does
//! I/O; templates arrive as text and playlists leave as text.
//!
//! # Modules
//!
//! - `hls` - Playlist model, rendering, and parsing through `m3u8-rs`
//! - `template` - Segment naming schemes recovered from reference playlists
//! - `clip` - Mapping of time ranges onto segments, with trim offsets
//! - `combine` - Multi-range media playlists and range-encoding master playlists
//!
//! # Example
//!
//! ```
//! use hlsclip_common::TimeRange;
//! use hlsclip_media::{clip, SegmentTemplate};
//!
//! let template = SegmentTemplate::parse(
//!     "#EXTM3U\n#EXT-X-TARGETDURATION:8\n#EXTINF:6.000,\nseg_00001.ts\n#EXT-X-ENDLIST\n",
//! )
//! .unwrap();
//! let range = TimeRange::new("video/", 7.0, 13.0).unwrap();
//! let planned = clip::plan(&range, &template).unwrap();
//!
//! assert_eq!(planned.segments[0].output_uri, "video/seg_00002--clip--1--6.ts");
//! ```

pub mod clip;
pub mod combine;
pub mod hls;
pub mod template;

pub use clip::{plan, ClippedPlaylist, SegmentDescriptor, MAX_SEGMENTS_PER_RANGE};
pub use combine::{combine_master, combine_media};
pub use hls::{MasterPlaylist, MediaPlaylist, StreamInfo};
pub use template::{MediaTemplateSet, SegmentTemplate};
