//! HLS playlist model.
//!
//! Parsing is delegated to `m3u8-rs`; rendering is done here so durations and
//! attribute order come out exactly as the clipping endpoints publish them.

mod parse;
mod playlist;

pub use parse::{parse_master, parse_media};
pub use playlist::{MasterPlaylist, MediaPlaylist, PlaylistType, SegmentEntry, StreamInfo};
