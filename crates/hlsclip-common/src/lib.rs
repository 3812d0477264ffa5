//! Hlsclip-Common: Shared types, constants, and utilities.
//!
//! This crate provides common functionality used across hlsclip:
//!
//! - **Time ranges**: [`TimeRange`] and the `key#t=start,end` fragment form
//! - **Rounding**: [`round4`] and [`format_offset`] for playlist-safe numbers
//! - **URI helpers**: relative reference resolution and prefixing
//! - **Range queries**: encoding and decoding of range lists carried in URLs
//! - **Error Handling**: Common error types and result aliases
//!
//! # Examples
//!
//! ```
//! use hlsclip_common::{uri, TimeRange};
//!
//! let range = TimeRange::parse_fragment("test-cases/#t=7,13").unwrap();
//! assert_eq!(range.start, 7.0);
//!
//! let variant = uri::resolve(&range.key, "playlist/270p/playlist.m3u8");
//! assert_eq!(variant, "test-cases/playlist/270p/playlist.m3u8");
//! ```

pub mod error;
pub mod query;
pub mod types;
pub mod uri;

pub use error::{Error, Result};
pub use query::{PlaylistKind, RangeQuery};
pub use types::*;
