//! Core type definitions for requested clips.
//!
//! A [`TimeRange`] names a sub-clip of a canonical asset by its source key and
//! a `[start, end)` window in seconds. Ranges travel either as JSON objects or
//! in the media-fragment form `key#t=start,end`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// Separator between a source key and its time fragment.
const TIME_FRAGMENT: &str = "#t=";

/// Round to 4 decimal places.
///
/// Every duration and offset that ends up in a playlist or a file name goes
/// through this so float noise (`1.0999999999999996`) never leaks out.
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Format an offset in its shortest decimal form after rounding.
///
/// `1.0` prints as `1`, `0.5` as `0.5`, and `-0.0` collapses to `0`.
pub fn format_offset(value: f64) -> String {
    let rounded = round4(value);
    if rounded == 0.0 {
        "0".to_string()
    } else {
        format!("{rounded}")
    }
}

/// A requested sub-clip of a canonical asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    /// Source key (or absolute URI) the asset's playlists are resolved against.
    #[serde(alias = "sourceKey", alias = "uri")]
    pub key: String,
    /// Start of the clip in seconds.
    pub start: f64,
    /// End of the clip in seconds (exclusive).
    pub end: f64,
}

impl TimeRange {
    /// Create a validated range.
    pub fn new(key: impl Into<String>, start: f64, end: f64) -> Result<Self> {
        let range = Self {
            key: key.into(),
            start,
            end,
        };
        range.validate()?;
        Ok(range)
    }

    /// Parse the `key#t=start,end` media-fragment form.
    pub fn parse_fragment(value: &str) -> Result<Self> {
        let (key, fragment) = value.split_once(TIME_FRAGMENT).ok_or_else(|| {
            Error::invalid_range(format!("missing '{TIME_FRAGMENT}' fragment in '{value}'"))
        })?;

        let (start, end) = fragment.split_once(',').ok_or_else(|| {
            Error::invalid_range(format!("expected 'start,end' in fragment of '{value}'"))
        })?;

        let parse = |bound: &str| {
            bound.trim().parse::<f64>().map_err(|_| {
                Error::invalid_range(format!("'{bound}' is not a number in '{value}'"))
            })
        };

        Self::new(key, parse(start)?, parse(end)?)
    }

    /// Render as `key#t=start,end`.
    ///
    /// Bounds are written at 4 decimals, the precision clip planning resolves
    /// them at, so a finer range and its fragment plan the same segments.
    pub fn to_fragment(&self) -> String {
        format!(
            "{}{}{},{}",
            self.key,
            TIME_FRAGMENT,
            format_offset(self.start),
            format_offset(self.end)
        )
    }

    /// Check that the range is finite, non-negative, and non-empty.
    pub fn validate(&self) -> Result<()> {
        if !self.start.is_finite() || !self.end.is_finite() {
            return Err(Error::invalid_range(format!(
                "bounds must be finite (start {}, end {})",
                self.start, self.end
            )));
        }
        if self.start < 0.0 {
            return Err(Error::invalid_range(format!(
                "start ({}) must not be negative",
                self.start
            )));
        }
        if self.end <= self.start {
            return Err(Error::invalid_range(format!(
                "end ({}) must be greater than start ({})",
                self.end, self.start
            )));
        }
        Ok(())
    }

    /// Length of the range in seconds, rounded.
    pub fn duration(&self) -> f64 {
        round4(self.end - self.start)
    }

    /// Same window, different key.
    pub fn with_key(&self, key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            start: self.start,
            end: self.end,
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_fragment())
    }
}
