//! Range lists carried in URL query strings.
//!
//! A master playlist never lists segments. Each of its variant entries points
//! back at the media endpoint with the full ordered range list encoded in the
//! query, and the media endpoint decodes the same list to build the playlist
//! lazily:
//!
//! ```text
//! ?type=media&range=<uri>%23t%3D10%2C28&range=<uri>%23t%3D12%2C38
//! ```

use std::fmt;
use url::form_urlencoded;

use crate::error::{Error, Result};
use crate::types::TimeRange;

/// Which playlist a request asks for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PlaylistKind {
    /// One entry per quality variant.
    #[default]
    Master,
    /// One entry per clipped segment.
    Media,
}

impl PlaylistKind {
    fn as_str(self) -> &'static str {
        match self {
            Self::Master => "master",
            Self::Media => "media",
        }
    }
}

impl fmt::Display for PlaylistKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PlaylistKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "master" => Ok(Self::Master),
            "media" => Ok(Self::Media),
            _ => Err(Error::invalid_input(format!("unknown playlist type: {s}"))),
        }
    }
}

/// Ordered ranges plus the requested playlist kind.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeQuery {
    pub kind: PlaylistKind,
    pub ranges: Vec<TimeRange>,
}

impl RangeQuery {
    /// Query for a media playlist over `ranges`.
    pub fn media(ranges: Vec<TimeRange>) -> Self {
        Self {
            kind: PlaylistKind::Media,
            ranges,
        }
    }

    /// Decode a raw query string (leading `?` optional).
    ///
    /// Range order is preserved; unknown parameters are ignored.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.strip_prefix('?').unwrap_or(raw);
        let mut kind = PlaylistKind::default();
        let mut ranges = Vec::new();

        for (name, value) in form_urlencoded::parse(raw.as_bytes()) {
            match name.as_ref() {
                "type" => kind = value.parse()?,
                "range" => ranges.push(TimeRange::parse_fragment(&value)?),
                _ => {}
            }
        }

        if ranges.is_empty() {
            return Err(Error::invalid_input("no ranges requested"));
        }

        Ok(Self { kind, ranges })
    }

    /// Encode as a query string starting with `?`.
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        serializer.append_pair("type", self.kind.as_str());
        for range in &self.ranges {
            serializer.append_pair("range", &range.to_fragment());
        }
        format!("?{}", serializer.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranges() -> Vec<TimeRange> {
        vec![
            TimeRange::new("https://cdn.example.com/a/270p/playlist.m3u8", 10.0, 28.0).unwrap(),
            TimeRange::new("https://cdn.example.com/a/270p/playlist.m3u8", 12.0, 38.0).unwrap(),
        ]
    }

    #[test]
    fn test_encode() {
        let query = RangeQuery::media(ranges()).to_query_string();
        assert_eq!(
            query,
            "?type=media\
             &range=https%3A%2F%2Fcdn.example.com%2Fa%2F270p%2Fplaylist.m3u8%23t%3D10%2C28\
             &range=https%3A%2F%2Fcdn.example.com%2Fa%2F270p%2Fplaylist.m3u8%23t%3D12%2C38"
        );
    }

    #[test]
    fn test_decode_preserves_order() {
        let mut reversed = ranges();
        reversed.reverse();
        let encoded = RangeQuery::media(reversed.clone()).to_query_string();
        let decoded = RangeQuery::parse(&encoded).unwrap();
        assert_eq!(decoded.kind, PlaylistKind::Media);
        assert_eq!(decoded.ranges, reversed);
    }

    #[test]
    fn test_default_kind_is_master() {
        let decoded = RangeQuery::parse("range=test-cases%2F%23t%3D0%2C4").unwrap();
        assert_eq!(decoded.kind, PlaylistKind::Master);
        assert_eq!(decoded.ranges[0].key, "test-cases/");
        assert_eq!(decoded.ranges[0].end, 4.0);
    }

    #[test]
    fn test_decode_errors() {
        assert!(matches!(
            RangeQuery::parse("type=media"),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            RangeQuery::parse("type=bogus&range=a%23t%3D0%2C1"),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            RangeQuery::parse("range=a%23t%3D5%2C1"),
            Err(Error::InvalidRange(_))
        ));
    }
}
