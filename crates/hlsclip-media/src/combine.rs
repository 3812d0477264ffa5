//! Multi-range playlist combination.

use hlsclip_common::{uri, Error, RangeQuery, Result, TimeRange};

use crate::clip::ClippedPlaylist;
use crate::hls::{MasterPlaylist, MediaPlaylist};

/// Concatenate clipped playlists in the order given.
///
/// The header comes from the first playlist, the target duration is the
/// largest of all inputs, and every later range starts with a discontinuity.
pub fn combine_media(playlists: &[ClippedPlaylist], public_prefix: &str) -> Result<MediaPlaylist> {
    let (first, rest) = playlists
        .split_first()
        .ok_or_else(|| Error::invalid_input("no clipped playlists to combine"))?;

    let mut combined = first.to_media_playlist(public_prefix);

    for playlist in rest {
        let mut media = playlist.to_media_playlist(public_prefix);
        if let Some(segment) = media.segments.first_mut() {
            segment.discontinuity = true;
        }
        combined.target_duration = combined.target_duration.max(media.target_duration);
        combined.segments.append(&mut media.segments);
    }

    Ok(combined)
}

/// Rewrite every variant of `master` into a reference to the media endpoint.
///
/// Each range key is resolved against the variant's media playlist URI and put
/// under `public_prefix`, so the media endpoint receives self-contained ranges.
pub fn combine_master(
    master: &MasterPlaylist,
    ranges: &[TimeRange],
    public_prefix: &str,
) -> Result<MasterPlaylist> {
    if ranges.is_empty() {
        return Err(Error::invalid_input("no ranges to combine"));
    }

    let streams = master
        .streams
        .iter()
        .map(|stream| {
            let resolved = ranges
                .iter()
                .map(|range| {
                    range.with_key(uri::prefixed(
                        public_prefix,
                        &uri::resolve(&range.key, &stream.uri),
                    ))
                })
                .collect();
            stream.with_uri(RangeQuery::media(resolved).to_query_string())
        })
        .collect();

    Ok(MasterPlaylist {
        streams,
        ..master.clone()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clip::plan;
    use crate::hls::parse_master;
    use crate::template::SegmentTemplate;
    use hlsclip_common::PlaylistKind;

    const MEDIA: &str = "#EXTM3U
#EXT-X-VERSION:3
#EXT-X-TARGETDURATION:8
#EXT-X-MEDIA-SEQUENCE:1
#EXT-X-PLAYLIST-TYPE:VOD
#EXTINF:6.000,
playlist_00001.ts
#EXT-X-ENDLIST
";

    const MASTER: &str = "#EXTM3U
#EXT-X-VERSION:3
#EXT-X-STREAM-INF:BANDWIDTH=590320,AVERAGE-BANDWIDTH=590320,CODECS=\"avc1.4d401f,mp4a.40.2\",RESOLUTION=480x270,FRAME-RATE=25.000
playlist/270p_400k/playlist.m3u8
#EXT-X-STREAM-INF:BANDWIDTH=3800419,AVERAGE-BANDWIDTH=3800419,CODECS=\"avc1.4d401f,mp4a.40.2\",RESOLUTION=960x540,FRAME-RATE=25.000
playlist/540p_3500k/playlist.m3u8
";

    const PREFIX: &str = "https://s3-eu-west-1.amazonaws.com/s10d-dev-tf1/";

    fn clipped(start: f64, end: f64) -> ClippedPlaylist {
        let template = SegmentTemplate::parse(MEDIA).unwrap();
        plan(&TimeRange::new("test-cases/", start, end).unwrap(), &template).unwrap()
    }

    #[test]
    fn test_combine_media_keeps_caller_order() {
        let combined = combine_media(&[clipped(20.0, 26.0), clipped(7.0, 13.0)], PREFIX).unwrap();

        let uris: Vec<&str> = combined.segments.iter().map(|s| s.uri.as_str()).collect();
        assert_eq!(
            uris,
            vec![
                format!("{PREFIX}test-cases/playlist_00004--clip--2--6.ts"),
                format!("{PREFIX}test-cases/playlist_00005--clip--0--2.ts"),
                format!("{PREFIX}test-cases/playlist_00002--clip--1--6.ts"),
                format!("{PREFIX}test-cases/playlist_00003--clip--0--1.ts"),
            ]
        );
        let breaks: Vec<bool> = combined.segments.iter().map(|s| s.discontinuity).collect();
        assert_eq!(breaks, vec![false, false, true, false]);
        assert_eq!(combined.total_duration(), 12.0);
    }

    #[test]
    fn test_combine_media_uses_largest_target_duration() {
        let mut longer = clipped(0.0, 6.0);
        longer.header.target_duration = 10;
        let combined = combine_media(&[clipped(0.0, 1.0), longer], PREFIX).unwrap();
        assert_eq!(combined.target_duration, 10);
        assert_eq!(combined.media_sequence, 1);
    }

    #[test]
    fn test_combine_media_rejects_empty() {
        assert!(combine_media(&[], PREFIX).is_err());
    }

    #[test]
    fn test_combine_master() {
        let master = parse_master(MASTER).unwrap();
        let ranges = vec![
            TimeRange::new("test-cases/", 10.0, 28.0).unwrap(),
            TimeRange::new("test-cases/", 12.0, 38.0).unwrap(),
        ];

        let combined = combine_master(&master, &ranges, PREFIX).unwrap();

        assert_eq!(combined.streams.len(), 2);
        assert_eq!(combined.streams[0].bandwidth, 590320);
        assert_eq!(
            combined.streams[0].uri,
            "?type=media\
             &range=https%3A%2F%2Fs3-eu-west-1.amazonaws.com%2Fs10d-dev-tf1%2Ftest-cases%2Fplaylist%2F270p_400k%2Fplaylist.m3u8%23t%3D10%2C28\
             &range=https%3A%2F%2Fs3-eu-west-1.amazonaws.com%2Fs10d-dev-tf1%2Ftest-cases%2Fplaylist%2F270p_400k%2Fplaylist.m3u8%23t%3D12%2C38"
        );

        let decoded = RangeQuery::parse(&combined.streams[1].uri).unwrap();
        assert_eq!(decoded.kind, PlaylistKind::Media);
        assert_eq!(decoded.ranges.len(), 2);
        assert_eq!(
            decoded.ranges[1].key,
            format!("{PREFIX}test-cases/playlist/540p_3500k/playlist.m3u8")
        );
        assert_eq!(decoded.ranges[1].start, 12.0);
        assert_eq!(decoded.ranges[1].end, 38.0);
    }

    #[test]
    fn test_master_reference_feeds_media_playlist() {
        let master = parse_master(MASTER).unwrap();
        let ranges = vec![TimeRange::new("test-cases/", 7.0, 13.0).unwrap()];
        let combined = combine_master(&master, &ranges, PREFIX).unwrap();

        let decoded = RangeQuery::parse(&combined.streams[0].uri).unwrap();
        let template = SegmentTemplate::parse(MEDIA).unwrap();
        let clipped: Vec<ClippedPlaylist> = decoded
            .ranges
            .iter()
            .map(|range| plan(range, &template).unwrap())
            .collect();
        let media = combine_media(&clipped, PREFIX).unwrap();

        assert_eq!(
            media.segments[0].uri,
            format!("{PREFIX}test-cases/playlist/270p_400k/playlist_00002--clip--1--6.ts")
        );
    }
}
