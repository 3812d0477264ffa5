//! Conversion from `m3u8-rs` parse trees into the local playlist model.

use hlsclip_common::{round4, Error, Result};
use m3u8_rs::MediaPlaylistType;
use tracing::debug;

use super::playlist::{MasterPlaylist, MediaPlaylist, PlaylistType, SegmentEntry, StreamInfo};

/// Parse a media playlist.
pub fn parse_media(text: &str) -> Result<MediaPlaylist> {
    let parsed = m3u8_rs::parse_media_playlist_res(text.as_bytes())
        .map_err(|_| Error::malformed_template("content is not a valid media playlist"))?;

    let playlist_type = match parsed.playlist_type {
        Some(MediaPlaylistType::Vod) => Some(PlaylistType::Vod),
        Some(MediaPlaylistType::Event) => Some(PlaylistType::Event),
        Some(MediaPlaylistType::Other(other)) => {
            debug!(playlist_type = %other, "Ignoring unknown playlist type");
            None
        }
        None => None,
    };

    let init_uri = parsed
        .segments
        .iter()
        .find_map(|segment| segment.map.as_ref().map(|map| map.uri.clone()));

    let segments = parsed
        .segments
        .into_iter()
        .map(|segment| SegmentEntry {
            duration: round4(f64::from(segment.duration)),
            uri: segment.uri,
            title: segment.title.filter(|title| !title.is_empty()),
            discontinuity: segment.discontinuity,
        })
        .collect();

    Ok(MediaPlaylist {
        version: parsed.version,
        target_duration: parsed.target_duration,
        media_sequence: parsed.media_sequence,
        playlist_type,
        independent_segments: parsed.independent_segments,
        init_uri,
        segments,
        ended: parsed.end_list,
    })
}

/// Parse a master playlist.
///
/// I-frame variants are skipped. Alternative renditions (`#EXT-X-MEDIA`) and
/// the group references pointing at them are dropped: clipped variants are
/// served as muxed media playlists only.
pub fn parse_master(text: &str) -> Result<MasterPlaylist> {
    let parsed = m3u8_rs::parse_master_playlist_res(text.as_bytes())
        .map_err(|_| Error::malformed_template("content is not a valid master playlist"))?;

    if !parsed.alternatives.is_empty() {
        debug!(
            alternatives = parsed.alternatives.len(),
            "Dropping alternative renditions from master template"
        );
    }

    let streams = parsed
        .variants
        .into_iter()
        .filter(|variant| !variant.is_i_frame)
        .map(|variant| StreamInfo {
            uri: variant.uri,
            bandwidth: variant.bandwidth,
            average_bandwidth: variant.average_bandwidth,
            codecs: variant.codecs,
            resolution: variant.resolution.map(|r| (r.width, r.height)),
            frame_rate: variant.frame_rate,
        })
        .collect::<Vec<_>>();

    if streams.is_empty() {
        return Err(Error::malformed_template("master playlist lists no variants"));
    }

    Ok(MasterPlaylist {
        version: parsed.version,
        independent_segments: parsed.independent_segments,
        streams,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn test_parse_media() {
        let playlist = parse_media(MEDIA).unwrap();
        assert_eq!(playlist.version, Some(3));
        assert_eq!(playlist.target_duration, 8);
        assert_eq!(playlist.media_sequence, 1);
        assert_eq!(playlist.playlist_type, Some(PlaylistType::Vod));
        assert!(playlist.ended);
        assert_eq!(playlist.segments.len(), 1);
        assert_eq!(playlist.segments[0].duration, 6.0);
        assert_eq!(playlist.segments[0].uri, "playlist_00001.ts");
    }

    #[test]
    fn test_parse_media_renders_back() {
        let playlist = parse_media(MEDIA).unwrap();
        assert_eq!(playlist.render(), MEDIA.replace("6.000,", "6.0000,"));
    }

    #[test]
    fn test_parse_master() {
        let master = parse_master(MASTER).unwrap();
        assert_eq!(master.streams.len(), 2);

        let low = &master.streams[0];
        assert_eq!(low.uri, "playlist/270p_400k/playlist.m3u8");
        assert_eq!(low.bandwidth, 590320);
        assert_eq!(low.average_bandwidth, Some(590320));
        assert_eq!(low.resolution, Some((480, 270)));
        assert_eq!(low.frame_rate, Some(25.0));
        assert_eq!(low.variant_name(), "270p_400k");

        assert_eq!(master.render(), MASTER);
    }

    #[test]
    fn test_parse_master_drops_audio_groups() {
        let text = "#EXTM3U
#EXT-X-VERSION:3
#EXT-X-MEDIA:TYPE=AUDIO,GROUP-ID=\"aac\",NAME=\"English\",DEFAULT=YES,URI=\"audio/en.m3u8\"
#EXT-X-STREAM-INF:BANDWIDTH=590320,RESOLUTION=480x270,AUDIO=\"aac\"
playlist/270p_400k/playlist.m3u8
";
        let master = parse_master(text).unwrap();
        assert_eq!(master.streams.len(), 1);

        let rendered = master.render();
        assert!(!rendered.contains("AUDIO="));
        assert!(!rendered.contains("#EXT-X-MEDIA"));
        assert!(rendered.contains("BANDWIDTH=590320,RESOLUTION=480x270\nplaylist/270p_400k/playlist.m3u8\n"));
    }

    #[test]
    fn test_parse_garbage() {
        assert!(matches!(
            parse_media("not a playlist"),
            Err(Error::MalformedTemplate(_))
        ));
        assert!(matches!(
            parse_master("not a playlist"),
            Err(Error::MalformedTemplate(_))
        ));
    }
}
