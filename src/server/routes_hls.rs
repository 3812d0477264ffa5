//! Playlist routes.
//!
//! `GET /hls?range=<key>%23t%3D<start>%2C<end>&...` answers the master
//! playlist. Its variants point at `?type=media&range=...`, which the same
//! route answers with the combined media playlist.

use axum::{
    extract::{RawQuery, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use hlsclip_common::{PlaylistKind, RangeQuery};

use super::error::AppError;
use super::AppContext;

pub const PLAYLIST_CONTENT_TYPE: &str = "application/x-mpegurl";

pub fn hls_routes() -> Router<AppContext> {
    Router::new().route("/hls", get(playlist))
}

async fn playlist(
    State(ctx): State<AppContext>,
    RawQuery(query): RawQuery,
) -> Result<Response, AppError> {
    let query = RangeQuery::parse(query.as_deref().unwrap_or_default())?;

    let body = match query.kind {
        PlaylistKind::Master => ctx.service.master_playlist(&query.ranges).await?.render(),
        PlaylistKind::Media => ctx.service.media_playlist(&query.ranges).await?.render(),
    };

    tracing::debug!(kind = %query.kind, ranges = query.ranges.len(), "Serving playlist");

    Ok((
        [
            (header::CONTENT_TYPE, PLAYLIST_CONTENT_TYPE),
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
        ],
        body,
    )
        .into_response())
}
