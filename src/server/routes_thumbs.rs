use axum::{
    extract::{RawQuery, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use hlsclip_common::RangeQuery;

use super::error::AppError;
use super::AppContext;

pub fn thumbs_routes() -> Router<AppContext> {
    Router::new().route("/thumbs", get(combined_thumbs))
}

/// URLs of the combined thumbnail strips, one per range.
async fn combined_thumbs(
    State(ctx): State<AppContext>,
    RawQuery(query): RawQuery,
) -> Result<Response, AppError> {
    let query = RangeQuery::parse(query.as_deref().unwrap_or_default())?;
    let uris = ctx.service.thumbnail_uris(&query.ranges);

    Ok((
        [(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")],
        Json(uris),
    )
        .into_response())
}
