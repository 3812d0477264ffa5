//! Job routes.
//!
//! `GET /jobs?range=...` lists the transcode jobs a set of ranges needs;
//! `POST /jobs` derives the same jobs and runs them on the worker.

use axum::{
    extract::{RawQuery, State},
    routing::get,
    Json, Router,
};
use hlsclip_common::{RangeQuery, TimeRange};
use serde::{Deserialize, Serialize};

use super::error::AppError;
use super::AppContext;
use crate::dispatch::DispatchReport;
use crate::jobs::TranscodeJob;

pub fn jobs_routes() -> Router<AppContext> {
    Router::new().route("/jobs", get(list_jobs).post(dispatch_jobs))
}

#[derive(Debug, Deserialize)]
pub struct DispatchRequest {
    pub ranges: Vec<TimeRange>,
}

#[derive(Debug, Serialize)]
pub struct DispatchResponse {
    pub jobs: usize,
    #[serde(flatten)]
    pub report: DispatchReport,
}

async fn list_jobs(
    State(ctx): State<AppContext>,
    RawQuery(query): RawQuery,
) -> Result<Json<Vec<TranscodeJob>>, AppError> {
    let query = RangeQuery::parse(query.as_deref().unwrap_or_default())?;
    let jobs = ctx.service.jobs(&query.ranges).await?;
    Ok(Json(jobs))
}

async fn dispatch_jobs(
    State(ctx): State<AppContext>,
    Json(request): Json<DispatchRequest>,
) -> Result<Json<DispatchResponse>, AppError> {
    if request.ranges.is_empty() {
        return Err(hlsclip_common::Error::invalid_input("no ranges requested").into());
    }
    for range in &request.ranges {
        range.validate()?;
    }

    let jobs = ctx.service.jobs(&request.ranges).await?;
    tracing::info!(ranges = request.ranges.len(), jobs = jobs.len(), "Dispatching jobs");

    let report = ctx.service.dispatch(&jobs).await?;

    Ok(Json(DispatchResponse {
        jobs: jobs.len(),
        report,
    }))
}
