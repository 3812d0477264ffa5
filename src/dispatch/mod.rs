//! Idempotent job dispatch.
//!
//! Each job is skipped when its output already exists and sent to the worker
//! otherwise. Jobs run concurrently up to a fixed bound; a failure never stops
//! the others, and all failures are reported together once every job settled.
//!
//! Two dispatches of the same output inside one process are serialized through
//! a ledger keyed by output URI, so the later one sees the earlier one's result
//! in its existence check. Across processes the guarantee is at-least-once.

mod store;
mod worker;

pub use store::{Existence, HttpObjectStore, ObjectStore};
pub use worker::{HttpWorker, Worker, FUNCTION_ERROR_HEADER};

use dashmap::DashMap;
use futures::future::join_all;
use hlsclip_common::{Error, Result};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{Mutex, Semaphore};
use tracing::{debug, info, warn};

use crate::jobs::TranscodeJob;

/// Counts of a fully successful dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DispatchReport {
    /// Jobs sent to the worker.
    pub invoked: usize,
    /// Jobs whose output already existed.
    pub skipped: usize,
    /// Invoked jobs whose existence check could not be completed.
    pub unverified: usize,
}

/// A job that failed, with the reason.
#[derive(Debug)]
pub struct JobFailure {
    pub output_uri: String,
    pub error: Error,
}

/// Every failure of one dispatch, in job order.
#[derive(Debug, thiserror::Error)]
#[error("{} job(s) failed{}", .failures.len(), first_failure(.failures))]
pub struct AggregateDispatchError {
    pub failures: Vec<JobFailure>,
    /// Jobs that went through, for context.
    pub report: DispatchReport,
}

fn first_failure(failures: &[JobFailure]) -> String {
    failures
        .first()
        .map(|first| format!("; first failure for {}: {}", first.output_uri, first.error))
        .unwrap_or_default()
}

enum Outcome {
    Skipped,
    Invoked { verified: bool },
}

/// Sends jobs to a [`Worker`], skipping outputs an [`ObjectStore`] already has.
pub struct Dispatcher {
    store: Arc<dyn ObjectStore>,
    worker: Arc<dyn Worker>,
    permits: Arc<Semaphore>,
    ledger: DashMap<String, Arc<Mutex<()>>>,
}

impl Dispatcher {
    pub fn new(store: Arc<dyn ObjectStore>, worker: Arc<dyn Worker>, concurrency: usize) -> Self {
        Self {
            store,
            worker,
            permits: Arc::new(Semaphore::new(concurrency.max(1))),
            ledger: DashMap::new(),
        }
    }

    /// Dispatch all jobs and wait for every one of them.
    pub async fn dispatch(
        &self,
        jobs: &[TranscodeJob],
    ) -> std::result::Result<DispatchReport, AggregateDispatchError> {
        let results = join_all(jobs.iter().map(|job| self.dispatch_one(job))).await;

        let mut report = DispatchReport::default();
        let mut failures = Vec::new();

        for (job, result) in jobs.iter().zip(results) {
            match result {
                Ok(Outcome::Skipped) => report.skipped += 1,
                Ok(Outcome::Invoked { verified }) => {
                    report.invoked += 1;
                    if !verified {
                        report.unverified += 1;
                    }
                }
                Err(error) => failures.push(JobFailure {
                    output_uri: job.output_uri.clone(),
                    error,
                }),
            }
        }

        info!(
            jobs = jobs.len(),
            invoked = report.invoked,
            skipped = report.skipped,
            unverified = report.unverified,
            failed = failures.len(),
            "Dispatch finished"
        );

        if failures.is_empty() {
            Ok(report)
        } else {
            Err(AggregateDispatchError { failures, report })
        }
    }

    async fn dispatch_one(&self, job: &TranscodeJob) -> Result<Outcome> {
        let slot = self
            .ledger
            .entry(job.output_uri.clone())
            .or_default()
            .clone();

        let outcome = {
            let _held = slot.lock().await;
            let _permit = self
                .permits
                .acquire()
                .await
                .map_err(|_| Error::internal("dispatcher is shut down"))?;
            self.execute(job).await
        };

        drop(slot);
        self.ledger
            .remove_if(&job.output_uri, |_, lock| Arc::strong_count(lock) == 1);

        outcome
    }

    async fn execute(&self, job: &TranscodeJob) -> Result<Outcome> {
        let verified = match self.store.exists(&job.output_uri).await {
            Existence::Present => {
                debug!(output = %job.output_uri, "Output exists, skipping");
                return Ok(Outcome::Skipped);
            }
            Existence::Absent => true,
            Existence::Unknown(reason) => {
                warn!(output = %job.output_uri, %reason, "Existence check failed, invoking anyway");
                false
            }
        };

        debug!(
            output = %job.output_uri,
            input = %job.input_uri,
            start = job.relative_start,
            end = job.relative_end,
            "Invoking worker"
        );
        self.worker.invoke(job).await?;

        Ok(Outcome::Invoked { verified })
    }

    /// Number of outputs currently being dispatched.
    pub fn in_flight(&self) -> usize {
        self.ledger.len()
    }
}
