//! Transcode job derivation.

use hlsclip_common::{uri, Result, TimeRange};
use hlsclip_media::{plan, MasterPlaylist, MediaTemplateSet, SegmentDescriptor};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

use super::options::VariantOptions;

/// Work order for one trimmed segment, sent to the worker as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscodeJob {
    pub input_uri: String,
    pub output_uri: String,
    pub relative_start: f64,
    pub relative_end: f64,
    pub output_options: Vec<String>,
}

/// Cross-multiplies ranges and variants into transcode jobs.
#[derive(Debug, Clone)]
pub struct JobDeriver {
    options: VariantOptions,
    best_quality: String,
    storage_prefix: String,
}

impl JobDeriver {
    pub fn new(
        options: VariantOptions,
        best_quality: impl Into<String>,
        storage_prefix: impl Into<String>,
    ) -> Self {
        Self {
            options,
            best_quality: best_quality.into(),
            storage_prefix: storage_prefix.into(),
        }
    }

    /// Jobs for every segment that has to be cut, range-major then variant
    /// order. A job whose output was already produced earlier in the list is
    /// dropped.
    pub fn derive_jobs(
        &self,
        ranges: &[TimeRange],
        master: &MasterPlaylist,
        templates: &MediaTemplateSet,
    ) -> Result<Vec<TranscodeJob>> {
        for stream in &master.streams {
            self.options.get(stream.variant_name())?;
        }

        let mut seen = HashSet::new();
        let mut jobs = Vec::new();

        for range in ranges {
            range.validate()?;

            for stream in &master.streams {
                let variant = stream.variant_name();
                let options = self.options.get(variant)?;
                let variant_range = range.with_key(uri::resolve(&range.key, &stream.uri));
                let planned = plan(&variant_range, templates.for_variant(variant))?;

                for segment in planned.clips() {
                    let job = self.job_for(segment, options.tokens());
                    if seen.insert(job.output_uri.clone()) {
                        jobs.push(job);
                    } else {
                        debug!(output = %job.output_uri, "Dropping duplicate job");
                    }
                }
            }
        }

        debug!(
            ranges = ranges.len(),
            variants = master.streams.len(),
            jobs = jobs.len(),
            "Derived transcode jobs"
        );

        Ok(jobs)
    }

    fn job_for(&self, segment: &SegmentDescriptor, options: &[String]) -> TranscodeJob {
        TranscodeJob {
            input_uri: uri::prefixed(&self.storage_prefix, &self.best_quality_input(&segment.source_uri)),
            output_uri: uri::prefixed(&self.storage_prefix, &segment.output_uri),
            relative_start: segment.relative_start,
            relative_end: segment.relative_end,
            output_options: options.to_vec(),
        }
    }

    /// The same segment, taken from the best-quality rendition.
    fn best_quality_input(&self, source_uri: &str) -> String {
        let directory = uri::resolve(source_uri, &self.best_quality);
        format!(
            "{}/{}",
            directory.trim_end_matches('/'),
            uri::file_name(source_uri)
        )
    }
}
