//! Transcode work orders.
//!
//! Every clipped segment that does not line up with a native segment boundary
//! has to be produced by the worker. The deriver expands requested ranges
//! across all quality variants and turns those segments into [`TranscodeJob`]s
//! carrying the variant's encoder options.

mod deriver;
mod options;

pub use deriver::{JobDeriver, TranscodeJob};
pub use options::{EncoderOptions, VariantOptions};
