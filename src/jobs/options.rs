//! Per-variant encoder options.

use hlsclip_common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

/// Encoder flags for one variant, one flag with its value per token.
///
/// `-preset veryfast -b:v 400000` becomes `["-preset veryfast", "-b:v 400000"]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncoderOptions(Vec<String>);

impl EncoderOptions {
    /// Split an option string at every `" -"` boundary.
    ///
    /// The leading dash is re-attached to every token after the first; the
    /// first token keeps whatever it started with.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            return Self::default();
        }

        let tokens = raw
            .split(" -")
            .enumerate()
            .map(|(i, token)| {
                if i == 0 {
                    token.to_string()
                } else {
                    format!("-{token}")
                }
            })
            .collect();

        Self(tokens)
    }

    pub fn tokens(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromStr for EncoderOptions {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

/// Encoder options keyed by variant name.
#[derive(Debug, Clone, Default)]
pub struct VariantOptions {
    by_variant: HashMap<String, EncoderOptions>,
}

impl VariantOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the `[variants]` config table.
    pub fn from_config(variants: &BTreeMap<String, String>) -> Self {
        let by_variant = variants
            .iter()
            .map(|(name, raw)| (name.clone(), EncoderOptions::parse(raw)))
            .collect();
        Self { by_variant }
    }

    pub fn with(mut self, variant: impl Into<String>, raw: &str) -> Self {
        self.by_variant
            .insert(variant.into(), EncoderOptions::parse(raw));
        self
    }

    /// Options for `variant`, or `MissingVariantOptions`.
    pub fn get(&self, variant: &str) -> Result<&EncoderOptions> {
        self.by_variant
            .get(variant)
            .filter(|options| !options.is_empty())
            .ok_or_else(|| Error::missing_variant_options(variant))
    }

    pub fn len(&self) -> usize {
        self.by_variant.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_variant.is_empty()
    }
}
