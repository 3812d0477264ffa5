//! Hlsclip - clip time ranges out of segmented HLS assets
//!
//! This library crate exposes the application layer for the binary and for
//! integration testing.

pub mod config;
pub mod dispatch;
pub mod jobs;
pub mod server;
pub mod service;
pub mod templates;
pub mod thumbs;
