//! Recorder service HTTP client

pub mod client;
pub mod recorder;
