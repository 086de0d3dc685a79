// src/io/mod.rs
//! Input parsing and recording cache

pub mod cache;
pub mod loader;

pub use cache::RecordingCache;
pub use loader::parse_recording;
