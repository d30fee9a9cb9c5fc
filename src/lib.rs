//! Matchcut - scoreboard overlay automation for racket-sport match videos.
//!
//! The library surface is the [`pipeline`] module: it ties the parsers,
//! overlay renderer, and ffmpeg actions from the `matchcut-*` crates into
//! one run that turns a timeline export plus a score sheet into a single
//! overlaid video.

pub mod pipeline;

pub use pipeline::{format_duration, frames_to_seconds, Pipeline, RunSummary};
