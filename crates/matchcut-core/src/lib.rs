//! # matchcut-core
//!
//! Shared foundation for the matchcut pipeline: the unified [`Error`] type,
//! application [`config`], the parsed data [`model`] (clips, score records,
//! encoder profiles), and the [`events`] emitted while a run progresses.

pub mod config;
pub mod error;
pub mod events;
pub mod model;

pub use error::{Error, Result};
pub use events::{null_progress, ProgressEvent, ProgressSink};
pub use model::{Clip, EncoderProfile, ScorePair, ScoreRecord, Segment};
