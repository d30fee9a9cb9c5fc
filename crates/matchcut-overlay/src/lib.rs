//! # matchcut-overlay
//!
//! Renders the scoreboard graphic composited onto every segment: a row of
//! rounded panels carrying team names, completed set scores, current games,
//! and current points, drawn onto a fully transparent canvas at the video's
//! resolution.
//!
//! Rendering is deterministic for identical inputs and fonts; which system
//! font gets picked up varies across hosts and is tolerated.

pub mod fonts;
pub mod layout;
pub mod renderer;

pub use layout::Layout;
pub use renderer::{Scoreline, ScoreboardRenderer};
