//! # matchcut-parse
//!
//! Read-only parsers for the two pipeline inputs: the editing-timeline XML
//! export ([`timeline`]) and the per-point score sheet ([`scores`]). Both
//! produce plain [`matchcut_core::model`] values in input order; pairing the
//! two lists is the orchestrator's job.

pub mod scores;
pub mod timeline;

pub use scores::parse_scores;
pub use timeline::parse_timeline;
