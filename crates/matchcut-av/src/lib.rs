//! # matchcut-av
//!
//! Everything that touches external audio/video tooling:
//!
//! - **Tool discovery** ([`ToolRegistry`]) -- find and cache paths to ffmpeg
//!   and ffprobe.
//! - **Command execution** ([`ToolCommand`]) -- async builder with timeout
//!   support for running external processes.
//! - **Encoder selection** ([`encoder::select_encoder`]) -- probe the host
//!   for hardware encoders and pick a profile, degrading to software.
//! - **Bitrate probing** ([`probe::source_bitrate_mbps`]) -- best-effort
//!   ffprobe query for the source stream bitrate.
//! - **Actions** ([`actions`]) -- per-segment overlay encode and final
//!   stream-copy concatenation.

pub mod actions;
pub mod command;
pub mod encoder;
pub mod probe;
pub mod tools;

pub use command::{ToolCommand, ToolOutput};
pub use encoder::select_encoder;
pub use tools::{ToolConfig, ToolInfo, ToolRegistry};
