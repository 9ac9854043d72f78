// Moving platforms
//
// - `segment`: authored path segments (linear, circular, sequenced)
// - `mover`: per-platform playback with wait times and loop policies
// - `body`: the kinematic body interface the mover writes poses to

pub mod body;
pub mod mover;
pub mod segment;

pub use body::{PlatformBody, Pose};
pub use mover::{FinishAction, LoopPolicy, PlatformMover, PlaybackDirection};
pub use segment::{PathSegment, SegmentKind};

/// Authored path data that cannot be played back
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PathError {
    #[error("Platform path has no segments")]
    Empty,

    #[error("Segment {index}: speed must be positive and finite, got {speed}")]
    InvalidSpeed { index: usize, speed: f32 },

    #[error("Segment {index}: wait times must be non-negative, got {wait}")]
    NegativeWait { index: usize, wait: f32 },

    #[error("Segment {index}: circular radius must be positive, got {radius}")]
    InvalidRadius { index: usize, radius: f32 },

    #[error("Segment {index}: geometry is not finite")]
    NonFinite { index: usize },
}
