// Character system
//
// This module contains everything related to controlled characters:
// - Per-tick controller (movement, jumps, wall cling, bullet dash)
// - Sub-state machines owned by the controller
// - Tunables and their validation
// - The rigid-body interface the controller drives

pub mod body;
pub mod config;
pub mod controller;
pub mod fall_through;
pub mod state;

// Re-export commonly used types
pub use body::CharacterBody;
pub use config::{ControllerConfig, DEFAULT_CONTROLLER};
pub use controller::CharacterController;
pub use fall_through::FallThroughTimers;
pub use state::{ClingPhase, ClingState, DashState, JumpBudget, Locomotion};

/// Controller tunables that cannot drive a character
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} must be finite")]
    NotFinite { field: &'static str },

    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f32 },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f32 },

    #[error("{field} must be within [{min}, {max}], got {value}")]
    OutOfRange {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },
}
