// Per-tick input snapshot consumed by the character controller

use glam::Vec2;

/// Everything a controller reads from input on one tick
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InputFrame {
    /// Horizontal and vertical axes, each in [-1, 1]
    pub axis: Vec2,
    /// Jump went down this tick
    pub jump_pressed: bool,
    /// Primary action is held
    pub primary_held: bool,
    /// Dash went down this tick
    pub dash_pressed: bool,
    /// Direction to aim dashes in (need not be normalized)
    pub aim: Vec2,
}

impl InputFrame {
    /// Frame with only the movement axes set
    pub fn axis(x: f32, y: f32) -> Self {
        Self {
            axis: Vec2::new(x.clamp(-1.0, 1.0), y.clamp(-1.0, 1.0)),
            ..Self::default()
        }
    }
}
