// Per-player input state management

use super::action::Action;
use super::frame::InputFrame;
use glam::Vec2;
use std::collections::HashSet;

/// Represents the input state for a single player
#[derive(Debug)]
pub struct PlayerInput {
    /// Player ID
    player_id: usize,

    /// Actions that are currently pressed this tick
    pressed: HashSet<Action>,

    /// Actions that were just pressed this tick (press events)
    just_pressed: HashSet<Action>,

    /// Actions that were just released this tick (release events)
    just_released: HashSet<Action>,

    /// Actions that were pressed in the previous tick
    previous_pressed: HashSet<Action>,

    /// World-space point the player is aiming at
    aim_point: Option<Vec2>,
}

impl PlayerInput {
    /// Create a new player input state
    pub fn new(player_id: usize) -> Self {
        Self {
            player_id,
            pressed: HashSet::new(),
            just_pressed: HashSet::new(),
            just_released: HashSet::new(),
            previous_pressed: HashSet::new(),
            aim_point: None,
        }
    }

    /// Get the player ID
    pub fn player_id(&self) -> usize {
        self.player_id
    }

    /// Check if an action is currently pressed
    pub fn is_pressed(&self, action: Action) -> bool {
        self.pressed.contains(&action)
    }

    /// Check if an action was just pressed this tick
    pub fn just_pressed(&self, action: Action) -> bool {
        self.just_pressed.contains(&action)
    }

    /// Check if an action was just released this tick
    pub fn just_released(&self, action: Action) -> bool {
        self.just_released.contains(&action)
    }

    /// Check if an action is held (pressed for multiple ticks)
    pub fn is_held(&self, action: Action) -> bool {
        self.pressed.contains(&action) && self.previous_pressed.contains(&action)
    }

    /// Register an action press
    pub fn press(&mut self, action: Action) {
        if self.pressed.insert(action) {
            self.just_pressed.insert(action);
        }
    }

    /// Register an action release
    pub fn release(&mut self, action: Action) {
        if self.pressed.remove(&action) {
            self.just_released.insert(action);
        }
    }

    /// Set the world-space aim point (e.g. the cursor projected into the world)
    pub fn set_aim_point(&mut self, point: Vec2) {
        self.aim_point = Some(point);
    }

    pub fn clear_aim_point(&mut self) {
        self.aim_point = None;
    }

    /// Update input state for a new tick
    /// Call this once per tick after the frame has been consumed
    pub fn update(&mut self) {
        // Clear tick-specific state
        self.just_pressed.clear();
        self.just_released.clear();

        // Save current pressed state for next tick
        self.previous_pressed = self.pressed.clone();
    }

    /// Reset all input state
    pub fn reset(&mut self) {
        self.pressed.clear();
        self.just_pressed.clear();
        self.just_released.clear();
        self.previous_pressed.clear();
        self.aim_point = None;
    }

    /// Get directional input (-1.0 to 1.0 per axis)
    /// Returns (horizontal, vertical)
    pub fn get_direction(&self) -> (f32, f32) {
        let mut horizontal = 0.0;
        let mut vertical = 0.0;

        if self.is_pressed(Action::MoveLeft) {
            horizontal -= 1.0;
        }
        if self.is_pressed(Action::MoveRight) {
            horizontal += 1.0;
        }
        if self.is_pressed(Action::Down) {
            vertical -= 1.0;
        }
        if self.is_pressed(Action::Up) {
            vertical += 1.0;
        }

        (horizontal, vertical)
    }

    /// Build the controller snapshot for a character centred at `origin`.
    ///
    /// Without an aim point, dashes aim along the movement axes.
    pub fn frame(&self, origin: Vec2) -> InputFrame {
        let (horizontal, vertical) = self.get_direction();
        let movement = InputFrame::axis(horizontal, vertical);
        let aim = match self.aim_point {
            Some(point) => point - origin,
            None => movement.axis,
        };

        InputFrame {
            jump_pressed: self.just_pressed(Action::Jump),
            primary_held: self.is_pressed(Action::Fire),
            dash_pressed: self.just_pressed(Action::Dash),
            aim,
            ..movement
        }
    }
}
