// Input handling system
//
// Device bindings live outside this crate; callers translate their events
// into `Action` presses and releases.
//
// - `action`: game actions
// - `player`: per-player pressed/edge tracking and aim
// - `frame`: the per-tick snapshot handed to a character controller
//
// ## Usage Example
//
// ```rust
// use traversal_core::engine::input::{Action, PlayerInput};
// use glam::Vec2;
//
// let mut input = PlayerInput::new(0);
// input.press(Action::Jump);
// input.set_aim_point(Vec2::new(4.0, 2.0));
//
// let frame = input.frame(Vec2::ZERO);
// assert!(frame.jump_pressed);
//
// // After the tick has consumed the frame
// input.update();
// ```

pub mod action;
pub mod frame;
pub mod player;

// Re-export commonly used types
pub use action::Action;
pub use frame::InputFrame;
pub use player::PlayerInput;
