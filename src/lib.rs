// Fixed-step 2D character controller and moving-platform kinematics

pub mod core;
pub mod engine;
pub mod game;
