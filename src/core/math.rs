// Math utilities and helper functions

use glam::Vec2;

/// Tolerance used when a countdown is compared against its floor
pub const TIMER_EPSILON: f32 = 1e-5;

/// Move `current` toward `target` by at most `max_delta`, never overshooting
pub fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    if (target - current).abs() <= max_delta {
        target
    } else {
        current + (target - current).signum() * max_delta
    }
}

/// Move a point toward `target` by at most `max_distance`.
///
/// Snaps exactly onto `target` once it is within reach, so arrival can be
/// checked with plain equality.
pub fn move_towards_vec2(current: Vec2, target: Vec2, max_distance: f32) -> Vec2 {
    let delta = target - current;
    let distance = delta.length();
    if distance <= max_distance || distance == 0.0 {
        target
    } else {
        current + delta / distance * max_distance
    }
}

/// Rotate `point` around `pivot` clockwise by `degrees`
pub fn rotate_clockwise_around(point: Vec2, pivot: Vec2, degrees: f32) -> Vec2 {
    let rotation = Vec2::from_angle(-degrees.to_radians());
    pivot + rotation.rotate(point - pivot)
}

/// Unit vector pointing at `degrees` counter-clockwise from +X
pub fn unit_from_degrees(degrees: f32) -> Vec2 {
    let radians = degrees.to_radians();
    Vec2::new(radians.cos(), radians.sin())
}

/// Linear interpolation
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
