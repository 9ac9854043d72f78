// Kinematic body interface the platform mover drives

use glam::Vec2;

/// World-space placement of a platform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec2,
    /// Rotation in degrees, counter-clockwise
    pub rotation: f32,
    pub scale: Vec2,
}

impl Pose {
    /// Unrotated, unscaled pose at `position`
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            rotation: 0.0,
            scale: Vec2::ONE,
        }
    }

    /// Check every component against another pose within `epsilon`
    pub fn abs_diff_eq(&self, other: &Pose, epsilon: f32) -> bool {
        self.position.abs_diff_eq(other.position, epsilon)
            && (self.rotation - other.rotation).abs() <= epsilon
            && self.scale.abs_diff_eq(other.scale, epsilon)
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::at(Vec2::ZERO)
    }
}

/// The physics-side view of one moving platform
pub trait PlatformBody {
    /// Move the platform; riders parented to it move along
    fn set_pose(&mut self, pose: &Pose);

    /// Unparent every character riding this platform
    fn detach_riders(&mut self);

    /// Remove the platform from the world
    fn despawn(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pose_comparison_tolerates_rounding() {
        let a = Pose::at(Vec2::new(1.0, 2.0));
        let b = Pose::at(Vec2::new(1.0 + 1e-6, 2.0));
        assert!(a.abs_diff_eq(&b, 1e-4));

        let rotated = Pose {
            rotation: 90.0,
            ..a
        };
        assert!(!a.abs_diff_eq(&rotated, 1e-4));
    }
}
