// Ground/wall classification derived from probe hits each tick

use glam::Vec2;

use super::probe::{probe_ground, probe_wall, CollisionQuery, ProbeConfig, WallSide};
use super::surface::{SurfaceId, SurfaceTag};

/// Discrete contact state for one character, recomputed every tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContactState {
    /// Tag of the surface under the feet (`None` when airborne or untagged)
    pub ground_type: SurfaceTag,
    /// Identity of the surface under the feet, if any
    pub ground_surface: Option<SurfaceId>,
    /// A clingable wall is within reach on the left
    pub left_wall: bool,
    /// A clingable wall is within reach on the right
    pub right_wall: bool,
}

impl ContactState {
    /// Run every probe and classify the results
    pub fn classify<Q: CollisionQuery + ?Sized>(
        world: &Q,
        origin: Vec2,
        config: &ProbeConfig,
    ) -> Self {
        let ground = probe_ground(world, origin, config);
        Self {
            ground_type: ground.map(|hit| hit.tag).unwrap_or_default(),
            ground_surface: ground.map(|hit| hit.surface),
            left_wall: probe_wall(world, origin, WallSide::Left, config).is_some(),
            right_wall: probe_wall(world, origin, WallSide::Right, config).is_some(),
        }
    }

    /// Something is under the feet, whatever its tag
    pub fn is_grounded(&self) -> bool {
        self.ground_surface.is_some()
    }

    /// Any clingable wall is within reach
    pub fn touches_wall(&self) -> bool {
        self.left_wall || self.right_wall
    }

    /// Wall side the horizontal input is pushing into: -1, 0 or +1
    pub fn wall_direction(&self, horizontal: f32, threshold: f32) -> i8 {
        [(WallSide::Left, self.left_wall), (WallSide::Right, self.right_wall)]
            .into_iter()
            .filter(|(side, touching)| *touching && horizontal * f32::from(side.sign()) > threshold)
            .map(|(side, _)| side.sign())
            .sum()
    }

    /// The one-way surface being stood on, if any
    pub fn one_way_ground(&self) -> Option<SurfaceId> {
        if self.ground_type.is_one_way() {
            self.ground_surface
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::testing::{ScriptedBody, Slab};

    #[test]
    fn test_airborne_state_is_empty() {
        let world = ScriptedBody::at(Vec2::new(0.0, 20.0));
        let contact = ContactState::classify(&world, world.position, &ProbeConfig::default());
        assert_eq!(contact, ContactState::default());
        assert!(!contact.is_grounded());
        assert!(!contact.touches_wall());
    }

    #[test]
    fn test_untagged_ground_still_counts_as_grounded() {
        let mut world = ScriptedBody::at(Vec2::new(0.0, 0.5));
        let floor = world.add_slab(Slab::floor(0.0, SurfaceTag::None));

        let contact = ContactState::classify(&world, world.position, &ProbeConfig::default());
        assert_eq!(contact.ground_type, SurfaceTag::None);
        assert_eq!(contact.ground_surface, Some(floor));
        assert!(contact.is_grounded());
        assert_eq!(contact.one_way_ground(), None);
    }

    #[test]
    fn test_walls_on_both_sides() {
        let mut world = ScriptedBody::at(Vec2::new(0.0, 5.0));
        world.add_slab(Slab::wall(0.5, SurfaceTag::Full));
        world.add_slab(Slab::wall_left_of(-0.5, SurfaceTag::Full));

        let contact = ContactState::classify(&world, world.position, &ProbeConfig::default());
        assert!(contact.left_wall);
        assert!(contact.right_wall);
        assert_eq!(contact.wall_direction(-1.0, 0.0), -1);
        assert_eq!(contact.wall_direction(1.0, 0.0), 1);
        assert_eq!(contact.wall_direction(0.0, 0.0), 0);
    }

    #[test]
    fn test_half_ground_is_one_way() {
        let mut world = ScriptedBody::at(Vec2::new(0.0, 0.5));
        let ledge = world.add_slab(Slab::floor(0.0, SurfaceTag::Half));

        let contact = ContactState::classify(&world, world.position, &ProbeConfig::default());
        assert_eq!(contact.one_way_ground(), Some(ledge));
    }
}
