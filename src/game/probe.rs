// Probe layer: shape-cast queries used for ground and wall contact

use glam::Vec2;

use super::surface::{SurfaceId, SurfaceTag};
use crate::engine::physics::CollisionGroups;

/// An axis-aligned box swept through the world
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeCast {
    /// Centre of the box at the start of the sweep
    pub origin: Vec2,
    /// Half-size of the box
    pub half_extents: Vec2,
    /// Unit sweep direction
    pub direction: Vec2,
    /// How far the box travels
    pub max_distance: f32,
    /// Collision group the query is allowed to hit
    pub groups: CollisionGroups,
}

impl ShapeCast {
    /// Create a box cast that only hits level geometry
    pub fn new(origin: Vec2, half_extents: Vec2, direction: Vec2, max_distance: f32) -> Self {
        Self {
            origin,
            half_extents,
            direction,
            max_distance,
            groups: CollisionGroups::Ground,
        }
    }
}

/// Nearest surface found by a shape cast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeHit {
    pub surface: SurfaceId,
    pub tag: SurfaceTag,
    /// Centre of the swept box at contact
    pub point: Vec2,
    /// Distance travelled along the sweep before contact
    pub distance: f32,
}

/// Read-only view of the collidable world.
///
/// A query that finds nothing returns `None` (or an empty list); misses are
/// never errors.
pub trait CollisionQuery {
    /// Nearest hit along the sweep
    fn cast_shape(&self, cast: &ShapeCast) -> Option<ProbeHit>;

    /// Every hit along the sweep, nearest first
    fn cast_shape_all(&self, cast: &ShapeCast) -> Vec<ProbeHit>;

    /// Whether the surface belongs to a moving platform that carries riders
    fn is_rideable(&self, surface: SurfaceId) -> bool;
}

/// Which side of the character a wall probe looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallSide {
    Left,
    Right,
}

impl WallSide {
    /// Sweep direction for this side
    pub fn direction(&self) -> Vec2 {
        match self {
            Self::Left => Vec2::NEG_X,
            Self::Right => Vec2::X,
        }
    }

    /// Cling direction sign (-1 left, +1 right)
    pub fn sign(&self) -> i8 {
        match self {
            Self::Left => -1,
            Self::Right => 1,
        }
    }
}

/// Probe box sizes, relative to a character centred on its origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeConfig {
    /// Half of the character's body size along either axis
    pub body_half_extent: f32,
    /// Full size of the box swept under the feet
    pub feet_size: Vec2,
    /// Full size of the boxes swept to either side
    pub hand_size: Vec2,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            body_half_extent: 0.5,
            feet_size: Vec2::new(0.9, 0.1),
            hand_size: Vec2::new(0.1, 0.8),
        }
    }
}

impl ProbeConfig {
    /// Cast used to find the surface under the feet
    pub fn ground_cast(&self, origin: Vec2) -> ShapeCast {
        ShapeCast::new(
            origin,
            self.feet_size / 2.0,
            Vec2::NEG_Y,
            self.body_half_extent + self.feet_size.y / 2.0,
        )
    }

    /// Cast used to find a wall on one side
    pub fn wall_cast(&self, origin: Vec2, side: WallSide) -> ShapeCast {
        ShapeCast::new(
            origin,
            self.hand_size / 2.0,
            side.direction(),
            self.body_half_extent + self.hand_size.x / 2.0,
        )
    }
}

/// Nearest surface under the character, whatever its tag
pub fn probe_ground<Q: CollisionQuery + ?Sized>(
    world: &Q,
    origin: Vec2,
    config: &ProbeConfig,
) -> Option<ProbeHit> {
    let hit = world.cast_shape(&config.ground_cast(origin));
    log::trace!("ground probe at {origin}: {hit:?}");
    hit
}

/// First clingable surface on one side.
///
/// Every hit along the sweep is considered, so a solid wall behind a
/// one-way platform edge still counts.
pub fn probe_wall<Q: CollisionQuery + ?Sized>(
    world: &Q,
    origin: Vec2,
    side: WallSide,
    config: &ProbeConfig,
) -> Option<ProbeHit> {
    let hit = world
        .cast_shape_all(&config.wall_cast(origin, side))
        .into_iter()
        .find(|hit| hit.tag.is_clingable());
    log::trace!("{side:?} wall probe at {origin}: {hit:?}");
    hit
}
