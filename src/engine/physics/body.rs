use super::collision::CollisionGroups;
use rapier2d::prelude::*;

pub use rapier2d::prelude::{ColliderHandle, RigidBodyHandle};

/// Builder for creating rigid bodies with common configurations
pub struct BodyBuilder {
    body_type: RigidBodyType,
    position: Isometry<Real>,
    linvel: Vector<Real>,
    gravity_scale: Real,
    can_sleep: bool,
    ccd: bool,
    locked_axes: LockedAxes,
}

impl BodyBuilder {
    fn with_type(body_type: RigidBodyType, gravity_scale: Real, can_sleep: bool) -> Self {
        Self {
            body_type,
            position: Isometry::identity(),
            linvel: Vector::zeros(),
            gravity_scale,
            can_sleep,
            ccd: false,
            locked_axes: LockedAxes::empty(),
        }
    }

    /// Create a new dynamic body (affected by forces and collisions)
    pub fn new_dynamic() -> Self {
        Self::with_type(RigidBodyType::Dynamic, 1.0, true)
    }

    /// Create a new kinematic position-based body (moved by writing poses)
    pub fn new_kinematic_position_based() -> Self {
        Self::with_type(RigidBodyType::KinematicPositionBased, 0.0, false)
    }

    /// Create a new fixed (static) body (completely immovable)
    pub fn new_fixed() -> Self {
        Self::with_type(RigidBodyType::Fixed, 0.0, false)
    }

    /// Set the initial position of the body
    pub fn position(mut self, x: Real, y: Real) -> Self {
        self.position = Isometry::translation(x, y);
        self
    }

    /// Set the initial position and rotation (radians)
    pub fn position_rotation(mut self, x: Real, y: Real, angle: Real) -> Self {
        self.position = Isometry::new(vector![x, y], angle);
        self
    }

    /// Set the initial linear velocity
    pub fn linvel(mut self, x: Real, y: Real) -> Self {
        self.linvel = vector![x, y];
        self
    }

    /// Set the gravity scale (1.0 = normal gravity, 0.0 = no gravity)
    pub fn gravity_scale(mut self, scale: Real) -> Self {
        self.gravity_scale = scale;
        self
    }

    /// Set whether the body can sleep when inactive
    pub fn can_sleep(mut self, can_sleep: bool) -> Self {
        self.can_sleep = can_sleep;
        self
    }

    /// Enable continuous collision detection (dashes are fast)
    pub fn ccd(mut self, enabled: bool) -> Self {
        self.ccd = enabled;
        self
    }

    /// Lock rotation (characters never tip over)
    pub fn lock_rotation(mut self) -> Self {
        self.locked_axes = LockedAxes::ROTATION_LOCKED;
        self
    }

    /// Build the rigid body
    pub fn build(self) -> RigidBody {
        RigidBodyBuilder::new(self.body_type)
            .position(self.position)
            .linvel(self.linvel)
            .gravity_scale(self.gravity_scale)
            .can_sleep(self.can_sleep)
            .ccd_enabled(self.ccd)
            .locked_axes(self.locked_axes)
            .build()
    }
}

/// Builder for creating box colliders with common configurations
pub struct ColliderBuilder2D {
    shape: SharedShape,
    collision_groups: CollisionGroups,
    friction: Real,
    active_hooks: ActiveHooks,
}

impl ColliderBuilder2D {
    /// Create a box-shaped collider
    pub fn box_shape(half_width: Real, half_height: Real) -> Self {
        Self {
            shape: SharedShape::cuboid(half_width, half_height),
            collision_groups: CollisionGroups::Default,
            friction: 0.5,
            active_hooks: ActiveHooks::empty(),
        }
    }

    /// Set the collision groups for filtering
    pub fn collision_groups(mut self, groups: CollisionGroups) -> Self {
        self.collision_groups = groups;
        self
    }

    /// Set friction coefficient (0.0 = no friction, 1.0 = high friction)
    pub fn friction(mut self, friction: Real) -> Self {
        self.friction = friction;
        self
    }

    /// Route this collider's contact pairs through the world's ignore list
    pub fn filter_contacts(mut self) -> Self {
        self.active_hooks |= ActiveHooks::FILTER_CONTACT_PAIRS;
        self
    }

    /// Build the collider (no bounce: landings must settle in one tick)
    pub fn build(self) -> Collider {
        rapier2d::prelude::ColliderBuilder::new(self.shape)
            .collision_groups(self.collision_groups.to_interaction_groups())
            .friction(self.friction)
            .restitution(0.0)
            .active_hooks(self.active_hooks)
            .build()
    }
}

/// Common rigid body configurations for stage objects
pub mod presets {
    use super::*;

    /// Create a character body (dynamic, rotation locked, never sleeps)
    pub fn character_body(x: Real, y: Real) -> RigidBody {
        BodyBuilder::new_dynamic()
            .position(x, y)
            .lock_rotation()
            .gravity_scale(1.0)
            .can_sleep(false)
            .ccd(true)
            .build()
    }

    /// Create a character collider (square box, frictionless)
    pub fn character_collider(half_extent: Real) -> Collider {
        ColliderBuilder2D::box_shape(half_extent, half_extent)
            .collision_groups(CollisionGroups::Player)
            .friction(0.0)
            .filter_contacts()
            .build()
    }

    /// Create a static ground body
    pub fn ground_body(x: Real, y: Real) -> RigidBody {
        BodyBuilder::new_fixed().position(x, y).build()
    }

    /// Create a moving platform body (kinematic, driven by pose writes)
    pub fn platform_body(x: Real, y: Real, angle: Real) -> RigidBody {
        BodyBuilder::new_kinematic_position_based()
            .position_rotation(x, y, angle)
            .build()
    }

    /// Create a ground or platform collider (box shape)
    pub fn ground_collider(half_width: Real, half_height: Real) -> Collider {
        ColliderBuilder2D::box_shape(half_width, half_height)
            .collision_groups(CollisionGroups::Ground)
            .friction(0.3)
            .build()
    }
}
