use glam::Vec2;
use log::{debug, warn};
use rapier2d::parry::query::ShapeCastOptions;
use rapier2d::prelude::*;
use std::collections::HashMap;

use super::collision::IgnoredPairs;
use crate::game::characters::CharacterBody;
use crate::game::platforms::{PlatformBody, Pose};
use crate::game::probe::{CollisionQuery, ProbeHit, ShapeCast};
use crate::game::surface::{SurfaceId, SurfaceTag};

/// Handle to identify rigid bodies
pub type RigidBodyHandle = rapier2d::prelude::RigidBodyHandle;

/// Handle to identify colliders
pub type ColliderHandle = rapier2d::prelude::ColliderHandle;

/// Upper bound on hits gathered by one `cast_shape_all` query
const MAX_CAST_HITS: usize = 16;

/// Pack a collider handle into an opaque surface identity
pub fn surface_id(handle: ColliderHandle) -> SurfaceId {
    let (index, generation) = handle.into_raw_parts();
    SurfaceId((u64::from(generation) << 32) | u64::from(index))
}

/// Recover the collider handle packed by [`surface_id`]
pub fn collider_handle(surface: SurfaceId) -> ColliderHandle {
    ColliderHandle::from_raw_parts(surface.0 as u32, (surface.0 >> 32) as u32)
}

/// Level-geometry metadata for one collider
#[derive(Debug, Clone, Copy)]
struct SurfaceInfo {
    tag: SurfaceTag,
    rideable: bool,
}

/// Physics world that manages all physics simulation
pub struct PhysicsWorld {
    /// Gravity vector (default: -9.81 m/s² in y-axis)
    gravity: Vector<Real>,

    /// Integration parameters for the physics simulation
    integration_parameters: IntegrationParameters,

    /// Physics pipeline handles collision detection and solving
    physics_pipeline: PhysicsPipeline,

    /// Island manager for sleeping bodies
    island_manager: IslandManager,

    /// Broad phase collision detection
    broad_phase: DefaultBroadPhase,

    /// Narrow phase collision detection
    narrow_phase: NarrowPhase,

    /// Impulse joint set
    impulse_joint_set: ImpulseJointSet,

    /// Multibody joint set
    multibody_joint_set: MultibodyJointSet,

    /// CCD solver for fast-moving objects
    ccd_solver: CCDSolver,

    /// Query pipeline for shape casts
    query_pipeline: QueryPipeline,

    /// Rigid body set
    rigid_body_set: RigidBodySet,

    /// Collider set
    collider_set: ColliderSet,

    /// Collider pairs with contacts switched off (fall-through)
    ignored_pairs: IgnoredPairs,

    /// Tags of every registered level collider
    surfaces: HashMap<ColliderHandle, SurfaceInfo>,

    /// Platform collider each character is riding
    parents: HashMap<RigidBodyHandle, ColliderHandle>,
}

impl PhysicsWorld {
    /// Create a new physics world with default settings
    pub fn new() -> Self {
        Self::with_gravity(vector![0.0, -9.81])
    }

    /// Create a new physics world with custom gravity
    pub fn with_gravity(gravity: Vector<Real>) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        // Fixed timestep of 1/60 seconds (60 FPS)
        integration_parameters.dt = 1.0 / 60.0;

        Self {
            gravity,
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            ignored_pairs: IgnoredPairs::new(),
            surfaces: HashMap::new(),
            parents: HashMap::new(),
        }
    }

    /// Step the physics simulation forward by one timestep
    pub fn step(&mut self) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &self.ignored_pairs,
            &(),
        );
    }

    /// Add a rigid body to the physics world
    pub fn add_rigid_body(&mut self, body: RigidBody) -> RigidBodyHandle {
        self.rigid_body_set.insert(body)
    }

    /// Add a collider attached to a rigid body
    pub fn add_collider(
        &mut self,
        collider: Collider,
        parent_handle: RigidBodyHandle,
    ) -> ColliderHandle {
        self.collider_set
            .insert_with_parent(collider, parent_handle, &mut self.rigid_body_set)
    }

    /// Add a tagged level collider that probes can find
    pub fn add_surface(
        &mut self,
        collider: Collider,
        parent_handle: RigidBodyHandle,
        tag: SurfaceTag,
        rideable: bool,
    ) -> SurfaceId {
        let handle = self.add_collider(collider, parent_handle);
        self.surfaces.insert(handle, SurfaceInfo { tag, rideable });
        surface_id(handle)
    }

    /// Remove a rigid body, its colliders, and everything referring to them
    pub fn remove_rigid_body(&mut self, handle: RigidBodyHandle) {
        let colliders: Vec<ColliderHandle> = self
            .rigid_body_set
            .get(handle)
            .map(|body| body.colliders().to_vec())
            .unwrap_or_default();

        for collider in &colliders {
            self.surfaces.remove(collider);
            self.ignored_pairs.forget(*collider);
        }
        self.parents
            .retain(|rider, platform| *rider != handle && !colliders.contains(platform));

        self.rigid_body_set.remove(
            handle,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true, // remove attached colliders
        );
    }

    /// Get a reference to a rigid body
    pub fn get_rigid_body(&self, handle: RigidBodyHandle) -> Option<&RigidBody> {
        self.rigid_body_set.get(handle)
    }

    /// Get a mutable reference to a rigid body
    pub fn get_rigid_body_mut(&mut self, handle: RigidBodyHandle) -> Option<&mut RigidBody> {
        self.rigid_body_set.get_mut(handle)
    }

    /// Get a reference to a collider
    pub fn get_collider(&self, handle: ColliderHandle) -> Option<&Collider> {
        self.collider_set.get(handle)
    }

    /// Tag of a registered surface
    pub fn surface_tag(&self, surface: SurfaceId) -> Option<SurfaceTag> {
        self.surfaces
            .get(&collider_handle(surface))
            .map(|info| info.tag)
    }

    /// Whether contacts between the two colliders are currently switched off
    pub fn is_pair_ignored(&self, a: ColliderHandle, b: ColliderHandle) -> bool {
        self.ignored_pairs.contains(a, b)
    }

    /// Platform surface a character body is riding
    pub fn parent_of(&self, rider: RigidBodyHandle) -> Option<SurfaceId> {
        self.parents.get(&rider).copied().map(surface_id)
    }

    /// Borrow a character body through the controller's interface
    pub fn character(
        &mut self,
        body: RigidBodyHandle,
        collider: ColliderHandle,
    ) -> CharacterRig<'_> {
        CharacterRig {
            world: self,
            body,
            collider,
        }
    }

    /// Borrow a platform body through the mover's interface
    pub fn platform(&mut self, body: RigidBodyHandle) -> PlatformRig<'_> {
        PlatformRig { world: self, body }
    }

    /// Sweep a box, skipping `exclude` and any collider in `skip`
    fn cast(
        &self,
        cast: &ShapeCast,
        exclude: Option<RigidBodyHandle>,
        skip: &[ColliderHandle],
    ) -> Option<ProbeHit> {
        let shape = Cuboid::new(vector![cast.half_extents.x, cast.half_extents.y]);
        let shape_pos = Isometry::translation(cast.origin.x, cast.origin.y);
        let shape_vel = vector![cast.direction.x, cast.direction.y];
        let options = ShapeCastOptions::with_max_time_of_impact(cast.max_distance);

        let not_skipped = |handle: ColliderHandle, _: &Collider| !skip.contains(&handle);
        let mut filter = QueryFilter::default()
            .exclude_sensors()
            .groups(cast.groups.to_query_groups())
            .predicate(&not_skipped);
        if let Some(body) = exclude {
            filter = filter.exclude_rigid_body(body);
        }

        let (handle, hit) = self.query_pipeline.cast_shape(
            &self.rigid_body_set,
            &self.collider_set,
            &shape_pos,
            &shape_vel,
            &shape,
            options,
            filter,
        )?;

        let distance = hit.time_of_impact;
        Some(ProbeHit {
            surface: surface_id(handle),
            tag: self
                .surfaces
                .get(&handle)
                .map(|info| info.tag)
                .unwrap_or_default(),
            point: cast.origin + cast.direction * distance,
            distance,
        })
    }

    fn cast_all(&self, cast: &ShapeCast, exclude: Option<RigidBodyHandle>) -> Vec<ProbeHit> {
        let mut skip = Vec::new();
        let mut hits = Vec::new();
        while hits.len() < MAX_CAST_HITS {
            let Some(hit) = self.cast(cast, exclude, &skip) else {
                break;
            };
            skip.push(collider_handle(hit.surface));
            hits.push(hit);
        }
        hits
    }

    fn is_rideable_surface(&self, surface: SurfaceId) -> bool {
        self.surfaces
            .get(&collider_handle(surface))
            .is_some_and(|info| info.rideable)
    }

    /// Set gravity for the physics world
    pub fn set_gravity(&mut self, gravity: Vector<Real>) {
        self.gravity = gravity;
    }

    /// Get current gravity
    pub fn gravity(&self) -> Vector<Real> {
        self.gravity
    }

    /// Set the timestep for physics simulation
    pub fn set_timestep(&mut self, dt: Real) {
        self.integration_parameters.dt = dt;
    }

    /// Get the current timestep
    pub fn timestep(&self) -> Real {
        self.integration_parameters.dt
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl CollisionQuery for PhysicsWorld {
    fn cast_shape(&self, cast: &ShapeCast) -> Option<ProbeHit> {
        self.cast(cast, None, &[])
    }

    fn cast_shape_all(&self, cast: &ShapeCast) -> Vec<ProbeHit> {
        self.cast_all(cast, None)
    }

    fn is_rideable(&self, surface: SurfaceId) -> bool {
        self.is_rideable_surface(surface)
    }
}

/// A character's rigid body and collider, borrowed from the world
pub struct CharacterRig<'w> {
    world: &'w mut PhysicsWorld,
    body: RigidBodyHandle,
    collider: ColliderHandle,
}

impl CharacterRig<'_> {
    fn body(&self) -> Option<&RigidBody> {
        let body = self.world.rigid_body_set.get(self.body);
        if body.is_none() {
            warn!("character body {:?} is missing", self.body);
        }
        body
    }

    fn body_mut(&mut self) -> Option<&mut RigidBody> {
        let body = self.world.rigid_body_set.get_mut(self.body);
        if body.is_none() {
            warn!("character body {:?} is missing", self.body);
        }
        body
    }
}

impl CollisionQuery for CharacterRig<'_> {
    fn cast_shape(&self, cast: &ShapeCast) -> Option<ProbeHit> {
        self.world.cast(cast, Some(self.body), &[])
    }

    fn cast_shape_all(&self, cast: &ShapeCast) -> Vec<ProbeHit> {
        self.world.cast_all(cast, Some(self.body))
    }

    fn is_rideable(&self, surface: SurfaceId) -> bool {
        self.world.is_rideable_surface(surface)
    }
}

impl CharacterBody for CharacterRig<'_> {
    fn position(&self) -> Vec2 {
        self.body()
            .map(|body| Vec2::new(body.translation().x, body.translation().y))
            .unwrap_or_default()
    }

    fn linear_velocity(&self) -> Vec2 {
        self.body()
            .map(|body| Vec2::new(body.linvel().x, body.linvel().y))
            .unwrap_or_default()
    }

    fn set_linear_velocity(&mut self, velocity: Vec2) {
        if let Some(body) = self.body_mut() {
            body.set_linvel(vector![velocity.x, velocity.y], true);
        }
    }

    fn gravity_scale(&self) -> f32 {
        self.body().map(|body| body.gravity_scale()).unwrap_or(1.0)
    }

    fn set_gravity_scale(&mut self, scale: f32) {
        if let Some(body) = self.body_mut() {
            body.set_gravity_scale(scale, true);
        }
    }

    fn parent(&self) -> Option<SurfaceId> {
        self.world.parent_of(self.body)
    }

    fn set_parent(&mut self, parent: Option<SurfaceId>) {
        match parent {
            Some(surface) => {
                self.world.parents.insert(self.body, collider_handle(surface));
            }
            None => {
                self.world.parents.remove(&self.body);
            }
        }
    }

    fn set_collision_with(&mut self, surface: SurfaceId, enabled: bool) {
        let other = collider_handle(surface);
        if enabled {
            self.world.ignored_pairs.remove(self.collider, other);
        } else {
            self.world.ignored_pairs.insert(self.collider, other);
        }
    }
}

/// A kinematic platform body, borrowed from the world.
///
/// Rapier colliders cannot be rescaled, so the pose's scale is not applied.
pub struct PlatformRig<'w> {
    world: &'w mut PhysicsWorld,
    body: RigidBodyHandle,
}

impl PlatformRig<'_> {
    fn colliders(&self) -> Vec<ColliderHandle> {
        self.world
            .rigid_body_set
            .get(self.body)
            .map(|body| body.colliders().to_vec())
            .unwrap_or_default()
    }
}

impl PlatformBody for PlatformRig<'_> {
    fn set_pose(&mut self, pose: &Pose) {
        let Some(body) = self.world.rigid_body_set.get_mut(self.body) else {
            warn!("platform body {:?} is missing", self.body);
            return;
        };

        let previous = body.next_position().translation.vector;
        let next = Isometry::new(
            vector![pose.position.x, pose.position.y],
            pose.rotation.to_radians(),
        );
        body.set_next_kinematic_position(next);
        let delta = next.translation.vector - previous;

        let colliders = self.colliders();
        let riders: Vec<RigidBodyHandle> = self
            .world
            .parents
            .iter()
            .filter(|(_, platform)| colliders.contains(platform))
            .map(|(rider, _)| *rider)
            .collect();

        for rider in riders {
            if let Some(body) = self.world.rigid_body_set.get_mut(rider) {
                let translation = body.translation() + delta;
                body.set_translation(translation, true);
            }
        }
    }

    fn detach_riders(&mut self) {
        let colliders = self.colliders();
        let before = self.world.parents.len();
        self.world
            .parents
            .retain(|_, platform| !colliders.contains(platform));
        debug!(
            "detached {} riders from platform {:?}",
            before - self.world.parents.len(),
            self.body
        );
    }

    fn despawn(&mut self) {
        self.world.remove_rigid_body(self.body);
        debug!("platform {:?} despawned", self.body);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::physics::body::presets;
    use approx::assert_abs_diff_eq;

    fn add_ground(
        world: &mut PhysicsWorld,
        x: f32,
        y: f32,
        hx: f32,
        hy: f32,
        tag: SurfaceTag,
    ) -> SurfaceId {
        let body = world.add_rigid_body(presets::ground_body(x, y));
        world.add_surface(presets::ground_collider(hx, hy), body, tag, false)
    }

    fn add_character(
        world: &mut PhysicsWorld,
        x: f32,
        y: f32,
    ) -> (RigidBodyHandle, ColliderHandle) {
        let body = world.add_rigid_body(presets::character_body(x, y));
        let collider = world.add_collider(presets::character_collider(0.5), body);
        (body, collider)
    }

    #[test]
    fn test_physics_world_step() {
        let mut world = PhysicsWorld::new();
        let (body, _) = add_character(&mut world, 0.0, 10.0);

        for _ in 0..10 {
            world.step();
        }

        let y = world.get_rigid_body(body).map(|b| b.translation().y);
        assert!(y.is_some_and(|y| y < 10.0), "body should fall under gravity");
    }

    #[test]
    fn test_ground_cast_finds_tagged_surface() {
        let mut world = PhysicsWorld::new();
        let floor = add_ground(&mut world, 0.0, -0.5, 10.0, 0.5, SurfaceTag::Half);
        world.step();

        let cast = ShapeCast::new(
            Vec2::new(0.0, 0.5),
            Vec2::new(0.45, 0.05),
            Vec2::NEG_Y,
            0.55,
        );
        let hit = world.cast_shape(&cast);
        assert_eq!(hit.map(|h| h.surface), Some(floor));
        assert_eq!(hit.map(|h| h.tag), Some(SurfaceTag::Half));
        let distance = hit.map(|h| h.distance).unwrap_or_default();
        assert_abs_diff_eq!(distance, 0.45, epsilon = 1e-3);
    }

    #[test]
    fn test_cast_all_sees_wall_behind_half_wall() {
        let mut world = PhysicsWorld::new();
        let half = add_ground(&mut world, 1.0, 0.0, 0.1, 5.0, SurfaceTag::Half);
        let full = add_ground(&mut world, 1.4, 0.0, 0.1, 5.0, SurfaceTag::Full);
        world.step();

        let cast = ShapeCast::new(Vec2::ZERO, Vec2::new(0.05, 0.4), Vec2::X, 2.0);
        let hits = world.cast_shape_all(&cast);
        let surfaces: Vec<SurfaceId> = hits.iter().map(|h| h.surface).collect();
        assert_eq!(surfaces, vec![half, full]);

        let behind = ShapeCast::new(Vec2::ZERO, Vec2::splat(0.1), Vec2::NEG_X, 2.0);
        assert!(world.cast_shape(&behind).is_none());
    }

    #[test]
    fn test_character_casts_skip_own_body() {
        let mut world = PhysicsWorld::new();
        let floor = add_ground(&mut world, 0.0, -0.5, 10.0, 0.5, SurfaceTag::Full);
        let (body, collider) = add_character(&mut world, 0.0, 0.5);
        world.step();

        let rig = world.character(body, collider);
        let cast = ShapeCast::new(
            rig.position(),
            Vec2::new(0.45, 0.05),
            Vec2::NEG_Y,
            0.55,
        );
        assert_eq!(rig.cast_shape(&cast).map(|h| h.surface), Some(floor));
    }

    #[test]
    fn test_ignored_pair_lets_character_fall_through() {
        let mut world = PhysicsWorld::new();
        let ledge = add_ground(&mut world, 0.0, -0.5, 10.0, 0.5, SurfaceTag::Half);
        let (solid_body, _) = add_character(&mut world, -3.0, 1.0);
        let (body, collider) = add_character(&mut world, 3.0, 1.0);

        world.character(body, collider).set_collision_with(ledge, false);
        assert!(world.is_pair_ignored(collider, collider_handle(ledge)));

        for _ in 0..90 {
            world.step();
        }

        let y = |handle| {
            world
                .get_rigid_body(handle)
                .map(|b| b.translation().y)
                .unwrap_or_default()
        };
        assert!(y(solid_body) > 0.0, "other characters still collide");
        assert!(y(body) < -1.0, "ignored pair should not collide");

        world.character(body, collider).set_collision_with(ledge, true);
        assert!(!world.is_pair_ignored(collider, collider_handle(ledge)));
    }

    #[test]
    fn test_platform_carries_riders() {
        let mut world = PhysicsWorld::new();
        let platform_body = world.add_rigid_body(presets::platform_body(0.0, 0.0, 0.0));
        let platform = world.add_surface(
            presets::ground_collider(2.0, 0.25),
            platform_body,
            SurfaceTag::Full,
            true,
        );
        let (rider, collider) = add_character(&mut world, 0.0, 0.75);

        assert!(world.is_rideable(platform));
        world.character(rider, collider).set_parent(Some(platform));
        world
            .platform(platform_body)
            .set_pose(&Pose::at(Vec2::new(1.5, 0.0)));

        let x = world.get_rigid_body(rider).map(|b| b.translation().x);
        assert_abs_diff_eq!(x.unwrap_or_default(), 1.5, epsilon = 1e-5);

        world.platform(platform_body).detach_riders();
        assert_eq!(world.parent_of(rider), None);
    }

    #[test]
    fn test_despawn_clears_surface_and_riders() {
        let mut world = PhysicsWorld::new();
        let platform_body = world.add_rigid_body(presets::platform_body(0.0, 0.0, 0.0));
        let platform = world.add_surface(
            presets::ground_collider(2.0, 0.25),
            platform_body,
            SurfaceTag::Full,
            true,
        );
        let (rider, collider) = add_character(&mut world, 0.0, 0.75);
        world.character(rider, collider).set_parent(Some(platform));

        world.platform(platform_body).despawn();

        assert!(world.get_rigid_body(platform_body).is_none());
        assert_eq!(world.surface_tag(platform), None);
        assert_eq!(world.parent_of(rider), None);
    }

    #[test]
    fn test_gravity_scale_round_trips_through_rig() {
        let mut world = PhysicsWorld::new();
        let (body, collider) = add_character(&mut world, 0.0, 0.0);

        let mut rig = world.character(body, collider);
        rig.set_gravity_scale(0.0);
        rig.set_linear_velocity(Vec2::new(3.0, -1.0));
        assert_eq!(rig.gravity_scale(), 0.0);
        assert_eq!(rig.linear_velocity(), Vec2::new(3.0, -1.0));
    }
}
