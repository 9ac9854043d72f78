// Stage: owns the physics world, characters and platforms, and runs a tick

use glam::Vec2;
use log::{debug, info};

use super::characters::{CharacterController, ConfigError, ControllerConfig};
use super::platforms::{FinishAction, LoopPolicy, PathError, PathSegment, PlatformMover, Pose};
use super::surface::{SurfaceId, SurfaceTag};
use crate::engine::input::InputFrame;
use crate::engine::physics::{presets, ColliderHandle, PhysicsWorld, RigidBodyHandle};

/// Unique identifier for a character
pub type CharacterId = u32;

/// Unique identifier for a moving platform
pub type PlatformId = u32;

/// A controlled character and its physics handles
#[derive(Debug)]
struct CharacterSlot {
    id: CharacterId,
    controller: CharacterController,
    body_handle: RigidBodyHandle,
    collider_handle: ColliderHandle,
}

/// A moving platform and its physics handles
#[derive(Debug)]
struct PlatformSlot {
    id: PlatformId,
    mover: PlatformMover,
    body_handle: RigidBodyHandle,
    surface: SurfaceId,
}

/// Composition root for one playable scene.
///
/// Each [`step`](Stage::step) runs every platform mover, then every
/// character controller, then one physics integration step.
pub struct Stage {
    physics: PhysicsWorld,
    characters: Vec<CharacterSlot>,
    platforms: Vec<PlatformSlot>,
    next_character_id: CharacterId,
    next_platform_id: PlatformId,
    tick_count: u64,
}

impl Stage {
    pub fn new() -> Self {
        Self::with_world(PhysicsWorld::new())
    }

    /// Build on a preconfigured physics world (custom gravity or timestep)
    pub fn with_world(physics: PhysicsWorld) -> Self {
        Self {
            physics,
            characters: Vec::new(),
            platforms: Vec::new(),
            next_character_id: 0,
            next_platform_id: 0,
            tick_count: 0,
        }
    }

    /// Add static level geometry
    pub fn add_ground(&mut self, position: Vec2, half_extents: Vec2, tag: SurfaceTag) -> SurfaceId {
        let body = self
            .physics
            .add_rigid_body(presets::ground_body(position.x, position.y));
        let collider = presets::ground_collider(half_extents.x, half_extents.y);
        self.physics.add_surface(collider, body, tag, false)
    }

    /// Add a rideable platform that plays `path` from `position`
    pub fn add_platform(
        &mut self,
        position: Vec2,
        half_extents: Vec2,
        tag: SurfaceTag,
        path: Vec<PathSegment>,
        policy: LoopPolicy,
        finish: FinishAction,
    ) -> Result<PlatformId, PathError> {
        let mover = PlatformMover::new(path, Pose::at(position), policy, finish)?;

        let body_handle = self
            .physics
            .add_rigid_body(presets::platform_body(position.x, position.y, 0.0));
        let collider = presets::ground_collider(half_extents.x, half_extents.y);
        let surface = self.physics.add_surface(collider, body_handle, tag, true);

        let id = self.next_platform_id;
        self.next_platform_id += 1;
        self.platforms.push(PlatformSlot {
            id,
            mover,
            body_handle,
            surface,
        });
        debug!("platform {id} added as {surface}");

        Ok(id)
    }

    /// Spawn a controlled character centred at `position`
    pub fn spawn_character(
        &mut self,
        position: Vec2,
        config: ControllerConfig,
    ) -> Result<CharacterId, ConfigError> {
        config.validate()?;

        let body_handle = self
            .physics
            .add_rigid_body(presets::character_body(position.x, position.y));
        let collider = presets::character_collider(config.probes.body_half_extent);
        let collider_handle = self.physics.add_collider(collider, body_handle);

        let id = self.next_character_id;
        self.next_character_id += 1;
        self.characters.push(CharacterSlot {
            id,
            controller: CharacterController::new(config),
            body_handle,
            collider_handle,
        });
        info!("character {id} spawned at {position}");

        Ok(id)
    }

    /// Remove a character, restoring anything its controller changed first
    pub fn despawn_character(&mut self, id: CharacterId) -> bool {
        let Some(index) = self.characters.iter().position(|c| c.id == id) else {
            return false;
        };
        let mut slot = self.characters.remove(index);

        let mut rig = self
            .physics
            .character(slot.body_handle, slot.collider_handle);
        slot.controller.reset(&mut rig);
        self.physics.remove_rigid_body(slot.body_handle);
        info!("character {id} despawned");
        true
    }

    /// Run one fixed tick. Characters without an entry in `inputs` get an
    /// idle frame.
    pub fn step(&mut self, inputs: &[(CharacterId, InputFrame)]) {
        let dt = self.physics.timestep();

        for slot in &mut self.platforms {
            let mut rig = self.physics.platform(slot.body_handle);
            slot.mover.tick(&mut rig, dt);
        }
        let physics = &self.physics;
        self.platforms.retain(|slot| {
            let alive = physics.get_rigid_body(slot.body_handle).is_some();
            if !alive {
                info!("platform {} removed from stage", slot.id);
            }
            alive
        });

        for slot in &mut self.characters {
            let input = inputs
                .iter()
                .find(|(id, _)| *id == slot.id)
                .map(|(_, frame)| *frame)
                .unwrap_or_default();
            let mut rig = self
                .physics
                .character(slot.body_handle, slot.collider_handle);
            slot.controller.tick(&mut rig, &input, dt);
        }

        self.physics.step();
        self.tick_count += 1;
    }

    /// Get a character's controller
    pub fn controller(&self, id: CharacterId) -> Option<&CharacterController> {
        self.character(id).map(|slot| &slot.controller)
    }

    /// Get a character's current position
    pub fn character_position(&self, id: CharacterId) -> Option<Vec2> {
        let slot = self.character(id)?;
        self.physics
            .get_rigid_body(slot.body_handle)
            .map(|body| Vec2::new(body.translation().x, body.translation().y))
    }

    /// Get a character's current velocity
    pub fn character_velocity(&self, id: CharacterId) -> Option<Vec2> {
        let slot = self.character(id)?;
        self.physics
            .get_rigid_body(slot.body_handle)
            .map(|body| Vec2::new(body.linvel().x, body.linvel().y))
    }

    /// Platform surface a character is riding
    pub fn character_parent(&self, id: CharacterId) -> Option<SurfaceId> {
        let slot = self.character(id)?;
        self.physics.parent_of(slot.body_handle)
    }

    /// Get a platform's mover
    pub fn platform(&self, id: PlatformId) -> Option<&PlatformMover> {
        self.platform_slot(id).map(|slot| &slot.mover)
    }

    /// Surface identity of a platform, as seen by character probes
    pub fn platform_surface(&self, id: PlatformId) -> Option<SurfaceId> {
        self.platform_slot(id).map(|slot| slot.surface)
    }

    pub fn character_count(&self) -> usize {
        self.characters.len()
    }

    pub fn platform_count(&self) -> usize {
        self.platforms.len()
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Get the physics world
    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    fn character(&self, id: CharacterId) -> Option<&CharacterSlot> {
        self.characters.iter().find(|c| c.id == id)
    }

    fn platform_slot(&self, id: PlatformId) -> Option<&PlatformSlot> {
        self.platforms.iter().find(|p| p.id == id)
    }
}

impl Default for Stage {
    fn default() -> Self {
        Self::new()
    }
}
