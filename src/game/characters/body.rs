// Rigid-body interface the character controller drives

use glam::Vec2;

use crate::game::probe::CollisionQuery;
use crate::game::surface::SurfaceId;

/// The physics-side view of one controlled character.
///
/// The controller reads contact through the `CollisionQuery` supertrait and
/// writes velocity, gravity scale, parenting and pairwise collision toggles
/// back through this trait. Integration itself belongs to the backend.
pub trait CharacterBody: CollisionQuery {
    /// World-space centre of the character
    fn position(&self) -> Vec2;

    fn linear_velocity(&self) -> Vec2;

    fn set_linear_velocity(&mut self, velocity: Vec2);

    fn gravity_scale(&self) -> f32;

    fn set_gravity_scale(&mut self, scale: f32);

    /// Surface the character is currently parented to
    fn parent(&self) -> Option<SurfaceId>;

    /// Reparent to a surface (or detach), preserving world pose
    fn set_parent(&mut self, parent: Option<SurfaceId>);

    /// Enable or disable collision between this character and one surface
    fn set_collision_with(&mut self, surface: SurfaceId, enabled: bool);
}
