// Physics system using rapier2d

pub mod body;
mod collision;
mod world;

pub use body::{presets, BodyBuilder, ColliderBuilder2D, ColliderHandle, RigidBodyHandle};
pub use collision::{CollisionGroups, IgnoredPairs};
pub use world::{collider_handle, surface_id, CharacterRig, PhysicsWorld, PlatformRig};
