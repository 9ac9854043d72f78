// Game layer: surfaces, probes, characters, platforms and the stage that ties them together

pub mod characters;
pub mod contact;
pub mod platforms;
pub mod probe;
pub mod stage;
pub mod surface;

#[cfg(test)]
pub(crate) mod testing;

pub use stage::{CharacterId, PlatformId, Stage};
pub use surface::{SurfaceId, SurfaceTag};
