// Scoped collision disables for dropping through one-way platforms

use log::debug;

use super::body::CharacterBody;
use crate::core::math::TIMER_EPSILON;
use crate::game::surface::SurfaceId;

/// One disabled character/surface pair waiting to be restored
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingRestore {
    pub surface: SurfaceId,
    /// Seconds until collision comes back
    pub remaining: f32,
}

/// Owned countdowns that re-enable collision exactly once per disable.
///
/// Restores are driven by the owning controller's tick, never by contact,
/// so a pair always comes back even after the character has moved away.
#[derive(Debug, Default, Clone)]
pub struct FallThroughTimers {
    pending: Vec<PendingRestore>,
}

impl FallThroughTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Disable collision with `surface` for `delay` seconds.
    ///
    /// A surface that is already pending keeps its original countdown;
    /// returns false in that case.
    pub fn disable<B: CharacterBody + ?Sized>(
        &mut self,
        body: &mut B,
        surface: SurfaceId,
        delay: f32,
    ) -> bool {
        if self.remaining(surface).is_some() {
            return false;
        }
        body.set_collision_with(surface, false);
        self.pending.push(PendingRestore {
            surface,
            remaining: delay,
        });
        debug!("collision with {surface} disabled for {delay}s");
        true
    }

    /// Count every timer down and restore the ones that ran out
    pub fn tick<B: CharacterBody + ?Sized>(&mut self, body: &mut B, dt: f32) {
        self.pending.retain_mut(|pending| {
            pending.remaining -= dt;
            if pending.remaining <= TIMER_EPSILON {
                body.set_collision_with(pending.surface, true);
                debug!("collision with {} restored", pending.surface);
                false
            } else {
                true
            }
        });
    }

    /// Restore every pending pair immediately
    pub fn cancel_all<B: CharacterBody + ?Sized>(&mut self, body: &mut B) {
        for pending in self.pending.drain(..) {
            body.set_collision_with(pending.surface, true);
        }
    }

    /// Time left before `surface` collides again, if it is disabled
    pub fn remaining(&self, surface: SurfaceId) -> Option<f32> {
        self.pending
            .iter()
            .find(|pending| pending.surface == surface)
            .map(|pending| pending.remaining)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
