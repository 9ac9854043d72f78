// Scripted in-memory backend for deterministic controller and mover tests

use std::collections::HashSet;

use glam::Vec2;

use super::characters::CharacterBody;
use super::platforms::{PlatformBody, Pose};
use super::probe::{CollisionQuery, ProbeHit, ShapeCast};
use super::surface::{SurfaceId, SurfaceTag};

/// Axis-aligned block of level geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slab {
    pub center: Vec2,
    pub half_extents: Vec2,
    pub tag: SurfaceTag,
    pub rideable: bool,
}

impl Slab {
    pub fn new(center: Vec2, half_extents: Vec2, tag: SurfaceTag) -> Self {
        Self {
            center,
            half_extents,
            tag,
            rideable: false,
        }
    }

    /// Wide floor whose top face sits at `top`
    pub fn floor(top: f32, tag: SurfaceTag) -> Self {
        Self::new(Vec2::new(0.0, top - 0.5), Vec2::new(100.0, 0.5), tag)
    }

    /// Tall wall whose left face sits at `left_face`
    pub fn wall(left_face: f32, tag: SurfaceTag) -> Self {
        Self::new(Vec2::new(left_face + 0.5, 0.0), Vec2::new(0.5, 100.0), tag)
    }

    /// Tall wall whose right face sits at `right_face`
    pub fn wall_left_of(right_face: f32, tag: SurfaceTag) -> Self {
        Self::new(Vec2::new(right_face - 0.5, 0.0), Vec2::new(0.5, 100.0), tag)
    }

    /// Mark as a moving platform that carries riders
    pub fn rideable(mut self) -> Self {
        self.rideable = true;
        self
    }

    /// Distance along the sweep at which a box of `half` extents first
    /// touches this slab, if within `max_distance`. Starting inside is a hit
    /// at zero.
    fn sweep(&self, cast: &ShapeCast) -> Option<f32> {
        let min = self.center - self.half_extents - cast.half_extents;
        let max = self.center + self.half_extents + cast.half_extents;

        let mut enter = 0.0f32;
        let mut exit = cast.max_distance;
        for axis in 0..2 {
            let origin = cast.origin[axis];
            let dir = cast.direction[axis];
            if dir == 0.0 {
                if origin < min[axis] || origin > max[axis] {
                    return None;
                }
                continue;
            }
            let t1 = (min[axis] - origin) / dir;
            let t2 = (max[axis] - origin) / dir;
            enter = enter.max(t1.min(t2));
            exit = exit.min(t1.max(t2));
        }

        (enter <= exit).then_some(enter)
    }
}

/// One character or platform body living in a hand-built world.
///
/// Implements every backend trait so the same value can stand in for a
/// character, a platform, or both. Velocity is only integrated when a test
/// calls [`ScriptedBody::integrate`].
#[derive(Debug, Clone)]
pub struct ScriptedBody {
    pub position: Vec2,
    pub velocity: Vec2,
    pub gravity_scale: f32,
    pub parent: Option<SurfaceId>,
    pub slabs: Vec<(SurfaceId, Slab)>,
    pub disabled: HashSet<SurfaceId>,
    /// Every collision toggle, in order
    pub collision_log: Vec<(SurfaceId, bool)>,
    pub pose: Option<Pose>,
    pub detach_count: usize,
    pub despawned: bool,
    next_id: u64,
}

impl ScriptedBody {
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            gravity_scale: 1.0,
            parent: None,
            slabs: Vec::new(),
            disabled: HashSet::new(),
            collision_log: Vec::new(),
            pose: None,
            detach_count: 0,
            despawned: false,
            next_id: 1,
        }
    }

    pub fn add_slab(&mut self, slab: Slab) -> SurfaceId {
        let id = SurfaceId(self.next_id);
        self.next_id += 1;
        self.slabs.push((id, slab));
        id
    }

    pub fn is_collision_disabled(&self, surface: SurfaceId) -> bool {
        self.disabled.contains(&surface)
    }

    /// Explicit Euler step under `gravity`, scaled by the body's gravity scale
    pub fn integrate(&mut self, dt: f32, gravity: f32) {
        self.velocity.y += gravity * self.gravity_scale * dt;
        self.position += self.velocity * dt;
    }

    fn hits(&self, cast: &ShapeCast) -> Vec<ProbeHit> {
        let mut hits: Vec<ProbeHit> = self
            .slabs
            .iter()
            .filter_map(|(id, slab)| {
                slab.sweep(cast).map(|distance| ProbeHit {
                    surface: *id,
                    tag: slab.tag,
                    point: cast.origin + cast.direction * distance,
                    distance,
                })
            })
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }
}

impl CollisionQuery for ScriptedBody {
    fn cast_shape(&self, cast: &ShapeCast) -> Option<ProbeHit> {
        self.hits(cast).into_iter().next()
    }

    fn cast_shape_all(&self, cast: &ShapeCast) -> Vec<ProbeHit> {
        self.hits(cast)
    }

    fn is_rideable(&self, surface: SurfaceId) -> bool {
        self.slabs
            .iter()
            .any(|(id, slab)| *id == surface && slab.rideable)
    }
}

impl CharacterBody for ScriptedBody {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn linear_velocity(&self) -> Vec2 {
        self.velocity
    }

    fn set_linear_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    fn gravity_scale(&self) -> f32 {
        self.gravity_scale
    }

    fn set_gravity_scale(&mut self, scale: f32) {
        self.gravity_scale = scale;
    }

    fn parent(&self) -> Option<SurfaceId> {
        self.parent
    }

    fn set_parent(&mut self, parent: Option<SurfaceId>) {
        self.parent = parent;
    }

    fn set_collision_with(&mut self, surface: SurfaceId, enabled: bool) {
        if enabled {
            self.disabled.remove(&surface);
        } else {
            self.disabled.insert(surface);
        }
        self.collision_log.push((surface, enabled));
    }
}

impl PlatformBody for ScriptedBody {
    fn set_pose(&mut self, pose: &Pose) {
        self.pose = Some(*pose);
    }

    fn detach_riders(&mut self) {
        self.detach_count += 1;
    }

    fn despawn(&mut self) {
        self.despawned = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sweep_hits_nearest_first() {
        let mut world = ScriptedBody::at(Vec2::ZERO);
        let far = world.add_slab(Slab::wall(3.0, SurfaceTag::Full));
        let near = world.add_slab(Slab::wall(1.0, SurfaceTag::Half));

        let cast = ShapeCast::new(Vec2::ZERO, Vec2::splat(0.1), Vec2::X, 5.0);
        let hits = world.cast_shape_all(&cast);
        assert_eq!(hits.iter().map(|h| h.surface).collect::<Vec<_>>(), vec![near, far]);
        assert!((hits[0].distance - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_sweep_respects_max_distance() {
        let mut world = ScriptedBody::at(Vec2::ZERO);
        world.add_slab(Slab::wall(3.0, SurfaceTag::Full));

        let cast = ShapeCast::new(Vec2::ZERO, Vec2::splat(0.1), Vec2::X, 2.0);
        assert!(world.cast_shape(&cast).is_none());
    }
}
