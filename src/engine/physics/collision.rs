use rapier2d::prelude::*;
use std::collections::HashSet;

/// Collision groups for filtering what objects can collide with each other
///
/// Probes only ever query `Ground`, so characters never detect each other
/// as floors or walls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionGroups {
    /// Default group - interacts with everything
    Default = 0b0000_0001,

    /// Controlled characters
    Player = 0b0000_0010,

    /// Level geometry and moving platforms
    Ground = 0b0000_0100,
}

impl CollisionGroups {
    fn group(self) -> Group {
        Group::from_bits_truncate(self as u32)
    }

    /// Convert to rapier2d's InteractionGroups
    pub fn to_interaction_groups(self) -> InteractionGroups {
        let filter = match self {
            // Characters stand on ground but pass through each other
            CollisionGroups::Player => CollisionGroups::Ground.group(),

            CollisionGroups::Ground => {
                CollisionGroups::Player.group() | CollisionGroups::Default.group()
            }

            CollisionGroups::Default => Group::ALL,
        };

        InteractionGroups::new(self.group(), filter)
    }

    /// Groups for a scene query that only reports colliders in this group
    pub fn to_query_groups(self) -> InteractionGroups {
        InteractionGroups::new(Group::ALL, self.group())
    }
}

/// Collider pairs whose contacts are suppressed.
///
/// Passed to the physics pipeline as its hooks object; colliders opt in with
/// `ActiveHooks::FILTER_CONTACT_PAIRS`.
#[derive(Debug, Default)]
pub struct IgnoredPairs {
    pairs: HashSet<(ColliderHandle, ColliderHandle)>,
}

impl IgnoredPairs {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(a: ColliderHandle, b: ColliderHandle) -> (ColliderHandle, ColliderHandle) {
        if a.into_raw_parts() <= b.into_raw_parts() {
            (a, b)
        } else {
            (b, a)
        }
    }

    /// Returns true if the pair was not already ignored
    pub fn insert(&mut self, a: ColliderHandle, b: ColliderHandle) -> bool {
        self.pairs.insert(Self::key(a, b))
    }

    /// Returns true if the pair was ignored
    pub fn remove(&mut self, a: ColliderHandle, b: ColliderHandle) -> bool {
        self.pairs.remove(&Self::key(a, b))
    }

    pub fn contains(&self, a: ColliderHandle, b: ColliderHandle) -> bool {
        self.pairs.contains(&Self::key(a, b))
    }

    /// Forget every pair involving `collider`
    pub fn forget(&mut self, collider: ColliderHandle) {
        self.pairs.retain(|(a, b)| *a != collider && *b != collider);
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

// Implement rapier2d's PhysicsHooks trait for the ignore list
impl PhysicsHooks for IgnoredPairs {
    fn filter_contact_pair(&self, context: &PairFilterContext) -> Option<SolverFlags> {
        if self.contains(context.collider1, context.collider2) {
            None
        } else {
            Some(SolverFlags::COMPUTE_IMPULSES)
        }
    }
}
