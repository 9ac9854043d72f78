// Path playback for moving platforms

use glam::Vec2;
use log::debug;

use super::body::{PlatformBody, Pose};
use super::segment::{PathSegment, SegmentKind};
use super::PathError;
use crate::core::math::{move_towards_vec2, rotate_clockwise_around, unit_from_degrees};

/// What happens when playback runs past either end of the path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopPolicy {
    /// Finish according to the mover's [`FinishAction`]
    #[default]
    Stop,
    /// Snap back to the initial pose and start over
    Loop,
    /// Reverse direction and retrace the path
    PingPong,
}

/// How a `Stop` path finishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FinishAction {
    /// Stay where the path ended
    #[default]
    Freeze,
    /// Remove the platform from the world
    Despawn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackDirection {
    Forward,
    Backward,
}

impl PlaybackDirection {
    /// Index step: +1 or -1
    pub fn sign(&self) -> isize {
        match self {
            Self::Forward => 1,
            Self::Backward => -1,
        }
    }

    pub fn flipped(&self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }

    fn is_reversed(&self) -> bool {
        matches!(self, Self::Backward)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Motion {
    /// Absolute target, resolved when the motion starts
    Linear { target: Option<Vec2> },
    /// Pivot resolved when the motion starts; signed sweep left to turn
    Circular { pivot: Option<Vec2>, remaining: f32 },
    /// Next waypoint to reach
    Sequenced { cursor: usize },
}

/// Live progress through the segment at `index`
#[derive(Debug, Clone, Copy, PartialEq)]
struct SegmentProgress {
    index: usize,
    reversed: bool,
    /// Where forward playback of this segment began, if it has been played
    entry: Option<Vec2>,
    pre_wait: f32,
    post_wait: f32,
    motion: Motion,
}

impl SegmentProgress {
    fn enter(segment: &PathSegment, index: usize, reversed: bool, entry: Option<Vec2>) -> Self {
        let motion = match &segment.kind {
            SegmentKind::Linear { .. } => Motion::Linear { target: None },
            SegmentKind::Circular { .. } => Motion::Circular {
                pivot: None,
                remaining: segment.arc(reversed).2,
            },
            SegmentKind::Sequenced { .. } => Motion::Sequenced { cursor: 0 },
        };

        Self {
            index,
            reversed,
            entry,
            pre_wait: segment.entry_wait(reversed),
            post_wait: segment.exit_wait(reversed),
            motion,
        }
    }
}

/// Plays an authored path on one kinematic platform.
///
/// The authored segments are never mutated; each (re)entry builds a fresh
/// progress record, so a path can be replayed any number of times. Playback
/// depends only on the elapsed tick time.
#[derive(Debug, Clone)]
pub struct PlatformMover {
    path: Vec<PathSegment>,
    policy: LoopPolicy,
    finish: FinishAction,
    initial_pose: Pose,
    pose: Pose,
    direction: PlaybackDirection,
    moving: bool,
    progress: SegmentProgress,
    /// Pose position at each segment's last forward entry
    entries: Vec<Option<Vec2>>,
}

impl PlatformMover {
    /// Validate `path` and start playback from its first segment
    pub fn new(
        path: Vec<PathSegment>,
        initial_pose: Pose,
        policy: LoopPolicy,
        finish: FinishAction,
    ) -> Result<Self, PathError> {
        let first = path.first().ok_or(PathError::Empty)?;
        for (index, segment) in path.iter().enumerate() {
            segment.validate(index)?;
        }
        let progress = SegmentProgress::enter(first, 0, false, Some(initial_pose.position));
        let mut entries = vec![None; path.len()];
        entries[0] = Some(initial_pose.position);

        Ok(Self {
            path,
            policy,
            finish,
            initial_pose,
            pose: initial_pose,
            direction: PlaybackDirection::Forward,
            moving: true,
            progress,
            entries,
        })
    }

    /// Advance playback by one fixed tick
    pub fn tick<B: PlatformBody + ?Sized>(&mut self, body: &mut B, dt: f32) {
        if !self.moving {
            return;
        }

        let progress = &mut self.progress;
        if progress.pre_wait > 0.0 {
            progress.pre_wait = (progress.pre_wait - dt).max(0.0);
            return;
        }

        if self.is_segment_complete() {
            let progress = &mut self.progress;
            if progress.post_wait > 0.0 {
                progress.post_wait = (progress.post_wait - dt).max(0.0);
            } else {
                self.advance(body);
            }
            return;
        }

        self.step_motion(dt);
        body.set_pose(&self.pose);
    }

    /// Whether the active segment has finished its motion (waits aside)
    pub fn is_segment_complete(&self) -> bool {
        let segment = &self.path[self.progress.index];
        match self.progress.motion {
            Motion::Linear { target } => target == Some(self.pose.position),
            Motion::Circular { remaining, .. } => remaining == 0.0,
            Motion::Sequenced { cursor } => match &segment.kind {
                SegmentKind::Sequenced { waypoints } => cursor >= waypoints.len(),
                _ => true,
            },
        }
    }

    fn step_motion(&mut self, dt: f32) {
        let segment = &self.path[self.progress.index];
        let reversed = self.progress.reversed;
        let entry = self.progress.entry;
        let step = segment.speed * dt;
        let position = self.pose.position;

        match &mut self.progress.motion {
            Motion::Linear { target } => {
                let target = *target.get_or_insert(position + segment.offset(reversed));
                self.pose.position = move_towards_vec2(position, target, step);
            }
            Motion::Circular { pivot, remaining } => {
                let (radius, center_angle, _) = segment.arc(reversed);
                let pivot =
                    *pivot.get_or_insert(position + unit_from_degrees(center_angle) * radius);

                let left = if *remaining < 0.0 {
                    (*remaining + step).min(0.0)
                } else {
                    (*remaining - step).max(0.0)
                };
                self.pose.position = rotate_clockwise_around(position, pivot, *remaining - left);
                *remaining = left;
            }
            Motion::Sequenced { cursor } => {
                if let Some(target) = segment.waypoint(*cursor, reversed, entry) {
                    self.pose.position = move_towards_vec2(position, target, step);
                    if self.pose.position == target {
                        *cursor += 1;
                    }
                }
            }
        }
    }

    fn advance<B: PlatformBody + ?Sized>(&mut self, body: &mut B) {
        let next = self.progress.index as isize + self.direction.sign();
        if let Some(index) = usize::try_from(next).ok().filter(|i| *i < self.path.len()) {
            self.enter(index);
            debug!("platform advanced to segment {index}");
            return;
        }

        match self.policy {
            LoopPolicy::Loop => {
                body.detach_riders();
                self.direction = PlaybackDirection::Forward;
                self.pose = self.initial_pose;
                self.enter(0);
                body.set_pose(&self.pose);
                debug!("platform path looped");
            }
            LoopPolicy::PingPong => {
                self.direction = self.direction.flipped();
                self.enter(self.progress.index);
                debug!("platform path reversed, now {:?}", self.direction);
            }
            LoopPolicy::Stop => {
                self.moving = false;
                if self.finish == FinishAction::Despawn {
                    body.despawn();
                }
                debug!("platform path finished ({:?})", self.finish);
            }
        }
    }

    fn enter(&mut self, index: usize) {
        let reversed = self.direction.is_reversed();
        if !reversed {
            self.entries[index] = Some(self.pose.position);
        }
        let entry = self.entries[index];
        self.progress = SegmentProgress::enter(&self.path[index], index, reversed, entry);
    }

    /// Current pose, as last written to the body
    pub fn pose(&self) -> Pose {
        self.pose
    }

    pub fn initial_pose(&self) -> Pose {
        self.initial_pose
    }

    pub fn segment_index(&self) -> usize {
        self.progress.index
    }

    pub fn direction(&self) -> PlaybackDirection {
        self.direction
    }

    pub fn is_moving(&self) -> bool {
        self.moving
    }

    pub fn policy(&self) -> LoopPolicy {
        self.policy
    }

    pub fn path(&self) -> &[PathSegment] {
        &self.path
    }

    /// Pause or resume playback without losing progress
    pub fn set_moving(&mut self, moving: bool) {
        self.moving = moving;
    }
}
