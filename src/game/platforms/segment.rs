// Authored path segments for moving platforms

use glam::Vec2;

use super::PathError;

/// Motion performed by one segment
#[derive(Debug, Clone, PartialEq)]
pub enum SegmentKind {
    /// Straight move by a displacement relative to where the segment starts
    Linear { offset: Vec2 },
    /// Orbit around a pivot placed `radius` away at `center_angle_deg`
    /// (counter-clockwise from +X). Positive sweeps turn clockwise.
    Circular {
        radius: f32,
        center_angle_deg: f32,
        sweep_deg: f32,
    },
    /// Visit absolute waypoints in order
    Sequenced { waypoints: Vec<Vec2> },
}

/// One authored unit of a platform path.
///
/// Segments are immutable templates; playback progress lives in the mover.
#[derive(Debug, Clone, PartialEq)]
pub struct PathSegment {
    pub kind: SegmentKind,
    /// Units per second for linear and sequenced motion, degrees per second
    /// for circular motion
    pub speed: f32,
    pub wait_at_start: f32,
    pub wait_at_end: f32,
}

impl PathSegment {
    pub fn linear(offset: Vec2, speed: f32) -> Self {
        Self::new(SegmentKind::Linear { offset }, speed)
    }

    pub fn circular(radius: f32, center_angle_deg: f32, sweep_deg: f32, speed: f32) -> Self {
        Self::new(
            SegmentKind::Circular {
                radius,
                center_angle_deg,
                sweep_deg,
            },
            speed,
        )
    }

    pub fn sequenced(waypoints: Vec<Vec2>, speed: f32) -> Self {
        Self::new(SegmentKind::Sequenced { waypoints }, speed)
    }

    fn new(kind: SegmentKind, speed: f32) -> Self {
        Self {
            kind,
            speed,
            wait_at_start: 0.0,
            wait_at_end: 0.0,
        }
    }

    /// Set the pauses before and after the motion
    pub fn with_waits(mut self, start: f32, end: f32) -> Self {
        self.wait_at_start = start;
        self.wait_at_end = end;
        self
    }

    /// Wait drained before the motion when played in the given direction
    pub(crate) fn entry_wait(&self, reversed: bool) -> f32 {
        if reversed {
            self.wait_at_end
        } else {
            self.wait_at_start
        }
    }

    /// Wait drained after the motion when played in the given direction
    pub(crate) fn exit_wait(&self, reversed: bool) -> f32 {
        if reversed {
            self.wait_at_start
        } else {
            self.wait_at_end
        }
    }

    /// Linear displacement as seen by the given playback direction
    pub(crate) fn offset(&self, reversed: bool) -> Vec2 {
        match &self.kind {
            SegmentKind::Linear { offset } if reversed => -*offset,
            SegmentKind::Linear { offset } => *offset,
            _ => Vec2::ZERO,
        }
    }

    /// Pivot angle and signed sweep as seen by the given playback direction.
    /// Reversing shifts the pivot angle by the old sweep and negates it, so
    /// the pivot resolved from the end point matches the forward pivot.
    pub(crate) fn arc(&self, reversed: bool) -> (f32, f32, f32) {
        match &self.kind {
            SegmentKind::Circular {
                radius,
                center_angle_deg,
                sweep_deg,
            } if reversed => (*radius, center_angle_deg - sweep_deg, -sweep_deg),
            SegmentKind::Circular {
                radius,
                center_angle_deg,
                sweep_deg,
            } => (*radius, *center_angle_deg, *sweep_deg),
            _ => (0.0, 0.0, 0.0),
        }
    }

    /// Target number `cursor` in playback order.
    ///
    /// Reversed playback starts on the last waypoint, so it skips it and
    /// walks the rest backwards, ending on `entry` (where forward playback
    /// began). Without a known entry the whole list is walked backwards.
    pub(crate) fn waypoint(
        &self,
        cursor: usize,
        reversed: bool,
        entry: Option<Vec2>,
    ) -> Option<Vec2> {
        let SegmentKind::Sequenced { waypoints } = &self.kind else {
            return None;
        };
        if !reversed {
            return waypoints.get(cursor).copied();
        }

        let last = waypoints.len().checked_sub(1)?;
        match entry {
            Some(entry) if cursor == last => Some(entry),
            Some(_) => waypoints.get(last.checked_sub(cursor + 1)?).copied(),
            None => waypoints.get(last.checked_sub(cursor)?).copied(),
        }
    }

    /// Check the authored data can be played back
    pub fn validate(&self, index: usize) -> Result<(), PathError> {
        if !self.speed.is_finite() || self.speed <= 0.0 {
            return Err(PathError::InvalidSpeed {
                index,
                speed: self.speed,
            });
        }
        for wait in [self.wait_at_start, self.wait_at_end] {
            if !wait.is_finite() || wait < 0.0 {
                return Err(PathError::NegativeWait { index, wait });
            }
        }

        match &self.kind {
            SegmentKind::Linear { offset } if !offset.is_finite() => {
                Err(PathError::NonFinite { index })
            }
            SegmentKind::Circular {
                radius,
                center_angle_deg,
                sweep_deg,
            } => {
                if !center_angle_deg.is_finite() || !sweep_deg.is_finite() {
                    Err(PathError::NonFinite { index })
                } else if !radius.is_finite() || *radius <= 0.0 {
                    Err(PathError::InvalidRadius {
                        index,
                        radius: *radius,
                    })
                } else {
                    Ok(())
                }
            }
            SegmentKind::Sequenced { waypoints } if waypoints.iter().any(|p| !p.is_finite()) => {
                Err(PathError::NonFinite { index })
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_waits_swap_when_reversed() {
        let segment = PathSegment::linear(Vec2::X, 1.0).with_waits(0.5, 2.0);
        assert_eq!(segment.entry_wait(false), 0.5);
        assert_eq!(segment.exit_wait(false), 2.0);
        assert_eq!(segment.entry_wait(true), 2.0);
        assert_eq!(segment.exit_wait(true), 0.5);
    }

    #[test]
    fn test_reversed_geometry() {
        let linear = PathSegment::linear(Vec2::new(3.0, -1.0), 1.0);
        assert_eq!(linear.offset(true), Vec2::new(-3.0, 1.0));

        let circular = PathSegment::circular(2.0, 90.0, 180.0, 45.0);
        assert_eq!(circular.arc(false), (2.0, 90.0, 180.0));
        assert_eq!(circular.arc(true), (2.0, -90.0, -180.0));

        let sequenced = PathSegment::sequenced(vec![Vec2::X, Vec2::Y, Vec2::ONE], 1.0);
        assert_eq!(sequenced.waypoint(0, false, None), Some(Vec2::X));
        assert_eq!(sequenced.waypoint(0, true, None), Some(Vec2::ONE));
        assert_eq!(sequenced.waypoint(2, true, None), Some(Vec2::X));
        assert_eq!(sequenced.waypoint(3, true, None), None);
    }

    #[test]
    fn test_reversed_waypoints_end_at_entry() {
        let entry = Vec2::new(-1.0, 0.0);
        let sequenced = PathSegment::sequenced(vec![Vec2::X, Vec2::Y, Vec2::ONE], 1.0);

        let order: Vec<Option<Vec2>> = (0..4)
            .map(|cursor| sequenced.waypoint(cursor, true, Some(entry)))
            .collect();
        assert_eq!(order, vec![Some(Vec2::Y), Some(Vec2::X), Some(entry), None]);

        let empty = PathSegment::sequenced(Vec::new(), 1.0);
        assert_eq!(empty.waypoint(0, true, Some(entry)), None);
    }

    #[test]
    fn test_validate_rejects_bad_speed() {
        let segment = PathSegment::linear(Vec2::X, 0.0);
        assert_eq!(
            segment.validate(3),
            Err(PathError::InvalidSpeed {
                index: 3,
                speed: 0.0
            })
        );
        assert!(PathSegment::linear(Vec2::X, f32::INFINITY)
            .validate(0)
            .is_err());
    }

    #[test]
    fn test_validate_rejects_negative_wait() {
        let segment = PathSegment::linear(Vec2::X, 1.0).with_waits(0.0, -1.0);
        assert_eq!(
            segment.validate(0),
            Err(PathError::NegativeWait {
                index: 0,
                wait: -1.0
            })
        );
    }

    #[test]
    fn test_validate_rejects_zero_radius() {
        let segment = PathSegment::circular(0.0, 0.0, 90.0, 10.0);
        assert!(matches!(
            segment.validate(1),
            Err(PathError::InvalidRadius { index: 1, .. })
        ));
    }

    #[test]
    fn test_empty_waypoints_are_allowed() {
        assert!(PathSegment::sequenced(Vec::new(), 1.0).validate(0).is_ok());
    }
}
