// Character sub-state machines: jump budget, bullet dash and wall cling

use glam::Vec2;

use crate::core::math::TIMER_EPSILON;

/// Coarse locomotion state, derived from the sub-state machines each tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Locomotion {
    /// Standing on any surface
    Grounded,
    /// In the air with normal control
    #[default]
    Airborne,
    /// Gripping a wall
    Clinging,
    /// Carried by a decaying dash or wall-jump launch; movement input ignored
    Dashing,
}

/// Remaining jumps since the last refill
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JumpBudget {
    remaining: u8,
}

impl JumpBudget {
    pub fn new(remaining: u8) -> Self {
        Self { remaining }
    }

    pub fn remaining(&self) -> u8 {
        self.remaining
    }

    /// Reset to a full budget
    pub fn refill(&mut self, capacity: u8) -> bool {
        let changed = self.remaining != capacity;
        self.remaining = capacity;
        changed
    }

    /// Add charges (wall jumps grant one before spending it)
    pub fn grant(&mut self, charges: u8) {
        self.remaining = self.remaining.saturating_add(charges);
    }

    /// Consume one jump; false (and no change) when exhausted
    pub fn try_spend(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }
}

/// Dash charges plus the launch velocity still decaying from the last dash
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashState {
    remaining: u8,
    capacity: u8,
    velocity: Vec2,
}

impl DashState {
    /// Start with a full set of charges
    pub fn new(capacity: u8) -> Self {
        Self {
            remaining: capacity,
            capacity,
            velocity: Vec2::ZERO,
        }
    }

    pub fn remaining(&self) -> u8 {
        self.remaining
    }

    pub fn capacity(&self) -> u8 {
        self.capacity
    }

    /// Velocity still being applied by the last launch
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn is_decaying(&self) -> bool {
        self.velocity != Vec2::ZERO
    }

    /// Restore every charge; returns whether anything changed
    pub fn refill(&mut self) -> bool {
        let changed = self.remaining != self.capacity;
        self.remaining = self.capacity;
        changed
    }

    /// Consume one charge; false (and no change) when exhausted
    pub fn try_spend(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }

    /// Start a new decaying launch
    pub fn launch(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    /// Damp the stored velocity once. Returns true on the tick the launch
    /// settles, after which the stored velocity is exactly zero.
    pub fn decay(&mut self, factor: f32, settle_speed_sq: f32) -> bool {
        if !self.is_decaying() {
            return false;
        }
        self.velocity *= factor;
        if self.velocity.length_squared() < settle_speed_sq {
            self.velocity = Vec2::ZERO;
            return true;
        }
        false
    }

    /// Drop any launch in progress
    pub fn cancel(&mut self) {
        self.velocity = Vec2::ZERO;
    }
}

/// Where a wall cling is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClingPhase {
    /// Timer is full; the next grip is a fresh entry
    Ready,
    /// Gravity off, holding a slow trickle
    Holding,
    /// Gravity returning as the timer runs toward -1
    Releasing,
    /// Timer spent; gravity fully restored
    Released,
}

/// Timed wall-cling state.
///
/// The timer runs from the smear delay down to -1: non-negative values hold
/// the character in place, negative values ramp gravity back in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClingState {
    direction: i8,
    last_direction: i8,
    timer: f32,
    phase: ClingPhase,
}

impl ClingState {
    pub fn new(smear_delay: f32) -> Self {
        Self {
            direction: 0,
            last_direction: 0,
            timer: smear_delay,
            phase: ClingPhase::Ready,
        }
    }

    /// Wall currently gripped: -1 left, +1 right, 0 none
    pub fn direction(&self) -> i8 {
        self.direction
    }

    /// Wall that cannot be gripped again until the lock is cleared
    pub fn last_direction(&self) -> i8 {
        self.last_direction
    }

    pub fn timer(&self) -> f32 {
        self.timer
    }

    pub fn phase(&self) -> ClingPhase {
        self.phase
    }

    /// Gripping a wall with time left on the timer
    pub fn is_active(&self) -> bool {
        self.direction != 0 && self.phase != ClingPhase::Released
    }

    /// Rearm the grace timer (landing, or no wall in reach)
    pub fn reset(&mut self, smear_delay: f32) {
        self.direction = 0;
        self.timer = smear_delay;
        self.phase = ClingPhase::Ready;
    }

    /// Start (or resume) gripping the wall on `direction`
    pub fn grip(&mut self, direction: i8) {
        self.direction = direction;
        if self.phase == ClingPhase::Ready {
            self.phase = ClingPhase::Holding;
        }
    }

    /// Let go without spending the timer
    pub fn let_go(&mut self) {
        self.direction = 0;
    }

    /// Run the timer down by one tick and return the new phase
    pub fn advance(&mut self, dt: f32) -> ClingPhase {
        self.timer = (self.timer - dt).max(-1.0);
        self.phase = if self.timer <= -1.0 + TIMER_EPSILON {
            self.timer = -1.0;
            ClingPhase::Released
        } else if self.timer < 0.0 {
            ClingPhase::Releasing
        } else {
            ClingPhase::Holding
        };
        self.phase
    }

    /// Spend the timer at once and lock out the wall on `direction`
    pub fn release(&mut self, direction: i8) {
        self.timer = -1.0;
        self.phase = ClingPhase::Released;
        self.direction = 0;
        self.last_direction = direction;
    }

    /// Lock out re-gripping the wall on `direction` (0 unlocks both)
    pub fn set_last_direction(&mut self, direction: i8) {
        self.last_direction = direction;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_jump_budget_never_underflows() {
        let mut budget = JumpBudget::new(1);
        assert!(budget.try_spend());
        assert!(!budget.try_spend());
        assert_eq!(budget.remaining(), 0);
    }

    #[test]
    fn test_wall_jump_accounting_is_neutral() {
        let mut budget = JumpBudget::new(0);
        budget.grant(1);
        assert!(budget.try_spend());
        assert_eq!(budget.remaining(), 0);
    }

    #[test]
    fn test_dash_charges_stay_within_capacity() {
        let mut dash = DashState::new(2);
        assert!(dash.try_spend());
        assert!(dash.try_spend());
        assert!(!dash.try_spend());
        assert_eq!(dash.remaining(), 0);

        assert!(dash.refill());
        assert!(!dash.refill());
        assert_eq!(dash.remaining(), dash.capacity());
    }

    #[test]
    fn test_dash_decay_settles_to_zero() {
        let mut dash = DashState::new(1);
        dash.launch(Vec2::new(2.0, 0.0));

        assert!(!dash.decay(0.5, 0.5));
        assert_relative_eq!(dash.velocity().x, 1.0);

        assert!(dash.decay(0.5, 0.5));
        assert_eq!(dash.velocity(), Vec2::ZERO);
        assert!(!dash.is_decaying());
        assert!(!dash.decay(0.5, 0.5));
    }

    #[test]
    fn test_cling_phases_follow_timer() {
        let mut cling = ClingState::new(0.2);
        assert_eq!(cling.phase(), ClingPhase::Ready);

        cling.grip(1);
        assert!(cling.is_active());
        assert_eq!(cling.advance(0.1), ClingPhase::Holding);
        assert_eq!(cling.advance(0.2), ClingPhase::Releasing);
        assert_relative_eq!(cling.timer(), -0.1, epsilon = 1e-6);
        assert_eq!(cling.advance(5.0), ClingPhase::Released);
        assert_eq!(cling.timer(), -1.0);
        assert!(!cling.is_active());
    }

    #[test]
    fn test_cling_timer_stays_in_range() {
        let smear = 0.25;
        let mut cling = ClingState::new(smear);
        cling.grip(-1);
        for _ in 0..200 {
            cling.advance(1.0 / 60.0);
            assert!(cling.timer() >= -1.0 && cling.timer() <= smear);
        }
        assert_eq!(cling.phase(), ClingPhase::Released);
    }

    #[test]
    fn test_release_locks_direction() {
        let mut cling = ClingState::new(0.5);
        cling.grip(1);
        cling.release(1);
        assert_eq!(cling.direction(), 0);
        assert_eq!(cling.last_direction(), 1);
        assert_eq!(cling.timer(), -1.0);

        cling.reset(0.5);
        assert_eq!(cling.phase(), ClingPhase::Ready);
        assert_eq!(cling.last_direction(), 1);
    }
}
