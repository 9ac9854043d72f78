// Controller tunables - loaded by the caller and treated as immutable here

use glam::Vec2;

use super::ConfigError;
use crate::game::probe::ProbeConfig;

/// Movement tunables for one character
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerConfig {
    // Movement
    /// Maximum horizontal speed (units/second)
    pub move_speed: f32,
    /// Maximum horizontal speed change per tick
    pub acceleration: f32,

    // Jumping
    /// Jumps available in the air after leaving the ground
    pub air_jumps: u8,
    /// Vertical velocity set by a jump
    pub jump_force: f32,
    /// Launch velocity of a wall jump, mirrored away from the wall
    pub wall_jump_force: Vec2,
    /// Time after any jump during which landing refills are held back
    pub jump_cooldown: f32,

    // Wall clinging
    /// How long a fresh cling holds before gravity starts returning
    pub wall_cling_smear_delay: f32,
    /// Downward speed held while gripping
    pub cling_trickle_speed: f32,
    /// Horizontal input needed to count as pushing into a wall when dashing
    pub wall_input_threshold: f32,

    // Bullet dash
    /// Dash charges available between refills
    pub bullet_dash_capacity: u8,
    /// Launch speed of a dash
    pub bullet_dash_force: f32,
    /// Multiplier applied to the stored dash velocity every tick
    pub dash_decay: f32,
    /// Squared speed below which a decaying dash ends
    pub dash_settle_speed_sq: f32,
    /// Jump cooldown armed by a dash
    pub dash_cooldown: f32,

    // Platforms
    /// How long collision with a one-way platform stays off after dropping through
    pub fall_through_delay: f32,

    // Physics
    /// Gravity scale outside of clinging
    pub base_gravity_scale: f32,
    /// Probe box geometry
    pub probes: ProbeConfig,
}

/// Baseline tuning used by the demo stage and tests
pub const DEFAULT_CONTROLLER: ControllerConfig = ControllerConfig {
    move_speed: 8.0,
    acceleration: 0.6,

    air_jumps: 1,
    jump_force: 10.0,
    wall_jump_force: Vec2::new(8.0, 10.0),
    jump_cooldown: 0.1,

    wall_cling_smear_delay: 0.25,
    cling_trickle_speed: 0.5,
    wall_input_threshold: 0.5,

    bullet_dash_capacity: 1,
    bullet_dash_force: 20.0,
    dash_decay: 0.98,
    dash_settle_speed_sq: 1.0,
    dash_cooldown: 0.1,

    fall_through_delay: 0.2,

    base_gravity_scale: 1.0,
    probes: ProbeConfig {
        body_half_extent: 0.5,
        feet_size: Vec2::new(0.9, 0.1),
        hand_size: Vec2::new(0.1, 0.8),
    },
};

impl Default for ControllerConfig {
    fn default() -> Self {
        DEFAULT_CONTROLLER
    }
}

impl ControllerConfig {
    /// Jumps granted by a refill: the ground jump plus every air jump
    pub fn jump_capacity(&self) -> u8 {
        self.air_jumps.saturating_add(1)
    }

    /// Check every tunable is usable by the controller
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("move_speed", self.move_speed)?;
        non_negative("acceleration", self.acceleration)?;
        non_negative("jump_force", self.jump_force)?;
        finite("wall_jump_force.x", self.wall_jump_force.x)?;
        finite("wall_jump_force.y", self.wall_jump_force.y)?;
        non_negative("jump_cooldown", self.jump_cooldown)?;
        non_negative("wall_cling_smear_delay", self.wall_cling_smear_delay)?;
        non_negative("cling_trickle_speed", self.cling_trickle_speed)?;
        within("wall_input_threshold", self.wall_input_threshold, 0.0, 1.0)?;
        non_negative("bullet_dash_force", self.bullet_dash_force)?;
        if !(self.dash_decay > 0.0 && self.dash_decay < 1.0) {
            return Err(ConfigError::OutOfRange {
                field: "dash_decay",
                value: self.dash_decay,
                min: 0.0,
                max: 1.0,
            });
        }
        positive("dash_settle_speed_sq", self.dash_settle_speed_sq)?;
        non_negative("dash_cooldown", self.dash_cooldown)?;
        non_negative("fall_through_delay", self.fall_through_delay)?;
        non_negative("base_gravity_scale", self.base_gravity_scale)?;
        positive("probes.body_half_extent", self.probes.body_half_extent)?;
        positive("probes.feet_size.x", self.probes.feet_size.x)?;
        positive("probes.feet_size.y", self.probes.feet_size.y)?;
        positive("probes.hand_size.x", self.probes.hand_size.x)?;
        positive("probes.hand_size.y", self.probes.hand_size.y)?;
        Ok(())
    }
}

fn finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotFinite { field })
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

fn within(field: &'static str, value: f32, min: f32, max: f32) -> Result<(), ConfigError> {
    finite(field, value)?;
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}
