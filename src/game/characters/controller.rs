// Per-tick character controller

use glam::Vec2;
use log::debug;

use super::body::CharacterBody;
use super::config::ControllerConfig;
use super::fall_through::FallThroughTimers;
use super::state::{ClingPhase, ClingState, DashState, JumpBudget, Locomotion};
use crate::core::math::{lerp, move_towards};
use crate::engine::input::InputFrame;
use crate::game::contact::ContactState;
use crate::game::surface::SurfaceId;

/// Drives one character: movement, jumps, wall clinging, bullet dashes,
/// dropping through one-way platforms and riding moving platforms.
///
/// All state here is owned by this controller. Each call to [`tick`] reads
/// contact through the body's probes, updates the sub-state machines and
/// writes velocity, gravity scale, parenting and collision toggles back.
///
/// [`tick`]: CharacterController::tick
#[derive(Debug, Clone)]
pub struct CharacterController {
    config: ControllerConfig,
    contact: ContactState,
    jumps: JumpBudget,
    dash: DashState,
    cling: ClingState,
    fall_through: FallThroughTimers,
    jump_cooldown: f32,
    can_move: bool,
    clung_this_tick: bool,
}

impl CharacterController {
    /// Create a controller with full jump and dash budgets
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            contact: ContactState::default(),
            jumps: JumpBudget::new(config.jump_capacity()),
            dash: DashState::new(config.bullet_dash_capacity),
            cling: ClingState::new(config.wall_cling_smear_delay),
            fall_through: FallThroughTimers::new(),
            jump_cooldown: 0.0,
            can_move: true,
            clung_this_tick: false,
            config,
        }
    }

    /// Advance the controller by one fixed tick
    pub fn tick<B: CharacterBody + ?Sized>(&mut self, body: &mut B, input: &InputFrame, dt: f32) {
        self.fall_through.tick(body, dt);

        let cooldown_expired = self.tick_cooldown(dt);
        self.sense(body);
        self.update_riding(body);
        self.decay_dash(body);

        self.clung_this_tick = false;
        if self.can_move {
            self.drive(body, input, cooldown_expired, dt);
        }
        if !self.clung_this_tick {
            self.let_go(body);
        }
    }

    /// Restore anything the controller changed on the body and refill budgets.
    /// Call before despawning or teleporting the character.
    pub fn reset<B: CharacterBody + ?Sized>(&mut self, body: &mut B) {
        self.fall_through.cancel_all(body);
        self.dash.cancel();
        self.dash.refill();
        self.jumps.refill(self.config.jump_capacity());
        self.cling.reset(self.config.wall_cling_smear_delay);
        self.cling.set_last_direction(0);
        self.jump_cooldown = 0.0;
        self.can_move = true;
        body.set_gravity_scale(self.config.base_gravity_scale);
        body.set_parent(None);
    }

    fn tick_cooldown(&mut self, dt: f32) -> bool {
        if self.jump_cooldown <= 0.0 {
            return false;
        }
        self.jump_cooldown = (self.jump_cooldown - dt).max(0.0);
        self.jump_cooldown == 0.0
    }

    fn sense<B: CharacterBody + ?Sized>(&mut self, body: &mut B) {
        let origin = body.position();
        self.contact = ContactState::classify(&*body, origin, &self.config.probes);

        if !self.contact.touches_wall() {
            self.let_go(body);
            self.cling.reset(self.config.wall_cling_smear_delay);
        }
    }

    fn update_riding<B: CharacterBody + ?Sized>(&mut self, body: &mut B) {
        let platform = self
            .contact
            .ground_surface
            .filter(|surface| body.is_rideable(*surface));

        if body.parent() != platform {
            match platform {
                Some(surface) => debug!("riding platform {surface}"),
                None => debug!("left platform"),
            }
            body.set_parent(platform);
        }
    }

    fn decay_dash<B: CharacterBody + ?Sized>(&mut self, body: &mut B) {
        if !self.dash.is_decaying() {
            return;
        }

        if self
            .dash
            .decay(self.config.dash_decay, self.config.dash_settle_speed_sq)
        {
            self.can_move = true;
            debug!("dash settled, control restored");
            return;
        }

        let velocity = body.linear_velocity();
        body.set_linear_velocity(Vec2::new(self.dash.velocity().x, velocity.y));
    }

    fn drive<B: CharacterBody + ?Sized>(
        &mut self,
        body: &mut B,
        input: &InputFrame,
        cooldown_expired: bool,
        dt: f32,
    ) {
        let speed = self.config.move_speed;
        let velocity = body.linear_velocity();
        let vx = move_towards(velocity.x, input.axis.x * speed, self.config.acceleration)
            .clamp(-speed, speed);
        body.set_linear_velocity(Vec2::new(vx, velocity.y));

        let grounded = self.contact.is_grounded();
        if grounded && self.jump_cooldown <= 0.0 {
            self.land();
        } else if cooldown_expired && !grounded && !self.cling.is_active() && self.dash.refill() {
            debug!("dash charges refilled in the air");
        }

        let wall = self.contact.wall_direction(input.axis.x, 0.0);
        if !grounded && wall != 0 && wall != self.cling.last_direction() {
            self.wall_cling(body, wall, dt);
        }

        if input.jump_pressed {
            self.jump(body);
        }
        if input.dash_pressed {
            self.bullet_dash(body, input.aim, input.axis.x);
        }

        self.fall_through_platform(body, input.axis.y);
    }

    fn land(&mut self) {
        let refilled_jumps = self.jumps.refill(self.config.jump_capacity());
        let refilled_dashes = self.dash.refill();
        self.cling.reset(self.config.wall_cling_smear_delay);
        self.cling.set_last_direction(0);

        if refilled_jumps || refilled_dashes {
            debug!(
                "landed: {} jumps, {} dashes",
                self.jumps.remaining(),
                self.dash.remaining()
            );
        }
    }

    fn wall_cling<B: CharacterBody + ?Sized>(&mut self, body: &mut B, direction: i8, dt: f32) {
        self.clung_this_tick = true;

        if self.cling.phase() == ClingPhase::Released {
            // Timer already spent on this wall contact.
            self.cling.set_last_direction(direction);
            return;
        }

        let entering = self.cling.phase() == ClingPhase::Ready;
        if self.cling.direction() == 0 {
            self.dash.refill();
        }

        let mut velocity = body.linear_velocity();
        if entering {
            velocity.y = 0.0;
            debug!("cling entered on {direction}");
        }

        self.cling.grip(direction);
        let base = self.config.base_gravity_scale;
        match self.cling.advance(dt) {
            ClingPhase::Holding | ClingPhase::Ready => {
                body.set_gravity_scale(0.0);
                if !entering {
                    velocity.y = -self.config.cling_trickle_speed;
                }
            }
            ClingPhase::Releasing => {
                body.set_gravity_scale(lerp(0.0, base, self.cling.timer().abs()));
            }
            ClingPhase::Released => {
                body.set_gravity_scale(base);
                self.cling.release(direction);
                debug!("cling on {direction} ran out");
            }
        }
        body.set_linear_velocity(velocity);
    }

    /// Drop the grip without spending the cling timer
    fn let_go<B: CharacterBody + ?Sized>(&mut self, body: &mut B) {
        if self.cling.direction() != 0 {
            self.cling.let_go();
            body.set_gravity_scale(self.config.base_gravity_scale);
        }
    }

    fn jump<B: CharacterBody + ?Sized>(&mut self, body: &mut B) {
        if self.cling.is_active() {
            self.wall_jump(body);
            return;
        }

        if !self.jumps.try_spend() {
            return;
        }

        let velocity = body.linear_velocity();
        body.set_linear_velocity(Vec2::new(velocity.x, self.config.jump_force));
        self.jump_cooldown = self.config.jump_cooldown;
        debug!("jump, {} left", self.jumps.remaining());
    }

    fn wall_jump<B: CharacterBody + ?Sized>(&mut self, body: &mut B) {
        let direction = self.cling.direction();

        // The wall grants the charge the launch spends.
        self.jumps.grant(1);
        self.jumps.try_spend();

        let force = self.config.wall_jump_force;
        self.launch(body, Vec2::new(force.x * -f32::from(direction), force.y));

        self.cling.release(direction);
        body.set_gravity_scale(self.config.base_gravity_scale);
        self.jump_cooldown = self.config.jump_cooldown;
        debug!("wall jump off {direction}");
    }

    fn bullet_dash<B: CharacterBody + ?Sized>(&mut self, body: &mut B, aim: Vec2, horizontal: f32) {
        let direction = aim.normalize_or_zero();
        if direction == Vec2::ZERO {
            return;
        }

        // Dashing off a wall locks it out; dashing in open air unlocks both.
        let pushing = horizontal.abs() > self.config.wall_input_threshold;
        let wall = if !self.contact.is_grounded() && pushing {
            i8::from(self.contact.right_wall) - i8::from(self.contact.left_wall)
        } else {
            0
        };
        if !self.dash.try_spend() {
            return;
        }
        self.cling.set_last_direction(wall);

        self.launch(body, direction * self.config.bullet_dash_force);
        self.jump_cooldown = self.config.dash_cooldown;
        debug!("bullet dash toward {direction}, {} left", self.dash.remaining());
    }

    /// Set a decaying launch velocity and hand control to it
    fn launch<B: CharacterBody + ?Sized>(&mut self, body: &mut B, velocity: Vec2) {
        body.set_linear_velocity(velocity);
        self.dash.launch(velocity);
        self.can_move = false;
    }

    fn fall_through_platform<B: CharacterBody + ?Sized>(&mut self, body: &mut B, vertical: f32) {
        if vertical == 0.0 {
            return;
        }
        if let Some(surface) = self.contact.one_way_ground() {
            self.fall_through
                .disable(body, surface, self.config.fall_through_delay);
        }
    }

    /// Get the tunables this controller runs with
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Contact state computed on the last tick
    pub fn contact(&self) -> &ContactState {
        &self.contact
    }

    pub fn remaining_jumps(&self) -> u8 {
        self.jumps.remaining()
    }

    pub fn remaining_dashes(&self) -> u8 {
        self.dash.remaining()
    }

    /// Launch velocity still decaying, zero when none
    pub fn dash_velocity(&self) -> Vec2 {
        self.dash.velocity()
    }

    pub fn cling(&self) -> &ClingState {
        &self.cling
    }

    pub fn jump_cooldown(&self) -> f32 {
        self.jump_cooldown
    }

    /// Whether movement input is currently applied
    pub fn can_move(&self) -> bool {
        self.can_move
    }

    /// Time until collision with `surface` is restored, if it is disabled
    pub fn fall_through_remaining(&self, surface: SurfaceId) -> Option<f32> {
        self.fall_through.remaining(surface)
    }

    /// Coarse state for animation and AI consumers
    pub fn locomotion(&self) -> Locomotion {
        if self.dash.is_decaying() {
            Locomotion::Dashing
        } else if self.cling.is_active() {
            Locomotion::Clinging
        } else if self.contact.is_grounded() {
            Locomotion::Grounded
        } else {
            Locomotion::Airborne
        }
    }
}
