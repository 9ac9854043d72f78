// Fixed timestep accumulator
//
// Converts variable frame durations into a whole number of fixed
// simulation ticks. Callers supply the frame durations, so the same
// sequence of frames always produces the same sequence of ticks.

use std::time::Duration;

/// Target simulation rate (60 ticks per second)
pub const FIXED_TIMESTEP: f32 = 1.0 / 60.0;
const FIXED_TIMESTEP_DURATION: Duration = Duration::from_nanos(16_666_667); // ~1/60 second

/// Maximum number of ticks per frame to prevent spiral of death
pub const MAX_STEPS_PER_FRAME: u32 = 5;

/// Fixed timestep state
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    /// Time not yet consumed by a tick
    accumulator: Duration,

    /// Whether the simulation is paused
    paused: bool,

    /// Frames seen by `advance`
    frame_count: u64,

    /// Total ticks handed out
    tick_count: u64,
}

impl FixedTimestep {
    pub fn new() -> Self {
        Self {
            accumulator: Duration::ZERO,
            paused: false,
            frame_count: 0,
            tick_count: 0,
        }
    }

    /// Account for one frame, returns the number of fixed ticks to run
    pub fn advance(&mut self, frame_time: Duration) -> u32 {
        self.frame_count += 1;

        // If paused, don't accumulate time for ticks
        if self.paused {
            return 0;
        }

        self.accumulator += frame_time;

        let mut ticks = 0;
        while self.accumulator >= FIXED_TIMESTEP_DURATION && ticks < MAX_STEPS_PER_FRAME {
            self.accumulator -= FIXED_TIMESTEP_DURATION;
            ticks += 1;
        }

        // Drop time the cap refused so a long stall does not snowball
        if ticks == MAX_STEPS_PER_FRAME && self.accumulator >= FIXED_TIMESTEP_DURATION {
            log::debug!(
                "dropping {:?} of simulation time after a long frame",
                self.accumulator
            );
            self.accumulator = Duration::ZERO;
        }

        self.tick_count += u64::from(ticks);
        ticks
    }

    /// Get the fixed timestep for one tick (in seconds)
    pub fn fixed_timestep(&self) -> f32 {
        FIXED_TIMESTEP
    }

    /// Get the interpolation alpha for smooth rendering between ticks
    /// Alpha = accumulated_time / fixed_timestep
    pub fn alpha(&self) -> f32 {
        self.accumulator.as_secs_f32() / FIXED_TIMESTEP
    }

    /// Simulated time covered by the ticks handed out so far
    pub fn simulated_time(&self) -> Duration {
        FIXED_TIMESTEP_DURATION * self.tick_count as u32
    }

    /// Get total number of frames advanced
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get total number of ticks handed out
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Check if the simulation is paused
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Pause the simulation
    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            log::info!("Simulation paused");
        }
    }

    /// Resume the simulation
    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            // Reset accumulator to prevent tick burst
            self.accumulator = Duration::ZERO;
            log::info!("Simulation resumed");
        }
    }

    /// Toggle pause state
    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::new()
    }
}
