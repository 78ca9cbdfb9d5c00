//! Frame-paced playback clock.
//!
//! An explicit Stopped/Running state machine replacing the usual pattern of
//! a `running` flag plus a timestamp variable scattered through the frame
//! loop. Starting always captures a fresh reference instant, so a pause of
//! any length can never leak into the next frame's dt.

use std::time::Instant;

/// Lower clamp for the playback speed multiplier
pub const SPEED_MIN: f32 = 0.1;
/// Upper clamp for the playback speed multiplier
pub const SPEED_MAX: f32 = 8.0;

#[derive(Debug, Clone, Copy)]
enum ClockState {
    Stopped,
    Running { last_tick: Instant },
}

/// Playback clock feeding scaled wall-time deltas to the simulation
#[derive(Debug, Clone)]
pub struct PlayClock {
    state: ClockState,
    speed_multiplier: f32,
}

impl PlayClock {
    pub fn new() -> Self {
        Self {
            state: ClockState::Stopped,
            speed_multiplier: 1.0,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, ClockState::Running { .. })
    }

    pub fn speed_multiplier(&self) -> f32 {
        self.speed_multiplier
    }

    /// Set the speed multiplier, clamped to the supported range.
    ///
    /// Takes effect on the next tick; the elapsed interval already in
    /// flight is not retroactively rescaled.
    pub fn set_speed_multiplier(&mut self, speed: f32) {
        if !speed.is_finite() {
            return;
        }
        self.speed_multiplier = speed.clamp(SPEED_MIN, SPEED_MAX);
    }

    /// Enter Running with a fresh reference timestamp.
    ///
    /// Also safe while already running: the reference is simply recaptured.
    pub fn start(&mut self) {
        self.state = ClockState::Running {
            last_tick: Instant::now(),
        };
    }

    /// Enter Stopped. A stopped clock yields no ticks, which is the only
    /// cancellation primitive the frame loop needs.
    pub fn stop(&mut self) {
        self.state = ClockState::Stopped;
    }

    /// Flip between Running and Stopped; returns whether the clock now runs
    pub fn toggle(&mut self) -> bool {
        if self.is_running() {
            self.stop();
        } else {
            self.start();
        }
        self.is_running()
    }

    /// Scaled seconds since the previous tick, or `None` while stopped.
    ///
    /// Advances the reference timestamp, so consecutive calls measure
    /// consecutive intervals.
    pub fn tick(&mut self) -> Option<f32> {
        match &mut self.state {
            ClockState::Stopped => None,
            ClockState::Running { last_tick } => {
                let now = Instant::now();
                let elapsed = now.duration_since(*last_tick).as_secs_f32();
                *last_tick = now;
                Some(elapsed * self.speed_multiplier)
            }
        }
    }
}

impl Default for PlayClock {
    fn default() -> Self {
        Self::new()
    }
}
