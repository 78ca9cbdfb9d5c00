//! Session facade tying the core, stage controller, and clock together.
//!
//! UI surfaces (windowed renderer, headless runner, tests) drive a session
//! exclusively through this type; none of them reach into the owned parts
//! directly for mutation.

use crate::chip::ChipLayout;
use crate::config::Parameters;
use crate::playback::PlayClock;
use crate::sim::{Simulation, SimulationMetrics, Snapshot};
use crate::tutorial::{Stage, StageController, TutorialScript};

/// One user-facing tutorial session
pub struct TutorialSession {
    sim: Simulation,
    controller: StageController,
    clock: PlayClock,
}

/// Everything the renderer needs for one frame
pub struct SessionSnapshot<'a> {
    pub sim: Snapshot<'a>,
    pub stage: &'a Stage,
    pub stage_count: usize,
    pub running: bool,
    pub speed_multiplier: f32,
}

impl TutorialSession {
    /// Build a session running the standard tour
    pub fn new(params: Parameters) -> Self {
        Self::with_script(params, TutorialScript::standard())
    }

    /// Build a session with a custom stage script
    pub fn with_script(params: Parameters, script: TutorialScript) -> Self {
        let sim = Simulation::new(&params, script.thresholds());
        let controller = StageController::new(script);

        log::info!(
            "Session ready: {} stages, {} cells, flow rate {:.2}",
            controller.stage_count(),
            sim.cells().len(),
            sim.flow_rate()
        );

        Self {
            sim,
            controller,
            clock: PlayClock::new(),
        }
    }

    pub fn start_playback(&mut self) {
        self.clock.start();
    }

    pub fn stop_playback(&mut self) {
        self.clock.stop();
    }

    /// Flip playback; returns whether it now runs
    pub fn toggle_playback(&mut self) -> bool {
        self.clock.toggle()
    }

    pub fn is_running(&self) -> bool {
        self.clock.is_running()
    }

    pub fn set_speed_multiplier(&mut self, speed: f32) {
        self.clock.set_speed_multiplier(speed);
    }

    pub fn speed_multiplier(&self) -> f32 {
        self.clock.speed_multiplier()
    }

    /// Step to the next stage (wrapping past the end with a full reset)
    pub fn advance_stage(&mut self) {
        self.controller.advance(&mut self.sim);
        log::info!(
            "Stage {}: {}",
            self.controller.current_index(),
            self.controller.current_stage().title
        );
    }

    /// Stop playback, return to stage 0, and clear all mutable state
    pub fn reset_all(&mut self) {
        self.clock.stop();
        self.controller.reset(&mut self.sim);
        log::info!("Session reset to stage 0");
    }

    /// Navigate straight to a stage via the step indicator
    pub fn jump_to_stage(&mut self, index: usize) {
        self.controller.jump_to(&mut self.sim, index);
        log::debug!(
            "Jumped to stage {}: {}",
            self.controller.current_index(),
            self.controller.current_stage().title
        );
    }

    pub fn set_flow_rate(&mut self, rate: f32) {
        self.sim.set_flow_rate(rate);
    }

    pub fn flow_rate(&self) -> f32 {
        self.sim.flow_rate()
    }

    /// Consume one clock tick if playback runs; returns whether the core advanced
    pub fn frame(&mut self) -> bool {
        match self.clock.tick() {
            Some(dt) => {
                self.sim.update(dt);
                true
            }
            None => false,
        }
    }

    /// Advance by an explicit dt, bypassing the clock (headless runs, tests)
    pub fn step(&mut self, dt: f32) {
        self.sim.update(dt);
    }

    pub fn stage_index(&self) -> usize {
        self.controller.current_index()
    }

    pub fn stage_count(&self) -> usize {
        self.controller.stage_count()
    }

    pub fn current_stage(&self) -> &Stage {
        self.controller.current_stage()
    }

    pub fn layout(&self) -> &ChipLayout {
        self.sim.layout()
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    pub fn snapshot(&self) -> SessionSnapshot<'_> {
        SessionSnapshot {
            sim: self.sim.snapshot(),
            stage: self.controller.current_stage(),
            stage_count: self.controller.stage_count(),
            running: self.clock.is_running(),
            speed_multiplier: self.clock.speed_multiplier(),
        }
    }

    /// Aggregate metrics for the HUD and exporters
    pub fn metrics(&self) -> SimulationMetrics {
        let mut metrics = SimulationMetrics::new();
        metrics.update_from_simulation(&self.sim);
        metrics.stage_title = self.controller.current_stage().title.to_string();
        metrics.running = self.clock.is_running();
        metrics.speed_multiplier = self.clock.speed_multiplier();
        metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_session() -> TutorialSession {
        TutorialSession::new(Parameters {
            rng_seed: Some(21),
            ..Parameters::default()
        })
    }

    #[test]
    fn test_frame_is_inert_until_playback_starts() {
        let mut session = test_session();
        assert!(!session.frame());
        assert_eq!(session.simulation().time_sec(), 0.0);

        session.start_playback();
        assert!(session.frame());
    }

    #[test]
    fn test_metrics_carry_session_facts() {
        let mut session = test_session();
        session.set_speed_multiplier(2.0);
        session.advance_stage();

        let metrics = session.metrics();
        assert_eq!(metrics.stage_index, 1);
        assert_eq!(metrics.stage_title, session.current_stage().title);
        assert!(!metrics.running);
        assert_eq!(metrics.speed_multiplier, 2.0);
    }

    #[test]
    fn test_snapshot_reflects_stage_metadata() {
        let mut session = test_session();
        session.jump_to_stage(4);

        let snapshot = session.snapshot();
        assert_eq!(snapshot.sim.stage_index, 4);
        assert_eq!(snapshot.stage_count, 7);
        assert_eq!(snapshot.stage.title, "Diffusion into the gel");
        assert_eq!(snapshot.sim.diffusion_particles.len(), 50);
    }
}
