//! Stage progression state machine.

use crate::sim::Simulation;

use super::{Stage, TutorialScript};

/// Tracks tour progress and drives stage transitions on the core.
///
/// The controller owns the script and the authoritative stage index; every
/// transition re-registers the index with the simulation and runs the
/// target stage's entry action.
pub struct StageController {
    script: TutorialScript,
    current: usize,
}

impl StageController {
    pub fn new(script: TutorialScript) -> Self {
        Self { script, current: 0 }
    }

    pub fn script(&self) -> &TutorialScript {
        &self.script
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_stage(&self) -> &Stage {
        self.script.stage(self.current)
    }

    pub fn stage_count(&self) -> usize {
        self.script.len()
    }

    /// Step to the next stage and run its entry action.
    ///
    /// Advancing past the final stage closes the loop: back to stage 0 with
    /// a full state reset in the same call. Playback is deliberately left
    /// alone so a running tour keeps rolling into its next lap.
    pub fn advance(&mut self, sim: &mut Simulation) {
        if self.current + 1 < self.script.len() {
            self.current += 1;
            sim.enter_stage(self.current, self.script.stage(self.current).entry_action);
        } else {
            self.current = 0;
            sim.reset();
        }
    }

    /// Return to stage 0 and clear all mutable simulation state
    pub fn reset(&mut self, sim: &mut Simulation) {
        self.current = 0;
        sim.reset();
    }

    /// Navigate straight to a stage, clamped to the script range.
    ///
    /// Runs only the target stage's entry action; unlike `reset`, nothing
    /// else is cleared, so state carried from earlier stages persists.
    pub fn jump_to(&mut self, sim: &mut Simulation, index: usize) {
        let index = index.min(self.script.last_index());
        self.current = index;
        sim.enter_stage(index, self.script.stage(index).entry_action);
    }
}
