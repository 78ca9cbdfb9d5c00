//! Unified simulation metrics for the HUD and export.
//!
//! Aggregates the displayable numbers from the core into one structure the
//! status panel can render and the CSV/JSON exporters can serialize.

use serde::{Deserialize, Serialize};

use crate::chip::CellKind;

use super::Simulation;

/// Aggregated metrics snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationMetrics {
    // === Timing ===
    /// Simulated seconds elapsed in the current run
    pub time_sec: f32,
    /// Active tutorial stage index
    pub stage_index: usize,
    /// Active stage title (filled in by the session layer)
    pub stage_title: String,
    /// Whether playback is running
    pub running: bool,
    /// Playback speed multiplier
    pub speed_multiplier: f32,

    // === Transport ===
    /// Pump flow rate (multiple of the reference setting)
    pub flow_rate: f32,
    /// Drug front progress along the channel (0-1)
    pub drug_front: f32,
    /// Gel diffusion level (0-1)
    pub diffusion_level: f32,
    /// Whether washout decay is live
    pub washout_active: bool,

    // === Tissue exposure (0-1 per kind) ===
    /// Mean motor neuron exposure
    pub neuron_exposure_mean: f32,
    /// Highest motor neuron exposure
    pub neuron_exposure_max: f32,
    /// Mean axon exposure
    pub axon_exposure_mean: f32,
    /// Highest axon exposure
    pub axon_exposure_max: f32,
    /// Mean Schwann cell exposure
    pub schwann_exposure_mean: f32,
    /// Highest Schwann cell exposure
    pub schwann_exposure_max: f32,

    // === Populations ===
    /// Medium tracers in flight
    pub flow_particle_count: usize,
    /// Live drug particles
    pub drug_particle_count: usize,
    /// Seeded diffusion particles
    pub diffusion_particle_count: usize,
    /// Diffusion particles that reached their target depth
    pub diffusion_settled_count: usize,
}

impl Default for SimulationMetrics {
    fn default() -> Self {
        Self {
            time_sec: 0.0,
            stage_index: 0,
            stage_title: String::new(),
            running: false,
            speed_multiplier: 1.0,

            flow_rate: 0.0,
            drug_front: 0.0,
            diffusion_level: 0.0,
            washout_active: false,

            neuron_exposure_mean: 0.0,
            neuron_exposure_max: 0.0,
            axon_exposure_mean: 0.0,
            axon_exposure_max: 0.0,
            schwann_exposure_mean: 0.0,
            schwann_exposure_max: 0.0,

            flow_particle_count: 0,
            drug_particle_count: 0,
            diffusion_particle_count: 0,
            diffusion_settled_count: 0,
        }
    }
}

impl SimulationMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refresh every core-derived field from the simulation.
    ///
    /// Stage title, running flag, and speed are session-level facts and are
    /// left untouched here.
    pub fn update_from_simulation(&mut self, sim: &Simulation) {
        self.time_sec = sim.time_sec();
        self.stage_index = sim.stage_index();
        self.flow_rate = sim.flow_rate();
        self.drug_front = sim.drug_front();
        self.diffusion_level = sim.diffusion_level();
        self.washout_active = sim.washout_active();

        let (neuron_mean, neuron_max) = exposure_stats(sim, CellKind::MotorNeuron);
        let (axon_mean, axon_max) = exposure_stats(sim, CellKind::Axon);
        let (schwann_mean, schwann_max) = exposure_stats(sim, CellKind::SchwannCell);
        self.neuron_exposure_mean = neuron_mean;
        self.neuron_exposure_max = neuron_max;
        self.axon_exposure_mean = axon_mean;
        self.axon_exposure_max = axon_max;
        self.schwann_exposure_mean = schwann_mean;
        self.schwann_exposure_max = schwann_max;

        self.flow_particle_count = sim.flow_particles().len();
        self.drug_particle_count = sim.drug_particles().len();
        self.diffusion_particle_count = sim.diffusion_particles().len();
        self.diffusion_settled_count = sim
            .diffusion_particles()
            .iter()
            .filter(|p| p.settled())
            .count();
    }
}

fn exposure_stats(sim: &Simulation, kind: CellKind) -> (f32, f32) {
    let mut sum = 0.0f32;
    let mut max = 0.0f32;
    let mut count = 0usize;

    for cell in sim.cells().iter().filter(|c| c.kind == kind) {
        sum += cell.drug_exposure;
        max = max.max(cell.drug_exposure);
        count += 1;
    }

    if count == 0 {
        (0.0, 0.0)
    } else {
        (sum / count as f32, max)
    }
}
