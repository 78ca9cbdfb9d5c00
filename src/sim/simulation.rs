//! Simulation core: owns every piece of mutable run state.
//!
//! All physical and biological quantities live here, advanced by `update`
//! and mutated by stage-entry actions. Collaborators only ever see the
//! read-only [`Snapshot`]; nothing outside this struct holds a handle to
//! the particle pools or the cells.

use glam::Vec2;
use rand::prelude::*;
use rand_distr::StandardNormal;

use crate::chip::{seed_tissue, CellKind, ChannelSide, ChipLayout, TissueCell};
use crate::config::{Parameters, PerfusionParameters};

use super::{DiffusionParticle, DrugParticle, FlowParticle};

/// Flow-rate clamp applied at the setter boundary
pub const FLOW_RATE_MIN: f32 = 0.1;
/// Upper flow-rate clamp
pub const FLOW_RATE_MAX: f32 = 2.0;

/// Stage indices at which each transport regime switches on.
///
/// Resolved once from the tutorial script at startup; the core compares
/// plain indices during `update` instead of consulting the script.
#[derive(Debug, Clone, Copy)]
pub struct StageThresholds {
    /// First stage with active perfusion (front advance and drug spawning)
    pub flow: usize,
    /// First stage with active gel diffusion
    pub diffusion: usize,
    /// Terminal washout stage
    pub washout: usize,
}

/// State mutation bound to a stage entry.
///
/// Every action is idempotent, so re-entering a stage through the step
/// indicator cannot compound state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageAction {
    /// Zero the drug front so perfusion visibly starts at the inlet
    ResetDrugFront,
    /// Seed both diffusion batches; a no-op while particles already exist
    SeedDiffusionParticles,
    /// Bump the diffusion level up to the configured floor
    RaiseDiffusionFloor,
}

/// The simulation core
pub struct Simulation {
    params: Parameters,
    layout: ChipLayout,

    time_sec: f32,
    flow_rate: f32,
    drug_front: f32,
    diffusion_level: f32,

    cells: Vec<TissueCell>,
    flow_particles: Vec<FlowParticle>,
    /// Startup-seeded tracer pool, restored verbatim on reset
    flow_template: Vec<FlowParticle>,
    drug_particles: Vec<DrugParticle>,
    diffusion_particles: Vec<DiffusionParticle>,

    /// Mirrored from the stage controller for regime gating
    stage_index: usize,
    stage_entered_at_sec: f32,
    thresholds: StageThresholds,

    rng: StdRng,
}

impl Simulation {
    /// Build the core: derive the layout, seed tissue and the tracer pool.
    ///
    /// Placement is rolled exactly once here. Resets restore the seeded
    /// arrangement rather than re-rolling it.
    pub fn new(params: &Parameters, thresholds: StageThresholds) -> Self {
        let layout = ChipLayout::new(&params.chip);
        let mut rng = match params.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let cells = seed_tissue(&params.tissue, &layout, &mut rng);
        let flow_template = Self::seed_flow_pool(&params.perfusion, &layout, &mut rng);

        Self {
            params: params.clone(),
            flow_rate: params.perfusion.default_flow_rate,
            time_sec: 0.0,
            drug_front: 0.0,
            diffusion_level: 0.0,
            cells,
            flow_particles: flow_template.clone(),
            flow_template,
            drug_particles: Vec::new(),
            diffusion_particles: Vec::new(),
            stage_index: 0,
            stage_entered_at_sec: 0.0,
            thresholds,
            rng,
            layout,
        }
    }

    fn seed_flow_pool(
        perfusion: &PerfusionParameters,
        layout: &ChipLayout,
        rng: &mut StdRng,
    ) -> Vec<FlowParticle> {
        let mut pool = Vec::with_capacity(2 * perfusion.flow_particles_per_channel);
        for side in ChannelSide::BOTH {
            let (y0, y1) = layout.channel_band(side);
            for _ in 0..perfusion.flow_particles_per_channel {
                pool.push(FlowParticle {
                    position_um: Vec2::new(
                        rng.gen_range(0.0..layout.channel_length_um),
                        rng.gen_range(y0..y1),
                    ),
                    speed_um_per_sec: rng.gen_range(
                        perfusion.flow_speed_min_um_per_sec..perfusion.flow_speed_max_um_per_sec,
                    ),
                    side,
                });
            }
        }
        pool
    }

    /// Advance the simulation by `dt` seconds of scaled time.
    ///
    /// `dt` arrives pre-multiplied by the playback speed. Zero-length or
    /// malformed frames change nothing, including the per-frame spawn and
    /// jitter draws.
    pub fn update(&mut self, dt: f32) {
        if !(dt > 0.0) {
            return;
        }

        // === Phase 1: clock ===
        self.time_sec += dt;

        // === Phase 2: channel tracers (animate in every stage) ===
        self.advance_flow_particles(dt);

        // === Phase 3: perfusion front and drug transport ===
        if self.stage_index >= self.thresholds.flow {
            let advance = dt * self.params.perfusion.front_advance_rate_per_sec * self.flow_rate;
            self.drug_front = (self.drug_front + advance).clamp(0.0, 1.0);
            self.spawn_drug_particles();
        }
        self.advance_drug_particles(dt);

        // === Phase 4: gel diffusion ===
        let washing = self.washout_active();
        if self.stage_index >= self.thresholds.diffusion {
            self.settle_diffusion_particles(dt);
            if !washing {
                // Exposure integrates the level as seen at frame start, so a
                // 1 s step from level 0.5 accrues exactly base * kind * 0.5
                let level_gate = self.diffusion_level;
                let rise = dt * self.params.diffusion.level_rise_rate_per_sec;
                self.diffusion_level = (self.diffusion_level + rise).clamp(0.0, 1.0);
                self.accrue_exposure(level_gate, dt);
            }
        }

        // === Phase 5: washout decay ===
        if washing {
            self.apply_washout_decay(dt);
        }
    }

    fn advance_flow_particles(&mut self, dt: f32) {
        let span = self.layout.channel_length_um;
        let flow = self.flow_rate;
        for p in &mut self.flow_particles {
            p.position_um.x += p.speed_um_per_sec * flow * dt;
            if p.position_um.x > span {
                p.position_um.x = p.position_um.x.rem_euclid(span);
            }
        }
    }

    fn spawn_drug_particles(&mut self) {
        let perfusion = &self.params.perfusion;
        let probability = perfusion.drug_spawn_probability.clamp(0.0, 1.0);

        for side in ChannelSide::BOTH {
            if self.drug_particles.len() >= perfusion.drug_particle_cap {
                break;
            }
            if !self.rng.gen_bool(probability) {
                continue;
            }
            let (y0, y1) = self.layout.channel_band(side);
            self.drug_particles.push(DrugParticle {
                position_um: Vec2::new(self.layout.inlet_x(), self.rng.gen_range(y0..y1)),
                speed_um_per_sec: self.rng.gen_range(
                    perfusion.drug_speed_min_um_per_sec..perfusion.drug_speed_max_um_per_sec,
                ),
                side,
            });
        }
    }

    fn advance_drug_particles(&mut self, dt: f32) {
        let span = self.layout.channel_length_um;
        let flow = self.flow_rate;

        // Advance in place first, then compact, so particles spawned this
        // same frame move once before the removal pass runs
        for p in &mut self.drug_particles {
            p.position_um.x += p.speed_um_per_sec * flow * dt;
        }
        self.drug_particles.retain(|p| p.position_um.x <= span);
    }

    fn settle_diffusion_particles(&mut self, dt: f32) {
        let sigma = self.params.diffusion.jitter_sigma_um;
        let span = self.layout.channel_length_um;

        for p in &mut self.diffusion_particles {
            if !p.settled() {
                let direction = if p.descending { 1.0 } else { -1.0 };
                p.position_um.y += direction * p.speed_um_per_sec * dt;
            }
            // Brownian shimmer continues after settling; per frame, not per second
            let jitter: f32 = self.rng.sample(StandardNormal);
            p.position_um.x = (p.position_um.x + jitter * sigma).clamp(0.0, span);
        }
    }

    fn accrue_exposure(&mut self, level_gate: f32, dt: f32) {
        let base = self.params.tissue.exposure_base_rate_per_sec;
        for cell in &mut self.cells {
            let scale = cell.kind.exposure_scale(&self.params.tissue);
            cell.drug_exposure =
                (cell.drug_exposure + dt * base * scale * level_gate).clamp(0.0, 1.0);
        }
    }

    fn apply_washout_decay(&mut self, dt: f32) {
        let washout = &self.params.washout;
        self.diffusion_level =
            (self.diffusion_level - dt * washout.level_decay_per_sec).max(0.0);

        for cell in &mut self.cells {
            match cell.kind {
                CellKind::MotorNeuron | CellKind::SchwannCell => {
                    cell.drug_exposure =
                        (cell.drug_exposure - dt * washout.exposure_decay_per_sec).max(0.0);
                }
                // Axon exposure persists through washout; the fiber keeps
                // its accumulated stain for the rest of the run
                CellKind::Axon => {}
            }
        }
    }

    /// Whether washout decay is live: terminal stage entered and the
    /// post-entry delay has elapsed
    pub fn washout_active(&self) -> bool {
        self.stage_index >= self.thresholds.washout
            && (self.time_sec - self.stage_entered_at_sec) > self.params.washout.delay_sec
    }

    /// Register a stage transition and run its entry action.
    ///
    /// Called by the stage controller on every transition, including jumps
    /// back to an earlier stage.
    pub fn enter_stage(&mut self, index: usize, action: Option<StageAction>) {
        self.stage_index = index;
        self.stage_entered_at_sec = self.time_sec;
        if let Some(action) = action {
            self.apply_stage_action(action);
        }
    }

    /// Apply one stage-entry action
    pub fn apply_stage_action(&mut self, action: StageAction) {
        match action {
            StageAction::ResetDrugFront => self.drug_front = 0.0,
            StageAction::SeedDiffusionParticles => self.seed_diffusion_batches(),
            StageAction::RaiseDiffusionFloor => {
                self.diffusion_level =
                    self.diffusion_level.max(self.params.diffusion.floor_level);
            }
        }
    }

    fn seed_diffusion_batches(&mut self) {
        // Re-entering the stage must not double the population
        if !self.diffusion_particles.is_empty() {
            return;
        }

        let diffusion = &self.params.diffusion;
        let count = diffusion.particles_per_batch;
        self.diffusion_particles.reserve(2 * count);

        for side in ChannelSide::BOTH {
            let (half_start, half_end) = self.layout.gel_half(side);
            let (entry_y, descending) = match side {
                ChannelSide::Top => (self.layout.gel_top_y(), true),
                ChannelSide::Bottom => (self.layout.gel_bottom_y(), false),
            };
            for _ in 0..count {
                self.diffusion_particles.push(DiffusionParticle {
                    position_um: Vec2::new(
                        self.rng.gen_range(0.0..self.layout.channel_length_um),
                        entry_y,
                    ),
                    target_depth_um: self.rng.gen_range(half_start..half_end),
                    speed_um_per_sec: self.rng.gen_range(
                        diffusion.settle_speed_min_um_per_sec
                            ..diffusion.settle_speed_max_um_per_sec,
                    ),
                    descending,
                });
            }
        }
    }

    /// Restore every mutable quantity to its initial value.
    ///
    /// The tracer pool snaps back to its startup arrangement and cells keep
    /// their seeded geometry with exposure zeroed. Flow rate is a user
    /// setting and survives.
    pub fn reset(&mut self) {
        self.time_sec = 0.0;
        self.drug_front = 0.0;
        self.diffusion_level = 0.0;
        self.drug_particles.clear();
        self.diffusion_particles.clear();
        self.flow_particles.clone_from(&self.flow_template);
        for cell in &mut self.cells {
            cell.drug_exposure = 0.0;
        }
        self.stage_index = 0;
        self.stage_entered_at_sec = 0.0;
    }

    /// Set the pump flow rate, clamped to the supported range
    pub fn set_flow_rate(&mut self, rate: f32) {
        if !rate.is_finite() {
            return;
        }
        self.flow_rate = rate.clamp(FLOW_RATE_MIN, FLOW_RATE_MAX);
    }

    pub fn time_sec(&self) -> f32 {
        self.time_sec
    }

    pub fn flow_rate(&self) -> f32 {
        self.flow_rate
    }

    pub fn drug_front(&self) -> f32 {
        self.drug_front
    }

    pub fn diffusion_level(&self) -> f32 {
        self.diffusion_level
    }

    pub fn stage_index(&self) -> usize {
        self.stage_index
    }

    pub fn stage_entered_at_sec(&self) -> f32 {
        self.stage_entered_at_sec
    }

    pub fn thresholds(&self) -> StageThresholds {
        self.thresholds
    }

    pub fn layout(&self) -> &ChipLayout {
        &self.layout
    }

    pub fn params(&self) -> &Parameters {
        &self.params
    }

    pub fn cells(&self) -> &[TissueCell] {
        &self.cells
    }

    pub fn flow_particles(&self) -> &[FlowParticle] {
        &self.flow_particles
    }

    pub fn drug_particles(&self) -> &[DrugParticle] {
        &self.drug_particles
    }

    pub fn diffusion_particles(&self) -> &[DiffusionParticle] {
        &self.diffusion_particles
    }

    /// Read-only view of the full state for rendering
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            time_sec: self.time_sec,
            flow_rate: self.flow_rate,
            drug_front: self.drug_front,
            diffusion_level: self.diffusion_level,
            stage_index: self.stage_index,
            washout_active: self.washout_active(),
            cells: &self.cells,
            flow_particles: &self.flow_particles,
            drug_particles: &self.drug_particles,
            diffusion_particles: &self.diffusion_particles,
        }
    }
}

/// Read-only state view handed to the renderer each frame
#[derive(Debug)]
pub struct Snapshot<'a> {
    pub time_sec: f32,
    pub flow_rate: f32,
    pub drug_front: f32,
    pub diffusion_level: f32,
    pub stage_index: usize,
    pub washout_active: bool,
    pub cells: &'a [TissueCell],
    pub flow_particles: &'a [FlowParticle],
    pub drug_particles: &'a [DrugParticle],
    pub diffusion_particles: &'a [DiffusionParticle],
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_sim() -> Simulation {
        let params = Parameters {
            rng_seed: Some(99),
            ..Parameters::default()
        };
        let thresholds = StageThresholds {
            flow: 2,
            diffusion: 4,
            washout: 6,
        };
        Simulation::new(&params, thresholds)
    }

    #[test]
    fn test_zero_and_invalid_dt_are_noops() {
        let mut sim = test_sim();
        sim.enter_stage(2, Some(StageAction::ResetDrugFront));

        sim.update(0.0);
        sim.update(-1.0);
        sim.update(f32::NAN);

        assert_eq!(sim.time_sec(), 0.0);
        assert_eq!(sim.drug_front(), 0.0);
        assert!(sim.drug_particles().is_empty());
    }

    #[test]
    fn test_enter_stage_records_entry_time() {
        let mut sim = test_sim();
        sim.update(1.5);
        sim.enter_stage(3, None);
        assert_eq!(sim.stage_index(), 3);
        assert!((sim.stage_entered_at_sec() - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_set_flow_rate_clamps() {
        let mut sim = test_sim();
        sim.set_flow_rate(100.0);
        assert_eq!(sim.flow_rate(), FLOW_RATE_MAX);
        sim.set_flow_rate(0.0);
        assert_eq!(sim.flow_rate(), FLOW_RATE_MIN);
        sim.set_flow_rate(f32::NAN);
        assert_eq!(sim.flow_rate(), FLOW_RATE_MIN);
    }

    #[test]
    fn test_snapshot_mirrors_state() {
        let mut sim = test_sim();
        sim.enter_stage(4, Some(StageAction::SeedDiffusionParticles));
        sim.update(0.5);

        let snap = sim.snapshot();
        assert_eq!(snap.stage_index, 4);
        assert_eq!(snap.diffusion_particles.len(), 50);
        assert_eq!(snap.cells.len(), sim.cells().len());
        assert!((snap.time_sec - 0.5).abs() < 1e-6);
    }
}
