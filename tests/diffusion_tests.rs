//! Validation tests for gel diffusion: one-shot particle seeding, settling,
//! the bulk concentration level, and tissue exposure accrual.
//!
//! Rates under test:
//! - Concentration level: +0.10/s while the diffusion regime is active
//! - Exposure: 0.07/s base, scaled per kind (neuron 1.0, axon 0.7,
//!   Schwann 0.5) and by the level as sampled at frame start

use perfusion_tutor::{CellKind, Parameters, Simulation, StageAction, TutorialScript};

fn test_sim(seed: u64) -> Simulation {
    let params = Parameters {
        rng_seed: Some(seed),
        ..Parameters::default()
    };
    Simulation::new(&params, TutorialScript::standard().thresholds())
}

/// Enter the diffusion stage the way the script would
fn enter_diffusion(sim: &mut Simulation) {
    let stage = sim.thresholds().diffusion;
    sim.enter_stage(stage, Some(StageAction::SeedDiffusionParticles));
}

fn exposure_of(sim: &Simulation, kind: CellKind) -> Vec<f32> {
    sim.cells()
        .iter()
        .filter(|c| c.kind == kind)
        .map(|c| c.drug_exposure)
        .collect()
}

// ============================================================================
// Seeding Tests
// ============================================================================

#[test]
fn test_seeding_places_one_batch_per_gel_boundary() {
    let mut sim = test_sim(21);
    enter_diffusion(&mut sim);

    let per_batch = sim.params().diffusion.particles_per_batch;
    let particles = sim.diffusion_particles();
    assert_eq!(particles.len(), 2 * per_batch);

    let layout = sim.layout();
    let descending = particles.iter().filter(|p| p.descending).count();
    assert_eq!(descending, per_batch, "one full batch should enter from the top");

    for p in particles {
        if p.descending {
            assert_eq!(p.position_um.y, layout.gel_top_y());
            assert!(
                p.target_depth_um >= layout.gel_top_y() && p.target_depth_um <= layout.gel_mid_y(),
                "top batch target {} outside the upper gel half",
                p.target_depth_um
            );
        } else {
            assert_eq!(p.position_um.y, layout.gel_bottom_y());
            assert!(
                p.target_depth_um >= layout.gel_mid_y()
                    && p.target_depth_um <= layout.gel_bottom_y(),
                "bottom batch target {} outside the lower gel half",
                p.target_depth_um
            );
        }
    }
}

#[test]
fn test_seeding_twice_does_not_double_the_population() {
    let mut sim = test_sim(22);
    enter_diffusion(&mut sim);
    let count = sim.diffusion_particles().len();

    sim.apply_stage_action(StageAction::SeedDiffusionParticles);
    assert_eq!(
        sim.diffusion_particles().len(),
        count,
        "re-entering the stage must not reseed"
    );
}

#[test]
fn test_particles_settle_inside_their_gel_half() {
    let mut sim = test_sim(23);
    enter_diffusion(&mut sim);

    // Slowest particle crosses the half gel in under 25 s
    for _ in 0..60 {
        sim.update(0.5);
    }

    let layout = sim.layout();
    for p in sim.diffusion_particles() {
        assert!(p.settled(), "particle never reached its depth: {:?}", p);
        assert!(
            p.position_um.y >= layout.gel_top_y() && p.position_um.y <= layout.gel_bottom_y(),
            "settled particle left the gel at y = {}",
            p.position_um.y
        );
        assert!(
            p.position_um.x >= 0.0 && p.position_um.x <= layout.channel_length_um,
            "jitter pushed a particle outside the chip at x = {}",
            p.position_um.x
        );
    }
}

// ============================================================================
// Concentration Level Tests
// ============================================================================

#[test]
fn test_level_rises_only_in_the_diffusion_regime() {
    let mut sim = test_sim(24);

    // Steady-flow stage sits below the diffusion threshold
    sim.enter_stage(sim.thresholds().diffusion - 1, None);
    for _ in 0..5 {
        sim.update(1.0);
    }
    assert_eq!(sim.diffusion_level(), 0.0, "level rose before diffusion began");

    enter_diffusion(&mut sim);
    sim.update(1.0);
    assert!(
        (sim.diffusion_level() - 0.1).abs() < 1e-6,
        "one second of diffusion should lift the level to 0.1, got {}",
        sim.diffusion_level()
    );
}

#[test]
fn test_first_diffusion_second_accrues_no_exposure() {
    let mut sim = test_sim(25);
    enter_diffusion(&mut sim);

    // The level starts at zero, and accrual reads the frame-start level
    sim.update(1.0);
    for cell in sim.cells() {
        assert_eq!(
            cell.drug_exposure, 0.0,
            "{:?} accrued exposure before any drug was in the gel",
            cell.kind
        );
    }

    // From the second second on, the level is nonzero and exposure follows
    sim.update(1.0);
    for value in exposure_of(&sim, CellKind::MotorNeuron) {
        assert!(value > 0.0, "neuron exposure still zero after the level rose");
    }
}

#[test]
fn test_level_saturates_at_one() {
    let mut sim = test_sim(26);
    enter_diffusion(&mut sim);

    for _ in 0..15 {
        sim.update(1.0);
    }
    assert_eq!(sim.diffusion_level(), 1.0, "level should clamp at 1.0");

    sim.update(1.0);
    assert_eq!(sim.diffusion_level(), 1.0, "level left the clamp");
}

#[test]
fn test_floor_raise_never_lowers_the_level() {
    let mut sim = test_sim(27);
    enter_diffusion(&mut sim);

    // Lift the level well above the floor, then apply the floor action
    for _ in 0..8 {
        sim.update(1.0);
    }
    let before = sim.diffusion_level();
    assert!(before > sim.params().diffusion.floor_level);

    sim.apply_stage_action(StageAction::RaiseDiffusionFloor);
    assert_eq!(
        sim.diffusion_level(),
        before,
        "floor raise dragged an already-higher level down"
    );
}

// ============================================================================
// Exposure Accrual Tests
// ============================================================================

#[test]
fn test_one_second_from_half_level_accrues_per_kind_rates() {
    let mut sim = test_sim(28);

    // The tissue stage raises the level floor to exactly 0.5
    let tissue_stage = sim.thresholds().diffusion + 1;
    sim.enter_stage(tissue_stage, Some(StageAction::RaiseDiffusionFloor));
    assert_eq!(sim.diffusion_level(), 0.5);

    sim.update(1.0);

    for value in exposure_of(&sim, CellKind::MotorNeuron) {
        assert!(
            (value - 0.035).abs() < 1e-6,
            "neuron exposure after 1 s at level 0.5 should be 0.035, got {}",
            value
        );
    }
    for value in exposure_of(&sim, CellKind::Axon) {
        assert!(
            (value - 0.0245).abs() < 1e-6,
            "axon exposure should scale by 0.7, got {}",
            value
        );
    }
    for value in exposure_of(&sim, CellKind::SchwannCell) {
        assert!(
            (value - 0.0175).abs() < 1e-6,
            "Schwann exposure should scale by 0.5, got {}",
            value
        );
    }
    assert!(
        (sim.diffusion_level() - 0.6).abs() < 1e-6,
        "level should have risen to 0.6 after accrual sampled 0.5, got {}",
        sim.diffusion_level()
    );
}

#[test]
fn test_exposure_clamps_at_full_stain() {
    let mut params = Parameters::default();
    params.rng_seed = Some(29);
    params.tissue.exposure_base_rate_per_sec = 1.0;
    let mut sim = Simulation::new(&params, TutorialScript::standard().thresholds());

    let tissue_stage = sim.thresholds().diffusion + 1;
    sim.enter_stage(tissue_stage, Some(StageAction::RaiseDiffusionFloor));
    for _ in 0..10 {
        sim.update(1.0);
    }

    for cell in sim.cells() {
        assert!(
            cell.drug_exposure <= 1.0,
            "{:?} exposure escaped the clamp: {}",
            cell.kind,
            cell.drug_exposure
        );
    }
    for value in exposure_of(&sim, CellKind::MotorNeuron) {
        assert_eq!(value, 1.0, "neurons should saturate at an inflated rate");
    }
}
