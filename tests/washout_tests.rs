//! Validation tests for the washout stage: the post-entry delay, decay of
//! the gel level and of cell exposure, the axon retention exception, and
//! the quantities washout must never touch.

use perfusion_tutor::{CellKind, Parameters, Simulation, StageAction, TutorialScript};

/// Simulation mid-tour with drug already in the gel.
///
/// Runs `build_sec` seconds of the diffusion stage, so the level sits at
/// `0.1 * build_sec` (capped at 1.0) and every cell carries exposure.
fn washout_ready_sim(seed: u64, build_sec: usize) -> Simulation {
    let params = Parameters {
        rng_seed: Some(seed),
        ..Parameters::default()
    };
    let mut sim = Simulation::new(&params, TutorialScript::standard().thresholds());
    sim.enter_stage(
        sim.thresholds().diffusion,
        Some(StageAction::SeedDiffusionParticles),
    );
    for _ in 0..build_sec {
        sim.update(1.0);
    }
    sim
}

fn exposure_of(sim: &Simulation, kind: CellKind) -> Vec<f32> {
    sim.cells()
        .iter()
        .filter(|c| c.kind == kind)
        .map(|c| c.drug_exposure)
        .collect()
}

// ============================================================================
// Delay Window Tests
// ============================================================================

#[test]
fn test_decay_waits_out_the_entry_delay() {
    let mut sim = washout_ready_sim(41, 4);
    assert!((sim.diffusion_level() - 0.4).abs() < 1e-6);

    sim.enter_stage(sim.thresholds().washout, None);
    assert!(!sim.washout_active(), "decay must not start at stage entry");

    // Inside the delay the gel keeps filling rather than draining
    sim.update(1.0);
    assert!(!sim.washout_active());
    assert!(
        (sim.diffusion_level() - 0.5).abs() < 1e-6,
        "level should still rise 1 s into the delay, got {}",
        sim.diffusion_level()
    );

    // The delay boundary is exclusive: exactly 2 s in, still filling
    sim.update(1.0);
    assert!(!sim.washout_active());
    assert!(
        (sim.diffusion_level() - 0.6).abs() < 1e-6,
        "level should still rise exactly at the delay boundary, got {}",
        sim.diffusion_level()
    );

    // Past the boundary the drain takes over
    sim.update(1.0);
    assert!(sim.washout_active());
    assert!(
        (sim.diffusion_level() - 0.48).abs() < 1e-6,
        "level should drop by 0.12 in the first draining second, got {}",
        sim.diffusion_level()
    );
}

// ============================================================================
// Decay Tests
// ============================================================================

#[test]
fn test_decay_hits_level_and_round_cells_but_not_axons() {
    let mut sim = washout_ready_sim(42, 12);
    assert_eq!(sim.diffusion_level(), 1.0);

    sim.enter_stage(sim.thresholds().washout, None);

    let level_before = sim.diffusion_level();
    let neurons_before = exposure_of(&sim, CellKind::MotorNeuron);
    let schwann_before = exposure_of(&sim, CellKind::SchwannCell);

    // One frame that crosses the delay and drains for its full length
    sim.update(2.5);
    assert!(sim.washout_active());

    assert!(
        sim.diffusion_level() < level_before,
        "gel level should drain, got {} from {}",
        sim.diffusion_level(),
        level_before
    );
    for (after, before) in exposure_of(&sim, CellKind::MotorNeuron)
        .iter()
        .zip(&neurons_before)
    {
        assert!(after < before, "neuron exposure should wash: {} from {}", after, before);
    }
    for (after, before) in exposure_of(&sim, CellKind::SchwannCell)
        .iter()
        .zip(&schwann_before)
    {
        assert!(after < before, "Schwann exposure should wash: {} from {}", after, before);
    }

    // Axons keep their stain once draining starts
    let axons_at_drain = exposure_of(&sim, CellKind::Axon);
    sim.update(5.0);
    for (later, earlier) in exposure_of(&sim, CellKind::Axon).iter().zip(&axons_at_drain) {
        assert_eq!(later, earlier, "axon exposure must not wash out");
    }
}

#[test]
fn test_long_washout_floors_at_zero_while_axons_hold() {
    let mut sim = washout_ready_sim(43, 12);
    sim.enter_stage(sim.thresholds().washout, None);

    for _ in 0..40 {
        sim.update(1.0);
    }

    assert_eq!(sim.diffusion_level(), 0.0, "level should floor at zero");
    for value in exposure_of(&sim, CellKind::MotorNeuron) {
        assert_eq!(value, 0.0, "neuron exposure should floor at zero");
    }
    for value in exposure_of(&sim, CellKind::SchwannCell) {
        assert_eq!(value, 0.0, "Schwann exposure should floor at zero");
    }
    for value in exposure_of(&sim, CellKind::Axon) {
        assert!(
            value > 0.0,
            "axons should still carry their stain after a full washout"
        );
    }

    // Settling never paused while the gel drained
    for p in sim.diffusion_particles() {
        assert!(p.settled(), "particle still drifting after 40 s: {:?}", p);
    }
}

// ============================================================================
// Untouched Quantity Tests
// ============================================================================

#[test]
fn test_washout_never_reduces_the_drug_front() {
    let mut sim = washout_ready_sim(44, 12);
    sim.enter_stage(sim.thresholds().washout, None);

    let mut previous = sim.drug_front();
    for _ in 0..30 {
        sim.update(1.0);
        assert!(
            sim.drug_front() >= previous,
            "front receded during washout: {} from {}",
            sim.drug_front(),
            previous
        );
        previous = sim.drug_front();
    }
    assert_eq!(
        sim.drug_front(),
        1.0,
        "with the pump still on, the front should finish the channel"
    );
}
