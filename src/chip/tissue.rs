//! Tissue cell registry and seeded placement.
//!
//! Cells are placed once at startup and keep their geometry for the life of
//! the process; a tutorial reset zeroes their exposure but never moves them.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::prelude::*;

use super::ChipLayout;
use crate::config::TissueParameters;

/// Half-thickness used for axon fibers (μm)
const AXON_HALF_THICKNESS_UM: f32 = 4.0;

/// Clearance kept between an axon terminal and the outlet edge (μm)
const AXON_TERMINAL_CLEARANCE_UM: f32 = 100.0;

/// The three cell kinds growing in the gel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    MotorNeuron,
    Axon,
    SchwannCell,
}

impl CellKind {
    pub fn label(self) -> &'static str {
        match self {
            CellKind::MotorNeuron => "Motor neuron",
            CellKind::Axon => "Axon",
            CellKind::SchwannCell => "Schwann cell",
        }
    }

    /// Exposure accrual rate relative to the motor-neuron base rate.
    ///
    /// Motor neurons respond fastest; axons and Schwann cells lag behind,
    /// and that asymmetry is what the tissue-response stage demonstrates.
    pub fn exposure_scale(self, params: &TissueParameters) -> f32 {
        match self {
            CellKind::MotorNeuron => 1.0,
            CellKind::Axon => params.axon_exposure_scale,
            CellKind::SchwannCell => params.schwann_exposure_scale,
        }
    }
}

/// One cell growing in the gel
#[derive(Debug, Clone)]
pub struct TissueCell {
    pub kind: CellKind,
    /// Body center; for axons, the left end of the segment (μm)
    pub position_um: Vec2,
    /// Body radius; for axons, the fiber half-thickness (μm)
    pub radius_um: f32,
    /// Horizontal segment length; zero for round cells (μm)
    pub length_um: f32,
    /// Rendering wobble phase (radians)
    pub phase: f32,
    /// Cumulative drug contact, clamped to [0, 1]
    pub drug_exposure: f32,
}

impl TissueCell {
    /// Far end of an axon segment; equals `position_um` for round cells
    pub fn end_um(&self) -> Vec2 {
        self.position_um + Vec2::new(self.length_um, 0.0)
    }
}

/// Seed the tissue population.
///
/// Somata land in the left part of the gel with jittered vertical offsets,
/// each sprouting one axon running rightward; Schwann cells wrap at random
/// offsets along randomly chosen axons.
pub fn seed_tissue(
    params: &TissueParameters,
    layout: &ChipLayout,
    rng: &mut StdRng,
) -> Vec<TissueCell> {
    let mut cells =
        Vec::with_capacity(2 * params.motor_neuron_count + params.schwann_cell_count);

    let gel_mid = layout.gel_mid_y();
    let y_min = layout.gel_top_y() + 2.0 * params.soma_radius_um;
    let y_max = layout.gel_bottom_y() - 2.0 * params.soma_radius_um;

    // (left end, length) per axon, for Schwann placement below
    let mut axon_spans: Vec<(Vec2, f32)> = Vec::with_capacity(params.motor_neuron_count);

    for _ in 0..params.motor_neuron_count {
        let x = rng.gen_range(params.soma_x_min_um..params.soma_x_max_um);
        let y_offset = symmetric_jitter(rng, params.soma_y_spread_um);
        let soma = Vec2::new(x, (gel_mid + y_offset).clamp(y_min, y_max));

        cells.push(TissueCell {
            kind: CellKind::MotorNeuron,
            position_um: soma,
            radius_um: params.soma_radius_um,
            length_um: 0.0,
            phase: rng.gen_range(0.0..TAU),
            drug_exposure: 0.0,
        });

        let nominal = params.axon_length_um + symmetric_jitter(rng, params.axon_length_jitter_um);
        let max_length = (layout.outlet_x() - AXON_TERMINAL_CLEARANCE_UM - soma.x).max(0.0);
        let length = nominal.clamp(0.0, max_length);

        cells.push(TissueCell {
            kind: CellKind::Axon,
            position_um: soma,
            radius_um: AXON_HALF_THICKNESS_UM,
            length_um: length,
            phase: rng.gen_range(0.0..TAU),
            drug_exposure: 0.0,
        });
        axon_spans.push((soma, length));
    }

    for _ in 0..params.schwann_cell_count {
        let Some(&(start, length)) = axon_spans.as_slice().choose(rng) else {
            break;
        };
        let along = rng.gen_range(0.15..0.95) * length;
        let offset_y = symmetric_jitter(rng, 10.0);

        cells.push(TissueCell {
            kind: CellKind::SchwannCell,
            position_um: Vec2::new(start.x + along, start.y + offset_y),
            radius_um: params.schwann_radius_um,
            length_um: 0.0,
            phase: rng.gen_range(0.0..TAU),
            drug_exposure: 0.0,
        });
    }

    cells
}

/// Uniform draw in ±amplitude; zero amplitude yields zero
fn symmetric_jitter(rng: &mut StdRng, amplitude: f32) -> f32 {
    if amplitude > 0.0 {
        rng.gen_range(-amplitude..amplitude)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChipParameters;

    fn seeded_cells(seed: u64) -> (Vec<TissueCell>, ChipLayout) {
        let layout = ChipLayout::new(&ChipParameters::default());
        let params = TissueParameters::default();
        let mut rng = StdRng::seed_from_u64(seed);
        (seed_tissue(&params, &layout, &mut rng), layout)
    }

    #[test]
    fn test_population_counts() {
        let (cells, _) = seeded_cells(42);
        let params = TissueParameters::default();

        let neurons = cells.iter().filter(|c| c.kind == CellKind::MotorNeuron).count();
        let axons = cells.iter().filter(|c| c.kind == CellKind::Axon).count();
        let schwann = cells.iter().filter(|c| c.kind == CellKind::SchwannCell).count();

        assert_eq!(neurons, params.motor_neuron_count);
        assert_eq!(axons, params.motor_neuron_count);
        assert_eq!(schwann, params.schwann_cell_count);
    }

    #[test]
    fn test_cells_start_unexposed_inside_gel() {
        let (cells, layout) = seeded_cells(42);

        for cell in &cells {
            assert_eq!(cell.drug_exposure, 0.0);
            assert!(
                cell.position_um.y > layout.gel_top_y()
                    && cell.position_um.y < layout.gel_bottom_y(),
                "{} at y = {} outside the gel band",
                cell.kind.label(),
                cell.position_um.y
            );
            assert!(
                cell.end_um().x <= layout.outlet_x(),
                "{} extends past the outlet",
                cell.kind.label()
            );
        }
    }

    #[test]
    fn test_seeding_is_reproducible() {
        let (a, _) = seeded_cells(7);
        let (b, _) = seeded_cells(7);
        let (c, _) = seeded_cells(8);

        assert_eq!(a.len(), b.len());
        for (left, right) in a.iter().zip(&b) {
            assert_eq!(left.position_um, right.position_um);
            assert_eq!(left.length_um, right.length_um);
        }
        assert!(
            a.iter().zip(&c).any(|(l, r)| l.position_um != r.position_um),
            "different seeds should shuffle placement"
        );
    }

    #[test]
    fn test_exposure_scales() {
        let params = TissueParameters::default();
        assert_eq!(CellKind::MotorNeuron.exposure_scale(&params), 1.0);
        assert!((CellKind::Axon.exposure_scale(&params) - 0.7).abs() < 1e-6);
        assert!((CellKind::SchwannCell.exposure_scale(&params) - 0.5).abs() < 1e-6);
    }
}
