//! Mouse hit-testing for the educational hotspots.

use glam::Vec2;

use crate::chip::{CellKind, ChipLayout, InfoTopic, TissueCell};

/// Extra slack around a round cell body for easier picking (µm)
const CELL_PICK_SLACK_UM: f32 = 10.0;

/// Pick distance from an axon centerline (µm)
const AXON_PICK_UM: f32 = 12.0;

/// Resolve the info topic under the pointer, if any.
///
/// Takes the pointer in chip coordinates (µm). Cells take precedence over
/// the regions underneath them, and among overlapping cells the one the
/// pointer sits deepest inside wins.
pub fn topic_at(
    layout: &ChipLayout,
    cells: &[TissueCell],
    x_um: f32,
    y_um: f32,
) -> Option<InfoTopic> {
    let point_um = Vec2::new(x_um, y_um);
    let mut best: Option<(f32, InfoTopic)> = None;
    for cell in cells {
        let penetration = match cell.kind {
            CellKind::Axon => {
                AXON_PICK_UM - distance_to_segment(point_um, cell.position_um, cell.end_um())
            }
            _ => cell.radius_um + CELL_PICK_SLACK_UM - point_um.distance(cell.position_um),
        };
        if penetration >= 0.0 {
            match best {
                Some((depth, _)) if depth >= penetration => {}
                _ => best = Some((penetration, InfoTopic::for_cell(cell.kind))),
            }
        }
    }
    if let Some((_, topic)) = best {
        return Some(topic);
    }

    if layout.near_inlet(point_um) {
        return Some(InfoTopic::Inlet);
    }
    if layout.channel_at(point_um).is_some() {
        return Some(InfoTopic::PerfusionChannel);
    }
    if layout.in_gel(point_um) {
        return Some(InfoTopic::GelRegion);
    }
    None
}

fn distance_to_segment(point: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return point.distance(a);
    }
    let t = ((point - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    point.distance(a + ab * t)
}
