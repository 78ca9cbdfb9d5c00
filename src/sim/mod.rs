//! Simulation core: particle populations, transport state, and metrics.

mod metrics;
mod particles;
mod simulation;

pub use metrics::SimulationMetrics;
pub use particles::{DiffusionParticle, DrugParticle, FlowParticle};
pub use simulation::{
    Simulation, Snapshot, StageAction, StageThresholds, FLOW_RATE_MAX, FLOW_RATE_MIN,
};
