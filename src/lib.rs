//! Perfusion Tutor - interactive tutorial simulator for a microfluidic
//! drug-perfusion chip
//!
//! This library models a lab-on-chip device in which motor neurons grow in a
//! hydrogel between two perfusion channels, and walks the viewer through a
//! staged drug-delivery experiment: loading, perfusion, diffusion into the
//! gel, tissue exposure, and washout.

pub mod chip;
pub mod config;
pub mod export;
pub mod playback;
pub mod render;
pub mod session;
pub mod sim;
pub mod tutorial;

pub use chip::{CellKind, ChannelSide, ChipLayout, InfoTopic, TissueCell};
pub use config::Parameters;
pub use playback::PlayClock;
pub use session::{SessionSnapshot, TutorialSession};
pub use sim::{Simulation, SimulationMetrics, Snapshot, StageAction, StageThresholds};
pub use tutorial::{HighlightTarget, Stage, StageController, TutorialScript};
