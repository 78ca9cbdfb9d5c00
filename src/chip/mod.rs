//! Chip geometry and tissue registry.
//!
//! Defines the static world the simulation runs in: channel/gel band
//! layout, the seeded cell population, and the hover info table.

mod info;
mod layout;
mod tissue;

pub use info::InfoTopic;
pub use layout::{ChannelSide, ChipLayout, INLET_ZONE_UM};
pub use tissue::{seed_tissue, CellKind, TissueCell};
