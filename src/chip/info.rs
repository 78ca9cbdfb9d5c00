//! Static lookup table for the hover info panel.
//!
//! Pure presentation data: maps each hoverable entity to a label and a short
//! explanation. Nothing here touches simulation state.

use super::CellKind;

/// Hoverable entity tags on the chip schematic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoTopic {
    MotorNeuron,
    Axon,
    SchwannCell,
    PerfusionChannel,
    GelRegion,
    Inlet,
}

impl InfoTopic {
    /// All topics, in panel display order
    pub const ALL: [InfoTopic; 6] = [
        InfoTopic::Inlet,
        InfoTopic::PerfusionChannel,
        InfoTopic::GelRegion,
        InfoTopic::MotorNeuron,
        InfoTopic::Axon,
        InfoTopic::SchwannCell,
    ];

    /// Topic describing a tissue cell kind
    pub fn for_cell(kind: CellKind) -> Self {
        match kind {
            CellKind::MotorNeuron => InfoTopic::MotorNeuron,
            CellKind::Axon => InfoTopic::Axon,
            CellKind::SchwannCell => InfoTopic::SchwannCell,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            InfoTopic::MotorNeuron => "Motor neuron",
            InfoTopic::Axon => "Axon",
            InfoTopic::SchwannCell => "Schwann cell",
            InfoTopic::PerfusionChannel => "Perfusion channel",
            InfoTopic::GelRegion => "Tissue gel",
            InfoTopic::Inlet => "Inlet",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            InfoTopic::MotorNeuron => {
                "Cell body of a motor neuron embedded in the gel. Soma membranes \
                 take up the compound fastest, so these cells respond first as \
                 the diffusion level rises."
            }
            InfoTopic::Axon => {
                "Long projection carrying signals away from the soma. The fiber \
                 accumulates drug at about 70% of the soma rate, visible as a \
                 slower color shift along its length."
            }
            InfoTopic::SchwannCell => {
                "Glial cell wrapped around an axon. Its insulating wrap slows \
                 uptake to roughly half the neuron rate, the slowest response \
                 in this tissue."
            }
            InfoTopic::PerfusionChannel => {
                "Microfluidic channel carrying culture medium past the gel. Two \
                 channels, one above and one below the tissue, supply nutrients \
                 and deliver the drug under continuous flow."
            }
            InfoTopic::GelRegion => {
                "Hydrogel scaffold between the channels where the cells grow. \
                 Compounds reach the tissue only by diffusing out of the \
                 channels and through this matrix."
            }
            InfoTopic::Inlet => {
                "Entry port where the pump pushes medium into both channels. \
                 Switching the feed reservoir here is how drug is introduced \
                 and later washed out."
            }
        }
    }
}
