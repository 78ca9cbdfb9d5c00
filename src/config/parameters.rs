//! Parameter structures for the perfusion tutorial.
//!
//! Values are calibrated for a legible guided tour rather than quantitative
//! accuracy: the on-screen pacing (how long the drug front takes to cross,
//! how quickly cells respond) is the design target.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level parameters container
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameters {
    /// Chip geometry (channel and gel dimensions)
    pub chip: ChipParameters,
    /// Tissue population and exposure response
    pub tissue: TissueParameters,
    /// Perfusion flow and drug transport
    pub perfusion: PerfusionParameters,
    /// Gel diffusion behavior
    pub diffusion: DiffusionParameters,
    /// Washout stage behavior
    pub washout: WashoutParameters,
    /// Optional RNG seed for reproducible placement and spawn draws.
    /// Not read from parameter files; set programmatically or via `--seed`.
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

impl Parameters {
    /// Load parameters from JSON files, or use defaults if files don't exist
    pub fn load_or_default() -> Self {
        Self::load_from_dir("data/parameters")
    }

    /// Load parameters from a specific directory
    pub fn load_from_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();

        Self {
            chip: ChipParameters::load_or_default(dir.join("chip.json")),
            tissue: TissueParameters::load_or_default(dir.join("tissue.json")),
            perfusion: PerfusionParameters::load_or_default(dir.join("perfusion.json")),
            diffusion: DiffusionParameters::load_or_default(dir.join("diffusion.json")),
            washout: WashoutParameters::load_or_default(dir.join("washout.json")),
            rng_seed: None,
        }
    }
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            chip: ChipParameters::default(),
            tissue: TissueParameters::default(),
            perfusion: PerfusionParameters::default(),
            diffusion: DiffusionParameters::default(),
            washout: WashoutParameters::default(),
            rng_seed: None,
        }
    }
}

/// Load one parameter group from a JSON file, falling back to defaults
fn load_group<T, P>(path: P, label: &str) -> T
where
    T: serde::de::DeserializeOwned + Default,
    P: AsRef<Path>,
{
    match std::fs::read_to_string(path.as_ref()) {
        Ok(contents) => match serde_json::from_str(&contents) {
            Ok(params) => {
                log::info!("Loaded {} parameters from {:?}", label, path.as_ref());
                params
            }
            Err(e) => {
                log::warn!("Failed to parse {} parameters: {}, using defaults", label, e);
                T::default()
            }
        },
        Err(_) => {
            log::info!("{} parameters file not found, using defaults", label);
            T::default()
        }
    }
}

/// Chip geometry parameters
///
/// The device is modeled in 2D: two perfusion channels sandwiching a
/// tissue-mimicking gel region, with flow running left to right.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChipParameters {
    /// Channel length (μm), inlet at x = 0
    pub channel_length_um: f32,

    /// Height of each perfusion channel (μm)
    pub channel_height_um: f32,

    /// Height of the gel region between the channels (μm)
    pub gel_height_um: f32,
}

impl ChipParameters {
    /// Load from JSON file or return defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        load_group(path, "chip")
    }
}

impl Default for ChipParameters {
    fn default() -> Self {
        Self {
            // Organ-on-chip devices commonly run channels a few mm long
            // with channel heights around 0.1-0.3 mm
            channel_length_um: 6000.0,
            channel_height_um: 220.0,
            gel_height_um: 1200.0,
        }
    }
}

/// Tissue population and exposure parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TissueParameters {
    /// Number of motor neuron somata seeded in the gel
    pub motor_neuron_count: usize,

    /// Soma radius (μm)
    pub soma_radius_um: f32,

    /// Lower x bound for soma placement (μm)
    pub soma_x_min_um: f32,
    /// Upper x bound for soma placement (μm)
    pub soma_x_max_um: f32,

    /// Vertical spread of somata around the gel midline (μm)
    pub soma_y_spread_um: f32,

    /// Nominal axon length (μm), extending rightward from the soma
    pub axon_length_um: f32,
    /// Per-axon length jitter, uniform in ±this value (μm)
    pub axon_length_jitter_um: f32,

    /// Number of Schwann cells wrapped along the axons
    pub schwann_cell_count: usize,
    /// Schwann cell radius (μm)
    pub schwann_radius_um: f32,

    /// Base exposure accrual rate (fraction of full exposure per second
    /// at diffusion level 1.0); motor neurons accrue at exactly this rate
    pub exposure_base_rate_per_sec: f32,
    /// Axon accrual rate as a fraction of the base rate
    pub axon_exposure_scale: f32,
    /// Schwann cell accrual rate as a fraction of the base rate
    pub schwann_exposure_scale: f32,
}

impl TissueParameters {
    /// Load from JSON file or return defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        load_group(path, "tissue")
    }
}

impl Default for TissueParameters {
    fn default() -> Self {
        Self {
            motor_neuron_count: 6,
            soma_radius_um: 25.0,
            soma_x_min_um: 600.0,
            soma_x_max_um: 1200.0,
            soma_y_spread_um: 300.0,
            axon_length_um: 2800.0,
            axon_length_jitter_um: 400.0,
            schwann_cell_count: 10,
            schwann_radius_um: 14.0,

            // Full exposure in ~14 s of sustained level-1.0 diffusion.
            // Axons and Schwann cells lag the somata, modeling slower
            // penetration into myelinated and wrapped structures.
            exposure_base_rate_per_sec: 0.07,
            axon_exposure_scale: 0.7,
            schwann_exposure_scale: 0.5,
        }
    }
}

/// Perfusion flow and drug transport parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerfusionParameters {
    /// Flow rate the session starts with (dimensionless multiple of the
    /// reference pump setting; all transport speeds scale linearly with it)
    pub default_flow_rate: f32,

    /// Drug front advance rate (fraction of channel length per second
    /// at unit flow rate)
    pub front_advance_rate_per_sec: f32,

    /// Number of medium tracer particles per channel (fixed pool)
    pub flow_particles_per_channel: usize,
    /// Tracer speed range at unit flow rate (μm/s)
    pub flow_speed_min_um_per_sec: f32,
    /// Upper bound of the tracer speed range (μm/s)
    pub flow_speed_max_um_per_sec: f32,

    /// Chance of spawning one drug particle per channel on each update
    /// (a per-frame Bernoulli draw, deliberately not scaled by dt)
    pub drug_spawn_probability: f64,
    /// Maximum number of live drug particles across both channels
    pub drug_particle_cap: usize,
    /// Drug particle speed range at unit flow rate (μm/s)
    pub drug_speed_min_um_per_sec: f32,
    /// Upper bound of the drug particle speed range (μm/s)
    pub drug_speed_max_um_per_sec: f32,
}

impl PerfusionParameters {
    /// Load from JSON file or return defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        load_group(path, "perfusion")
    }
}

impl Default for PerfusionParameters {
    fn default() -> Self {
        Self {
            default_flow_rate: 0.5,

            // Front crosses the channel in ~14 s at unit flow rate
            front_advance_rate_per_sec: 0.07,

            flow_particles_per_channel: 36,
            flow_speed_min_um_per_sec: 500.0,
            flow_speed_max_um_per_sec: 800.0,

            drug_spawn_probability: 0.3,
            drug_particle_cap: 100,
            drug_speed_min_um_per_sec: 600.0,
            drug_speed_max_um_per_sec: 900.0,
        }
    }
}

/// Gel diffusion parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffusionParameters {
    /// Particles seeded per gel boundary when diffusion begins
    pub particles_per_batch: usize,

    /// Settling speed range toward the target depth (μm/s)
    pub settle_speed_min_um_per_sec: f32,
    /// Upper bound of the settling speed range (μm/s)
    pub settle_speed_max_um_per_sec: f32,

    /// Standard deviation of the per-frame horizontal jitter (μm);
    /// like the spawn draw, applied per frame rather than per second
    pub jitter_sigma_um: f32,

    /// Diffusion level rise rate (fraction per second) while the
    /// diffusion regime is active
    pub level_rise_rate_per_sec: f32,

    /// Floor the level is bumped to when the tissue-response stage
    /// begins, so the cell response is immediately visible
    pub floor_level: f32,
}

impl DiffusionParameters {
    /// Load from JSON file or return defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        load_group(path, "diffusion")
    }
}

impl Default for DiffusionParameters {
    fn default() -> Self {
        Self {
            particles_per_batch: 25,
            settle_speed_min_um_per_sec: 25.0,
            settle_speed_max_um_per_sec: 60.0,
            jitter_sigma_um: 1.8,
            level_rise_rate_per_sec: 0.10,
            floor_level: 0.5,
        }
    }
}

/// Washout stage parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WashoutParameters {
    /// Seconds after entering the washout stage before decay begins;
    /// drug keeps arriving while the clean medium works through the lines
    pub delay_sec: f32,

    /// Diffusion level decay rate (fraction per second)
    pub level_decay_per_sec: f32,

    /// Cell exposure decay rate (fraction per second)
    pub exposure_decay_per_sec: f32,
}

impl WashoutParameters {
    /// Load from JSON file or return defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        load_group(path, "washout")
    }
}

impl Default for WashoutParameters {
    fn default() -> Self {
        Self {
            delay_sec: 2.0,
            level_decay_per_sec: 0.12,
            exposure_decay_per_sec: 0.08,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_chip_params() {
        let params = ChipParameters::default();
        assert!(params.channel_length_um > 0.0);
        assert!(params.gel_height_um > params.channel_height_um);
    }

    #[test]
    fn test_default_exposure_rates() {
        let params = TissueParameters::default();
        assert!((params.exposure_base_rate_per_sec - 0.07).abs() < 1e-6);
        assert!((params.axon_exposure_scale - 0.7).abs() < 1e-6);
        assert!((params.schwann_exposure_scale - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_default_front_rate() {
        let params = PerfusionParameters::default();
        assert!((params.front_advance_rate_per_sec - 0.07).abs() < 1e-6);
        assert!(params.default_flow_rate > 0.0);
    }

    #[test]
    fn test_serialization() {
        let params = Parameters::default();
        let json = serde_json::to_string_pretty(&params).unwrap();
        let parsed: Parameters = serde_json::from_str(&json).unwrap();
        assert!(
            (parsed.perfusion.front_advance_rate_per_sec
                - params.perfusion.front_advance_rate_per_sec)
                .abs()
                < 1e-6
        );
        assert_eq!(
            parsed.diffusion.particles_per_batch,
            params.diffusion.particles_per_batch
        );
    }

    #[test]
    fn test_group_loader_reads_the_shipped_file() {
        // The files under data/parameters/ mirror the built-in defaults
        let chip = ChipParameters::load_or_default("data/parameters/chip.json");
        let defaults = ChipParameters::default();
        assert!((chip.channel_length_um - defaults.channel_length_um).abs() < 1e-6);
        assert!((chip.channel_height_um - defaults.channel_height_um).abs() < 1e-6);
        assert!((chip.gel_height_um - defaults.gel_height_um).abs() < 1e-6);
    }

    #[test]
    fn test_load_from_missing_dir_falls_back_to_defaults() {
        let params = Parameters::load_from_dir("data/does_not_exist");
        assert_eq!(
            params.tissue.motor_neuron_count,
            TissueParameters::default().motor_neuron_count
        );
        assert!(params.rng_seed.is_none());
    }
}
