//! Configuration module for loading simulation parameters.
//!
//! All tunable constants live here, grouped by concern and overridable
//! through per-group JSON files under `data/parameters/`.

mod parameters;

pub use parameters::{
    ChipParameters, DiffusionParameters, Parameters, PerfusionParameters, TissueParameters,
    WashoutParameters,
};
