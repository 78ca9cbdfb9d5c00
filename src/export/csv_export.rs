//! CSV time-series export for session metrics.

use std::fs::File;
use std::path::PathBuf;

use anyhow::Result;
use chrono::Local;
use serde::Serialize;

use crate::sim::SimulationMetrics;

/// Record for CSV time-series export
#[derive(Debug, Clone, Serialize)]
pub struct TimeSeriesRecord {
    /// Simulation time (seconds)
    pub time_sec: f32,
    /// Current tutorial stage
    pub stage_index: usize,
    /// Pump flow rate (normalized)
    pub flow_rate: f32,
    /// Drug front position (0..1 along the channel)
    pub drug_front: f32,
    /// Gel drug concentration (0..1)
    pub diffusion_level: f32,
    /// Mean motor neuron exposure
    pub neuron_exposure_mean: f32,
    /// Mean axon exposure
    pub axon_exposure_mean: f32,
    /// Mean Schwann cell exposure
    pub schwann_exposure_mean: f32,
    /// Drug tracer particles in flight
    pub drug_particle_count: usize,
    /// Diffusion particles seeded
    pub diffusion_particle_count: usize,
}

impl From<&SimulationMetrics> for TimeSeriesRecord {
    fn from(m: &SimulationMetrics) -> Self {
        Self {
            time_sec: m.time_sec,
            stage_index: m.stage_index,
            flow_rate: m.flow_rate,
            drug_front: m.drug_front,
            diffusion_level: m.diffusion_level,
            neuron_exposure_mean: m.neuron_exposure_mean,
            axon_exposure_mean: m.axon_exposure_mean,
            schwann_exposure_mean: m.schwann_exposure_mean,
            drug_particle_count: m.drug_particle_count,
            diffusion_particle_count: m.diffusion_particle_count,
        }
    }
}

/// CSV exporter for time-series data
pub struct CsvExporter {
    writer: csv::Writer<File>,
    /// Sample interval in seconds
    sample_interval_sec: f32,
    /// Last sample time
    last_sample_time: f32,
    /// Path to output file
    path: PathBuf,
}

impl CsvExporter {
    /// Create a new CSV exporter with the given sample interval
    ///
    /// Creates the exports directory if it doesn't exist.
    /// Filename is auto-generated with timestamp.
    pub fn new(sample_interval_sec: f32) -> Result<Self> {
        let dir = PathBuf::from("exports");
        std::fs::create_dir_all(&dir)?;

        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let filename = format!("timeseries_{}.csv", timestamp);
        let path = dir.join(&filename);

        let file = File::create(&path)?;
        let writer = csv::Writer::from_writer(file);

        log::info!("CSV export started: {}", path.display());

        Ok(Self {
            writer,
            sample_interval_sec,
            last_sample_time: -sample_interval_sec, // Ensure first sample is recorded
            path,
        })
    }

    /// Record a sample if the interval has elapsed
    pub fn maybe_record(&mut self, metrics: &SimulationMetrics) -> Result<bool> {
        let time = metrics.time_sec;

        if time - self.last_sample_time >= self.sample_interval_sec {
            let record = TimeSeriesRecord::from(metrics);
            self.writer.serialize(&record)?;
            self.last_sample_time = time;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Force record a sample regardless of interval
    pub fn record(&mut self, metrics: &SimulationMetrics) -> Result<()> {
        let record = TimeSeriesRecord::from(metrics);
        self.writer.serialize(&record)?;
        self.last_sample_time = metrics.time_sec;
        Ok(())
    }

    /// Finish writing and return the output path
    pub fn finish(mut self) -> Result<PathBuf> {
        self.writer.flush()?;
        log::info!("CSV export completed: {}", self.path.display());
        Ok(self.path)
    }

    /// Get the output path
    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}
