//! Stat documents emitted by the headless rendering binary.

use std::path::Path;

use serde::Deserialize;

use crate::error::BenchError;

/// The JSON document the headless binary writes to its `--stat` path.
///
/// `averageFrameTimeUs`, `gpu` and `driverVersion` are always present;
/// the hardware counters only appear on drivers that expose them.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameStats {
    /// Average frame time over the run, in microseconds.
    pub average_frame_time_us: f64,
    /// GPU name as reported by the driver.
    pub gpu: String,
    /// Driver version string.
    pub driver_version: String,
    /// GPU cycles per frame, if the driver exposes the counter.
    #[serde(default)]
    pub gpu_cycles: Option<f64>,
    /// Bytes read from memory per frame, if exposed.
    #[serde(default)]
    pub bandwidth_read: Option<f64>,
    /// Bytes written to memory per frame, if exposed.
    #[serde(default)]
    pub bandwidth_write: Option<f64>,
}

/// Read and parse a stat file.
pub fn read_stat_file(path: &Path) -> Result<FrameStats, BenchError> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}
