//! # Kiln benchmark harness
//!
//! Drives the engine's external headless rendering binary over a sweep
//! of renderer configurations, locally or through an Android device
//! bridge, and post-processes the collected stats:
//!
//! - [`runner`] - invoking the headless binary and summarizing iterations
//! - [`sweep`] - the config matrix and sweep-results documents
//! - [`device`] - adb push/run/pull orchestration
//! - [`stat`] - the stat JSON the binary emits
//! - [`report`] - diff tables, parameter analysis and CSV export
//!
//! Sweeps are strictly sequential: one external process at a time, any
//! failure aborts the sweep.

pub mod device;
pub mod report;
pub mod runner;
pub mod stat;
pub mod sweep;

mod error;

pub use device::DeviceBridge;
pub use error::BenchError;
pub use runner::{HeadlessRunner, RunSummary};
pub use stat::FrameStats;
pub use sweep::{SweepConfig, SweepResults};
