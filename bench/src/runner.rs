//! Driving the external headless rendering binary.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::device::DeviceBridge;
use crate::error::BenchError;
use crate::stat::{read_stat_file, FrameStats};

/// Mean and sample standard deviation of a sample set.
///
/// A single sample (or none) has a standard deviation of 0.0.
pub fn mean_stddev(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    if values.len() <= 1 {
        return (mean, 0.0);
    }
    let variance =
        values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / (values.len() - 1) as f64;
    (mean, variance.sqrt())
}

/// Summary of repeated runs of one configuration.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Mean average frame time across iterations, in microseconds.
    pub avg: f64,
    /// Sample standard deviation across iterations, in microseconds.
    pub stdev: f64,
    pub gpu: String,
    pub driver_version: String,
    pub gpu_cycles: Option<f64>,
    pub bandwidth_read: Option<f64>,
    pub bandwidth_write: Option<f64>,
}

/// Invokes the headless binary with its fixed flag surface:
/// `--frames N --width W --height H <scene> --stat <path> [--config <path>]`.
///
/// In device mode the binary, scene, stat and config paths are remote
/// paths on the device; the stat file is pulled back to a local path
/// after every run.
pub struct HeadlessRunner {
    binary: PathBuf,
    scene: PathBuf,
    frames: u32,
    width: u32,
    height: u32,
    stat_path: PathBuf,
    config_path: Option<PathBuf>,
    device: Option<(DeviceBridge, PathBuf)>,
}

impl HeadlessRunner {
    /// Create a runner for a local binary.
    pub fn new(
        binary: impl Into<PathBuf>,
        scene: impl Into<PathBuf>,
        frames: u32,
        width: u32,
        height: u32,
        stat_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            binary: binary.into(),
            scene: scene.into(),
            frames,
            width,
            height,
            stat_path: stat_path.into(),
            config_path: None,
            device: None,
        }
    }

    /// Pass a `--config` file to the binary.
    pub fn with_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Run through a device bridge. All runner paths are then remote;
    /// the stat file is pulled to `local_stat` after every run.
    pub fn with_device(mut self, bridge: DeviceBridge, local_stat: impl Into<PathBuf>) -> Self {
        self.device = Some((bridge, local_stat.into()));
        self
    }

    /// The argument vector handed to the binary.
    pub fn arguments(&self) -> Vec<String> {
        let mut args = vec![
            "--frames".to_owned(),
            self.frames.to_string(),
            "--width".to_owned(),
            self.width.to_string(),
            "--height".to_owned(),
            self.height.to_string(),
            self.scene.display().to_string(),
            "--stat".to_owned(),
            self.stat_path.display().to_string(),
        ];
        if let Some(config) = &self.config_path {
            args.push("--config".to_owned());
            args.push(config.display().to_string());
        }
        args
    }

    /// Run the binary once and parse the stat file it wrote.
    pub fn run_once(&self) -> Result<FrameStats, BenchError> {
        match &self.device {
            None => {
                let status = Command::new(&self.binary).args(self.arguments()).status()?;
                if !status.success() {
                    return Err(BenchError::CommandFailed {
                        command: self.command_line(),
                        code: status.code(),
                    });
                }
                read_stat_file(&self.stat_path)
            }
            Some((bridge, local_stat)) => {
                let mut command = vec![self.binary.display().to_string()];
                command.extend(self.arguments());
                bridge.shell(&command)?;
                bridge.pull(&self.stat_path.display().to_string(), local_stat)?;
                read_stat_file(local_stat)
            }
        }
    }

    /// Run the binary `iterations` times and summarize.
    ///
    /// GPU name and driver version come from the last iteration's stat
    /// file; they do not change between runs.
    pub fn run(&self, iterations: u32) -> Result<RunSummary, BenchError> {
        let iterations = iterations.max(1);
        log::info!("running {} ({iterations} iterations)", self.command_line());

        let mut stats = self.run_once()?;
        let mut samples = vec![stats.average_frame_time_us];
        for iteration in 1..iterations {
            log::debug!("iteration {}/{}", iteration + 1, iterations);
            stats = self.run_once()?;
            samples.push(stats.average_frame_time_us);
        }

        let (avg, stdev) = mean_stddev(&samples);
        Ok(RunSummary {
            avg,
            stdev,
            gpu: stats.gpu,
            driver_version: stats.driver_version,
            gpu_cycles: stats.gpu_cycles,
            bandwidth_read: stats.bandwidth_read,
            bandwidth_write: stats.bandwidth_write,
        })
    }

    fn command_line(&self) -> String {
        format!("{} {}", self.binary.display(), self.arguments().join(" "))
    }
}

/// The local stat path a sweep should use by default.
pub fn default_stat_path(label: &str) -> PathBuf {
    std::env::temp_dir().join(format!("kiln_stat_{}_{label}.json", std::process::id()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_stddev_of_nothing() {
        assert_eq!(mean_stddev(&[]), (0.0, 0.0));
    }

    #[test]
    fn single_sample_has_zero_stddev() {
        assert_eq!(mean_stddev(&[42.0]), (42.0, 0.0));
    }

    #[test]
    fn sample_stddev_uses_n_minus_one() {
        let (mean, stdev) = mean_stddev(&[1.0, 3.0]);
        assert_eq!(mean, 2.0);
        assert!((stdev - std::f64::consts::SQRT_2).abs() < 1e-12);
    }

    #[test]
    fn arguments_follow_the_fixed_flag_surface() {
        let runner = HeadlessRunner::new(
            "viewer-headless",
            "scene.glb",
            100,
            1920,
            1080,
            "stat.json",
        )
        .with_config("config.json");

        assert_eq!(
            runner.arguments(),
            [
                "--frames", "100", "--width", "1920", "--height", "1080", "scene.glb", "--stat",
                "stat.json", "--config", "config.json",
            ]
        );
    }

    #[test]
    fn config_flag_is_optional() {
        let runner = HeadlessRunner::new("viewer", "scene.glb", 1, 64, 64, "stat.json");
        assert!(!runner.arguments().contains(&"--config".to_owned()));
    }

    #[cfg(unix)]
    mod subprocess {
        use super::*;
        use std::os::unix::fs::PermissionsExt;

        fn temp_dir(name: &str) -> PathBuf {
            let dir = std::env::temp_dir().join(format!("kiln_bench_runner_{name}"));
            let _ = std::fs::remove_dir_all(&dir);
            std::fs::create_dir_all(&dir).unwrap();
            dir
        }

        fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
            let path = dir.join(name);
            std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        #[test]
        fn run_collects_stats_from_a_fake_binary() {
            let dir = temp_dir("fake");
            let stat = dir.join("stat.json");
            let script = write_script(
                &dir,
                "fake-viewer",
                r#"out=""
prev=""
for a in "$@"; do
  if [ "$prev" = "--stat" ]; then out="$a"; fi
  prev="$a"
done
printf '{"averageFrameTimeUs": 1500.0, "gpu": "TestGPU", "driverVersion": "42"}' > "$out""#,
            );

            let runner = HeadlessRunner::new(&script, "scene.glb", 10, 64, 64, &stat);
            let summary = runner.run(3).unwrap();

            assert_eq!(summary.avg, 1500.0);
            assert_eq!(summary.stdev, 0.0);
            assert_eq!(summary.gpu, "TestGPU");
            assert_eq!(summary.driver_version, "42");

            let _ = std::fs::remove_dir_all(&dir);
        }

        #[test]
        fn non_zero_exit_is_reported() {
            let dir = temp_dir("exit");
            let script = write_script(&dir, "failing-viewer", "exit 3");

            let runner = HeadlessRunner::new(&script, "scene.glb", 1, 64, 64, dir.join("s.json"));
            let result = runner.run_once();
            assert!(matches!(
                result,
                Err(BenchError::CommandFailed { code: Some(3), .. })
            ));

            let _ = std::fs::remove_dir_all(&dir);
        }

        #[test]
        fn missing_binary_propagates_io_error() {
            let runner = HeadlessRunner::new(
                "/nonexistent/kiln/viewer",
                "scene.glb",
                1,
                64,
                64,
                "stat.json",
            );
            assert!(matches!(runner.run_once(), Err(BenchError::Io(_))));
        }
    }
}
