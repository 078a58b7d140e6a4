//! Automated performance sweeps against the headless viewer.

use std::path::{Path, PathBuf};

use clap::Parser;

use kiln_bench::report::results_to_csv;
use kiln_bench::runner::default_stat_path;
use kiln_bench::sweep::{generate_configs, write_results_file, RunRecord, SweepConfig};
use kiln_bench::{DeviceBridge, HeadlessRunner, SweepResults};

/// Run automated performance sweeps and collect stat results.
#[derive(Parser, Debug)]
#[command(
    name = "sweep-scene",
    about = "Sweep renderer configurations over a scene with the headless viewer",
    version
)]
struct Args {
    /// The glTF/glB scene to test.
    scene: PathBuf,

    /// Path to the headless viewer binary.
    #[arg(long, default_value = "./gltf-viewer-headless")]
    binary: PathBuf,

    /// Resolution X.
    #[arg(long)]
    width: u32,

    /// Resolution Y.
    #[arg(long)]
    height: u32,

    /// Number of frames per run.
    #[arg(long)]
    frames: u32,

    /// Number of iterations per config.
    #[arg(long, default_value = "1")]
    iterations: u32,

    /// Config files to sweep through.
    #[arg(long, num_args = 1.., conflicts_with = "gen_configs")]
    configs: Vec<PathBuf>,

    /// Automatically generate the full config matrix to sweep through.
    #[arg(long)]
    gen_configs: bool,

    /// Store the results JSON here.
    #[arg(long)]
    results: Option<PathBuf>,

    /// Store the results CSV here.
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Run on an Android device, pushing this binary through adb.
    #[arg(long)]
    android_binary: Option<PathBuf>,

    /// Builtin asset directory to push when sweeping on a device.
    #[arg(long)]
    builtin: Option<PathBuf>,

    /// Scratch directory on the device.
    #[arg(long, default_value = kiln_bench::DeviceBridge::DEFAULT_REMOTE_DIR)]
    remote_dir: String,

    /// Remove the device scratch directory after the sweep.
    #[arg(long)]
    cleanup: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    if let Err(err) = run(args) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    if !args.gen_configs && args.configs.is_empty() {
        return Err("need --configs or --gen-configs".into());
    }

    let device = match &args.android_binary {
        Some(binary) => Some(prepare_device(&args, binary)?),
        None => None,
    };

    let sweep_configs = collect_configs(&args)?;
    let mut results = SweepResults::default();

    for (config, config_file) in sweep_configs {
        let summary = run_config(&args, device.as_ref(), &config_file)?.run(args.iterations)?;
        println!(
            "{}: {:.3} ms (stddev {:.3} ms)",
            config.tag(),
            summary.avg / 1000.0,
            summary.stdev / 1000.0
        );
        results.runs.push(RunRecord {
            config,
            avg: summary.avg,
            stdev: summary.stdev,
            gpu: summary.gpu,
            version: summary.driver_version,
            width: args.width,
            height: args.height,
            gpu_cycles: summary.gpu_cycles,
            bandwidth_read: summary.bandwidth_read,
            bandwidth_write: summary.bandwidth_write,
        });
    }

    if let Some(path) = &args.results {
        write_results_file(path, &results)?;
        println!("wrote results to {}", path.display());
    }
    if let Some(path) = &args.csv {
        std::fs::write(path, results_to_csv(&results))?;
        println!("wrote CSV to {}", path.display());
    }

    if args.cleanup {
        if let Some(bridge) = &device {
            bridge.cleanup()?;
        }
    }
    Ok(())
}

/// Resolve the configs to sweep: explicit files are parsed as engine
/// config documents, `--gen-configs` writes each generated config to a
/// scratch file.
fn collect_configs(args: &Args) -> Result<Vec<(SweepConfig, PathBuf)>, Box<dyn std::error::Error>> {
    if args.gen_configs {
        let dir = std::env::temp_dir().join(format!("kiln_sweep_{}", std::process::id()));
        std::fs::create_dir_all(&dir)?;
        let mut configs = Vec::new();
        for (index, config) in generate_configs().into_iter().enumerate() {
            let path = dir.join(format!("config_{index}.json"));
            std::fs::write(&path, serde_json::to_string_pretty(&config.engine_config())?)?;
            configs.push((config, path));
        }
        Ok(configs)
    } else {
        let mut configs = Vec::new();
        for path in &args.configs {
            let document: serde_json::Value =
                serde_json::from_str(&std::fs::read_to_string(path)?)?;
            configs.push((SweepConfig::from_engine_config(&document), path.clone()));
        }
        Ok(configs)
    }
}

fn prepare_device(args: &Args, binary: &Path) -> Result<DeviceBridge, Box<dyn std::error::Error>> {
    let bridge = DeviceBridge::new(args.remote_dir.clone());
    println!("setting up device scratch directory ...");
    bridge.prepare()?;
    println!("pushing headless binary ...");
    bridge.push_executable(binary, &bridge.remote_path("viewer-headless"))?;
    println!("pushing scene ...");
    bridge.push(&args.scene, &bridge.remote_path("scene.glb"))?;
    if let Some(builtin) = &args.builtin {
        println!("pushing builtin assets ...");
        bridge.push(builtin, &format!("{}/", bridge.remote_dir()))?;
    }
    Ok(bridge)
}

/// Build the runner for one config, locally or against the device.
fn run_config(
    args: &Args,
    device: Option<&DeviceBridge>,
    config_file: &Path,
) -> Result<HeadlessRunner, Box<dyn std::error::Error>> {
    match device {
        None => {
            let stat = default_stat_path("sweep");
            Ok(
                HeadlessRunner::new(&args.binary, &args.scene, args.frames, args.width, args.height, &stat)
                    .with_config(config_file),
            )
        }
        Some(bridge) => {
            let remote_config = bridge.remote_path("config.json");
            bridge.push(config_file, &remote_config)?;
            let runner = HeadlessRunner::new(
                bridge.remote_path("viewer-headless"),
                bridge.remote_path("scene.glb"),
                args.frames,
                args.width,
                args.height,
                bridge.remote_path("stat.json"),
            )
            .with_config(remote_config)
            .with_device(bridge.clone(), default_stat_path("device"));
            Ok(runner)
        }
    }
}
