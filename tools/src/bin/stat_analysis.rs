//! On/off analysis of one sweep dimension.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use kiln_bench::report::{parameter_analysis, Counter, Parameter};
use kiln_bench::sweep::read_results_file;
use kiln_bench::BenchError;

/// Compare runs with a config option on against their off counterparts.
#[derive(Parser, Debug)]
#[command(
    name = "stat-analysis",
    about = "Analyze the cost of one renderer option within a sweep result file",
    version
)]
struct Args {
    /// Result file to analyze.
    #[arg(long)]
    stat: PathBuf,

    /// Config dimension to analyze.
    #[arg(long, value_enum)]
    config: ParameterArg,

    /// Counter to compare.
    #[arg(long, value_enum, default_value = "avg")]
    counter: CounterArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum ParameterArg {
    Renderer,
    Prepass,
    Clustered,
    HdrBloom,
    Shadows,
    PosShadows,
}

impl From<ParameterArg> for Parameter {
    fn from(arg: ParameterArg) -> Self {
        match arg {
            ParameterArg::Renderer => Parameter::Renderer,
            ParameterArg::Prepass => Parameter::Prepass,
            ParameterArg::Clustered => Parameter::Clustered,
            ParameterArg::HdrBloom => Parameter::HdrBloom,
            ParameterArg::Shadows => Parameter::Shadows,
            ParameterArg::PosShadows => Parameter::PosShadows,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum CounterArg {
    Avg,
    GpuCycles,
    BandwidthRead,
    BandwidthWrite,
}

impl From<CounterArg> for Counter {
    fn from(arg: CounterArg) -> Self {
        match arg {
            CounterArg::Avg => Counter::Avg,
            CounterArg::GpuCycles => Counter::GpuCycles,
            CounterArg::BandwidthRead => Counter::BandwidthRead,
            CounterArg::BandwidthWrite => Counter::BandwidthWrite,
        }
    }
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    if let Err(err) = run(args) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), BenchError> {
    let results = read_results_file(&args.stat)?;
    print!(
        "{}",
        parameter_analysis(&results, args.config.into(), args.counter.into())
    );
    Ok(())
}
