//! Diff sweep result files against each other.

use std::path::PathBuf;

use clap::Parser;

use kiln_bench::report::diff_table;
use kiln_bench::sweep::read_results_file;
use kiln_bench::BenchError;

/// Print a config-by-config comparison of sweep result files.
#[derive(Parser, Debug)]
#[command(
    name = "stat-diff",
    about = "Diff sweep result files; the first file is the reference",
    version
)]
struct Args {
    /// Result files to compare.
    #[arg(long, num_args = 1.., required = true)]
    stats: Vec<PathBuf>,
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
    let mut sets = Vec::with_capacity(args.stats.len());
    for path in &args.stats {
        sets.push(read_results_file(path)?);
    }
    print!("{}", diff_table(&sets));
    Ok(())
}
