//! Tables and CSV from sweep results.
//!
//! Formatting follows the sweep tooling conventions: a 15-wide config
//! tag column, 25-wide right-aligned value columns, times in
//! milliseconds, raw counters in millions per frame, and percentage
//! deltas against a reference column.

use std::fmt::Write as _;

use crate::sweep::{generate_configs, Renderer, RunRecord, SweepConfig, SweepResults};

/// Find the run whose config matches exactly.
pub fn find_run<'a>(results: &'a SweepResults, config: &SweepConfig) -> Option<&'a RunRecord> {
    results.runs.iter().find(|run| run.config == *config)
}

/// Diff table across result sets.
///
/// One row per config in canonical matrix order. The first set's time is
/// the reference; every further set shows its time plus the percentage
/// delta against the reference. Configs a set lacks render as `N/A`.
pub fn diff_table(results: &[SweepResults]) -> String {
    let mut out = String::new();
    let _ = write!(out, "{:<15}", "Test");
    for set in results {
        let _ = write!(out, "{:>25}", gpu_name(set));
    }
    out.push('\n');

    for config in generate_configs() {
        let _ = write!(out, "{:<15}", config.tag());
        let mut reference = None;
        for set in results {
            match find_run(set, &config) {
                Some(run) => {
                    let cell = match reference {
                        None => format!("{:.3} ms", run.avg / 1000.0),
                        Some(reference) => format!(
                            "{:.3} ms ({:6.2} %)",
                            run.avg / 1000.0,
                            percent_delta(run.avg, reference)
                        ),
                    };
                    let _ = write!(out, "{cell:>25}");
                    reference.get_or_insert(run.avg);
                }
                None => {
                    let _ = write!(out, "{:>25}", "N/A");
                }
            }
        }
        out.push('\n');
    }
    out
}

/// Sweep dimension analyzed by [`parameter_analysis`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parameter {
    Renderer,
    Prepass,
    Clustered,
    HdrBloom,
    Shadows,
    PosShadows,
}

impl Parameter {
    /// Whether a config has this dimension "on" (renderer counts as on
    /// when deferred).
    pub fn is_on(&self, config: &SweepConfig) -> bool {
        match self {
            Parameter::Renderer => config.renderer == Renderer::Deferred,
            Parameter::Prepass => config.prepass,
            Parameter::Clustered => config.clustered,
            Parameter::HdrBloom => config.hdr_bloom,
            Parameter::Shadows => config.shadows,
            Parameter::PosShadows => config.pos_shadows,
        }
    }

    /// The same config with this dimension turned off.
    pub fn turned_off(&self, config: &SweepConfig) -> SweepConfig {
        let mut config = *config;
        match self {
            Parameter::Renderer => config.renderer = Renderer::Forward,
            Parameter::Prepass => config.prepass = false,
            Parameter::Clustered => config.clustered = false,
            Parameter::HdrBloom => config.hdr_bloom = false,
            Parameter::Shadows => config.shadows = false,
            Parameter::PosShadows => config.pos_shadows = false,
        }
        config
    }
}

/// Counter rendered by [`parameter_analysis`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    /// Average frame time, rendered in milliseconds.
    Avg,
    /// GPU cycles per frame, rendered in millions per frame.
    GpuCycles,
    /// Bandwidth read per frame, rendered in millions per frame.
    BandwidthRead,
    /// Bandwidth written per frame, rendered in millions per frame.
    BandwidthWrite,
}

impl Counter {
    fn value(&self, run: &RunRecord) -> Option<f64> {
        match self {
            Counter::Avg => Some(run.avg),
            Counter::GpuCycles => run.gpu_cycles,
            Counter::BandwidthRead => run.bandwidth_read,
            Counter::BandwidthWrite => run.bandwidth_write,
        }
    }

    fn render(&self, value: f64) -> String {
        match self {
            Counter::Avg => format!("{:.3} ms", value / 1000.0),
            _ => format!("{:.3} M/frame", value / 1_000_000.0),
        }
    }
}

/// On/off comparison of one sweep dimension within a result set.
///
/// Every run with the dimension on is paired with the run that is
/// identical in all other dimensions; runs without a counterpart are
/// skipped. Ends with a total row over all paired runs.
pub fn parameter_analysis(
    results: &SweepResults,
    parameter: Parameter,
    counter: Counter,
) -> String {
    let mut out = String::new();
    let gpu = gpu_name(results);
    let _ = write!(out, "{:<15}", "Test");
    let _ = write!(out, "{:>25}", format!("{gpu} Off"));
    let _ = write!(out, "{:>25}", format!("{gpu} On"));
    out.push('\n');

    let mut total_on = 0.0;
    let mut total_off = 0.0;
    let mut any = false;

    for on_run in results.runs.iter().filter(|r| parameter.is_on(&r.config)) {
        let off_config = parameter.turned_off(&on_run.config);
        let Some(off_run) = find_run(results, &off_config) else {
            continue;
        };
        let (Some(on_value), Some(off_value)) = (counter.value(on_run), counter.value(off_run))
        else {
            continue;
        };

        any = true;
        total_on += on_value;
        total_off += off_value;

        let _ = write!(out, "{:<15}", on_run.config.tag());
        let _ = write!(out, "{:>25}", counter.render(off_value));
        let _ = write!(
            out,
            "{:>25}",
            format!(
                "{} ({:6.2} %)",
                counter.render(on_value),
                percent_delta(on_value, off_value)
            )
        );
        out.push('\n');
    }

    if any {
        let _ = write!(out, "{:<15}", "Total");
        let _ = write!(out, "{:>25}", counter.render(total_off));
        let _ = write!(
            out,
            "{:>25}",
            format!(
                "{} ({:6.2} %)",
                counter.render(total_on),
                percent_delta(total_on, total_off)
            )
        );
        out.push('\n');
    }
    out
}

/// Flatten run records to CSV, times converted to milliseconds.
pub fn results_to_csv(results: &SweepResults) -> String {
    let mut out = String::from(
        "tag,renderer,msaa,prepass,clustered,hdr_bloom,shadows,pos_shadows,\
         avg_ms,stdev_ms,gpu,driver_version,width,height\n",
    );
    for run in &results.runs {
        let config = &run.config;
        let _ = writeln!(
            out,
            "{},{},{},{},{},{},{},{},{:.3},{:.3},{},{},{},{}",
            config.tag(),
            config.renderer.as_str(),
            config.msaa,
            config.prepass,
            config.clustered,
            config.hdr_bloom,
            config.shadows,
            config.pos_shadows,
            run.avg / 1000.0,
            run.stdev / 1000.0,
            csv_field(&run.gpu),
            csv_field(&run.version),
            run.width,
            run.height,
        );
    }
    out
}

fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_owned()
    }
}

fn percent_delta(value: f64, reference: f64) -> f64 {
    (value - reference) / reference * 100.0
}

fn gpu_name(results: &SweepResults) -> &str {
    results
        .runs
        .first()
        .map(|run| run.gpu.as_str())
        .unwrap_or("unknown")
}
