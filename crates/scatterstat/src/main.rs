use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::WrapErr;
use scatterstat::{ReportOptions, RunConfig, build_artifacts, init_logging, write_report};
use scatterstat_core::{
    DirectorySource, EventSource, FaultPolicy, Material, Particle, SweepConfig, SyntheticProfile,
    SyntheticSource, run_sweep,
};

#[derive(Parser, Debug)]
#[command(name = "scatterstat")]
#[command(about = "Summary statistics for particle-scattering simulation sweeps")]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Summarize simulation output described by a YAML run configuration
    Run {
        /// Path to the run configuration
        #[arg(short, long)]
        config: PathBuf,

        /// Output directory (overrides the configuration)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Abort on the first missing configuration or integrity fault
        #[arg(long)]
        strict: bool,
    },
    /// Run a built-in sweep over synthetic events
    Demo {
        #[arg(short, long, default_value = "scatterstat-demo")]
        output: PathBuf,

        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    match args.command {
        Command::Run {
            config,
            output,
            strict,
        } => {
            let mut run = RunConfig::load(&config)
                .wrap_err_with(|| format!("failed to load {}", config.display()))?;
            if let Some(output) = output {
                run.output_dir = output;
            }
            if strict {
                run.sweep.policy = FaultPolicy::Strict;
            }

            let _guard = init_logging(&run.output_dir, &args.log_level)?;
            let source = DirectorySource::new(&run.data_dir);
            summarize_sweep(&source, &run.sweep, &run.report, &run.output_dir)
        }
        Command::Demo { output, seed } => {
            let _guard = init_logging(&output, &args.log_level)?;
            let profile = SyntheticProfile::default();
            let sweep = SweepConfig {
                particles: vec![Particle::MuPlus, Particle::MuMinus],
                materials: vec![Material::Copper, Material::Gold],
                momenta: vec![100.0, 200.0, 400.0],
                angles: vec![0.5, 1.0, 2.0, 3.0, 5.0, 8.0, 12.0, 20.0, 30.0, 45.0],
                expected_events: profile.events,
                seed,
                ..SweepConfig::default()
            };
            let report = ReportOptions {
                depth_study: true,
                ..ReportOptions::default()
            };
            let source = SyntheticSource::new(profile, seed);
            summarize_sweep(&source, &sweep, &report, &output)
        }
    }
}

fn summarize_sweep<S: EventSource + Sync>(
    source: &S,
    sweep: &SweepConfig,
    report: &ReportOptions,
    output: &std::path::Path,
) -> color_eyre::Result<()> {
    let results = run_sweep(source, sweep)?;
    if results.has_faults() {
        tracing::warn!(
            faults = results.faults.len(),
            "sweep finished with faults; see faults.json"
        );
    }

    let artifacts = build_artifacts(&results, report);
    let manifest = write_report(output, &results, &artifacts)?;
    tracing::info!(
        configurations = manifest.configurations,
        artifacts = manifest.artifacts.len(),
        "done"
    );
    Ok(())
}
