mod config;
mod error;
mod event;
mod generator;
mod kinematics;
mod masses;
mod run;
mod writer;

use anyhow::{Context, Result};
use clap::Parser;
use config::{DEFAULT_OUTPUT_FILE, GunConfig};
use generator::ParticleGun;
use masses::MassTable;
use metrics::{counter, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use particle_gun_common::{
    init_tracer,
    metrics::{
        component_info_metric, describe_metrics,
        failures::{self, FailureKind},
        metric_names::{EVENTS_REQUESTED, FAILURES},
    },
    tracer::{TracerEngine, TracerOptions},
};
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::{
    fs,
    path::{Path, PathBuf},
    process,
};
use tracing::info;
use writer::Asciiv3Writer;

#[derive(Debug, Parser)]
#[clap(author, version, about)]
struct Cli {
    /// Configuration file, either `key value` lines or JSON (*.json)
    config: PathBuf,

    /// File to write the HepMC3 event listing to
    #[clap(short, long, default_value = DEFAULT_OUTPUT_FILE)]
    output: PathBuf,

    /// Seed for the random number generator, overrides any seed in the configuration
    #[clap(long)]
    seed: Option<u64>,

    /// Number of events to generate, overrides the configured count
    #[clap(long)]
    nevents: Option<u64>,

    /// If set, a Prometheus text snapshot of the run's metrics is written here on completion
    #[clap(long)]
    metrics_file: Option<PathBuf>,

    #[command(flatten)]
    tracer_options: TracerOptions,
}

fn main() -> Result<()> {
    // Usage errors exit with 1, help and version with 0
    let cli = Cli::try_parse().unwrap_or_else(|e| {
        let _ = e.print();
        process::exit(if e.use_stderr() { 1 } else { 0 })
    });

    let _tracer = init_tracer!(cli.tracer_options.clone())?;

    let metrics_handle = cli
        .metrics_file
        .as_ref()
        .map(|_| PrometheusBuilder::new().install_recorder())
        .transpose()?;
    describe_metrics();
    component_info_metric("particle-gun");

    let result = generate(&cli);

    if let (Some(path), Some(handle)) = (&cli.metrics_file, &metrics_handle) {
        write_metrics(path, handle)?;
    }
    result
}

fn generate(cli: &Cli) -> Result<()> {
    let mut config = GunConfig::load(&cli.config)
        .inspect_err(|_| count_invalid_configuration())
        .with_context(|| format!("Could not load configuration from {}", cli.config.display()))?;
    if let Some(nevents) = cli.nevents {
        config.nevents = nevents;
    }
    config.log_summary();

    let seed = select_seed(cli.seed, config.seed);
    info!("Random seed: {seed}");
    let mut rng = StdRng::seed_from_u64(seed);

    let masses = MassTable::pdg();
    let gun = ParticleGun::new(&config, &masses).inspect_err(|_| count_invalid_configuration())?;

    gauge!(EVENTS_REQUESTED).set(config.nevents as f64);

    let mut writer = Asciiv3Writer::create(&cli.output)
        .with_context(|| format!("Could not create output file {}", cli.output.display()))?;
    run::run(&gun, config.nevents, &mut rng, &mut writer)
        .with_context(|| format!("Could not write events to {}", cli.output.display()))?;
    info!("Events written to {}", cli.output.display());
    Ok(())
}

/// The command line seed wins over the configured one. Without either, a
/// fresh seed is drawn from the OS-seeded thread generator.
fn select_seed(cli: Option<u64>, config: Option<u64>) -> u64 {
    cli.or(config).unwrap_or_else(|| rand::rng().random())
}

fn count_invalid_configuration() {
    counter!(FAILURES, &[failures::get_label(FailureKind::InvalidConfiguration)]).increment(1);
}

fn write_metrics(path: &Path, handle: &PrometheusHandle) -> Result<()> {
    fs::write(path, handle.render())
        .with_context(|| format!("Could not write metrics to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::ffi::OsStr;

    #[test]
    fn cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn cli_defaults() {
        let cli = Cli::try_parse_from(["particle-gun", "gun.cfg"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("gun.cfg"));
        assert_eq!(cli.output, PathBuf::from("events.hepmc"));
        assert_eq!(cli.seed, None);
        assert_eq!(cli.nevents, None);
        assert!(cli.metrics_file.is_none());
    }

    #[test]
    fn cli_overrides() {
        let cli = Cli::try_parse_from([
            "particle-gun",
            "gun.json",
            "-o",
            "out.hepmc",
            "--seed",
            "5",
            "--nevents",
            "12",
        ])
        .unwrap();
        assert_eq!(cli.output, PathBuf::from("out.hepmc"));
        assert_eq!(cli.seed, Some(5));
        assert_eq!(cli.nevents, Some(12));
    }

    #[test]
    fn missing_config_is_a_usage_error() {
        let error = Cli::try_parse_from(["particle-gun"]).unwrap_err();
        assert!(error.use_stderr());
    }

    #[test]
    fn seed_precedence() {
        assert_eq!(select_seed(Some(5), Some(42)), 5);
        assert_eq!(select_seed(Some(5), None), 5);
        assert_eq!(select_seed(None, Some(42)), 42);
    }

    #[test]
    fn fresh_seed_without_overrides() {
        let seeds = (0..8).map(|_| select_seed(None, None)).collect::<Vec<_>>();
        assert!(seeds.iter().any(|seed| *seed != seeds[0]));
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("particle-gun-{name}-{}", process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    const VALID_CONFIG: &str = "\
nevents 3
npart_range 1,2
theta_range 30,150
mom_range 1,10
drmax 0.1
pid_list 211,-211
";

    #[test]
    fn rejected_config_leaves_output_untouched() {
        let dir = scratch_dir("rejected");
        let config = dir.join("bad.cfg");
        fs::write(&config, VALID_CONFIG.replace("theta_range 30,150", "theta_range 0,90")).unwrap();

        let existing = dir.join("existing.hepmc");
        fs::write(&existing, "keep").unwrap();
        let missing = dir.join("missing.hepmc");

        for output in [&existing, &missing] {
            let cli = Cli::try_parse_from([
                OsStr::new("particle-gun"),
                config.as_os_str(),
                OsStr::new("--output"),
                output.as_os_str(),
            ])
            .unwrap();
            let error = generate(&cli).unwrap_err();
            assert!(format!("{error:#}").contains("theta_range"));
        }
        assert_eq!(fs::read_to_string(&existing).unwrap(), "keep");
        assert!(!missing.exists());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn accepted_config_writes_listing() {
        let dir = scratch_dir("accepted");
        let config = dir.join("gun.cfg");
        fs::write(&config, VALID_CONFIG).unwrap();
        let output = dir.join("events.hepmc");

        let cli = Cli::try_parse_from([
            OsStr::new("particle-gun"),
            config.as_os_str(),
            OsStr::new("--output"),
            output.as_os_str(),
            OsStr::new("--seed"),
            OsStr::new("7"),
        ])
        .unwrap();
        generate(&cli).unwrap();

        let listing = fs::read_to_string(&output).unwrap();
        assert!(listing.starts_with("HepMC::Version 3.02.06\n"));
        assert_eq!(listing.lines().filter(|line| line.starts_with("E ")).count(), 3);
        assert!(listing.ends_with("HepMC::Asciiv3-END_EVENT_LISTING\n\n"));

        fs::remove_dir_all(&dir).unwrap();
    }
}
