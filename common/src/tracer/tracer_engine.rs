use clap::Args;
use thiserror::Error;
use tracing_subscriber::{EnvFilter, Layer, filter::ParseError, layer::SubscriberExt};

#[derive(Debug, Error)]
pub enum TracerError {
    #[error("Invalid Log Filter: {0}")]
    Filter(#[from] ParseError),
    #[error("Global Subscriber Already Set: {0}")]
    SetGlobalDefault(#[from] tracing::subscriber::SetGlobalDefaultError),
}

#[derive(Clone, Debug, Args)]
pub struct TracerOptions {
    /// Filter directives for log output, e.g. "info" or "particle_gun=debug"
    #[clap(long, env = "PARTICLE_GUN_LOG", default_value = "info")]
    pub log_filter: String,

    /// Disable ANSI colour codes in log output
    #[clap(long, default_value = "false")]
    pub no_ansi: bool,
}

impl Default for TracerOptions {
    fn default() -> Self {
        Self {
            log_filter: "info".to_owned(),
            no_ansi: false,
        }
    }
}

/// This object initialises the stdout tracer, given a TracerOptions struct.
pub struct TracerEngine {
    service_name: String,
}

impl TracerEngine {
    /// Initialises the stdout tracer for the crate
    /// #Arguments
    /// * `options` - The caller-specified instance of TracerOptions.
    /// * `service_name` - The name of the component, used in the start-up message.
    /// #Returns
    /// An instance of TracerEngine, or an error if the filter does not parse
    /// or a global subscriber has already been installed.
    pub fn new(options: TracerOptions, service_name: &str) -> Result<Self, TracerError> {
        let stdout_tracer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stdout)
            .with_ansi(!options.no_ansi);

        // This filter is applied to the stdout tracer
        let log_filter = EnvFilter::builder().parse(&options.log_filter)?;

        let subscriber =
            tracing_subscriber::Registry::default().with(stdout_tracer.with_filter(log_filter));

        tracing::subscriber::set_global_default(subscriber)?;

        Ok(Self {
            service_name: service_name.to_owned(),
        })
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }
}
