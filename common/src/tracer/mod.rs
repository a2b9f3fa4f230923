mod tracer_engine;

pub use tracer_engine::{TracerEngine, TracerError, TracerOptions};

/// Should be called at the start of each component.
/// Installs the global subscriber and emits a single line naming the
/// component, so that log files from separate runs can be told apart.
#[macro_export]
macro_rules! init_tracer {
    ($options:expr) => {{
        let tracer = TracerEngine::new($options, env!("CARGO_BIN_NAME"));
        if let Ok(tracer) = &tracer {
            tracing::info!(
                "{} {} started in {}",
                tracer.service_name(),
                env!("CARGO_PKG_VERSION"),
                module_path!()
            );
        }
        tracer
    }};
}
