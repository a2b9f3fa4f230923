use metrics::{Unit, describe_counter, describe_gauge, gauge};

pub fn component_info_metric(name: &'static str) {
    describe_gauge!(
        metric_names::COMPONENT_INFO,
        "Basic information about the component"
    );

    let git_rev = option_env!("GIT_VERSION").unwrap_or("unknown");
    gauge!(metric_names::COMPONENT_INFO, "component" => name, "git_version" => git_rev).set(1);
}

/// Registers descriptions for every metric the generator emits.
pub fn describe_metrics() {
    describe_counter!(
        metric_names::EVENTS_GENERATED,
        Unit::Count,
        "Number of events generated and written"
    );
    describe_counter!(
        metric_names::PARTICLES_GENERATED,
        Unit::Count,
        "Number of outgoing particles generated"
    );
    describe_gauge!(
        metric_names::EVENTS_REQUESTED,
        Unit::Count,
        "Number of events the run was configured to produce"
    );
    describe_counter!(
        metric_names::FAILURES,
        Unit::Count,
        "Number of failures encountered"
    );
}

pub mod metric_names {
    pub const COMPONENT_INFO: &str = "particle_gun_component_info";
    pub const EVENTS_GENERATED: &str = "particle_gun_events_generated";
    pub const EVENTS_REQUESTED: &str = "particle_gun_events_requested";
    pub const PARTICLES_GENERATED: &str = "particle_gun_particles_generated";
    pub const FAILURES: &str = "particle_gun_failures";
}

pub mod failures {
    #[derive(Debug, Clone, Copy, Eq, Hash, PartialEq)]
    pub enum FailureKind {
        FileWriteFailed,
        InvalidConfiguration,
    }

    // Label building function
    pub fn get_label(failure_kind: FailureKind) -> (&'static str, &'static str) {
        (
            "failure_kind",
            match failure_kind {
                FailureKind::FileWriteFailed => "file_write_failed",
                FailureKind::InvalidConfiguration => "invalid_configuration",
            },
        )
    }
}
