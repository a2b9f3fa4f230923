pub mod metrics;
pub mod tracer;

/// PDG Monte Carlo particle numbering scheme code.
pub type Pid = i32;
pub type EventNumber = u64;

pub type Momentum = f64;
pub type Mass = f64;
