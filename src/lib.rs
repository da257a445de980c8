use std::fmt;

pub mod batch;
pub mod config;
pub mod memory_map;
pub mod repl;
pub mod report;
pub mod simulator;

pub use access_trace::{AccessKind, AccessRecord, AddressTrace, PageId, TraceError};
pub use replacement::PolicyKind;

pub use batch::run_batch;
pub use config::{Args, Config, ConfigError};
pub use report::{report, Report};
pub use simulator::{run, run_recorded, SimulationError, SimulationResult, Simulator};

#[derive(Debug)]
pub enum Error {
    Config(ConfigError),
    Trace(TraceError),
    Simulation(SimulationError),
    Io(std::io::Error),
    /// A memory map was asked for a run that kept no steps.
    NotRecorded,
    /// The recorded steps belong to a trace of another length.
    TraceMismatch { steps: usize, accesses: usize },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "{}", e),
            Error::Trace(e) => write!(f, "{}", e),
            Error::Simulation(e) => write!(f, "{}", e),
            Error::Io(e) => write!(f, "{}", e),
            Error::NotRecorded => write!(f, "run was not recorded step by step"),
            Error::TraceMismatch { steps, accesses } => write!(
                f,
                "run recorded {} steps but the trace has {} accesses",
                steps, accesses
            ),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Config(e) => Some(e),
            Error::Trace(e) => Some(e),
            Error::Simulation(e) => Some(e),
            Error::Io(e) => Some(e),
            Error::NotRecorded | Error::TraceMismatch { .. } => None,
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<TraceError> for Error {
    fn from(e: TraceError) -> Self {
        Error::Trace(e)
    }
}

impl From<SimulationError> for Error {
    fn from(e: SimulationError) -> Self {
        Error::Simulation(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}
