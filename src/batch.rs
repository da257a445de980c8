use std::thread;

use access_trace::AddressTrace;
use log::info;
use replacement::PolicyKind;

use crate::simulator::{run, run_recorded, SimulationError, SimulationResult};

/// Runs every `(policy, frames)` pair on its own thread over the shared trace.
///
/// Results come back in the order of `runs`. The first failing run, in that
/// order, fails the whole batch.
pub fn run_batch(
    trace: &AddressTrace,
    runs: &[(PolicyKind, usize)],
    record_steps: bool,
) -> Result<Vec<SimulationResult>, SimulationError> {
    info!("Start batch of {} runs", runs.len());
    let results: Vec<Result<SimulationResult, SimulationError>> = thread::scope(|scope| {
        let handles: Vec<_> = runs
            .iter()
            .map(|&(policy, capacity)| {
                scope.spawn(move || {
                    if record_steps {
                        run_recorded(trace, policy, capacity)
                    } else {
                        run(trace, policy, capacity)
                    }
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| match handle.join() {
                Ok(result) => result,
                Err(panic) => std::panic::resume_unwind(panic),
            })
            .collect()
    });
    info!("Done batch of {} runs", runs.len());
    results.into_iter().collect()
}
