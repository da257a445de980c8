use std::fmt;

use replacement::PolicyKind;

use crate::simulator::SimulationResult;

/// Derived figures of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Report {
    pub policy: PolicyKind,
    pub capacity: usize,
    pub faults: u64,
    pub evictions: u64,
    pub writes_to_disk: u64,
    pub estimated_access_time_ns: u64,
}

/// Every fault is charged `fault_cost_ns`; every write in the trace counts
/// as a write to disk.
pub fn report(result: &SimulationResult, fault_cost_ns: u64) -> Report {
    Report {
        policy: result.policy,
        capacity: result.capacity,
        faults: result.faults,
        evictions: result.evictions,
        writes_to_disk: result.writes,
        estimated_access_time_ns: result.faults.saturating_mul(fault_cost_ns),
    }
}

const RULE: &str = "+------------------------------------------------+";

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", RULE)?;
        writeln!(f, "| {:<35}| {:<10}|", "Page faults:", self.faults)?;
        writeln!(f, "| {:<35}| {:<10}|", "Replacements:", self.evictions)?;
        writeln!(f, "| {:<35}| {:<10}|", "Writes to disk:", self.writes_to_disk)?;
        writeln!(
            f,
            "| {:<35}| {:<10}|",
            "EAT (ns):", self.estimated_access_time_ns
        )?;
        write!(f, "{}", RULE)
    }
}

/// One line per report: policy, frames, faults, replacements, writes, EAT.
pub fn comparison_table(reports: &[Report]) -> String {
    let mut table = format!(
        "{:<10}{:>8}{:>14}{:>14}{:>10}{:>14}\n",
        "Policy", "Frames", "Page faults", "Replacements", "Writes", "EAT (ns)"
    );
    for r in reports {
        table.push_str(&format!(
            "{:<10}{:>8}{:>14}{:>14}{:>10}{:>14}\n",
            r.policy.name(),
            r.capacity,
            r.faults,
            r.evictions,
            r.writes_to_disk,
            r.estimated_access_time_ns
        ));
    }
    table
}
