use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use access_trace::AddressTrace;
use log::info;

use crate::{simulator::SimulationResult, Error};

/// Writes one row per access: address, operation, page, frame and dirty bit,
/// as they were right after that access.
///
/// The result must come from a recorded run over the same trace. Pages
/// without a frame, as under OPT, show as `unassigned`.
pub fn write_memory_map<W: Write>(
    writer: &mut W,
    trace: &AddressTrace,
    result: &SimulationResult,
) -> Result<(), Error> {
    let steps = result.steps().ok_or(Error::NotRecorded)?;
    if steps.len() != trace.len() {
        return Err(Error::TraceMismatch {
            steps: steps.len(),
            accesses: trace.len(),
        });
    }
    writeln!(
        writer,
        "{:<15}{:<10}{:<15}{:<12}{:<10}",
        "Address", "Operation", "Page", "Frame", "Dirty"
    )?;
    for (record, step) in trace.iter().zip(steps) {
        let frame = step
            .frame
            .map_or_else(|| "unassigned".to_string(), |f| f.to_string());
        writeln!(
            writer,
            "{:<15}{:<10}{:<15}{:<12}{:<10}",
            record.address(),
            record.kind().as_char(),
            trace.page_name(step.page).unwrap_or("?"),
            frame,
            if step.dirty { 1 } else { 0 }
        )?;
    }
    Ok(())
}

pub fn save_memory_map<P: AsRef<Path>>(
    path: P,
    trace: &AddressTrace,
    result: &SimulationResult,
) -> Result<(), Error> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    write_memory_map(&mut writer, trace, result)?;
    writer.flush()?;
    info!(
        "Saved {} memory map for {} frames to {}",
        result.policy,
        result.capacity,
        path.display()
    );
    Ok(())
}
