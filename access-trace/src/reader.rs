use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use log::{debug, info};

use crate::{AccessKind, AddressTrace, TraceError};

/// Reads `address operation` lines, stopping once `limit` records were taken.
///
/// Blank lines are skipped. Only the first character of the operation field
/// is looked at.
pub fn read_trace<R: BufRead>(
    reader: R,
    limit: Option<usize>,
    offset_width: usize,
) -> Result<AddressTrace, TraceError> {
    let mut records = Vec::new();
    for (number, line) in reader.lines().enumerate() {
        if limit.map_or(false, |limit| records.len() >= limit) {
            break;
        }
        let line = line?;
        let mut fields = line.split_whitespace();
        let address = match fields.next() {
            Some(address) => address,
            None => continue,
        };
        let operation = fields
            .next()
            .and_then(|field| field.chars().next())
            .ok_or(TraceError::MissingField { line: number + 1 })?;
        if AccessKind::from_char(operation).is_none() {
            return Err(TraceError::InvalidOperation {
                line: number + 1,
                operation,
            });
        }
        records.push((address.to_string(), operation));
    }
    debug!("Read {} trace records", records.len());
    AddressTrace::load(records, offset_width)
}

pub fn read_trace_file<P: AsRef<Path>>(
    path: P,
    limit: Option<usize>,
    offset_width: usize,
) -> Result<AddressTrace, TraceError> {
    let path = path.as_ref();
    info!("Start reading trace {}", path.display());
    let file = File::open(path)?;
    let trace = read_trace(BufReader::new(file), limit, offset_width)?;
    info!(
        "Done reading trace {}: {} records, {} pages",
        path.display(),
        trace.len(),
        trace.page_count()
    );
    Ok(trace)
}
