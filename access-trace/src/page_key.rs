use crate::TraceError;

/// Number of trailing address characters that make up the page offset.
/// Three decimal digits stand in for a 4096 byte page in the trace format.
pub const PAGE_OFFSET_WIDTH: usize = 3;

/// Strips the page offset from `address` and returns what is left as the page key.
///
/// The address must keep at least one character once the offset is removed,
/// so `"4A0"` with a width of 3 is rejected instead of becoming an empty key.
pub fn page_key(address: &str, offset_width: usize) -> Result<&str, TraceError> {
    if offset_width == 0 {
        return Err(TraceError::InvalidOffsetWidth);
    }
    let len = address.chars().count();
    if len <= offset_width {
        return Err(TraceError::AddressTooShort {
            address: address.to_string(),
            width: offset_width,
        });
    }
    let end = address
        .char_indices()
        .nth(len - offset_width)
        .map_or(address.len(), |(i, _)| i);
    Ok(&address[..end])
}
