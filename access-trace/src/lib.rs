mod page_key;
mod reader;

use std::{collections::BTreeMap, fmt};

pub use page_key::{page_key, PAGE_OFFSET_WIDTH};
pub use reader::{read_trace, read_trace_file};

#[derive(Debug)]
pub enum TraceError {
    Io(std::io::Error),
    InvalidOffsetWidth,
    AddressTooShort { address: String, width: usize },
    MissingField { line: usize },
    InvalidOperation { line: usize, operation: char },
}

impl fmt::Display for TraceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceError::Io(e) => write!(f, "could not read trace: {}", e),
            TraceError::InvalidOffsetWidth => write!(f, "page offset width must be at least 1"),
            TraceError::AddressTooShort { address, width } => write!(
                f,
                "address {:?} is not longer than the page offset width {}",
                address, width
            ),
            TraceError::MissingField { line } => {
                write!(f, "line {}: expected an address and an operation", line)
            }
            TraceError::InvalidOperation { line, operation } => {
                write!(f, "line {}: unknown operation {:?}", line, operation)
            }
        }
    }
}

impl std::error::Error for TraceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TraceError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for TraceError {
    fn from(e: std::io::Error) -> Self {
        TraceError::Io(e)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessKind {
    Read,
    Write,
}

impl AccessKind {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'R' => Some(AccessKind::Read),
            'W' => Some(AccessKind::Write),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            AccessKind::Read => 'R',
            AccessKind::Write => 'W',
        }
    }

    pub fn is_write(&self) -> bool {
        *self == AccessKind::Write
    }
}

/// Dense identifier of a page within one [`AddressTrace`].
///
/// Ids are handed out in ascending order of the page key text, so comparing
/// two ids compares their keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PageId(u32);

impl PageId {
    pub const fn new(index: u32) -> Self {
        PageId(index)
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessRecord {
    address: String,
    page: PageId,
    kind: AccessKind,
}

impl AccessRecord {
    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn page(&self) -> PageId {
        self.page
    }

    pub fn kind(&self) -> AccessKind {
        self.kind
    }
}

/// An ordered, immutable list of memory accesses.
///
/// Position in the trace is the only notion of time a simulation has.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressTrace {
    records: Vec<AccessRecord>,
    pages: Vec<String>,
    offset_width: usize,
}

impl AddressTrace {
    /// Builds a trace from `(address, operation)` pairs in access order.
    pub fn load<I, S>(records: I, offset_width: usize) -> Result<Self, TraceError>
    where
        I: IntoIterator<Item = (S, char)>,
        S: Into<String>,
    {
        if offset_width == 0 {
            return Err(TraceError::InvalidOffsetWidth);
        }

        let mut raw = Vec::new();
        let mut keys: BTreeMap<String, u32> = BTreeMap::new();
        for (i, (address, operation)) in records.into_iter().enumerate() {
            let address = address.into();
            let kind = AccessKind::from_char(operation).ok_or(TraceError::InvalidOperation {
                line: i + 1,
                operation,
            })?;
            let key = page_key(&address, offset_width)?;
            if !keys.contains_key(key) {
                keys.insert(key.to_string(), 0);
            }
            raw.push((address, kind));
        }

        for (id, slot) in keys.values_mut().enumerate() {
            *slot = id as u32;
        }

        let mut records = Vec::with_capacity(raw.len());
        for (address, kind) in raw {
            let page = PageId(keys[page_key(&address, offset_width)?]);
            records.push(AccessRecord {
                address,
                page,
                kind,
            });
        }

        Ok(Self {
            records,
            pages: keys.into_keys().collect(),
            offset_width,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, step: usize) -> Option<&AccessRecord> {
        self.records.get(step)
    }

    pub fn records(&self) -> &[AccessRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AccessRecord> {
        self.records.iter()
    }

    /// Number of distinct pages referenced by the trace.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn page_name(&self, page: PageId) -> Option<&str> {
        self.pages.get(page.index()).map(String::as_str)
    }

    pub fn page_id(&self, key: &str) -> Option<PageId> {
        self.pages
            .binary_search_by(|page| page.as_str().cmp(key))
            .ok()
            .map(|i| PageId(i as u32))
    }

    pub fn offset_width(&self) -> usize {
        self.offset_width
    }

    pub fn writes(&self) -> usize {
        self.records.iter().filter(|r| r.kind.is_write()).count()
    }
}

impl<'a> IntoIterator for &'a AddressTrace {
    type Item = &'a AccessRecord;
    type IntoIter = std::slice::Iter<'a, AccessRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
