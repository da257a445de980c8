use access_trace::{AccessKind, PageId};

/// Maps a resident page to the frame holding it.
/// OPT runs never hand out frames, so `frame` stays `None` for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageTableEntry {
    page: PageId,
    frame: Option<u32>,
    dirty: bool,
}

impl PageTableEntry {
    pub(crate) fn new(page: PageId, frame: Option<u32>, kind: AccessKind) -> Self {
        PageTableEntry {
            page,
            frame,
            dirty: kind.is_write(),
        }
    }

    pub fn page(&self) -> PageId {
        self.page
    }

    pub fn frame(&self) -> Option<u32> {
        self.frame
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Once set, the dirty bit stays set for the life of the entry.
    pub(crate) fn record(&mut self, kind: AccessKind) {
        self.dirty |= kind.is_write();
    }
}
