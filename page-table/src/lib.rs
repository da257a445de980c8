mod frame_allocator;
mod iter;
mod page_table_entry;

use access_trace::{AccessKind, PageId};
use log::trace;

pub use frame_allocator::FrameAllocator;
pub use iter::PageTableIterator;
pub use page_table_entry::PageTableEntry;

/// Resident set of one simulation run, indexed by page id.
///
/// A page has an entry from the step it is loaded until it is unmapped.
pub struct PageTable {
    entries: Vec<Option<PageTableEntry>>,
    resident: usize,
}

impl PageTable {
    /// `pages` is the number of distinct pages that can ever be mapped.
    pub fn init(pages: usize) -> Self {
        Self {
            entries: vec![None; pages],
            resident: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.resident
    }

    pub fn is_empty(&self) -> bool {
        self.resident == 0
    }

    pub fn is_resident(&self, page: PageId) -> bool {
        self.get_entry(page).is_some()
    }

    pub fn get_entry(&self, page: PageId) -> Option<&PageTableEntry> {
        self.entries.get(page.index())?.as_ref()
    }

    pub fn get_frame(&self, page: PageId) -> Option<u32> {
        self.get_entry(page)?.frame()
    }

    pub fn is_dirty(&self, page: PageId) -> Option<bool> {
        Some(self.get_entry(page)?.is_dirty())
    }

    /// Installs a fresh entry for `page`. Any dirty state of an earlier
    /// entry for the same page is gone.
    pub fn map_page(&mut self, page: PageId, frame: Option<u32>, kind: AccessKind) -> PageTableEntry {
        let index = page.index();
        if index >= self.entries.len() {
            self.entries.resize(index + 1, None);
        }
        let entry = PageTableEntry::new(page, frame, kind);
        if self.entries[index].replace(entry).is_none() {
            self.resident += 1;
        }
        trace!("Mapped page {} to frame {:?}", page, frame);
        entry
    }

    /// Applies an access to a resident page and returns the updated entry.
    pub fn touch(&mut self, page: PageId, kind: AccessKind) -> Option<PageTableEntry> {
        let entry = self.entries.get_mut(page.index())?.as_mut()?;
        entry.record(kind);
        Some(*entry)
    }

    pub fn unmap_page(&mut self, page: PageId) -> Option<PageTableEntry> {
        let entry = self.entries.get_mut(page.index())?.take()?;
        self.resident -= 1;
        trace!("Unmapped page {}", page);
        Some(entry)
    }

    pub fn iter(&self) -> PageTableIterator<'_> {
        PageTableIterator::new(&self.entries)
    }
}
