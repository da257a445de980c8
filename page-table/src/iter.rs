use super::PageTableEntry;

/// Walks the resident entries in ascending page order.
pub struct PageTableIterator<'a> {
    entries: std::slice::Iter<'a, Option<PageTableEntry>>,
}

impl<'a> PageTableIterator<'a> {
    pub fn new(entries: &'a [Option<PageTableEntry>]) -> Self {
        Self {
            entries: entries.iter(),
        }
    }
}

impl<'a> Iterator for PageTableIterator<'a> {
    type Item = &'a PageTableEntry;

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.by_ref().flatten().next()
    }
}
