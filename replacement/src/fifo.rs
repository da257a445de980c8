use std::collections::VecDeque;

use access_trace::PageId;

use crate::ReplacementPolicy;

/// Evicts pages in the order they were loaded. Hits are ignored.
pub struct Fifo {
    queue: VecDeque<PageId>,
}

impl Fifo {
    pub fn new(capacity: usize) -> Self {
        Self {
            queue: VecDeque::with_capacity(capacity),
        }
    }
}

impl ReplacementPolicy for Fifo {
    fn on_load(&mut self, page: PageId, _step: usize) {
        self.queue.push_back(page);
    }

    fn on_hit(&mut self, _page: PageId, _step: usize) {}

    fn evict(&mut self, _step: usize) -> Option<PageId> {
        self.queue.pop_front()
    }

    fn len(&self) -> usize {
        self.queue.len()
    }
}
