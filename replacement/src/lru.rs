use std::collections::VecDeque;

use access_trace::PageId;

use crate::ReplacementPolicy;

/// Least recently used first. The front of `stack` is the LRU page, the
/// back the most recently used one.
pub struct Lru {
    stack: VecDeque<PageId>,
}

impl Lru {
    pub fn new(capacity: usize) -> Self {
        Self {
            stack: VecDeque::with_capacity(capacity),
        }
    }
}

impl ReplacementPolicy for Lru {
    fn on_load(&mut self, page: PageId, _step: usize) {
        self.stack.push_back(page);
    }

    // O(capacity) scan; fine for the frame counts simulated here.
    fn on_hit(&mut self, page: PageId, _step: usize) {
        if let Some(pos) = self.stack.iter().position(|&p| p == page) {
            self.stack.remove(pos);
        }
        self.stack.push_back(page);
    }

    fn evict(&mut self, _step: usize) -> Option<PageId> {
        self.stack.pop_front()
    }

    fn len(&self) -> usize {
        self.stack.len()
    }
}
