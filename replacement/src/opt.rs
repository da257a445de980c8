use std::collections::BTreeMap;

use access_trace::{AddressTrace, PageId};
use log::debug;

use crate::ReplacementPolicy;

/// Position of the next access to `page` strictly after `step`, found by
/// walking the rest of the trace.
pub fn scan_next_use(trace: &AddressTrace, page: PageId, step: usize) -> Option<usize> {
    trace
        .iter()
        .enumerate()
        .skip(step + 1)
        .find(|(_, record)| record.page() == page)
        .map(|(i, _)| i)
}

/// For every trace position, where the same page is accessed next.
///
/// Built backwards in one pass; `after(step)` answers the same question as
/// [`scan_next_use`] for the page accessed at `step`.
pub struct NextUseIndex {
    next: Vec<Option<usize>>,
}

impl NextUseIndex {
    pub fn build(trace: &AddressTrace) -> Self {
        let mut last_seen: Vec<Option<usize>> = vec![None; trace.page_count()];
        let mut next = vec![None; trace.len()];
        for (step, record) in trace.iter().enumerate().rev() {
            let seen = &mut last_seen[record.page().index()];
            next[step] = *seen;
            *seen = Some(step);
        }
        Self { next }
    }

    pub fn after(&self, step: usize) -> Option<usize> {
        self.next.get(step).copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.next.len()
    }

    pub fn is_empty(&self) -> bool {
        self.next.is_empty()
    }
}

/// Belady's policy: evict the resident page whose next use lies furthest
/// ahead, pages never used again first. Ties go to the lowest page id.
pub struct Opt {
    index: NextUseIndex,
    // Resident pages and the step of their next access.
    upcoming: BTreeMap<PageId, Option<usize>>,
}

impl Opt {
    pub fn new(trace: &AddressTrace) -> Self {
        let index = NextUseIndex::build(trace);
        debug!("Built next-use index over {} steps", index.len());
        Self {
            index,
            upcoming: BTreeMap::new(),
        }
    }
}

impl ReplacementPolicy for Opt {
    fn tracks_frames(&self) -> bool {
        false
    }

    fn on_load(&mut self, page: PageId, step: usize) {
        self.upcoming.insert(page, self.index.after(step));
    }

    fn on_hit(&mut self, page: PageId, step: usize) {
        self.upcoming.insert(page, self.index.after(step));
    }

    fn evict(&mut self, _step: usize) -> Option<PageId> {
        let mut victim: Option<(PageId, usize)> = None;
        for (&page, &next) in self.upcoming.iter() {
            let distance = next.unwrap_or(usize::MAX);
            if victim.map_or(true, |(_, best)| distance > best) {
                victim = Some((page, distance));
                if next.is_none() {
                    break;
                }
            }
        }
        let (page, _) = victim?;
        self.upcoming.remove(&page);
        Some(page)
    }

    fn len(&self) -> usize {
        self.upcoming.len()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::*;

    fn trace_of(pages: &[&str]) -> AddressTrace {
        AddressTrace::load(pages.iter().map(|p| (format!("{}000", p), 'R')), 3).unwrap()
    }

    fn random_trace(rng: &mut StdRng, len: usize, pages: u32) -> AddressTrace {
        AddressTrace::load(
            (0..len).map(|_| (format!("{}000", rng.gen_range(0..pages)), 'R')),
            3,
        )
        .unwrap()
    }

    #[test]
    fn index_matches_scan() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let trace = random_trace(&mut rng, 200, 12);
            let index = NextUseIndex::build(&trace);
            for (step, record) in trace.iter().enumerate() {
                assert_eq!(
                    index.after(step),
                    scan_next_use(&trace, record.page(), step),
                    "step {}",
                    step
                );
            }
        }
    }

    #[test]
    fn scan_past_end() {
        let trace = trace_of(&["1", "2", "1"]);
        let one = trace.page_id("1").unwrap();
        assert_eq!(scan_next_use(&trace, one, 0), Some(2));
        assert_eq!(scan_next_use(&trace, one, 2), None);
        assert_eq!(scan_next_use(&trace, one, 10), None);
    }

    #[test]
    fn evict_furthest_next_use() {
        // 1 2 3 | 4 -> 1 is used at step 5, 2 at step 4, 3 at step 6
        let trace = trace_of(&["1", "2", "3", "4", "2", "1", "3"]);
        let id = |p: &str| trace.page_id(p).unwrap();
        let mut opt = Opt::new(&trace);
        opt.on_load(id("1"), 0);
        opt.on_load(id("2"), 1);
        opt.on_load(id("3"), 2);
        assert_eq!(opt.evict(3), Some(id("3")));
        assert_eq!(opt.len(), 2);
    }

    #[test]
    fn evict_never_used_again_first() {
        let trace = trace_of(&["1", "2", "3", "4", "1"]);
        let id = |p: &str| trace.page_id(p).unwrap();
        let mut opt = Opt::new(&trace);
        opt.on_load(id("1"), 0);
        opt.on_load(id("2"), 1);
        opt.on_load(id("3"), 2);
        // 2 and 3 never come back; the lower id wins the tie
        assert_eq!(opt.evict(3), Some(id("2")));
        assert_eq!(opt.evict(3), Some(id("3")));
        assert_eq!(opt.evict(3), Some(id("1")));
        assert_eq!(opt.evict(3), None);
    }

    #[test]
    fn hit_refreshes_next_use() {
        let trace = trace_of(&["1", "2", "1", "3", "2", "1"]);
        let id = |p: &str| trace.page_id(p).unwrap();
        let mut opt = Opt::new(&trace);
        opt.on_load(id("1"), 0);
        opt.on_load(id("2"), 1);
        opt.on_hit(id("1"), 2);
        // after step 2: 1 is next used at 5, 2 at 4
        assert_eq!(opt.evict(3), Some(id("1")));
    }

    // Straight forward Belady with a forward scan per resident page.
    fn scan_victims(trace: &AddressTrace, capacity: usize) -> Vec<PageId> {
        let mut resident = BTreeSet::new();
        let mut victims = Vec::new();
        for (step, record) in trace.iter().enumerate() {
            if resident.contains(&record.page()) {
                continue;
            }
            if resident.len() >= capacity {
                let mut victim = None;
                let mut furthest = 0;
                for &page in resident.iter() {
                    match scan_next_use(trace, page, step) {
                        None => {
                            victim = Some(page);
                            break;
                        }
                        Some(next) if victim.is_none() || next > furthest => {
                            furthest = next;
                            victim = Some(page);
                        }
                        Some(_) => {}
                    }
                }
                let victim = victim.unwrap();
                resident.remove(&victim);
                victims.push(victim);
            }
            resident.insert(record.page());
        }
        victims
    }

    #[test]
    fn same_victims_as_forward_scan() {
        let mut rng = StdRng::seed_from_u64(42);
        for round in 0..30 {
            let trace = random_trace(&mut rng, 300, 15);
            let capacity = 1 + round % 6;
            let mut opt = Opt::new(&trace);
            let mut resident = BTreeSet::new();
            let mut victims = Vec::new();
            for (step, record) in trace.iter().enumerate() {
                let page = record.page();
                if resident.contains(&page) {
                    opt.on_hit(page, step);
                    continue;
                }
                if resident.len() >= capacity {
                    let victim = opt.evict(step).unwrap();
                    resident.remove(&victim);
                    victims.push(victim);
                }
                resident.insert(page);
                opt.on_load(page, step);
            }
            assert_eq!(victims, scan_victims(&trace, capacity), "round {}", round);
        }
    }
}
