//! Page replacement policies.
//!
//! A policy only decides which resident page goes when a frame is needed.
//! Residency itself, dirty bits and frame numbers belong to the caller's
//! page table; the policy is told about every load and every hit and keeps
//! whatever ordering it needs.

mod fifo;
mod lru;
mod opt;

use std::{fmt, str::FromStr};

use access_trace::{AddressTrace, PageId};

pub use fifo::Fifo;
pub use lru::Lru;
pub use opt::{scan_next_use, NextUseIndex, Opt};

pub trait ReplacementPolicy {
    /// Whether loaded pages get a frame number. OPT only models residency.
    fn tracks_frames(&self) -> bool {
        true
    }

    /// `page` was loaded at trace position `step`.
    fn on_load(&mut self, page: PageId, step: usize);

    /// `page` was already resident when accessed at `step`.
    fn on_hit(&mut self, page: PageId, step: usize);

    /// Picks the page to make room for the fault at `step` and stops tracking it.
    /// Returns `None` only when nothing is tracked.
    fn evict(&mut self, step: usize) -> Option<PageId>;

    /// Number of pages the policy currently tracks.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PolicyKind {
    Fifo,
    Lru,
    Opt,
}

impl PolicyKind {
    pub const ALL: [PolicyKind; 3] = [PolicyKind::Fifo, PolicyKind::Lru, PolicyKind::Opt];

    pub fn name(&self) -> &'static str {
        match self {
            PolicyKind::Fifo => "FIFO",
            PolicyKind::Lru => "LRU",
            PolicyKind::Opt => "OPT",
        }
    }

    /// Creates a fresh policy for one run over `trace` with `capacity` frames.
    /// Storage is sized for at most the pages the trace touches.
    pub fn build(&self, trace: &AddressTrace, capacity: usize) -> Box<dyn ReplacementPolicy + Send> {
        let capacity = capacity.min(trace.page_count());
        match self {
            PolicyKind::Fifo => Box::new(Fifo::new(capacity)),
            PolicyKind::Lru => Box::new(Lru::new(capacity)),
            PolicyKind::Opt => Box::new(Opt::new(trace)),
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct UnknownPolicy(pub String);

impl fmt::Display for UnknownPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown replacement policy {:?}", self.0)
    }
}

impl std::error::Error for UnknownPolicy {}

impl FromStr for PolicyKind {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fifo" => Ok(PolicyKind::Fifo),
            "lru" => Ok(PolicyKind::Lru),
            "opt" | "optimal" | "belady" => Ok(PolicyKind::Opt),
            _ => Err(UnknownPolicy(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_policy_names() {
        assert_eq!("fifo".parse(), Ok(PolicyKind::Fifo));
        assert_eq!("LRU".parse(), Ok(PolicyKind::Lru));
        assert_eq!("Opt".parse(), Ok(PolicyKind::Opt));
        assert_eq!("belady".parse(), Ok(PolicyKind::Opt));
        assert_eq!(
            "clock".parse::<PolicyKind>(),
            Err(UnknownPolicy("clock".to_string()))
        );
    }

    #[test]
    fn build_reports_frame_tracking() {
        let trace = AddressTrace::load(vec![("1000", 'R')], 3).unwrap();
        assert!(PolicyKind::Fifo.build(&trace, 2).tracks_frames());
        assert!(PolicyKind::Lru.build(&trace, 2).tracks_frames());
        assert!(!PolicyKind::Opt.build(&trace, 2).tracks_frames());
    }

    #[test]
    fn build_with_unbounded_capacity() {
        let trace = AddressTrace::load(vec![("1000", 'R'), ("2000", 'W')], 3).unwrap();
        for kind in PolicyKind::ALL {
            let mut policy = kind.build(&trace, usize::MAX);
            policy.on_load(PageId::new(0), 0);
            policy.on_load(PageId::new(1), 1);
            assert_eq!(policy.len(), 2);
            assert!(policy.evict(2).is_some());
        }
    }

    #[test]
    fn display_names() {
        let names: Vec<String> = PolicyKind::ALL.iter().map(|p| p.to_string()).collect();
        assert_eq!(names, vec!["FIFO", "LRU", "OPT"]);
    }
}
