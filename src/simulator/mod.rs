
use std::fmt;

use access_trace::{AccessKind, AccessRecord, AddressTrace, PageId};
use log::{debug, info, trace};
use page_table::{FrameAllocator, PageTable};
use replacement::{PolicyKind, ReplacementPolicy};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulatorState {
    Idle,
    Running,
    Done,
    Aborted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimulationError {
    /// Zero frames were requested.
    InvalidCapacity,
    /// More pages resident than frames after a step.
    ResidentSetOverflow {
        step: usize,
        resident: usize,
        capacity: usize,
    },
    /// The resident set was full but the policy had nothing to evict.
    MissingVictim { step: usize },
    /// The policy picked a page that is not resident.
    VictimNotResident { step: usize, page: PageId },
    /// A result was asked for before the trace was exhausted.
    Unfinished,
    /// The run already failed and can not continue.
    Aborted,
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::InvalidCapacity => write!(f, "frame capacity must be at least 1"),
            SimulationError::ResidentSetOverflow {
                step,
                resident,
                capacity,
            } => write!(
                f,
                "step {}: {} pages resident with only {} frames",
                step, resident, capacity
            ),
            SimulationError::MissingVictim { step } => {
                write!(f, "step {}: no page to evict from a full resident set", step)
            }
            SimulationError::VictimNotResident { step, page } => {
                write!(f, "step {}: eviction victim {} is not resident", step, page)
            }
            SimulationError::Unfinished => write!(f, "simulation has not finished"),
            SimulationError::Aborted => write!(f, "simulation was aborted"),
        }
    }
}

impl std::error::Error for SimulationError {}

/// What happened on one access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub index: usize,
    pub page: PageId,
    pub kind: AccessKind,
    pub fault: bool,
    pub evicted: Option<PageId>,
    /// Frame of the page after the access, `None` under OPT.
    pub frame: Option<u32>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationResult {
    pub policy: PolicyKind,
    pub capacity: usize,
    pub accesses: u64,
    pub hits: u64,
    pub faults: u64,
    pub evictions: u64,
    /// Evicted pages that had been written while resident.
    pub dirty_evictions: u64,
    /// Write accesses in the trace, resident or not.
    pub writes: u64,
    pub steps: Option<Vec<Step>>,
}

impl SimulationResult {
    pub fn steps(&self) -> Option<&[Step]> {
        self.steps.as_deref()
    }

    pub fn fault_rate(&self) -> f64 {
        if self.accesses == 0 {
            0.0
        } else {
            self.faults as f64 / self.accesses as f64
        }
    }
}

/// Replays one trace through one policy with a fixed number of frames.
///
/// Goes `Idle -> Running -> Done` one record per [`Simulator::step`]. A
/// result can only be taken once the whole trace was replayed; after an
/// error the run is `Aborted` and nothing of it is handed out.
pub struct Simulator<'a> {
    trace: &'a AddressTrace,
    kind: PolicyKind,
    policy: Box<dyn ReplacementPolicy + Send>,
    capacity: usize,
    page_table: PageTable,
    frames: FrameAllocator,
    state: SimulatorState,
    cursor: usize,
    hits: u64,
    faults: u64,
    evictions: u64,
    dirty_evictions: u64,
    steps: Option<Vec<Step>>,
}

impl<'a> Simulator<'a> {
    pub fn new(
        trace: &'a AddressTrace,
        kind: PolicyKind,
        capacity: usize,
    ) -> Result<Self, SimulationError> {
        Self::with_policy(trace, kind, kind.build(trace, capacity), capacity)
    }

    pub(crate) fn with_policy(
        trace: &'a AddressTrace,
        kind: PolicyKind,
        policy: Box<dyn ReplacementPolicy + Send>,
        capacity: usize,
    ) -> Result<Self, SimulationError> {
        if capacity == 0 {
            return Err(SimulationError::InvalidCapacity);
        }
        // no run ever holds more pages than the trace touches
        let frames = if policy.tracks_frames() {
            capacity.min(trace.page_count())
        } else {
            0
        };
        Ok(Self {
            trace,
            kind,
            policy,
            capacity,
            page_table: PageTable::init(trace.page_count()),
            frames: FrameAllocator::init(frames),
            state: SimulatorState::Idle,
            cursor: 0,
            hits: 0,
            faults: 0,
            evictions: 0,
            dirty_evictions: 0,
            steps: None,
        })
    }

    /// Keep a [`Step`] for every access in the result.
    pub fn record_steps(mut self) -> Self {
        self.steps = Some(Vec::with_capacity(self.trace.len()));
        self
    }

    pub fn state(&self) -> SimulatorState {
        self.state
    }

    pub fn page_table(&self) -> &PageTable {
        &self.page_table
    }

    pub fn faults(&self) -> u64 {
        self.faults
    }

    pub fn evictions(&self) -> u64 {
        self.evictions
    }

    /// Processes the next record. `Ok(None)` once the trace is exhausted.
    pub fn step(&mut self) -> Result<Option<Step>, SimulationError> {
        match self.state {
            SimulatorState::Idle => {
                info!(
                    "Start {} run with {} frames over {} accesses",
                    self.kind,
                    self.capacity,
                    self.trace.len()
                );
                self.state = SimulatorState::Running;
            }
            SimulatorState::Running => {}
            SimulatorState::Done => return Ok(None),
            SimulatorState::Aborted => return Err(SimulationError::Aborted),
        }

        let trace = self.trace;
        let record = match trace.get(self.cursor) {
            Some(record) => record,
            None => {
                self.state = SimulatorState::Done;
                info!(
                    "Done {} run with {} frames: {} faults, {} evictions",
                    self.kind, self.capacity, self.faults, self.evictions
                );
                return Ok(None);
            }
        };
        let index = self.cursor;
        self.cursor += 1;

        match self.access(index, record) {
            Ok(step) => {
                if let Some(steps) = self.steps.as_mut() {
                    steps.push(step);
                }
                Ok(Some(step))
            }
            Err(e) => {
                self.state = SimulatorState::Aborted;
                self.steps = None;
                Err(e)
            }
        }
    }

    fn access(&mut self, index: usize, record: &AccessRecord) -> Result<Step, SimulationError> {
        let page = record.page();
        let kind = record.kind();

        if let Some(entry) = self.page_table.touch(page, kind) {
            self.hits += 1;
            self.policy.on_hit(page, index);
            trace!("Step {}: hit on page {}", index, page);
            return Ok(Step {
                index,
                page,
                kind,
                fault: false,
                evicted: None,
                frame: entry.frame(),
                dirty: entry.is_dirty(),
            });
        }

        self.faults += 1;
        let mut evicted = None;
        if self.page_table.len() >= self.capacity {
            let victim = self
                .policy
                .evict(index)
                .ok_or(SimulationError::MissingVictim { step: index })?;
            let entry = self
                .page_table
                .unmap_page(victim)
                .ok_or(SimulationError::VictimNotResident { step: index, page: victim })?;
            if let Some(frame) = entry.frame() {
                self.frames.deallocate_frame(frame);
            }
            if entry.is_dirty() {
                self.dirty_evictions += 1;
            }
            self.evictions += 1;
            debug!("Step {}: page {} evicts page {}", index, page, victim);
            evicted = Some(victim);
        } else {
            debug!("Step {}: page {} loaded into a free frame", index, page);
        }

        let frame = if self.policy.tracks_frames() {
            let frame = self.frames.allocate_frame().ok_or(SimulationError::ResidentSetOverflow {
                step: index,
                resident: self.page_table.len() + 1,
                capacity: self.capacity,
            })?;
            Some(frame)
        } else {
            None
        };
        let entry = self.page_table.map_page(page, frame, kind);
        self.policy.on_load(page, index);

        if self.page_table.len() > self.capacity || self.policy.len() != self.page_table.len() {
            return Err(SimulationError::ResidentSetOverflow {
                step: index,
                resident: self.page_table.len().max(self.policy.len()),
                capacity: self.capacity,
            });
        }

        Ok(Step {
            index,
            page,
            kind,
            fault: true,
            evicted,
            frame: entry.frame(),
            dirty: entry.is_dirty(),
        })
    }

    /// Runs the remaining records and returns the result.
    pub fn run_to_end(mut self) -> Result<SimulationResult, SimulationError> {
        while self.step()?.is_some() {}
        self.finish()
    }

    pub fn finish(self) -> Result<SimulationResult, SimulationError> {
        match self.state {
            SimulatorState::Done => {}
            SimulatorState::Aborted => return Err(SimulationError::Aborted),
            SimulatorState::Idle | SimulatorState::Running => {
                return Err(SimulationError::Unfinished)
            }
        }
        Ok(SimulationResult {
            policy: self.kind,
            capacity: self.capacity,
            accesses: self.trace.len() as u64,
            hits: self.hits,
            faults: self.faults,
            evictions: self.evictions,
            dirty_evictions: self.dirty_evictions,
            writes: self.trace.writes() as u64,
            steps: self.steps,
        })
    }
}

/// Replays `trace` under `policy` with `capacity` frames.
pub fn run(
    trace: &AddressTrace,
    policy: PolicyKind,
    capacity: usize,
) -> Result<SimulationResult, SimulationError> {
    Simulator::new(trace, policy, capacity)?.run_to_end()
}

/// Like [`run`], but the result carries a [`Step`] per access.
pub fn run_recorded(
    trace: &AddressTrace,
    policy: PolicyKind,
    capacity: usize,
) -> Result<SimulationResult, SimulationError> {
    Simulator::new(trace, policy, capacity)?
        .record_steps()
        .run_to_end()
}
