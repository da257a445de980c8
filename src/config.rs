use std::{fmt, path::PathBuf};

use clap::Parser;
use replacement::PolicyKind;

pub const PAGE_OFFSET_WIDTH: usize = access_trace::PAGE_OFFSET_WIDTH;
/// Cost charged per page fault when estimating access time.
pub const FAULT_COST_NS: u64 = 100;
pub const FRAME_COUNTS: [usize; 3] = [10, 50, 100];
pub const TRACE_FILE: &str = "gcc.trace";

/// Replays a memory trace through FIFO, LRU and OPT page replacement
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "page_sim", version, about, long_about = None)]
pub struct Args {
    /// Trace file, one `ADDRESS R|W` record per line
    #[arg(default_value = TRACE_FILE)]
    pub trace_file: PathBuf,

    /// Read at most this many records
    #[arg(short = 'n', long, conflicts_with = "all")]
    pub count: Option<usize>,

    /// Read the whole trace without asking
    #[arg(short, long)]
    pub all: bool,

    /// Frame counts to simulate
    #[arg(short, long, value_delimiter = ',', default_values_t = FRAME_COUNTS)]
    pub frames: Vec<usize>,

    /// Replacement policies to run: fifo, lru, opt
    #[arg(short, long, value_delimiter = ',', default_values_t = PolicyKind::ALL)]
    pub policies: Vec<PolicyKind>,

    /// Trailing address characters that form the page offset
    #[arg(short = 'w', long, default_value_t = PAGE_OFFSET_WIDTH)]
    pub offset_width: usize,

    /// Nanoseconds charged per page fault
    #[arg(short = 'c', long, default_value_t = FAULT_COST_NS)]
    pub fault_cost: u64,

    /// Write one memory map per run into this directory
    #[arg(short = 'm', long, value_name = "DIR")]
    pub memory_maps: Option<PathBuf>,

    /// Print the memory map of every run
    #[arg(long)]
    pub print_maps: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub trace_file: PathBuf,
    /// Read at most this many records. `None` reads the whole file.
    pub address_limit: Option<usize>,
    /// Ask on the terminal how many records to read.
    pub prompt_for_limit: bool,
    pub frame_counts: Vec<usize>,
    pub policies: Vec<PolicyKind>,
    pub page_offset_width: usize,
    pub fault_cost_ns: u64,
    /// Write a memory map per run into this directory.
    pub memory_map_dir: Option<PathBuf>,
    pub print_memory_maps: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            trace_file: PathBuf::from(TRACE_FILE),
            address_limit: None,
            prompt_for_limit: true,
            frame_counts: FRAME_COUNTS.to_vec(),
            policies: PolicyKind::ALL.to_vec(),
            page_offset_width: PAGE_OFFSET_WIDTH,
            fault_cost_ns: FAULT_COST_NS,
            memory_map_dir: None,
            print_memory_maps: false,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    InvalidCapacity,
    InvalidOffsetWidth,
    NothingToRun,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidCapacity => write!(f, "frame counts must be at least 1"),
            ConfigError::InvalidOffsetWidth => write!(f, "page offset width must be at least 1"),
            ConfigError::NothingToRun => write!(f, "no policy or frame count selected"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl TryFrom<Args> for Config {
    type Error = ConfigError;

    fn try_from(args: Args) -> Result<Self, Self::Error> {
        let config = Config {
            trace_file: args.trace_file,
            address_limit: args.count,
            prompt_for_limit: args.count.is_none() && !args.all,
            frame_counts: args.frames,
            policies: args.policies,
            page_offset_width: args.offset_width,
            fault_cost_ns: args.fault_cost,
            memory_map_dir: args.memory_maps,
            print_memory_maps: args.print_maps,
        };
        config.validate()?;
        Ok(config)
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frame_counts.iter().any(|&frames| frames == 0) {
            return Err(ConfigError::InvalidCapacity);
        }
        if self.page_offset_width == 0 {
            return Err(ConfigError::InvalidOffsetWidth);
        }
        if self.frame_counts.is_empty() || self.policies.is_empty() {
            return Err(ConfigError::NothingToRun);
        }
        Ok(())
    }

    /// Whether runs have to keep their steps for a memory map.
    pub fn records_steps(&self) -> bool {
        self.memory_map_dir.is_some() || self.print_memory_maps
    }

    /// Every (policy, frames) pair to simulate, grouped by frame count.
    pub fn runs(&self) -> Vec<(PolicyKind, usize)> {
        self.frame_counts
            .iter()
            .flat_map(|&frames| self.policies.iter().map(move |&policy| (policy, frames)))
            .collect()
    }
}
