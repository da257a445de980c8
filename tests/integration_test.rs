use std::{
    fs::{read_to_string, remove_dir_all, remove_file, File},
    io::Write,
    path::Path,
};

use access_trace::{read_trace_file, AddressTrace};
use clap::Parser;
use page_sim::{
    config::{Args, Config},
    memory_map::save_memory_map,
    report, run, run_batch, run_recorded, PolicyKind,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serial_test::serial;

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn random_trace(rng: &mut StdRng, len: usize, pages: u32) -> AddressTrace {
    AddressTrace::load(
        (0..len).map(|_| {
            let op = if rng.gen_bool(0.3) { 'W' } else { 'R' };
            (format!("{:x}{:03}", rng.gen_range(0..pages), rng.gen_range(0..1000)), op)
        }),
        3,
    )
    .unwrap()
}

#[test]
fn counts_are_bounded() {
    init();
    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..25 {
        let len = rng.gen_range(0..400);
        let pages = rng.gen_range(1..40);
        let trace = random_trace(&mut rng, len, pages);
        let capacity = rng.gen_range(1..12);
        for policy in PolicyKind::ALL {
            let result = run(&trace, policy, capacity).unwrap();
            assert!(result.evictions <= result.faults);
            assert!(result.faults <= trace.len() as u64);
            assert!(result.faults >= trace.page_count().min(trace.len()) as u64);
            assert!(result.dirty_evictions <= result.evictions);
            assert_eq!(result.hits + result.faults, result.accesses);
        }
    }
}

#[test]
fn opt_never_loses() {
    init();
    let mut rng = StdRng::seed_from_u64(2);
    for _ in 0..40 {
        let pages = rng.gen_range(2..30);
        let trace = random_trace(&mut rng, 500, pages);
        for capacity in [1, 2, 3, 5, 8, 13] {
            let opt = run(&trace, PolicyKind::Opt, capacity).unwrap().faults;
            let fifo = run(&trace, PolicyKind::Fifo, capacity).unwrap().faults;
            let lru = run(&trace, PolicyKind::Lru, capacity).unwrap().faults;
            assert!(opt <= fifo, "OPT {} > FIFO {} at {} frames", opt, fifo, capacity);
            assert!(opt <= lru, "OPT {} > LRU {} at {} frames", opt, lru, capacity);
        }
    }
}

#[test]
fn evictions_follow_faults_once_full() {
    let mut rng = StdRng::seed_from_u64(3);
    let trace = random_trace(&mut rng, 1000, 20);
    for policy in PolicyKind::ALL {
        let result = run(&trace, policy, 4).unwrap();
        // the first four faults fill empty frames
        assert_eq!(result.evictions, result.faults - 4);
    }
}

#[test]
fn dirty_flags_match_writes_since_load() {
    let mut rng = StdRng::seed_from_u64(4);
    let trace = random_trace(&mut rng, 600, 10);
    for policy in PolicyKind::ALL {
        let result = run_recorded(&trace, policy, 3).unwrap();
        let mut written = vec![false; trace.page_count()];
        for (record, step) in trace.iter().zip(result.steps().unwrap()) {
            let page = record.page().index();
            if let Some(victim) = step.evicted {
                written[victim.index()] = false;
            }
            if step.fault {
                written[page] = false;
            }
            written[page] |= record.kind().is_write();
            assert_eq!(step.dirty, written[page], "{} step {}", policy, step.index);
        }
    }
}

#[test]
fn more_frames_than_pages() {
    let mut rng = StdRng::seed_from_u64(5);
    let trace = random_trace(&mut rng, 300, 6);
    for policy in PolicyKind::ALL {
        let result = run(&trace, policy, trace.page_count()).unwrap();
        assert_eq!(result.faults, trace.page_count() as u64);
        assert_eq!(result.evictions, 0);
    }
}

fn write_trace(name: &str, lines: &[&str]) {
    let mut file = File::create(name).unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
}

#[test]
#[serial]
fn trace_file_to_reports() {
    init();
    let name = "test_trace_file_to_reports.trace";
    write_trace(
        name,
        &[
            "0041f7a0 R",
            "13f5e2c0 R",
            "05e78900 W",
            "004758a0 R",
            "0041f7a4 W",
            "13f5e2c8 R",
            "31348900 W",
        ],
    );

    let args = Args::try_parse_from(["page_sim", name, "-f", "2,3", "-n", "6"]).unwrap();
    let config = Config::try_from(args).unwrap();
    let trace = read_trace_file(
        &config.trace_file,
        config.address_limit,
        config.page_offset_width,
    )
    .unwrap();
    assert_eq!(trace.len(), 6);

    let results = run_batch(&trace, &config.runs(), false).unwrap();
    assert_eq!(results.len(), 6);
    for result in &results {
        let summary = report(result, config.fault_cost_ns);
        assert_eq!(summary.writes_to_disk, 2);
        assert_eq!(summary.estimated_access_time_ns, summary.faults * 100);
    }

    // with three frames only OPT keeps 0041f and 13f5e around for their reuse
    let three: Vec<u64> = results.iter().filter(|r| r.capacity == 3).map(|r| r.faults).collect();
    assert_eq!(three, vec![6, 6, 4]);

    remove_file(name).unwrap();
}

#[test]
#[serial]
fn memory_maps_for_every_run() {
    let name = "test_memory_maps_for_every_run.trace";
    let dir = Path::new("test_memory_maps_for_every_run");
    write_trace(name, &["1000 W", "2000 R", "3000 R", "1004 R"]);
    let _ = remove_dir_all(dir);
    std::fs::create_dir_all(dir).unwrap();

    let trace = read_trace_file(name, None, 3).unwrap();
    let results = run_batch(
        &trace,
        &[(PolicyKind::Fifo, 2), (PolicyKind::Lru, 2), (PolicyKind::Opt, 2)],
        true,
    )
    .unwrap();
    for result in &results {
        let path = dir.join(format!("{}.map", result.policy.name()));
        save_memory_map(&path, &trace, result).unwrap();
        let text = read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 5);
        assert!(text.lines().nth(1).unwrap().starts_with("1000"));
    }

    remove_dir_all(dir).unwrap();
    remove_file(name).unwrap();
}
