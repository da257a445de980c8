use std::{cmp::Ordering, process::ExitCode};

use access_trace::read_trace_file;
use clap::{error::ErrorKind, CommandFactory, Parser};
use cursive_table_view::{TableView, TableViewItem};
use log::info;
use page_sim::{
    config::{Args, Config},
    repl::REPL,
    report, run_batch, Error, Report,
};

use cursive::{
    view::{Nameable, Resizable},
    views::{Dialog, DummyView, LinearLayout, SelectView, TextView},
};

#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy)]
enum Column {
    Policy,
    Frames,
    Faults,
    Replacements,
    Writes,
    Eat,
}

impl Column {
    const ALL: [Column; 6] = [
        Column::Policy,
        Column::Frames,
        Column::Faults,
        Column::Replacements,
        Column::Writes,
        Column::Eat,
    ];

    fn title(&self) -> &'static str {
        match self {
            Column::Policy => "Policy",
            Column::Frames => "Frames",
            Column::Faults => "Page faults",
            Column::Replacements => "Replacements",
            Column::Writes => "Writes to disk",
            Column::Eat => "EAT (ns)",
        }
    }
}

#[derive(Debug, Clone)]
struct Row(Report);

impl TableViewItem<Column> for Row {
    fn to_column(&self, column: Column) -> String {
        let r = &self.0;
        match column {
            Column::Policy => r.policy.to_string(),
            Column::Frames => r.capacity.to_string(),
            Column::Faults => r.faults.to_string(),
            Column::Replacements => r.evictions.to_string(),
            Column::Writes => r.writes_to_disk.to_string(),
            Column::Eat => r.estimated_access_time_ns.to_string(),
        }
    }

    fn cmp(&self, other: &Self, column: Column) -> Ordering
    where
        Self: Sized,
    {
        let (a, b) = (&self.0, &other.0);
        match column {
            Column::Policy => a.policy.cmp(&b.policy),
            Column::Frames => a.capacity.cmp(&b.capacity),
            Column::Faults => a.faults.cmp(&b.faults),
            Column::Replacements => a.evictions.cmp(&b.evictions),
            Column::Writes => a.writes_to_disk.cmp(&b.writes_to_disk),
            Column::Eat => a.estimated_access_time_ns.cmp(&b.estimated_access_time_ns),
        }
    }
}

fn make_table(rows: Vec<Row>) -> TableView<Row, Column> {
    let mut table = TableView::<Row, Column>::new();
    for (i, column) in Column::ALL.iter().enumerate() {
        table.insert_column(i, *column, column.title(), |c| c);
    }
    table.set_items(rows);
    table
}

fn rows_for(rows: &[Row], frames: Option<usize>) -> Vec<Row> {
    rows.iter()
        .filter(|row| frames.map_or(true, |frames| row.0.capacity == frames))
        .cloned()
        .collect()
}

fn simulate(config: &Config) -> Result<(String, Vec<Row>), Error> {
    let trace = read_trace_file(
        &config.trace_file,
        config.address_limit,
        config.page_offset_width,
    )?;
    let results = run_batch(&trace, &config.runs(), false)?;
    let rows = results
        .iter()
        .map(|result| Row(report(result, config.fault_cost_ns)))
        .collect::<Vec<_>>();
    info!("Simulated {} runs over {} accesses", results.len(), trace.len());
    let header = format!(
        "{}: {} accesses, {} pages, {} writes",
        config.trace_file.display(),
        trace.len(),
        trace.page_count(),
        trace.writes()
    );
    Ok((header, rows))
}

fn main() -> ExitCode {
    env_logger::init();

    let mut config = match Config::try_from(Args::parse()) {
        Ok(config) => config,
        Err(e) => Args::command().error(ErrorKind::ValueValidation, e).exit(),
    };
    if config.prompt_for_limit {
        match (REPL {}).ask_address_limit() {
            Ok(limit) => config.address_limit = limit,
            Err(e) => {
                eprintln!("error: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }
    let (header, rows) = match simulate(&config) {
        Ok(simulated) => simulated,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut select = SelectView::<Option<usize>>::new().item("All frames", None);
    for &frames in &config.frame_counts {
        select.add_item(format!("{} frames", frames), Some(frames));
    }
    let all_rows = rows.clone();
    let select = select
        .on_submit(move |s, frames: &Option<usize>| {
            let rows = rows_for(&all_rows, *frames);
            s.call_on_name("results", |view: &mut TableView<Row, Column>| {
                view.set_items(rows);
            });
        })
        .with_name("Choose frames")
        .fixed_size((16, 10));

    let table = make_table(rows).with_name("results").min_size((90, 16));

    let mut siv = cursive::default();
    siv.add_global_callback('q', |s| s.quit());
    siv.add_layer(
        Dialog::around(
            LinearLayout::vertical()
                .child(TextView::new(header))
                .child(DummyView)
                .child(LinearLayout::horizontal().child(select).child(table)),
        )
        .title("Page replacement")
        .button("Quit", |s| s.quit()),
    );
    siv.run();
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use page_sim::PolicyKind;

    use super::*;

    fn row(policy: PolicyKind, capacity: usize, faults: u64) -> Row {
        Row(Report {
            policy,
            capacity,
            faults,
            evictions: faults.saturating_sub(capacity as u64),
            writes_to_disk: 3,
            estimated_access_time_ns: faults * 100,
        })
    }

    #[test]
    fn columns_render_report() {
        let r = row(PolicyKind::Lru, 10, 42);
        let cells: Vec<String> = Column::ALL.iter().map(|c| r.to_column(*c)).collect();
        assert_eq!(cells, vec!["LRU", "10", "42", "32", "3", "4200"]);
    }

    #[test]
    fn sort_numerically() {
        let a = row(PolicyKind::Opt, 9, 100);
        let b = row(PolicyKind::Fifo, 10, 20);
        assert_eq!(a.cmp(&b, Column::Frames), Ordering::Less);
        assert_eq!(a.cmp(&b, Column::Faults), Ordering::Greater);
        assert_eq!(a.cmp(&b, Column::Policy), Ordering::Greater);
    }

    #[test]
    fn filter_by_frames() {
        let rows = vec![
            row(PolicyKind::Fifo, 10, 5),
            row(PolicyKind::Lru, 10, 4),
            row(PolicyKind::Fifo, 50, 3),
        ];
        assert_eq!(rows_for(&rows, None).len(), 3);
        assert_eq!(rows_for(&rows, Some(10)).len(), 2);
        assert!(rows_for(&rows, Some(100)).is_empty());
    }
}
