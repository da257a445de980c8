use std::{
    fs,
    io::{self, Write},
    process::ExitCode,
};

use access_trace::read_trace_file;
use clap::{error::ErrorKind, CommandFactory, Parser};
use page_sim::{
    config::{Args, Config},
    memory_map::{save_memory_map, write_memory_map},
    repl::REPL,
    report::{comparison_table, report},
    run_batch, Error,
};

fn main() -> ExitCode {
    env_logger::init();
    let config = match Config::try_from(Args::parse()) {
        Ok(config) => config,
        Err(e) => Args::command().error(ErrorKind::ValueValidation, e).exit(),
    };
    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(mut config: Config) -> Result<(), Error> {
    if config.prompt_for_limit {
        config.address_limit = REPL {}.ask_address_limit()?;
    }

    let trace = read_trace_file(
        &config.trace_file,
        config.address_limit,
        config.page_offset_width,
    )?;
    let results = run_batch(&trace, &config.runs(), config.records_steps())?;

    if let Some(dir) = &config.memory_map_dir {
        fs::create_dir_all(dir)?;
    }

    println!("\n            Summary table\n");
    let mut reports = Vec::with_capacity(results.len());
    for result in &results {
        println!("{} simulation for {} frames:", result.policy, result.capacity);
        let summary = report(result, config.fault_cost_ns);
        println!("{}\n", summary);
        reports.push(summary);

        if config.print_memory_maps {
            let mut stdout = io::stdout().lock();
            write_memory_map(&mut stdout, &trace, result)?;
            writeln!(stdout)?;
        }
        if let Some(dir) = &config.memory_map_dir {
            let name = format!("{}_{}.map", result.policy.name().to_lowercase(), result.capacity);
            save_memory_map(dir.join(name), &trace, result)?;
        }
    }
    print!("{}", comparison_table(&reports));
    Ok(())
}
