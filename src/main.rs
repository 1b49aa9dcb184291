use std::path::{Path, PathBuf};
use std::process;

use anyhow::Result;
use clap::Parser;

use covbench::config::Config;
use covbench::context::{self, RunContext};
use covbench::corpus;
use covbench::display;
use covbench::driver;
use covbench::errors::CovbenchError;
use covbench::runner::TimedRunner;
use covbench::toolchain;
use covbench::types::{ToolchainId, WorkloadSize};

#[derive(Parser)]
#[command(
    name = "covbench",
    version,
    about = "Measure the runtime overhead of coverage tools across Rust and C++ test suites"
)]
struct Cli {
    /// Generate the Rust test corpus with N synthetic test cases
    #[arg(long, value_name = "N")]
    gen_rust_tests: Option<u32>,

    /// Generate the C++ test corpus with N synthetic test cases
    #[arg(long, value_name = "N")]
    gen_cpp_tests: Option<u32>,

    /// Benchmark the Rust toolchain across all workload sizes
    #[arg(long)]
    sweep_rust: bool,

    /// Benchmark the C++ toolchain across all workload sizes
    #[arg(long)]
    sweep_cpp: bool,

    /// Benchmark both toolchains
    #[arg(long)]
    sweep_all: bool,

    /// Timed runs per workload and tool (default 5)
    #[arg(short, long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    trials: Option<u32>,

    /// Render comparison tables from the most recent benchmark log
    #[arg(long)]
    report: bool,

    /// Log file to report from instead of the most recent one
    #[arg(long, value_name = "PATH")]
    log: Option<PathBuf>,

    /// Workbench root containing the rust/ and cpp/ app trees
    #[arg(long, value_name = "DIR")]
    root: Option<PathBuf>,

    /// Emit the report as JSON instead of tables
    #[arg(long)]
    json: bool,
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::resolve(cli.root.clone(), cli.trials)?;

    let wants_gen = cli.gen_rust_tests.is_some() || cli.gen_cpp_tests.is_some();
    let wants_sweep = cli.sweep_rust || cli.sweep_cpp || cli.sweep_all;

    if !wants_gen && !wants_sweep && !cli.report {
        return Err(CovbenchError::NothingToDo.into());
    }

    if let Some(n) = cli.gen_rust_tests {
        let size = WorkloadSize::new(n)?;
        let path = corpus::generate(ToolchainId::Rust, size, &config.root)?;
        println!("Wrote {} Rust test cases to {}", size, path.display());
    }

    if let Some(n) = cli.gen_cpp_tests {
        let size = WorkloadSize::new(n)?;
        let path = corpus::generate(ToolchainId::Cpp, size, &config.root)?;
        println!("Wrote {} C++ test cases to {}", size, path.display());
    }

    if wants_sweep {
        let mut selected = Vec::new();
        if cli.sweep_rust || cli.sweep_all {
            selected.push(ToolchainId::Rust);
        }
        if cli.sweep_cpp || cli.sweep_all {
            selected.push(ToolchainId::Cpp);
        }

        let mut ctx = RunContext::create(&config.log_dir)?;
        let runner = TimedRunner;
        let sizes = WorkloadSize::all();

        for id in selected {
            let tc = toolchain::for_id(id, &config.root);
            // A missing toolchain skips its sweep; it never kills the run.
            match tc.check_installed(&runner) {
                Ok(()) => driver::sweep(tc.as_ref(), &runner, &sizes, config.trials, &mut ctx)?,
                Err(err) => ctx.warn(&format!("skipping {} sweep: {err}", id.label())),
            }
        }

        print_report(ctx.path(), cli.json)?;
    } else if cli.report {
        let path = match cli.log {
            Some(path) => path,
            None => context::latest_log(&config.log_dir)?,
        };
        print_report(&path, cli.json)?;
    }

    Ok(())
}

fn print_report(log_path: &Path, json: bool) -> Result<()> {
    let text = std::fs::read_to_string(log_path).map_err(|source| CovbenchError::LogRead {
        path: log_path.to_path_buf(),
        source,
    })?;

    let report = display::build_report(&text, &WorkloadSize::all());
    if json {
        println!("{}", display::format_json(&report));
    } else {
        print!("{}", display::render_tables(&report));
    }
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{}", err);
        process::exit(1);
    }
}
