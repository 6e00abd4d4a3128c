use std::path::PathBuf;

use clap::{Parser, Subcommand};
use crisp8::fs_runner::FsTestHost;
use crisp8_harness::{OutputTestRunner, RunnerOptions, DEFAULT_SEED};
use crisp8_machine::{Crisp8, CYCLE_LIMIT, HALT_ADDRESS};

#[derive(Parser)]
#[command(about = "CRISP-8: A CHIP-8 emulator.")]
struct Args {
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Seed for the random number instruction
    #[arg(short, long, global = true, default_value_t = DEFAULT_SEED)]
    seed: u64,
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Run a ROM until it jumps to 0x0111 and print the machine state
    Run {
        path: PathBuf,
        #[arg(short, long, default_value_t = CYCLE_LIMIT)]
        max_cycles: usize,
    },
    /// Run every ".test" ROM under the given paths and compare the final
    /// machine state with the sibling ".expected" file
    Test {
        /// Save the actual machine state to the ".expected" file of each
        /// test with an incorrect result
        #[arg(short, long)]
        rebase: bool,
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
}

fn run(path: PathBuf, seed: u64, max_cycles: usize) -> anyhow::Result<()> {
    let rom = std::fs::read(&path)?;

    let mut crisp8 = Crisp8::seeded(seed);
    crisp8.load_rom(&rom)?;

    match crisp8.run_until(HALT_ADDRESS, max_cycles) {
        Ok(stats) if stats.halted => println!("Halted after {} cycles.", stats.cycles),
        Ok(stats) => println!("Stopped after {} cycles.", stats.cycles),
        Err(error) if error.is_domain() => println!("{error}"),
        Err(error) => return Err(error.into()),
    }

    println!("{}", crisp8.debug_string());
    Ok(())
}

fn test(paths: Vec<PathBuf>, seed: u64, rebase: bool) -> anyhow::Result<bool> {
    let mut host = FsTestHost::new(paths.as_slice())?;
    host.set_seed(seed);

    let mut runner = OutputTestRunner::new(RunnerOptions { rebase });
    let summary = runner.run(&mut host)?;
    Ok(summary.all_passed())
}

fn main() -> anyhow::Result<()> {
    let Args {
        verbose,
        seed,
        action,
    } = Args::parse();

    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match action {
        Action::Run { path, max_cycles } => run(path, seed, max_cycles)?,
        Action::Test { rebase, paths } => {
            if !test(paths, seed, rebase)? {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
