mod app;
mod cli;
mod data;
mod error;
mod prompt;

use std::io;

use anyhow::Result;

use app::RunOutcome;
use cli::Cli;
use data::filter::ConsoleReporter;

fn main() -> Result<()> {
    let cli = Cli::parse_normalized();
    init_logging(cli.verbose);

    let stdin = io::stdin();
    let outcome = app::run(&cli, stdin.lock(), io::stdout(), &mut ConsoleReporter)?;

    match outcome {
        RunOutcome::Written { loaded, written, output } => {
            println!("Loaded {loaded} entries from {}", cli.filename.display());
            println!("Wrote {written} scene IDs to {}", output.display());
        }
        RunOutcome::Declined => println!("Not continuing."),
    }
    Ok(())
}

/// Logs go to stderr. `-v` shows load progress; `RUST_LOG` overrides both.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}
