use std::io;
use std::process;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use pomo::cli::{Cli, CliCommand};
use pomo::config::Config;
use pomo::error::Error;
use pomo::importer::{IssueImporter, not_found_diagnostic};
use pomo::task::print_tasks;
use pomo::tracker::github::GitHubTracker;

fn init_logging() {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();
}

/// Report `err` on stderr and exit. A missing repository or issue gets the
/// not-found diagnostic.
fn fail(err: &Error) -> ! {
    if err.is_not_found() {
        eprint!("{}", not_found_diagnostic(err));
    } else {
        eprintln!("error: {err}");
    }
    process::exit(1);
}

fn main() {
    let cli = Cli::parse();
    init_logging();

    let config = match Config::load(&cli) {
        Ok(c) => c,
        Err(e) => fail(&e),
    };

    debug!(?config, "config loaded");

    match &cli.command {
        CliCommand::Import {
            user,
            project,
            number,
            verbose,
        } => {
            let importer = IssueImporter::new(GitHubTracker::new(&config));
            let tasks = match importer.import(user, project, *number) {
                Ok(tasks) => tasks,
                Err(e) => fail(&e),
            };

            let mut stdout = io::stdout().lock();
            if let Err(e) = print_tasks(&tasks, *verbose, &config.line_format(), &mut stdout) {
                fail(&Error::Io(e));
            }
        }
    }
}
