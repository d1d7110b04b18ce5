use clap::{Parser, Subcommand};

/// pomo: personal task tracker
#[derive(Parser, Debug, Clone)]
#[command(name = "pomo", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,

    /// Path to config file (default: .pomo.toml, if present)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// GitHub API root (e.g. a GitHub Enterprise API URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CliCommand {
    /// Import GitHub issues as tasks
    Import {
        /// Account or organization owning the repository
        user: String,

        /// Repository name
        project: String,

        /// Import only this issue (default: all open issues, oldest first)
        number: Option<u64>,

        /// Print every field of each imported task
        #[arg(long, short)]
        verbose: bool,
    },
}
