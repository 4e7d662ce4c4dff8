use clap::Parser;
use pvault::cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter (e.g. `PVAULT_LOG=debug`).
const LOG_ENV: &str = "PVAULT_LOG";

fn main() {
    // Logs go to stderr so they never mix with shell output on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("error")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Create { ref name } => pvault::cli::commands::create::execute(&cli, name),
        Commands::Shell { ref vault } => {
            pvault::cli::commands::shell::execute(&cli, vault.as_deref())
        }
        Commands::List => pvault::cli::commands::list::execute(&cli),
    };

    if let Err(e) = result {
        pvault::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
