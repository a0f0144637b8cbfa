//! promptcache CLI
//!
//! Offline inspector for cache-aware request layouts. Nothing here talks to
//! the provider; it shows what would be sent.
//!
//! ```bash
//! promptcache render "Hi" --document --tools
//! promptcache breakpoints "Hi" --one-hour --transcript history.json
//! promptcache --config promptcache.toml check
//! ```

mod args;
mod commands;
mod console;

use args::{Cli, Commands};
use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.json_logs);

    // Set RUST_LOG=debug to see breakpoint layout decisions
    match &cli.command {
        Commands::Render(request) => commands::render(cli.config.as_deref(), request),
        Commands::Breakpoints(request) => commands::breakpoints(cli.config.as_deref(), request),
        Commands::Check => commands::check(cli.config.as_deref()),
    }
}

fn init_logging(json: bool) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
