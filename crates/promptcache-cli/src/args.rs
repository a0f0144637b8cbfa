//! CLI argument definitions using clap

use clap::{Args, Parser, Subcommand};
use promptcache_core::RequestOptions;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "promptcache")]
#[command(about = "Inspect prompt-cache request layouts")]
#[command(version)]
pub struct Cli {
    /// Settings file (TOML, YAML or JSON)
    #[arg(long, global = true, env = "PROMPTCACHE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the encoded request body for a new user turn
    Render(RequestArgs),

    /// List cache breakpoints the request would carry
    Breakpoints(RequestArgs),

    /// Load settings and assets and validate credentials
    Check,
}

/// Shared flags describing the request to build
#[derive(Args, Debug, Clone)]
pub struct RequestArgs {
    /// Text of the new user turn
    pub text: String,

    /// JSON file holding prior turns
    #[arg(long)]
    pub transcript: Option<PathBuf>,

    /// Use the 1h cache TTL instead of 5m
    #[arg(long)]
    pub one_hour: bool,

    /// Include the large reference document
    #[arg(long)]
    pub document: bool,

    /// Include the tool catalog
    #[arg(long)]
    pub tools: bool,

    /// Build as the first turn of a fresh conversation
    #[arg(long)]
    pub reset: bool,
}

impl RequestArgs {
    pub fn options(&self) -> RequestOptions {
        RequestOptions::new()
            .with_1h_cache(self.one_hour)
            .with_large_document(self.document)
            .with_tools(self.tools)
            .with_reset(self.reset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptcache_core::CacheTtl;

    #[test]
    fn test_parse_render_flags() {
        let cli = Cli::parse_from([
            "promptcache",
            "render",
            "Hi",
            "--one-hour",
            "--tools",
            "--transcript",
            "history.json",
        ]);
        let Commands::Render(request) = cli.command else {
            panic!("expected render");
        };
        assert_eq!(request.text, "Hi");
        assert_eq!(request.transcript, Some(PathBuf::from("history.json")));

        let options = request.options();
        assert_eq!(options.ttl(), CacheTtl::Long);
        assert!(options.include_tools);
        assert!(!options.include_large_document);
        assert!(!options.reset_conversation);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["promptcache", "check", "--config", "pc.toml", "--json-logs"]);
        assert!(matches!(cli.command, Commands::Check));
        assert_eq!(cli.config, Some(PathBuf::from("pc.toml")));
        assert!(cli.json_logs);
    }

    #[test]
    fn test_text_is_required() {
        assert!(Cli::try_parse_from(["promptcache", "breakpoints"]).is_err());
    }
}
