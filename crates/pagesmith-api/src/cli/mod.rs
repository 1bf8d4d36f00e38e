//! CLI command definitions using clap derive.
//!
//! Commands:
//! - `pagesmith run`    : long-poll the Bot API
//! - `pagesmith serve`  : receive updates through a webhook
//! - `pagesmith doctor` : check the environment without starting the bot

pub mod doctor;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Pagesmith: build and publish landing pages from a Telegram chat.
#[derive(Parser)]
#[command(name = "pagesmith", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Pipeline tunables (model, git identity, timeouts)
    #[arg(long, global = true, env = "PAGESMITH_CONFIG", default_value = "pagesmith.toml")]
    pub config: PathBuf,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Also export spans through OpenTelemetry (stdout exporter)
    #[arg(long, global = true)]
    pub otel: bool,

    /// Suppress everything below errors
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Verbose output (-v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the bot with getUpdates long polling.
    Run,

    /// Run the bot behind a webhook.
    Serve {
        /// Address to bind
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Port to listen on
        #[arg(long, short, env = "PORT", default_value = "8080")]
        port: u16,

        /// Public base URL to register with Telegram (https://...)
        #[arg(long, env = "PAGESMITH_PUBLIC_URL")]
        public_url: Option<String>,
    },

    /// Check credentials, git and the config file.
    Doctor {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_serve_flags() {
        let cli = Cli::try_parse_from(["pagesmith", "-vv", "serve", "--port", "9000"]).unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Serve { host, port, .. } => {
                assert_eq!(host, "0.0.0.0");
                assert_eq!(port, 9000);
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["pagesmith", "run", "--quiet", "--config", "other.toml"]).unwrap();
        assert!(cli.quiet);
        assert_eq!(cli.config, PathBuf::from("other.toml"));
        assert!(matches!(cli.command, Commands::Run));
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["pagesmith"]).is_err());
    }
}
