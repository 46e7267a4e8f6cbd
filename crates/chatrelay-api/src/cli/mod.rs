//! CLI command definitions for the `chatrelay` binary.
//!
//! Uses clap derive macros for argument parsing. `serve` runs the HTTP relay;
//! `send` and `history` drive the same services directly against the
//! configured store and hub.

pub mod history;
pub mod send;
pub mod token;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

/// Durable chat relay: persist chat messages and fan them out to a live hub.
#[derive(Parser)]
#[command(name = "chatrelay", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all log output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log line format.
    #[arg(long, value_enum, default_value_t = LogFormatArg::Text, global = true)]
    pub log_format: LogFormatArg,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    /// Path to the TOML config file (default: ./chatrelay.toml if present).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the message store URL.
    #[arg(long, global = true)]
    pub database_url: Option<String>,

    /// Override the hub publish URL.
    #[arg(long, global = true)]
    pub hub_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP relay server.
    Serve {
        /// Port to listen on (default from config, 8080).
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (default from config, 0.0.0.0).
        #[arg(long)]
        host: Option<String>,
    },

    /// Submit one message through the relay (persist, then publish).
    Send {
        /// Channel to post to.
        channel: String,

        /// Sender ID.
        user_id: String,

        /// Message text.
        message: String,

        /// Mark the message as already read.
        #[arg(long)]
        read: bool,
    },

    /// Show one page of a channel's history, newest first.
    History {
        /// Channel to read.
        channel: String,

        /// Only show messages older than this message id.
        #[arg(long)]
        before: Option<i64>,
    },

    /// Mint a publisher JWT for the hub.
    Token {
        /// Topic the token may publish to (repeatable; default: all topics).
        #[arg(long = "topic", env = "MERCURE_TOPIC")]
        topics: Vec<String>,

        /// Hub publisher secret.
        #[arg(long, env = "MERCURE_JWT_PUBLISHER", hide_env_values = true)]
        secret: String,

        /// Token lifetime in seconds (default: never expires).
        #[arg(long)]
        ttl_secs: Option<u64>,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
