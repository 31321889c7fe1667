//! CLI argument definitions using clap derive macros.

use clap::{Parser, Subcommand};

/// Negotiate download tickets and look up file metadata on the openload API.
///
/// Results go to stdout; logs go to stderr.
#[derive(Parser, Debug)]
#[command(name = "openload")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// API base URL (overrides config file)
    #[arg(long, value_name = "URL", global = true)]
    pub base_url: Option<String>,

    /// Per-request timeout in seconds (1-3600)
    #[arg(long, value_name = "SECS", global = true, value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub timeout: Option<u64>,

    /// API login (requires --key)
    #[arg(long, global = true, requires = "key")]
    pub login: Option<String>,

    /// API key (requires --login)
    #[arg(long, global = true, requires = "login")]
    pub key: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Request a download ticket for a file
    Ticket {
        /// File id
        file_id: String,
    },

    /// Redeem a ticket for a direct download URL
    Download {
        /// File id
        file_id: String,
        /// Ticket token from `openload ticket`
        #[arg(long)]
        ticket: String,
        /// Captcha answer, when the ticket carried a challenge
        #[arg(long)]
        captcha: Option<String>,
    },

    /// Request a ticket, wait as instructed, and redeem it
    Link {
        /// File id
        file_id: String,
        /// Redeem immediately instead of honoring the ticket wait time
        #[arg(long)]
        no_wait: bool,
    },

    /// Look up metadata for one or more files
    Info {
        /// File ids
        #[arg(required = true, num_args = 1..)]
        file_ids: Vec<String>,
    },
}
