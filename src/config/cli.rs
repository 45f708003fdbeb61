//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with global client options and one
//! subcommand per action.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// SendPigeon: send email and verify webhooks from the command line.
///
/// Every command prints its result as JSON on stdout.
#[derive(Debug, Parser)]
#[command(name = "sendpigeon")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Command to run
    #[command(subcommand)]
    pub command: Command,

    /// API key (falls back to the config file)
    #[arg(long, global = true, env = "SENDPIGEON_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// API base URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Per-attempt timeout in seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Retries after the first attempt (0 to 5, negative means default)
    #[arg(long, global = true, allow_negative_numbers = true)]
    pub max_retries: Option<i64>,

    /// Path to configuration file
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// Subcommands for sendpigeon
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = super::defaults::INIT_OUTPUT)]
        output: PathBuf,
    },

    /// Send one email
    Send(SendArgs),

    /// Show one sent email
    GetEmail {
        /// Email ID
        id: String,
    },

    /// List sending domains
    ListDomains {
        /// Page size
        #[arg(long)]
        limit: Option<u32>,

        /// Cursor from a previous page
        #[arg(long)]
        cursor: Option<String>,
    },

    /// Check a received webhook's signature and print its payload
    VerifyWebhook(VerifyWebhookArgs),

    /// Compute the signature header for a webhook payload
    SignWebhook(SignWebhookArgs),
}

/// Arguments of `sendpigeon send`.
#[derive(Debug, Args)]
pub struct SendArgs {
    /// Recipient address (can be specified multiple times)
    #[arg(long, required = true)]
    pub to: Vec<String>,

    /// Sender address
    #[arg(long)]
    pub from: Option<String>,

    #[arg(long)]
    pub subject: Option<String>,

    /// HTML body
    #[arg(long)]
    pub html: Option<String>,

    /// Plain-text body
    #[arg(long)]
    pub text: Option<String>,

    /// Template to render instead of an inline body
    #[arg(long = "template-id")]
    pub template_id: Option<String>,

    /// Template variable in 'Key=Value' format (can be specified multiple times)
    #[arg(long = "var", value_name = "K=V")]
    pub variables: Vec<String>,

    /// Email header in 'Key=Value' or 'Key: Value' format (can be specified multiple times)
    #[arg(long = "header", value_name = "K=V")]
    pub headers: Vec<String>,

    /// Tag (can be specified multiple times)
    #[arg(long = "tag")]
    pub tags: Vec<String>,

    /// RFC 3339 time to send at
    #[arg(long = "scheduled-at")]
    pub scheduled_at: Option<String>,

    /// Key that makes retried sends deliver only once
    #[arg(long = "idempotency-key")]
    pub idempotency_key: Option<String>,
}

/// Arguments of `sendpigeon verify-webhook`.
#[derive(Debug, Args)]
pub struct VerifyWebhookArgs {
    /// File holding the raw request body
    #[arg(long)]
    pub payload: PathBuf,

    /// Value of the X-Webhook-Signature header
    #[arg(long)]
    pub signature: String,

    /// Value of the X-Webhook-Timestamp header
    #[arg(long)]
    pub timestamp: String,

    /// Webhook signing secret (falls back to the config file)
    #[arg(long, env = "SENDPIGEON_WEBHOOK_SECRET", hide_env_values = true)]
    pub secret: Option<String>,

    /// Maximum accepted timestamp age in seconds
    #[arg(long = "max-age", allow_negative_numbers = true)]
    pub max_age: Option<i64>,
}

/// Arguments of `sendpigeon sign-webhook`.
#[derive(Debug, Args)]
pub struct SignWebhookArgs {
    /// File holding the raw request body
    #[arg(long)]
    pub payload: PathBuf,

    /// Unix timestamp to sign (default: now)
    #[arg(long)]
    pub timestamp: Option<String>,

    /// Webhook signing secret (falls back to the config file)
    #[arg(long, env = "SENDPIGEON_WEBHOOK_SECRET", hide_env_values = true)]
    pub secret: Option<String>,
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Returns true if this is the init command.
    #[must_use]
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Command::Init { .. })
    }
}
