//! Configuration layer for the `sendpigeon` command-line tool.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`])
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Validated configuration ([`ValidatedConfig`], [`Action`])
//! - Configuration file generation ([`write_default_config`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! Configuration values are resolved with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments** - including `SENDPIGEON_API_KEY` and
//!    `SENDPIGEON_WEBHOOK_SECRET`, which clap reads as the flag's value
//! 2. **TOML config file** - `--config <path>`, else
//!    `<config dir>/sendpigeon/config.toml` if it exists
//! 3. **Built-in defaults** - Hardcoded default values
//!
//! The API key is only required by commands that call the API, and the
//! webhook secret only by `verify-webhook` and `sign-webhook`.
//!
//! # CLI-Only vs TOML-Only Options
//!
//! `client.debug` is TOML-only; it makes `--verbose` runs include request
//! and response sizes.

mod cli;
pub mod defaults;
mod error;
mod toml;
mod validated;

#[cfg(test)]
mod toml_tests;
#[cfg(test)]
mod validated_tests;

pub use cli::{Cli, Command, SendArgs, SignWebhookArgs, VerifyWebhookArgs};
pub use error::{ConfigError, field};
pub use toml::{ClientSection, TomlConfig, WebhookSection, default_config_template};
pub use validated::{
    Action, ApiCall, ClientConfig, ValidatedConfig, WebhookCheck, WebhookSigning,
    write_default_config,
};
