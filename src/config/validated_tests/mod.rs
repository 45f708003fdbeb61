//! Tests for validated configuration.

use super::ConfigError;
use super::cli::Cli;
use super::toml::TomlConfig;
use super::validated::{Action, ApiCall, ClientConfig, ValidatedConfig};

/// Helper to create CLI args from a slice
fn cli(args: &[&str]) -> Cli {
    let mut full_args = vec!["sendpigeon"];
    full_args.extend(args);
    Cli::parse_from_iter(full_args)
}

/// Helper to parse TOML config
fn toml(content: &str) -> TomlConfig {
    TomlConfig::parse(content).unwrap()
}

/// Resolves an API command, panicking on any other action.
fn api_call(config: ValidatedConfig) -> (ClientConfig, ApiCall) {
    match config.action {
        Action::Call { client, call } => (client, call),
        other => panic!("expected an API call, got {other:?}"),
    }
}

mod webhook_tests;
