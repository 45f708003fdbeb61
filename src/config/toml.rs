//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::path::Path;

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional to allow partial configuration
/// that can be merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// API client section
    #[serde(default)]
    pub client: ClientSection,

    /// Webhook verification section
    #[serde(default)]
    pub webhook: WebhookSection,
}

/// API client configuration section.
#[derive(Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientSection {
    /// API key
    pub api_key: Option<String>,

    /// API base URL
    pub base_url: Option<String>,

    /// Per-attempt timeout in seconds
    pub timeout: Option<u64>,

    /// Retries after the first attempt
    pub max_retries: Option<i64>,

    /// Log request diagnostics
    #[serde(default)]
    pub debug: bool,
}

impl std::fmt::Debug for ClientSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientSection")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .field("debug", &self.debug)
            .finish()
    }
}

/// Webhook verification section.
#[derive(Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WebhookSection {
    /// Signing secret
    pub secret: Option<String>,

    /// Maximum accepted timestamp age in seconds
    pub max_age: Option<i64>,
}

impl std::fmt::Debug for WebhookSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookSection")
            .field("secret", &self.secret.as_ref().map(|_| "***"))
            .field("max_age", &self.max_age)
            .finish()
    }
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# SendPigeon Configuration File
# Values given on the command line take precedence over this file.

[client]
# API key (required for send, get-email and list-domains)
# Can also be set with --api-key or the SENDPIGEON_API_KEY variable.
# api_key = "sk_live_..."

# API base URL (default: https://api.sendpigeon.dev)
# base_url = "https://api.sendpigeon.dev"

# Per-attempt timeout in seconds (default: 30)
# timeout = 30

# Retries after the first attempt for rate-limited and server errors
# (default: 2, at most 5, negative means default)
# max_retries = 2

# Log request and response diagnostics with --verbose
# debug = false

[webhook]
# Signing secret for verify-webhook and sign-webhook
# Can also be set with --secret or the SENDPIGEON_WEBHOOK_SECRET variable.
# secret = "whsec_..."

# Maximum accepted timestamp age in seconds (default: 300)
# max_age = 300
"#
    .to_string()
}
