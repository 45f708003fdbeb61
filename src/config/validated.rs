//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configuration that is used
//! by the application. All validation is performed during construction.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use http::header::{HeaderName, HeaderValue};
use url::Url;

use crate::client::{Client, ClientOptions};
use crate::http::{ApiKey, DEFAULT_BASE_URL, HttpClient, RetryPolicy};
use crate::resources::{ListOptions, SendEmailRequest};

use super::cli::{Cli, Command, SendArgs, SignWebhookArgs, VerifyWebhookArgs};
use super::defaults;
use super::error::{ConfigError, field};
use super::toml::TomlConfig;

/// Fully validated configuration ready for use by the application.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and optional TOML config.
/// The function validates all inputs and returns errors for invalid configurations.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// What to run
    pub action: Action,

    /// Verbose logging enabled
    pub verbose: bool,
}

/// A fully resolved command.
#[derive(Debug)]
pub enum Action {
    /// Write the configuration template.
    Init {
        /// Where to write it
        output: PathBuf,
    },
    /// Call the API.
    Call {
        /// How to reach the API
        client: ClientConfig,
        /// Which operation to perform
        call: ApiCall,
    },
    /// Verify a stored webhook delivery.
    VerifyWebhook(WebhookCheck),
    /// Sign a webhook payload.
    SignWebhook(WebhookSigning),
}

/// Settings for building a [`Client`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API key (redacted in debug output)
    pub api_key: ApiKey,

    /// Endpoint, timeout, retries and diagnostics
    pub options: ClientOptions,
}

impl ClientConfig {
    /// Builds a client over a custom transport.
    #[must_use]
    pub fn build_with<H: HttpClient>(&self, transport: H) -> Client<H> {
        Client::with_transport(transport, self.api_key.clone(), self.options.clone())
    }
}

/// An API operation requested on the command line.
#[derive(Debug)]
pub enum ApiCall {
    /// `POST /v1/emails`
    Send(Box<SendEmailRequest>),
    /// `GET /v1/emails/{id}`
    GetEmail(String),
    /// `GET /v1/domains`
    ListDomains(ListOptions),
}

/// Inputs for checking one webhook delivery.
pub struct WebhookCheck {
    /// File holding the raw body
    pub payload: PathBuf,
    pub signature: String,
    pub timestamp: String,
    pub secret: String,
    /// Maximum timestamp age in seconds
    pub max_age: i64,
}

impl fmt::Debug for WebhookCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebhookCheck")
            .field("payload", &self.payload)
            .field("signature", &self.signature)
            .field("timestamp", &self.timestamp)
            .field("secret", &"***")
            .field("max_age", &self.max_age)
            .finish()
    }
}

/// Inputs for signing one webhook payload.
pub struct WebhookSigning {
    /// File holding the raw body
    pub payload: PathBuf,
    /// Timestamp to sign; the current time when unset
    pub timestamp: Option<String>,
    pub secret: String,
}

impl fmt::Debug for WebhookSigning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebhookSigning")
            .field("payload", &self.payload)
            .field("timestamp", &self.timestamp)
            .field("secret", &"***")
            .finish()
    }
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.action {
            Action::Init { output } => {
                write!(f, "Config {{ command: init, output: {} }}", output.display())
            }
            Action::Call { client, call } => {
                let options = &client.options;
                let base_url = options
                    .base_url
                    .as_ref()
                    .map_or(DEFAULT_BASE_URL, Url::as_str);
                write!(
                    f,
                    "Config {{ command: {}, base_url: {}, timeout: {}s, max_retries: {}, debug: {} }}",
                    call.name(),
                    base_url,
                    options.timeout.unwrap_or_else(defaults::timeout).as_secs(),
                    options.max_retries.map_or(RetryPolicy::DEFAULT_MAX_RETRIES, |n| {
                        RetryPolicy::new().with_max_retries(n).max_retries
                    }),
                    options.debug,
                )
            }
            Action::VerifyWebhook(check) => write!(
                f,
                "Config {{ command: verify-webhook, payload: {}, max_age: {}s }}",
                check.payload.display(),
                check.max_age,
            ),
            Action::SignWebhook(signing) => write!(
                f,
                "Config {{ command: sign-webhook, payload: {} }}",
                signing.payload.display(),
            ),
        }
    }
}

impl ApiCall {
    /// Command name, as typed on the command line.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Send(_) => "send",
            Self::GetEmail(_) => "get-email",
            Self::ListDomains(_) => "list-domains",
        }
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and optional TOML config.
    ///
    /// CLI arguments (including values taken from the environment) take
    /// precedence over TOML config values.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A required value is missing (API key for API calls, webhook secret)
    /// - The base URL is invalid
    /// - The timeout is zero
    /// - A template variable or header is malformed
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let action = match &cli.command {
            Command::Init { output } => Action::Init {
                output: output.clone(),
            },
            Command::Send(args) => Action::Call {
                client: Self::resolve_client(cli, toml)?,
                call: ApiCall::Send(Box::new(build_send_request(args)?)),
            },
            Command::GetEmail { id } => Action::Call {
                client: Self::resolve_client(cli, toml)?,
                call: ApiCall::GetEmail(id.clone()),
            },
            Command::ListDomains { limit, cursor } => Action::Call {
                client: Self::resolve_client(cli, toml)?,
                call: ApiCall::ListDomains(ListOptions {
                    limit: *limit,
                    offset: None,
                    cursor: cursor.clone(),
                }),
            },
            Command::VerifyWebhook(args) => Action::VerifyWebhook(Self::resolve_check(args, toml)?),
            Command::SignWebhook(args) => Action::SignWebhook(Self::resolve_signing(args, toml)?),
        };

        Ok(Self {
            action,
            verbose: cli.verbose,
        })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// The file named by `--config` is required to exist. Without it, the
    /// platform default path is used if present. `init` never reads a file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let path = if cli.is_init() {
            None
        } else if let Some(ref path) = cli.config {
            Some(expand_tilde(path))
        } else {
            defaults::config_path().filter(|p| p.is_file())
        };

        let toml = path.as_deref().map(TomlConfig::load).transpose()?;

        Self::from_raw(cli, toml.as_ref())
    }

    fn resolve_client(cli: &Cli, toml: Option<&TomlConfig>) -> Result<ClientConfig, ConfigError> {
        let section = toml.map(|t| &t.client);

        let api_key = cli
            .api_key
            .as_deref()
            .or_else(|| section.and_then(|c| c.api_key.as_deref()))
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                ConfigError::missing(
                    field::API_KEY,
                    "Use --api-key, set SENDPIGEON_API_KEY, or set client.api_key in config file",
                )
            })?;

        let mut options = ClientOptions::new();

        // Priority: CLI explicit > TOML > default
        if let Some(url_str) = cli
            .base_url
            .as_deref()
            .or_else(|| section.and_then(|c| c.base_url.as_deref()))
        {
            options = options.with_base_url(parse_base_url(url_str)?);
        }

        let timeout_secs = cli
            .timeout
            .or_else(|| section.and_then(|c| c.timeout))
            .unwrap_or(defaults::TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidDuration {
                field: "timeout",
                reason: "must be greater than 0".to_string(),
            });
        }

        let max_retries = cli
            .max_retries
            .or_else(|| section.and_then(|c| c.max_retries))
            .unwrap_or(defaults::MAX_RETRIES);

        options = options
            .with_timeout(Duration::from_secs(timeout_secs))
            .with_max_retries(max_retries)
            .with_debug(section.is_some_and(|c| c.debug));

        Ok(ClientConfig {
            api_key: ApiKey::new(api_key),
            options,
        })
    }

    fn resolve_check(
        args: &VerifyWebhookArgs,
        toml: Option<&TomlConfig>,
    ) -> Result<WebhookCheck, ConfigError> {
        let max_age = args
            .max_age
            .or_else(|| toml.and_then(|t| t.webhook.max_age))
            .unwrap_or(defaults::WEBHOOK_MAX_AGE_SECS);

        Ok(WebhookCheck {
            payload: args.payload.clone(),
            signature: args.signature.clone(),
            timestamp: args.timestamp.clone(),
            secret: resolve_secret(args.secret.as_deref(), toml)?,
            max_age,
        })
    }

    fn resolve_signing(
        args: &SignWebhookArgs,
        toml: Option<&TomlConfig>,
    ) -> Result<WebhookSigning, ConfigError> {
        Ok(WebhookSigning {
            payload: args.payload.clone(),
            timestamp: args.timestamp.clone(),
            secret: resolve_secret(args.secret.as_deref(), toml)?,
        })
    }
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

// Helper functions

fn resolve_secret(cli: Option<&str>, toml: Option<&TomlConfig>) -> Result<String, ConfigError> {
    cli.or_else(|| toml.and_then(|t| t.webhook.secret.as_deref()))
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            ConfigError::missing(
                field::WEBHOOK_SECRET,
                "Use --secret, set SENDPIGEON_WEBHOOK_SECRET, or set webhook.secret in config file",
            )
        })
}

fn parse_base_url(s: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(s).map_err(|e| ConfigError::InvalidUrl {
        url: s.to_string(),
        reason: e.to_string(),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidUrl {
            url: s.to_string(),
            reason: "scheme must be http or https".to_string(),
        });
    }

    Ok(url)
}

fn build_send_request(args: &SendArgs) -> Result<SendEmailRequest, ConfigError> {
    let mut variables = BTreeMap::new();
    for var in &args.variables {
        let (name, value) = var
            .split_once('=')
            .ok_or_else(|| ConfigError::InvalidVariable { value: var.clone() })?;
        variables.insert(name.trim().to_string(), value.trim().to_string());
    }

    let mut headers = BTreeMap::new();
    for header_str in &args.headers {
        let (name, value) = parse_header_string(header_str)?;
        parse_header_name(&name)?;
        parse_header_value(&name, &value)?;
        headers.insert(name, value);
    }

    Ok(SendEmailRequest {
        to: args.to.clone(),
        from: args.from.clone(),
        subject: args.subject.clone(),
        html: args.html.clone(),
        text: args.text.clone(),
        template_id: args.template_id.clone(),
        variables,
        headers,
        tags: args.tags.clone(),
        scheduled_at: args.scheduled_at.clone(),
        idempotency_key: args.idempotency_key.clone(),
        ..SendEmailRequest::default()
    })
}

/// Expands a leading `~/` to the home directory.
fn expand_tilde(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

fn parse_header_string(s: &str) -> Result<(String, String), ConfigError> {
    // Try "Key=Value" format first
    if let Some((name, value)) = s.split_once('=') {
        return Ok((name.trim().to_string(), value.trim().to_string()));
    }

    // Try "Key: Value" format
    if let Some((name, value)) = s.split_once(':') {
        return Ok((name.trim().to_string(), value.trim().to_string()));
    }

    Err(ConfigError::InvalidHeader {
        value: s.to_string(),
    })
}

fn parse_header_name(name: &str) -> Result<HeaderName, ConfigError> {
    name.parse::<HeaderName>()
        .map_err(|e| ConfigError::InvalidHeaderName {
            name: name.to_string(),
            reason: e.to_string(),
        })
}

fn parse_header_value(name: &str, value: &str) -> Result<HeaderValue, ConfigError> {
    HeaderValue::from_str(value).map_err(|e| ConfigError::InvalidHeaderValue {
        name: name.to_string(),
        reason: e.to_string(),
    })
}
