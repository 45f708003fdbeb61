//! Command execution.
//!
//! Turns a resolved [`Action`] into output on stdout. API results and
//! webhook documents are printed as pretty JSON; logs stay on stderr.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use sendpigeon::Client;
use sendpigeon::config::{
    Action, ApiCall, ConfigError, ValidatedConfig, WebhookCheck, WebhookSigning,
    write_default_config,
};
use sendpigeon::http::{HttpClient, ReqwestClient};
use sendpigeon::time::{Clock, SystemClock};
use sendpigeon::webhook::{
    SIGNATURE_HEADER, TIMESTAMP_HEADER, VerifyError, WebhookVerifier, sign_webhook,
};

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for command failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// Writing the configuration template failed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The API call failed.
    #[error("API request failed: {0}")]
    Api(#[from] sendpigeon::Error),

    /// The webhook payload file could not be read.
    #[error("Failed to read payload '{}': {source}", path.display())]
    PayloadRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The webhook delivery was rejected.
    #[error("Webhook rejected: {0}")]
    Webhook(#[from] VerifyError),

    /// The result could not be encoded as JSON.
    #[error("Failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),

    /// Writing to stdout failed.
    #[error("Failed to write output: {0}")]
    Output(#[source] io::Error),
}

/// What a command produced.
#[derive(Debug, PartialEq)]
pub enum Output {
    /// Printed as pretty JSON.
    Json(Value),
    /// Printed as a single line.
    Message(String),
}

/// Executes the resolved command and prints its result to stdout.
///
/// # Errors
///
/// Returns the first [`RunError`] encountered.
pub async fn execute(config: ValidatedConfig) -> Result<(), RunError> {
    let output = perform(config.action, ReqwestClient::new(), SystemClock).await?;
    write_output(&mut io::stdout().lock(), &output)
}

/// Runs one action over the given transport and clock.
///
/// The clock supplies the current time for webhook freshness checks and
/// for signing without an explicit timestamp.
pub(crate) async fn perform<H: HttpClient, C: Clock>(
    action: Action,
    transport: H,
    clock: C,
) -> Result<Output, RunError> {
    match action {
        Action::Init { output } => {
            write_default_config(&output)?;
            Ok(Output::Message(format!(
                "Configuration template written to: {}",
                output.display()
            )))
        }
        Action::Call { client, call } => {
            let client = client.build_with(transport);
            call_api(&client, call).await.map(Output::Json)
        }
        Action::VerifyWebhook(check) => verify(&check, clock).map(Output::Json),
        Action::SignWebhook(signing) => sign(&signing, &clock).map(Output::Json),
    }
}

async fn call_api<H: HttpClient>(client: &Client<H>, call: ApiCall) -> Result<Value, RunError> {
    tracing::debug!(command = call.name(), "Calling API");
    match call {
        ApiCall::Send(request) => {
            let sent = client.send(&request).await?;
            tracing::info!(id = %sent.id, "Email accepted");
            to_json(&sent)
        }
        ApiCall::GetEmail(id) => to_json(&client.emails().get(&id).await?),
        ApiCall::ListDomains(options) => to_json(&client.domains().list(&options).await?),
    }
}

fn verify<C: Clock>(check: &WebhookCheck, clock: C) -> Result<Value, RunError> {
    let payload = read_payload(&check.payload)?;
    let document = WebhookVerifier::new(check.secret.as_str())
        .with_max_age(check.max_age)
        .with_clock(clock)
        .verify(&payload, &check.signature, &check.timestamp)?;

    tracing::info!("Webhook signature valid");
    Ok(Value::Object(document))
}

fn sign<C: Clock>(signing: &WebhookSigning, clock: &C) -> Result<Value, RunError> {
    let payload = read_payload(&signing.payload)?;
    let timestamp = signing
        .timestamp
        .clone()
        .unwrap_or_else(|| clock.unix_seconds().to_string());
    let signature = sign_webhook(&payload, &timestamp, &signing.secret);

    let mut headers = Map::new();
    headers.insert(SIGNATURE_HEADER.to_string(), Value::String(signature));
    headers.insert(TIMESTAMP_HEADER.to_string(), Value::String(timestamp));
    Ok(Value::Object(headers))
}

fn read_payload(path: &Path) -> Result<Vec<u8>, RunError> {
    std::fs::read(path).map_err(|source| RunError::PayloadRead {
        path: path.to_path_buf(),
        source,
    })
}

fn to_json<T: Serialize>(value: &T) -> Result<Value, RunError> {
    Ok(serde_json::to_value(value)?)
}

fn write_output<W: Write>(out: &mut W, output: &Output) -> Result<(), RunError> {
    match output {
        Output::Json(value) => {
            serde_json::to_writer_pretty(&mut *out, value)?;
            writeln!(out).map_err(RunError::Output)
        }
        Output::Message(message) => writeln!(out, "{message}").map_err(RunError::Output),
    }
}
