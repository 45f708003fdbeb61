//! Tests for the run module.

use std::time::{Duration, SystemTime};

use httpmock::prelude::*;
use serde_json::json;
use url::Url;

use sendpigeon::ClientOptions;
use sendpigeon::config::ClientConfig;
use sendpigeon::http::ApiKey;
use sendpigeon::resources::{ListOptions, SendEmailRequest};

use super::*;

#[derive(Debug, Clone, Copy)]
struct FixedClock(u64);

impl Clock for FixedClock {
    fn now(&self) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(self.0)
    }
}

const NOW: u64 = 1_700_000_000;

fn client_for(server: &MockServer) -> ClientConfig {
    ClientConfig {
        api_key: ApiKey::new("sk_test"),
        options: ClientOptions::new()
            .with_base_url(Url::parse(&server.base_url()).unwrap())
            .with_max_retries(0),
    }
}

async fn run(action: Action) -> Result<Output, RunError> {
    perform(action, ReqwestClient::new(), FixedClock(NOW)).await
}

mod run_error {
    use super::*;

    #[test]
    fn api_error_includes_code_and_message() {
        let error = RunError::from(sendpigeon::Error::api(
            http::StatusCode::BAD_REQUEST,
            Some("validation_error".to_string()),
            "Invalid sender",
        ));

        assert_eq!(
            error.to_string(),
            "API request failed: [validation_error] Invalid sender"
        );
    }

    #[test]
    fn webhook_error_uses_stable_reason() {
        let error = RunError::from(VerifyError::InvalidSignature);

        assert_eq!(error.to_string(), "Webhook rejected: Invalid signature");
    }

    #[test]
    fn payload_read_names_the_file() {
        let error = RunError::PayloadRead {
            path: PathBuf::from("missing.json"),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };

        assert!(error.to_string().contains("missing.json"));
    }

    #[test]
    fn config_error_is_transparent() {
        let config_error = ConfigError::InvalidVariable {
            value: "novalue".to_string(),
        };
        let expected = config_error.to_string();

        assert_eq!(RunError::from(config_error).to_string(), expected);
    }
}

mod output {
    use super::*;

    #[test]
    fn json_is_pretty_printed_with_trailing_newline() {
        let mut buffer = Vec::new();

        write_output(&mut buffer, &Output::Json(json!({"id": "em_1"}))).unwrap();

        assert_eq!(String::from_utf8(buffer).unwrap(), "{\n  \"id\": \"em_1\"\n}\n");
    }

    #[test]
    fn message_is_one_line() {
        let mut buffer = Vec::new();

        write_output(&mut buffer, &Output::Message("done".to_string())).unwrap();

        assert_eq!(buffer, b"done\n");
    }
}

mod init {
    use super::*;

    #[tokio::test]
    async fn writes_template() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sendpigeon.toml");

        let output = run(Action::Init {
            output: path.clone(),
        })
        .await
        .unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("[client]"));
        assert!(matches!(output, Output::Message(ref m) if m.contains("sendpigeon.toml")));
    }

    #[tokio::test]
    async fn unwritable_path_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("sendpigeon.toml");

        let result = run(Action::Init { output: path }).await;

        assert!(matches!(
            result,
            Err(RunError::Config(ConfigError::FileWrite { .. }))
        ));
    }
}

mod call {
    use super::*;

    #[tokio::test]
    async fn send_prints_response() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1/emails")
                    .header("authorization", "Bearer sk_test")
                    .json_body(json!({"to": ["user@example.com"], "subject": "Hi"}));
                then.status(200)
                    .json_body(json!({"id": "em_1", "status": "scheduled"}));
            })
            .await;

        let request = SendEmailRequest {
            to: vec!["user@example.com".to_string()],
            subject: Some("Hi".to_string()),
            ..Default::default()
        };
        let output = run(Action::Call {
            client: client_for(&server),
            call: ApiCall::Send(Box::new(request)),
        })
        .await
        .unwrap();

        mock.assert_async().await;
        assert_eq!(output, Output::Json(json!({"id": "em_1", "status": "scheduled"})));
    }

    #[tokio::test]
    async fn list_domains_passes_paging() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/v1/domains")
                    .query_param("limit", "5");
                then.status(200).json_body(json!({
                    "data": [{"id": "dom_1", "name": "acme.dev", "status": "verified"}],
                    "cursor": {"next": "c_2"}
                }));
            })
            .await;

        let output = run(Action::Call {
            client: client_for(&server),
            call: ApiCall::ListDomains(ListOptions::new().with_limit(5)),
        })
        .await
        .unwrap();

        let Output::Json(value) = output else {
            panic!("expected JSON output");
        };
        assert_eq!(value["items"][0]["id"], "dom_1");
        assert_eq!(value["items"][0]["status"], "verified");
        assert_eq!(value["next_cursor"], "c_2");
    }

    #[tokio::test]
    async fn api_failure_is_api_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v1/emails/em_missing");
                then.status(404)
                    .json_body(json!({"error": {"code": "not_found", "message": "Email not found"}}));
            })
            .await;

        let result = run(Action::Call {
            client: client_for(&server),
            call: ApiCall::GetEmail("em_missing".to_string()),
        })
        .await;

        let Err(RunError::Api(error)) = result else {
            panic!("expected API error, got {result:?}");
        };
        assert_eq!(error.status(), Some(http::StatusCode::NOT_FOUND));
    }
}

mod webhook {
    use super::*;

    const PAYLOAD: &[u8] = br#"{"event":"email.delivered","data":{"emailId":"em_1"}}"#;
    const SECRET: &str = "whsec_test";

    fn payload_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(PAYLOAD).unwrap();
        file
    }

    fn check(file: &tempfile::NamedTempFile, signature: String, timestamp: &str) -> WebhookCheck {
        WebhookCheck {
            payload: file.path().to_path_buf(),
            signature,
            timestamp: timestamp.to_string(),
            secret: SECRET.to_string(),
            max_age: 300,
        }
    }

    #[tokio::test]
    async fn verify_prints_document() {
        let file = payload_file();
        let timestamp = NOW.to_string();
        let signature = sign_webhook(PAYLOAD, &timestamp, SECRET);

        let output = run(Action::VerifyWebhook(check(&file, signature, &timestamp)))
            .await
            .unwrap();

        let Output::Json(value) = output else {
            panic!("expected JSON output");
        };
        assert_eq!(value["event"], "email.delivered");
        assert_eq!(value["data"]["emailId"], "em_1");
    }

    #[tokio::test]
    async fn verify_rejects_stale_delivery() {
        let file = payload_file();
        let timestamp = (NOW - 301).to_string();
        let signature = sign_webhook(PAYLOAD, &timestamp, SECRET);

        let result = run(Action::VerifyWebhook(check(&file, signature, &timestamp))).await;

        assert!(matches!(
            result,
            Err(RunError::Webhook(VerifyError::TimestampTooOld))
        ));
    }

    #[tokio::test]
    async fn verify_rejects_wrong_signature() {
        let file = payload_file();
        let timestamp = NOW.to_string();
        let signature = sign_webhook(PAYLOAD, &timestamp, "whsec_other");

        let result = run(Action::VerifyWebhook(check(&file, signature, &timestamp))).await;

        assert!(matches!(
            result,
            Err(RunError::Webhook(VerifyError::InvalidSignature))
        ));
    }

    #[tokio::test]
    async fn verify_missing_payload_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = run(Action::VerifyWebhook(WebhookCheck {
            payload: dir.path().join("absent.json"),
            signature: "00".to_string(),
            timestamp: NOW.to_string(),
            secret: SECRET.to_string(),
            max_age: 300,
        }))
        .await;

        assert!(matches!(result, Err(RunError::PayloadRead { .. })));
    }

    #[tokio::test]
    async fn sign_uses_clock_when_timestamp_unset() {
        let file = payload_file();

        let output = run(Action::SignWebhook(WebhookSigning {
            payload: file.path().to_path_buf(),
            timestamp: None,
            secret: SECRET.to_string(),
        }))
        .await
        .unwrap();

        let expected = sign_webhook(PAYLOAD, "1700000000", SECRET);
        assert_eq!(
            output,
            Output::Json(json!({
                "X-Webhook-Signature": expected,
                "X-Webhook-Timestamp": "1700000000",
            }))
        );
    }

    #[tokio::test]
    async fn signed_output_verifies() {
        let file = payload_file();

        let Output::Json(headers) = run(Action::SignWebhook(WebhookSigning {
            payload: file.path().to_path_buf(),
            timestamp: Some("1699999990".to_string()),
            secret: SECRET.to_string(),
        }))
        .await
        .unwrap() else {
            panic!("expected JSON output");
        };

        let signature = headers[SIGNATURE_HEADER].as_str().unwrap().to_string();
        let timestamp = headers[TIMESTAMP_HEADER].as_str().unwrap().to_string();
        let result = run(Action::VerifyWebhook(check(&file, signature, &timestamp))).await;

        assert!(result.is_ok());
    }
}
