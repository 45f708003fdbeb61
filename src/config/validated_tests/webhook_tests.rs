//! Tests for webhook commands: secret, max age and signing inputs.

use std::path::PathBuf;

use super::*;

fn verify_cli(extra: &[&str]) -> Cli {
    let mut args = vec![
        "verify-webhook",
        "--payload",
        "body.json",
        "--signature",
        "deadbeef",
        "--timestamp",
        "1700000000",
    ];
    args.extend_from_slice(extra);
    cli(&args)
}

mod verify {
    use super::*;

    #[test]
    fn resolves_inputs() {
        let cli = verify_cli(&["--secret", "whsec_1", "--max-age", "60"]);
        let config = ValidatedConfig::from_raw(&cli, None).unwrap();

        let Action::VerifyWebhook(check) = config.action else {
            panic!("expected verify-webhook");
        };
        assert_eq!(check.payload, PathBuf::from("body.json"));
        assert_eq!(check.signature, "deadbeef");
        assert_eq!(check.timestamp, "1700000000");
        assert_eq!(check.secret, "whsec_1");
        assert_eq!(check.max_age, 60);
    }

    #[test]
    fn max_age_defaults_to_five_minutes() {
        let cli = verify_cli(&["--secret", "whsec_1"]);
        let config = ValidatedConfig::from_raw(&cli, None).unwrap();

        let Action::VerifyWebhook(check) = config.action else {
            panic!("expected verify-webhook");
        };
        assert_eq!(check.max_age, 300);
    }

    #[test]
    fn secret_from_toml() {
        let cli = verify_cli(&[]);
        let toml = toml("[webhook]\nsecret = \"whsec_toml\"");

        let config = ValidatedConfig::from_raw(&cli, Some(&toml)).unwrap();

        let Action::VerifyWebhook(check) = config.action else {
            panic!("expected verify-webhook");
        };
        assert_eq!(check.secret, "whsec_toml");
    }

    #[test]
    fn missing_secret_returns_error() {
        let cli = verify_cli(&[]);
        let result = ValidatedConfig::from_raw(&cli, None);

        assert!(matches!(
            result,
            Err(ConfigError::MissingRequired {
                field: "webhook.secret",
                ..
            })
        ));
    }

    #[test]
    fn api_key_not_required() {
        let cli = verify_cli(&["--secret", "whsec_1"]);

        assert!(ValidatedConfig::from_raw(&cli, None).is_ok());
    }

    #[test]
    fn debug_and_display_hide_secret() {
        let cli = verify_cli(&["--secret", "whsec_hidden"]);
        let config = ValidatedConfig::from_raw(&cli, None).unwrap();

        assert!(!format!("{config:?}").contains("whsec_hidden"));
        assert!(!config.to_string().contains("whsec_hidden"));
        assert!(config.to_string().contains("verify-webhook"));
    }
}

mod sign {
    use super::*;

    #[test]
    fn timestamp_is_optional() {
        let cli = cli(&["sign-webhook", "--payload", "body.json", "--secret", "whsec_1"]);
        let config = ValidatedConfig::from_raw(&cli, None).unwrap();

        let Action::SignWebhook(signing) = config.action else {
            panic!("expected sign-webhook");
        };
        assert_eq!(signing.payload, PathBuf::from("body.json"));
        assert!(signing.timestamp.is_none());
        assert_eq!(signing.secret, "whsec_1");
    }

    #[test]
    fn missing_secret_returns_error() {
        let cli = cli(&["sign-webhook", "--payload", "body.json"]);
        let result = ValidatedConfig::from_raw(&cli, None);

        assert!(matches!(result, Err(ConfigError::MissingRequired { .. })));
    }
}
