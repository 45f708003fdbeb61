//! Tests for TOML configuration parsing.

use super::toml::{TomlConfig, default_config_template};

mod parsing {
    use super::*;

    #[test]
    fn parse_client_section() {
        let toml = r#"
            [client]
            api_key = "sk_live_1"
            base_url = "https://eu.sendpigeon.dev"
            timeout = 15
            max_retries = 4
            debug = true
        "#;

        let config = TomlConfig::parse(toml).unwrap();
        let client = &config.client;

        assert_eq!(client.api_key.as_deref(), Some("sk_live_1"));
        assert_eq!(client.base_url.as_deref(), Some("https://eu.sendpigeon.dev"));
        assert_eq!(client.timeout, Some(15));
        assert_eq!(client.max_retries, Some(4));
        assert!(client.debug);
    }

    #[test]
    fn parse_webhook_section() {
        let toml = r#"
            [webhook]
            secret = "whsec_1"
            max_age = 600
        "#;

        let config = TomlConfig::parse(toml).unwrap();

        assert_eq!(config.webhook.secret.as_deref(), Some("whsec_1"));
        assert_eq!(config.webhook.max_age, Some(600));
    }

    #[test]
    fn negative_max_retries_parses() {
        let config = TomlConfig::parse("[client]\nmax_retries = -1").unwrap();

        assert_eq!(config.client.max_retries, Some(-1));
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config = TomlConfig::parse("").unwrap();

        assert!(config.client.api_key.is_none());
        assert!(config.client.timeout.is_none());
        assert!(!config.client.debug);
        assert!(config.webhook.secret.is_none());
    }
}

mod rejection {
    use super::*;

    #[test]
    fn unknown_section_is_rejected() {
        assert!(TomlConfig::parse("[retry]\nmax_attempts = 3").is_err());
    }

    #[test]
    fn unknown_field_is_rejected() {
        assert!(TomlConfig::parse("[client]\napi_token = \"x\"").is_err());
    }

    #[test]
    fn wrong_type_is_rejected() {
        assert!(TomlConfig::parse("[client]\ntimeout = \"30s\"").is_err());
    }

    #[test]
    fn negative_timeout_is_rejected() {
        assert!(TomlConfig::parse("[client]\ntimeout = -5").is_err());
    }
}

mod redaction {
    use super::*;

    #[test]
    fn debug_hides_secrets() {
        let config = TomlConfig::parse(
            r#"
            [client]
            api_key = "sk_live_hidden"

            [webhook]
            secret = "whsec_hidden"
        "#,
        )
        .unwrap();

        let debug = format!("{config:?}");
        assert!(!debug.contains("sk_live_hidden"));
        assert!(!debug.contains("whsec_hidden"));
    }
}

mod template {
    use super::*;

    #[test]
    fn template_parses_as_valid_config() {
        let config = TomlConfig::parse(&default_config_template()).unwrap();

        assert!(config.client.api_key.is_none());
        assert!(config.webhook.max_age.is_none());
    }

    #[test]
    fn template_documents_every_field() {
        let template = default_config_template();

        for key in [
            "[client]",
            "api_key",
            "base_url",
            "timeout",
            "max_retries",
            "debug",
            "[webhook]",
            "secret",
            "max_age",
        ] {
            assert!(template.contains(key), "template is missing {key}");
        }
    }
}
