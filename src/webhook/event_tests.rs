//! Tests for typed webhook events.

use super::{WebhookEventKind, parse_webhook_payload};

mod event_kind {
    use super::*;

    #[test]
    fn known_names_map_to_variants() {
        let cases = [
            ("email.delivered", WebhookEventKind::Delivered),
            ("email.bounced", WebhookEventKind::Bounced),
            ("email.complained", WebhookEventKind::Complained),
            ("email.opened", WebhookEventKind::Opened),
            ("email.clicked", WebhookEventKind::Clicked),
            ("webhook.test", WebhookEventKind::Test),
        ];

        for (name, kind) in cases {
            assert_eq!(WebhookEventKind::from(name.to_string()), kind);
            assert_eq!(kind.as_str(), name);
        }
    }

    #[test]
    fn unknown_name_is_preserved() {
        let kind = WebhookEventKind::from("contact.created".to_string());

        assert_eq!(kind, WebhookEventKind::Unknown("contact.created".to_string()));
        assert_eq!(kind.to_string(), "contact.created");
        assert_eq!(String::from(kind), "contact.created");
    }
}

mod parse {
    use super::*;

    #[test]
    fn bounced_event_has_bounce_fields() {
        let payload = br#"{
            "event": "email.bounced",
            "timestamp": "2024-01-15T10:30:00Z",
            "data": {
                "emailId": "em_123",
                "toAddress": "user@example.com",
                "fromAddress": "hello@acme.dev",
                "subject": "Welcome",
                "bounceType": "permanent"
            }
        }"#;

        let event = parse_webhook_payload(payload).unwrap();

        assert_eq!(event.event, WebhookEventKind::Bounced);
        assert_eq!(event.timestamp, "2024-01-15T10:30:00Z");
        assert_eq!(event.data.email_id.as_deref(), Some("em_123"));
        assert_eq!(event.data.bounce_type.as_deref(), Some("permanent"));
        assert!(event.data.link_url.is_none());
    }

    #[test]
    fn clicked_event_has_link_fields() {
        let payload = br#"{"event":"email.clicked","timestamp":"t","data":{
            "clickedAt":"2024-01-15T10:31:00Z","linkUrl":"https://acme.dev","linkIndex":0}}"#;

        let event = parse_webhook_payload(payload).unwrap();

        assert_eq!(event.event, WebhookEventKind::Clicked);
        assert_eq!(event.data.link_url.as_deref(), Some("https://acme.dev"));
        assert_eq!(event.data.link_index, Some(0));
    }

    #[test]
    fn missing_data_defaults_to_empty() {
        let event = parse_webhook_payload(br#"{"event":"webhook.test"}"#).unwrap();

        assert_eq!(event.event, WebhookEventKind::Test);
        assert!(event.timestamp.is_empty());
        assert_eq!(event.data, super::super::WebhookEventData::default());
    }

    #[test]
    fn serialization_omits_absent_fields() {
        let event = parse_webhook_payload(
            br#"{"event":"email.opened","timestamp":"t","data":{"openedAt":"now"}}"#,
        )
        .unwrap();

        let value = serde_json::to_value(&event).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "event": "email.opened",
                "timestamp": "t",
                "data": { "openedAt": "now" }
            })
        );
    }

    #[test]
    fn payload_without_event_is_rejected() {
        assert!(parse_webhook_payload(br#"{"data":{}}"#).is_err());
        assert!(parse_webhook_payload(b"not json").is_err());
    }
}
