//! Templates, domains, API keys, suppressions and tracking.

use super::{
    ApiKeyMode, ApiKeyPermission, CreateApiKeyRequest, CreateTemplateRequest, DomainStatus,
    ListOptions, TestTemplateRequest, UpdateTemplateRequest, UpdateTrackingDefaultsRequest,
};
use crate::test_fixtures::{reply, scripted_client};
use http::Method;
use serde_json::json;

mod templates {
    use super::*;

    #[tokio::test]
    async fn create_posts_camel_case_body() {
        let (client, transport) = scripted_client(vec![reply(
            200,
            r#"{"id":"tpl_1","name":"welcome","subject":"Hi {{name}}","variables":["name"]}"#,
        )]);
        let request = CreateTemplateRequest {
            name: "welcome".to_string(),
            subject: "Hi {{name}}".to_string(),
            html: Some("<p>Hi {{name}}</p>".to_string()),
            domain_id: Some("dom_1".to_string()),
            ..Default::default()
        };

        let template = client.templates().create(&request).await.unwrap();

        assert_eq!(template.id, "tpl_1");
        assert_eq!(template.variables, vec!["name"]);
        assert_eq!(transport.last_request().url.path(), "/v1/templates");
        assert_eq!(
            transport.last_json(),
            json!({
                "name": "welcome",
                "subject": "Hi {{name}}",
                "html": "<p>Hi {{name}}</p>",
                "domainId": "dom_1"
            })
        );
    }

    #[tokio::test]
    async fn update_is_a_partial_patch() {
        let (client, transport) = scripted_client(vec![]);
        let request = UpdateTemplateRequest {
            subject: Some("New subject".to_string()),
            ..Default::default()
        };

        client.templates().update("tpl_1", &request).await.unwrap();

        let req = transport.last_request();
        assert_eq!(req.method, Method::PATCH);
        assert_eq!(req.url.path(), "/v1/templates/tpl_1");
        assert_eq!(transport.last_json(), json!({"subject": "New subject"}));
    }

    #[tokio::test]
    async fn list_passes_paging() {
        let (client, transport) = scripted_client(vec![reply(
            200,
            r#"{"data":[{"id":"tpl_1"},{"id":"tpl_2"}],"cursor":{"next":"c_3"}}"#,
        )]);

        let page = client
            .templates()
            .list(&ListOptions::new().with_limit(2).with_cursor("c_2"))
            .await
            .unwrap();

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.next_cursor.as_deref(), Some("c_3"));
        assert_eq!(
            transport.last_request().url.query(),
            Some("cursor=c_2&limit=2")
        );
    }

    #[tokio::test]
    async fn publishing_and_testing() {
        let (client, transport) = scripted_client(vec![
            reply(200, r#"{"id":"tpl_1"}"#),
            reply(200, r#"{"id":"tpl_1"}"#),
            reply(200, r#"{"success":true,"message":"sent"}"#),
        ]);
        let mut test = TestTemplateRequest {
            to: vec!["qa@acme.dev".to_string()],
            ..Default::default()
        };
        test.variables.insert("name".to_string(), "Ada".to_string());

        client.templates().publish("tpl_1").await.unwrap();
        client.templates().unpublish("tpl_1").await.unwrap();
        let result = client.templates().test("tpl_1", &test).await.unwrap();

        assert!(result.success);
        assert_eq!(result.message.as_deref(), Some("sent"));
        let requests = transport.requests();
        assert_eq!(requests[0].url.path(), "/v1/templates/tpl_1/publish");
        assert_eq!(requests[1].url.path(), "/v1/templates/tpl_1/unpublish");
        assert_eq!(requests[2].url.path(), "/v1/templates/tpl_1/test");
        assert_eq!(
            transport.last_json(),
            json!({"to": ["qa@acme.dev"], "variables": {"name": "Ada"}})
        );
    }

    #[tokio::test]
    async fn delete_ignores_empty_body() {
        let (client, transport) = scripted_client(vec![reply(204, "")]);

        client.templates().delete("tpl_1").await.unwrap();

        assert_eq!(transport.last_request().method, Method::DELETE);
    }
}

mod domains {
    use super::*;

    #[tokio::test]
    async fn create_returns_dns_records() {
        let (client, transport) = scripted_client(vec![reply(
            200,
            r#"{"id":"dom_1","name":"acme.dev","status":"pending",
                "dns_records":[{"type":"TXT","name":"_spf.acme.dev","value":"v=spf1"},
                               {"type":"MX","name":"acme.dev","value":"mx.sendpigeon.dev","priority":10}]}"#,
        )]);

        let domain = client.domains().create("acme.dev").await.unwrap();

        assert_eq!(domain.domain.name, "acme.dev");
        assert_eq!(domain.domain.status, DomainStatus::Pending);
        assert_eq!(domain.dns_records.len(), 2);
        assert_eq!(domain.dns_records[0].record_type, "TXT");
        assert_eq!(domain.dns_records[1].priority, Some(10));
        assert_eq!(transport.last_json(), json!({"name": "acme.dev"}));
    }

    #[tokio::test]
    async fn verify_posts_without_body() {
        let (client, transport) = scripted_client(vec![reply(
            200,
            r#"{"verified":false,"status":"temporary_failure","dns_records":[]}"#,
        )]);

        let result = client.domains().verify("dom_1").await.unwrap();

        assert!(!result.verified);
        assert_eq!(result.status, DomainStatus::TemporaryFailure);
        let req = transport.last_request();
        assert_eq!(req.method, Method::POST);
        assert_eq!(req.url.path(), "/v1/domains/dom_1/verify");
        assert!(req.body.is_none());
    }

    #[tokio::test]
    async fn unknown_status_is_tolerated() {
        let (client, _) = scripted_client(vec![reply(
            200,
            r#"{"data":[{"id":"dom_1","name":"acme.dev","status":"suspended"}]}"#,
        )]);

        let page = client.domains().list(&ListOptions::new()).await.unwrap();

        assert_eq!(page.items[0].status, DomainStatus::Unknown);
    }
}

mod api_keys {
    use super::*;

    #[tokio::test]
    async fn create_returns_secret_once() {
        let (client, transport) = scripted_client(vec![reply(
            200,
            r#"{"id":"key_1","name":"ci","key_prefix":"sk_test_ab","mode":"test",
                "permission":"sending","key":"sk_test_abcdef"}"#,
        )]);
        let request = CreateApiKeyRequest {
            name: "ci".to_string(),
            mode: Some(ApiKeyMode::Test),
            permission: Some(ApiKeyPermission::Sending),
            ..Default::default()
        };

        let created = client.api_keys().create(&request).await.unwrap();

        assert_eq!(created.info.mode, ApiKeyMode::Test);
        assert_eq!(created.info.permission, ApiKeyPermission::Sending);
        assert_eq!(created.key, "sk_test_abcdef");
        assert!(!format!("{created:?}").contains("sk_test_abcdef"));
        assert_eq!(transport.last_request().url.path(), "/v1/api-keys");
        assert_eq!(
            transport.last_json(),
            json!({"name": "ci", "mode": "test", "permission": "sending"})
        );
    }

    #[tokio::test]
    async fn get_and_delete_address_one_key() {
        let (client, transport) = scripted_client(vec![reply(
            200,
            r#"{"id":"key_1","permission":"full_access"}"#,
        )]);

        let key = client.api_keys().get("key_1").await.unwrap();
        client.api_keys().delete("key_1").await.unwrap();

        assert_eq!(key.permission, ApiKeyPermission::FullAccess);
        let requests = transport.requests();
        assert_eq!(requests[0].url.path(), "/v1/api-keys/key_1");
        assert_eq!(requests[1].method, Method::DELETE);
    }
}

mod suppressions {
    use super::*;

    #[tokio::test]
    async fn list_ignores_cursor() {
        let (client, transport) = scripted_client(vec![reply(
            200,
            r#"{"data":[{"email":"a@example.com","reason":"hard_bounce"}]}"#,
        )]);
        let options = ListOptions::new()
            .with_limit(20)
            .with_offset(40)
            .with_cursor("c_1");

        let page = client.suppressions().list(&options).await.unwrap();

        assert_eq!(page.items[0].reason, "hard_bounce");
        assert_eq!(
            transport.last_request().url.query(),
            Some("limit=20&offset=40")
        );
    }

    #[tokio::test]
    async fn delete_escapes_address() {
        let (client, transport) = scripted_client(vec![reply(204, "")]);

        client
            .suppressions()
            .delete("a+b@example.com")
            .await
            .unwrap();

        let req = transport.last_request();
        assert_eq!(req.method, Method::DELETE);
        assert_eq!(req.url.path(), "/v1/suppressions/a%2Bb%40example.com");
    }
}

mod tracking {
    use super::*;

    #[tokio::test]
    async fn get_defaults() {
        let (client, transport) = scripted_client(vec![reply(
            200,
            r#"{"track_opens":true,"track_clicks":false,"privacy_mode":true}"#,
        )]);

        let defaults = client.tracking().get_defaults().await.unwrap();

        assert!(defaults.track_opens);
        assert!(!defaults.track_clicks);
        assert!(defaults.privacy_mode);
        assert_eq!(transport.last_request().url.path(), "/v1/tracking/defaults");
    }

    #[tokio::test]
    async fn update_sends_only_changes() {
        let (client, transport) = scripted_client(vec![]);
        let request = UpdateTrackingDefaultsRequest {
            track_clicks: Some(true),
            ..Default::default()
        };

        client.tracking().update_defaults(&request).await.unwrap();

        assert_eq!(transport.last_request().method, Method::PATCH);
        assert_eq!(transport.last_json(), json!({"trackClicks": true}));
    }
}
