//! Tests for `ReqwestClient`.
//!
//! Exchanges against a live server are covered by `tests/engine_http.rs`
//! using an httpmock server; these tests cover construction and the
//! connection-failure mapping.

use super::*;

mod reqwest_client {
    use super::*;

    #[test]
    fn from_client_accepts_custom_client() {
        let custom = reqwest::Client::builder()
            .user_agent(CLIENT_USER_AGENT)
            .build()
            .unwrap();
        let client = ReqwestClient::from_client(custom);

        assert!(format!("{client:?}").contains("ReqwestClient"));
    }

    #[test]
    fn client_is_send_sync_and_clone() {
        fn assert_traits<T: Send + Sync + Clone + Default>() {}
        assert_traits::<ReqwestClient>();
    }

    #[tokio::test]
    async fn unreachable_port_maps_to_connection_error() {
        let client = ReqwestClient::new();
        // Port 9 (discard) on loopback is closed in test environments.
        let url = url::Url::parse("http://127.0.0.1:9/v1/emails").unwrap();

        let result = client.request(HttpRequest::new(http::Method::GET, url)).await;

        assert!(
            matches!(result, Err(HttpError::Connection(_))),
            "Expected connection error, got {result:?}"
        );
    }
}
