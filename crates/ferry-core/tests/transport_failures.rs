//! Failure classification for requests that never get a clean response.

use ferry_core::{
    ChatMessage, LlmClient, LlmError, ModelParameters, OpenAiProvider, ProviderConfig,
    ProxySettings, TimeoutConfig, TransportPolicy,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{any, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Grab a port nothing is listening on anymore.
fn refused_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn openai_client(config: ProviderConfig) -> LlmClient {
    let adapter = Arc::new(OpenAiProvider::new(&config, ModelParameters::new("gpt-4o")));
    LlmClient::builder(adapter, config)
        .with_proxy_settings(ProxySettings::default())
        .build()
        .unwrap()
}

#[tokio::test]
async fn connection_refused_is_connectivity_naming_the_target() {
    init_tracing();
    let port = refused_port();
    let base_url = format!("http://127.0.0.1:{port}");
    let client = openai_client(
        ProviderConfig::new()
            .with_api_key("test-key")
            .with_base_url(&base_url),
    );

    let err = client.chat(&[ChatMessage::user("hi")]).await.unwrap_err();
    assert!(matches!(err, LlmError::Connectivity { .. }), "got {err:?}");
    assert!(err.message().contains(&format!("127.0.0.1:{port}")));
    assert!(err.message().contains("proxy"));
    assert_eq!(err.status_code(), None);
}

#[tokio::test]
async fn unreachable_explicit_proxy_is_connectivity() {
    init_tracing();
    // The provider endpoint is up; only the proxy the policy routes
    // through is dead. A connectivity error proves the proxy was used.
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "ok"}}],
        })))
        .expect(0)
        .mount(&server)
        .await;

    let config = ProviderConfig::new()
        .with_api_key("test-key")
        .with_base_url(format!("{}/v1", server.uri()));
    let adapter = Arc::new(OpenAiProvider::new(&config, ModelParameters::new("gpt-4o")));
    let settings = ProxySettings {
        https_proxy_host: Some("127.0.0.1".to_string()),
        https_proxy_port: Some(refused_port().to_string()),
        ..ProxySettings::default()
    };
    let client = LlmClient::builder(adapter, config)
        .with_proxy_settings(settings)
        .build()
        .unwrap();
    assert!(matches!(
        client.transport_policy(),
        TransportPolicy::Proxy { .. }
    ));

    let err = client.chat(&[ChatMessage::user("hi")]).await.unwrap_err();
    assert!(matches!(err, LlmError::Connectivity { .. }), "got {err:?}");
}

#[tokio::test]
async fn cancellation_mid_flight_returns_cancelled() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"choices": []}))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let token = CancellationToken::new();
    let config = ProviderConfig::new()
        .with_api_key("test-key")
        .with_base_url(format!("{}/v1", server.uri()));
    let adapter = Arc::new(OpenAiProvider::new(&config, ModelParameters::new("gpt-4o")));
    let client = LlmClient::builder(adapter, config)
        .with_proxy_settings(ProxySettings::default())
        .with_cancellation(token.clone())
        .build()
        .unwrap();

    let in_flight = tokio::spawn({
        let client = client.clone();
        async move { client.chat(&[ChatMessage::user("hi")]).await }
    });
    tokio::time::sleep(Duration::from_millis(100)).await;
    token.cancel();

    let err = in_flight.await.unwrap().unwrap_err();
    assert!(err.is_cancelled());
    // The token stays cancelled so callers can observe why.
    assert!(token.is_cancelled());
}

#[tokio::test]
async fn already_cancelled_token_short_circuits_without_sending() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(0)
        .mount(&server)
        .await;

    let token = CancellationToken::new();
    token.cancel();
    let config = ProviderConfig::new()
        .with_api_key("test-key")
        .with_base_url(format!("{}/v1", server.uri()));
    let adapter = Arc::new(OpenAiProvider::new(&config, ModelParameters::new("gpt-4o")));
    let client = LlmClient::builder(adapter, config)
        .with_proxy_settings(ProxySettings::default())
        .with_cancellation(token)
        .build()
        .unwrap();

    let err = client.chat(&[ChatMessage::user("hi")]).await.unwrap_err();
    assert!(err.is_cancelled());
}

#[tokio::test]
async fn slow_responses_time_out_as_plain_transport() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"choices": []}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let config = ProviderConfig::new()
        .with_api_key("test-key")
        .with_base_url(format!("{}/v1", server.uri()))
        .with_timeouts(
            TimeoutConfig::new()
                .with_connect_timeout_secs(1)
                .with_request_timeout_secs(1),
        );
    let client = openai_client(config);

    let err = client.chat(&[ChatMessage::user("hi")]).await.unwrap_err();
    assert!(matches!(err, LlmError::Transport { .. }), "got {err:?}");
    assert!(err.message().contains("timed out"));
    assert!(!err.is_cancelled());
}
