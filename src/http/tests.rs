//! Tests for the HTTP client module

use super::*;
use crate::auth::AuthConfig;
use crate::error::{Error, Result};
use crate::types::{BackoffType, StringMap};
use serde_json::{json, Value};
use std::time::Duration;
use test_case::test_case;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn mock_client(server: &MockServer) -> HttpClient {
    let config = HttpClientConfig::builder()
        .base_url(server.uri())
        .backoff(
            BackoffType::Constant,
            Duration::from_millis(10),
            Duration::from_secs(1),
        )
        .max_retries(2)
        .no_rate_limit()
        .build();
    HttpClient::with_config(config)
}

fn params(pairs: &[(&str, &str)]) -> StringMap {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

// ============================================================================
// Config Tests
// ============================================================================

#[test]
fn test_http_client_config_default() {
    let config = HttpClientConfig::default();
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert_eq!(config.max_retries, 3);
    assert!(config.base_url.is_none());
    assert!(config.rate_limit.is_some());
    assert!(config.user_agent.starts_with("security-advisor-sdk/"));
}

#[test]
fn test_http_client_config_builder() {
    let config = HttpClientConfig::builder()
        .base_url("https://findings.example.com")
        .timeout(Duration::from_secs(60))
        .max_retries(5)
        .backoff(
            BackoffType::Linear,
            Duration::from_millis(200),
            Duration::from_secs(30),
        )
        .header("X-Custom", "value")
        .user_agent("test-agent/1.0")
        .build();

    assert_eq!(
        config.base_url,
        Some("https://findings.example.com".to_string())
    );
    assert_eq!(config.timeout, Duration::from_secs(60));
    assert_eq!(config.max_retries, 5);
    assert_eq!(config.backoff_type, BackoffType::Linear);
    assert_eq!(config.initial_backoff, Duration::from_millis(200));
    assert_eq!(config.max_backoff, Duration::from_secs(30));
    assert_eq!(
        config.default_headers.get("X-Custom"),
        Some(&"value".to_string())
    );
    assert_eq!(config.user_agent, "test-agent/1.0");
}

#[test]
fn test_request_config_builder() {
    let config = RequestConfig::new()
        .path_param("account_id", "acc-1")
        .query("page_size", "10")
        .query_opt("page_token", Some("tok"))
        .query_opt("limit", None::<u32>)
        .header("Transaction-Id", "abc123")
        .header_opt("X-Skip", None::<String>);

    assert_eq!(config.path_params.get("account_id"), Some(&"acc-1".to_string()));
    assert_eq!(config.query.get("page_size"), Some(&"10".to_string()));
    assert_eq!(config.query.get("page_token"), Some(&"tok".to_string()));
    assert!(!config.query.contains_key("limit"));
    assert_eq!(
        config.headers.get("Transaction-Id"),
        Some(&"abc123".to_string())
    );
    assert!(!config.headers.contains_key("X-Skip"));
}

// ============================================================================
// Path Template Tests
// ============================================================================

#[test_case("/v1/{account_id}/providers", &[("account_id", "acc-1")], "/v1/acc-1/providers" ; "single parameter")]
#[test_case("/v1/{a}/notes/{b}", &[("a", "x"), ("b", "y")], "/v1/x/notes/y" ; "two parameters")]
#[test_case("/v1/{id}", &[("id", "a/b")], "/v1/a%2Fb" ; "slash is encoded")]
#[test_case("/v1/{id}", &[("id", "a b+c")], "/v1/a%20b%2Bc" ; "space and plus are encoded")]
#[test_case("/posture/v2/profiles", &[], "/posture/v2/profiles" ; "no template")]
fn test_expand_path(template: &str, pairs: &[(&str, &str)], expected: &str) {
    assert_eq!(expand_path(template, &params(pairs)).unwrap(), expected);
}

#[test]
fn test_expand_path_missing_parameter() {
    let err = expand_path("/v1/{account_id}/notes", &StringMap::new()).unwrap_err();
    assert!(matches!(err, Error::InvalidParameter { ref name, .. } if name == "account_id"));
}

#[test]
fn test_expand_path_empty_parameter() {
    let err = expand_path("/v1/{account_id}", &params(&[("account_id", "")])).unwrap_err();
    assert!(err.to_string().contains("must not be empty"));
}

// ============================================================================
// Request Tests
// ============================================================================

#[tokio::test]
async fn test_get_json_fills_path_template() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/acc%201/providers/p1/notes"))
        .and(query_param("page_size", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "notes": [],
            "next_page_token": ""
        })))
        .mount(&mock_server)
        .await;

    let client = mock_client(&mock_server);
    let body: Value = client
        .get_json(
            "/v1/{account_id}/providers/{provider_id}/notes",
            RequestConfig::new()
                .path_param("account_id", "acc 1")
                .path_param("provider_id", "p1")
                .query("page_size", "2"),
        )
        .await
        .unwrap();

    assert_eq!(body["next_page_token"], "");
}

#[tokio::test]
async fn test_http_client_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/data"))
        .and(header("X-Default", "d"))
        .and(header("Transaction-Id", "tx-456"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = HttpClientConfig::builder()
        .base_url(mock_server.uri())
        .header("X-Default", "d")
        .no_rate_limit()
        .build();

    let client = HttpClient::with_config(config);
    let body: Value = client
        .get_json(
            "/api/data",
            RequestConfig::new().header("Transaction-Id", "tx-456"),
        )
        .await
        .unwrap();

    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn test_http_client_bearer_auth() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/secure"))
        .and(header("Authorization", "Bearer secret123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = HttpClientConfig::builder()
        .base_url(mock_server.uri())
        .no_rate_limit()
        .build();

    let client = HttpClient::with_auth(
        config,
        AuthConfig::Bearer {
            token: "secret123".to_string(),
        },
    );

    let body: Value = client.get_json("/api/secure", RequestConfig::new()).await.unwrap();
    assert_eq!(body, json!({}));
}

#[tokio::test]
async fn test_http_client_token_failure_sends_nothing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/identity/token"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = HttpClientConfig::builder()
        .base_url(mock_server.uri())
        .no_rate_limit()
        .build();
    let client = HttpClient::with_auth(
        config,
        AuthConfig::Iam {
            api_key: "k".to_string(),
            token_url: format!("{}/identity/token", mock_server.uri()),
        },
    );

    let result: Result<Value> = client.get_json("/api/data", RequestConfig::new()).await;
    assert!(matches!(result, Err(Error::TokenRefresh { .. })));
}

#[tokio::test]
async fn test_http_client_404_error_keeps_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("provider not found"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = mock_client(&mock_server);
    let err = client
        .get_json::<Value>("/api/missing", RequestConfig::new())
        .await
        .unwrap_err();

    match err {
        Error::HttpStatus { status, body } => {
            assert_eq!(status, 404);
            assert_eq!(body, "provider not found");
        }
        other => panic!("expected HttpStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn test_http_client_malformed_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/broken"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
        .mount(&mock_server)
        .await;

    let client = mock_client(&mock_server);
    let result: Result<Value> = client.get_json("/api/broken", RequestConfig::new()).await;

    assert!(matches!(result, Err(Error::JsonParse(_))));
}

#[tokio::test]
async fn test_http_client_invalid_path_param_sends_nothing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = mock_client(&mock_server);
    let result: Result<Value> = client
        .get_json(
            "/v1/{account_id}/providers",
            RequestConfig::new().path_param("account_id", ""),
        )
        .await;

    assert!(matches!(result, Err(Error::InvalidParameter { .. })));
}

// ============================================================================
// Retry Tests
// ============================================================================

#[tokio::test]
async fn test_http_client_retry_on_500() {
    let mock_server = MockServer::start().await;

    // First two calls return 500, third succeeds
    Mock::given(method("GET"))
        .and(path("/api/flaky"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = mock_client(&mock_server);
    let body: Value = client.get_json("/api/flaky", RequestConfig::new()).await.unwrap();

    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn test_http_client_rate_limit_retry() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/limited"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("retry-after", "1")
                .set_body_string("Rate limited"),
        )
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/limited"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&mock_server)
        .await;

    let client = mock_client(&mock_server);
    let body: Value = client.get_json("/api/limited", RequestConfig::new()).await.unwrap();

    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn test_http_client_does_not_retry_client_errors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/forbidden"))
        .respond_with(ResponseTemplate::new(403).set_body_string("denied"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = mock_client(&mock_server);
    let result: Result<Value> = client.get_json("/api/forbidden", RequestConfig::new()).await;

    assert!(matches!(result, Err(Error::HttpStatus { status: 403, .. })));
}

#[tokio::test]
async fn test_http_client_max_retries_exceeded() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/always-fail"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Server error"))
        .expect(3)
        .mount(&mock_server)
        .await;

    let client = mock_client(&mock_server);
    let result: Result<Value> = client.get_json("/api/always-fail", RequestConfig::new()).await;

    assert!(
        matches!(result, Err(Error::HttpStatus { status: 500, ref body }) if body == "Server error")
    );
}

// ============================================================================
// Backoff Tests
// ============================================================================

fn backoff_client(backoff: BackoffType, max: Duration) -> HttpClient {
    let config = HttpClientConfig::builder()
        .backoff(backoff, Duration::from_millis(100), max)
        .no_rate_limit()
        .build();
    HttpClient::with_config(config)
}

#[test]
fn test_backoff_delay_constant() {
    let client = backoff_client(BackoffType::Constant, Duration::from_secs(10));

    assert_eq!(client.backoff_delay(0), Duration::from_millis(100));
    assert_eq!(client.backoff_delay(1), Duration::from_millis(100));
    assert_eq!(client.backoff_delay(5), Duration::from_millis(100));
}

#[test]
fn test_backoff_delay_linear() {
    let client = backoff_client(BackoffType::Linear, Duration::from_secs(10));

    assert_eq!(client.backoff_delay(0), Duration::from_millis(100));
    assert_eq!(client.backoff_delay(1), Duration::from_millis(200));
    assert_eq!(client.backoff_delay(2), Duration::from_millis(300));
}

#[test]
fn test_backoff_delay_exponential() {
    let client = backoff_client(BackoffType::Exponential, Duration::from_secs(10));

    assert_eq!(client.backoff_delay(0), Duration::from_millis(100));
    assert_eq!(client.backoff_delay(1), Duration::from_millis(200));
    assert_eq!(client.backoff_delay(2), Duration::from_millis(400));
    assert_eq!(client.backoff_delay(3), Duration::from_millis(800));
}

#[test]
fn test_backoff_delay_respects_max() {
    let client = backoff_client(BackoffType::Exponential, Duration::from_millis(500));

    assert_eq!(client.backoff_delay(10), Duration::from_millis(500));
}

#[test]
fn test_http_client_debug() {
    let client = HttpClient::new();
    let debug_str = format!("{client:?}");
    assert!(debug_str.contains("HttpClient"));
    assert!(debug_str.contains("config"));
}

#[tokio::test]
async fn test_http_client_with_rate_limiter() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(3)
        .mount(&mock_server)
        .await;

    let config = HttpClientConfig::builder()
        .base_url(mock_server.uri())
        .rate_limit(RateLimiterConfig::new(100, 10))
        .build();

    let client = HttpClient::with_config(config);
    assert!(format!("{client:?}").contains("rate_limited: true"));

    for _ in 0..3 {
        let _: Value = client.get_json("/api/data", RequestConfig::new()).await.unwrap();
    }
}
