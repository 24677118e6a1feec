//! Drives the chat-completions provider against a local axum stand-in.

use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use daybook::config::FeedbackConfig;
use daybook::feedback::openai::OpenAiFeedback;
use daybook::feedback::{FeedbackProvider, UpstreamError};
use serde_json::{json, Value};

/// Serve `router` on an ephemeral port and return its base URL.
async fn spawn_mock(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}/v1")
}

fn provider(api_base: String) -> OpenAiFeedback {
    OpenAiFeedback::new(&FeedbackConfig {
        api_base,
        model: "gpt-4".into(),
        api_key: Some("sk-test".into()),
    })
    .unwrap()
}

#[tokio::test]
async fn returns_first_choice_trimmed() {
    let router = Router::new().route(
        "/v1/chat/completions",
        post(|headers: HeaderMap, Json(body): Json<Value>| async move {
            assert_eq!(headers["authorization"], "Bearer sk-test");
            assert_eq!(body["model"], "gpt-4");
            assert_eq!(body["messages"][0]["role"], "user");
            assert_eq!(body["messages"][0]["content"], "hello");
            Json(json!({
                "choices": [
                    {"message": {"role": "assistant", "content": "  Be kind to yourself.\n"}},
                    {"message": {"role": "assistant", "content": "ignored"}}
                ]
            }))
        }),
    );
    let base = spawn_mock(router).await;

    let text = provider(base).generate("hello").await.unwrap();
    assert_eq!(text, "Be kind to yourself.");
}

#[tokio::test]
async fn rate_limit_is_transient() {
    let router = Router::new().route(
        "/v1/chat/completions",
        post(|| async {
            (
                StatusCode::TOO_MANY_REQUESTS,
                Json(json!({"error": {"message": "Rate limit reached"}})),
            )
        }),
    );
    let base = spawn_mock(router).await;

    let err = provider(base).generate("hello").await.unwrap_err();
    assert!(matches!(&err, UpstreamError::RateLimited(msg) if msg == "Rate limit reached"));
    assert!(err.is_transient());
}

#[tokio::test]
async fn bad_key_is_permanent() {
    let router = Router::new().route(
        "/v1/chat/completions",
        post(|| async {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": {"message": "Incorrect API key provided"}})),
            )
        }),
    );
    let base = spawn_mock(router).await;

    let err = provider(base).generate("hello").await.unwrap_err();
    assert!(matches!(err, UpstreamError::Unauthorized { status: 401, .. }));
    assert!(!err.is_transient());
}

#[tokio::test]
async fn empty_choices_is_malformed() {
    let router = Router::new().route(
        "/v1/chat/completions",
        post(|| async { Json(json!({"choices": []})) }),
    );
    let base = spawn_mock(router).await;

    let err = provider(base).generate("hello").await.unwrap_err();
    assert!(matches!(err, UpstreamError::Malformed(_)));
}

#[tokio::test]
async fn unreachable_provider_is_network_error() {
    // Bind then drop to get a port nothing listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = provider(format!("http://{addr}/v1"))
        .generate("hello")
        .await
        .unwrap_err();
    assert!(matches!(err, UpstreamError::Network(_)));
    assert!(err.is_transient());
}
