use std::io::Write;
use std::time::Duration;

use futures::StreamExt;
use mockito::Matcher;
use serde_json::json;

use super::Gateway;
use crate::chat::{ChatMessage, CompletionProvider, CompletionRequest, Usage};
use crate::error::GatewayError;

fn request(model: &str) -> CompletionRequest {
    CompletionRequest {
        model: model.to_string(),
        messages: ChatMessage::conversation(Some("be brief"), "hello"),
        temperature: 0.2,
        timeout: Some(Duration::from_secs(5)),
    }
}

#[tokio::test]
async fn complete_sends_openai_payload_and_reads_usage() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer test-key")
        .match_body(Matcher::PartialJson(json!({
            "model": "anthropic/claude-3-haiku-20240307",
            "stream": false,
            "messages": [
                { "role": "system", "content": "be brief" },
                { "role": "user", "content": "hello" }
            ]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "choices": [{ "message": { "role": "assistant", "content": "hi there" } }],
                "usage": { "prompt_tokens": 12, "completion_tokens": 3, "total_tokens": 15 }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let gateway = Gateway::new("test-key", format!("{}/", server.url())).unwrap();
    let completion = gateway
        .complete(&request("anthropic/claude-3-haiku-20240307"))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(completion.text().as_deref(), Some("hi there"));
    assert_eq!(
        completion.usage(),
        Some(Usage {
            prompt_tokens: 12,
            completion_tokens: 3,
            total_tokens: 15
        })
    );
}

#[tokio::test]
async fn missing_usage_is_not_an_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(json!({ "choices": [{ "message": { "content": "ok" } }] }).to_string())
        .create_async()
        .await;

    let gateway = Gateway::new("k", server.url()).unwrap();
    let completion = gateway.complete(&request("gpt-4o")).await.unwrap();

    assert_eq!(completion.usage(), None);
}

#[tokio::test]
async fn error_status_keeps_body() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(400)
        .with_body(r#"{"error":"Invalid model name passed in model=nope"}"#)
        .create_async()
        .await;

    let gateway = Gateway::new("k", server.url()).unwrap();
    let err = gateway.complete(&request("nope")).await.unwrap_err();

    match err {
        GatewayError::Status { status, body } => {
            assert_eq!(status, 400);
            assert!(body.contains("Invalid model name"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn unauthorized_maps_to_auth_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(401)
        .with_body("bad key")
        .create_async()
        .await;

    let gateway = Gateway::new("k", server.url()).unwrap();
    let err = gateway.complete(&request("gpt-4o")).await.unwrap_err();

    assert!(matches!(err, GatewayError::AuthError(body) if body == "bad key"));
}

#[tokio::test]
async fn empty_choices_is_a_format_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(r#"{"choices":[]}"#)
        .create_async()
        .await;

    let gateway = Gateway::new("k", server.url()).unwrap();
    let err = gateway.complete(&request("gpt-4o")).await.unwrap_err();

    assert!(matches!(err, GatewayError::ResponseFormatError { .. }));
}

#[tokio::test]
async fn empty_api_key_fails_before_sending() {
    let gateway = Gateway::new("", "http://127.0.0.1:9/").unwrap();
    let err = gateway.complete(&request("gpt-4o")).await.unwrap_err();

    assert!(matches!(err, GatewayError::AuthError(_)));
}

#[tokio::test]
async fn stream_yields_fragments_in_order() {
    let body = [
        json!({ "choices": [{ "delta": { "role": "assistant" } }] }),
        json!({ "choices": [{ "delta": { "content": "Hel" } }] }),
        json!({ "choices": [{ "delta": { "content": "lo" } }] }),
    ]
    .iter()
    .map(|chunk| format!("data: {chunk}\n\n"))
    .collect::<String>()
        + "data: [DONE]\n\n";

    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::PartialJson(json!({ "stream": true })))
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_body(body)
        .create_async()
        .await;

    let gateway = Gateway::new("k", server.url()).unwrap();
    let mut stream = gateway.complete_stream(&request("gpt-4o")).await.unwrap();
    let mut fragments = Vec::new();
    while let Some(chunk) = stream.next().await {
        fragments.push(chunk.unwrap().content().map(str::to_string));
    }

    mock.assert_async().await;
    assert_eq!(
        fragments,
        vec![None, Some("Hel".to_string()), Some("lo".to_string())]
    );
}

#[tokio::test]
async fn usage_without_total_is_summed() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(
            json!({
                "choices": [{ "message": { "content": "hi" } }],
                "usage": { "prompt_tokens": 3, "completion_tokens": 2 }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let gateway = Gateway::new("k", server.url()).unwrap();
    let completion = gateway.complete(&request("gpt-4o")).await.unwrap();

    assert_eq!(completion.text().as_deref(), Some("hi"));
    assert_eq!(
        completion.usage(),
        Some(Usage {
            prompt_tokens: 3,
            completion_tokens: 2,
            total_tokens: 5
        })
    );
}

#[tokio::test]
async fn unreadable_usage_keeps_the_answer() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(
            json!({
                "choices": [{ "message": { "content": "hi" } }],
                "usage": { "completion_tokens": "two" }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let gateway = Gateway::new("k", server.url()).unwrap();
    let completion = gateway.complete(&request("gpt-4o")).await.unwrap();

    assert_eq!(completion.text().as_deref(), Some("hi"));
    assert_eq!(completion.usage(), None);
}

#[tokio::test]
async fn error_object_in_ok_body_is_a_provider_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(json!({ "error": { "message": "model overloaded" } }).to_string())
        .create_async()
        .await;

    let gateway = Gateway::new("k", server.url()).unwrap();
    let err = gateway.complete(&request("gpt-4o")).await.unwrap_err();

    match err {
        GatewayError::ProviderError(message) => assert_eq!(message, "model overloaded"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn slow_body_hits_the_call_timeout() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_chunked_body(|w| {
            std::thread::sleep(Duration::from_millis(500));
            w.write_all(br#"{"choices":[{"message":{"content":"late"}}]}"#)
        })
        .create_async()
        .await;

    let gateway = Gateway::new("k", server.url()).unwrap();
    let mut slow = request("gpt-4o");
    slow.timeout = Some(Duration::from_millis(100));
    let err = gateway.complete(&slow).await.unwrap_err();

    assert!(matches!(err, GatewayError::Timeout(_)), "{err:?}");
}
