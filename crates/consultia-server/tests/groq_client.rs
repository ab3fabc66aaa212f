use httpmock::Method::POST;
use httpmock::MockServer;
use serde_json::json;

use consultia_core::ChatMessage;
use consultia_server::provider::{CompletionProvider, CompletionRequest, GroqClient, ProviderError};

fn request() -> CompletionRequest {
    CompletionRequest {
        model: "llama-3.1-8b-instant".into(),
        messages: vec![ChatMessage::system("Você é Ana."), ChatMessage::user("Oi")],
        max_tokens: 1000,
        temperature: 0.7,
    }
}

#[tokio::test]
async fn sends_bearer_key_and_openai_payload() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/chat/completions")
                .header("authorization", "Bearer gsk_live")
                .header("content-type", "application/json")
                .body_includes("\"model\":\"llama-3.1-8b-instant\"")
                .body_includes("\"messages\":[{\"role\":\"system\",\"content\":\"Você é Ana.\"},{\"role\":\"user\",\"content\":\"Oi\"}]")
                .body_includes("\"max_tokens\":1000");
            then.status(200).json_body(json!({
                "id": "chatcmpl-9",
                "model": "llama-3.1-8b-instant",
                "choices": [{"index": 0, "message": {"role": "assistant", "content": "Olá!"}}],
                "usage": {"prompt_tokens": 12, "completion_tokens": 2, "total_tokens": 14}
            }));
        })
        .await;

    let client = GroqClient::new(&server.url("/v1/chat/completions"), "gsk_live");
    let response = client.complete(&request()).await.unwrap();

    assert_eq!(response.first_text(), "Olá!");
    assert_eq!(response.usage.unwrap().prompt_tokens, 12);
    mock.assert_calls(1);
}

#[tokio::test]
async fn non_json_success_body_is_decode_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200).body("<html>gateway</html>");
        })
        .await;

    let client = GroqClient::new(&server.url("/v1/chat/completions"), "k");
    let err = client.complete(&request()).await.unwrap_err();

    assert!(matches!(err, ProviderError::Decode(_)));
}

#[tokio::test]
async fn error_status_keeps_parsed_body() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(429)
                .json_body(json!({"error": {"message": "Rate limit reached"}}));
        })
        .await;

    let client = GroqClient::new(&server.url("/v1/chat/completions"), "k");
    match client.complete(&request()).await.unwrap_err() {
        ProviderError::Status { status, body } => {
            assert_eq!(status, 429);
            assert_eq!(body["error"]["message"], "Rate limit reached");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn unreachable_endpoint_is_transport_error() {
    let client = GroqClient::new("http://127.0.0.1:1/v1/chat/completions", "k");
    let err = client.complete(&request()).await.unwrap_err();
    assert!(matches!(err, ProviderError::Transport(_)));
}
