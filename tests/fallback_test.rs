//! Integration tests for the provider fallback chain.
//!
//! Each upstream provider gets its own wiremock server; the gateway is
//! pointed at them via the builder's base-URL overrides. Call-count
//! expectations (`.expect(n)`) verify which providers were actually
//! contacted.

use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use muninn::{GatewayError, GenerationRequest, Muninn};

fn openai_chat_response(text: &str) -> serde_json::Value {
    serde_json::json!({
        "choices": [{"message": {"role": "assistant", "content": text}}]
    })
}

fn gemini_response(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [{"content": {"parts": [{"text": text}]}}]
    })
}

fn request() -> GenerationRequest {
    GenerationRequest::new("You are a helpful assistant.", "Tell me a short joke.")
        .temperature(0.7)
        .max_output_tokens(50)
}

/// Primary provider errors; the secondary serves the request and the
/// failure stays invisible to the caller.
#[tokio::test]
async fn secondary_provider_serves_when_primary_fails() {
    let openai = MockServer::start().await;
    let gemini = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&openai)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.0-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_response("from gemini")))
        .expect(1)
        .mount(&gemini)
        .await;

    let gateway = Muninn::builder()
        .openai("test-key")
        .gemini("test-key")
        .openai_base_url(openai.uri())
        .gemini_base_url(gemini.uri())
        .no_cache()
        .build();

    let text = gateway.generate(&request()).await.unwrap();
    assert_eq!(text, "from gemini");
}

/// A and B both fail; C's normalized text comes back and no failure
/// from A or B is visible.
#[tokio::test]
async fn tertiary_provider_serves_when_first_two_fail() {
    let openai = MockServer::start().await;
    let gemini = MockServer::start().await;
    let mistral = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&openai)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429))
        .expect(1)
        .mount(&gemini)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(openai_chat_response("from mistral")))
        .expect(1)
        .mount(&mistral)
        .await;

    let gateway = Muninn::builder()
        .openai("test-key")
        .gemini("test-key")
        .mistral("test-key")
        .openai_base_url(openai.uri())
        .gemini_base_url(gemini.uri())
        .mistral_base_url(mistral.uri())
        .no_cache()
        .build();

    let text = gateway.generate(&request()).await.unwrap();
    assert_eq!(text, "from mistral");
}

/// All three text providers fail: exhaustion, no partial text.
#[tokio::test]
async fn all_providers_failing_is_exhaustion() {
    let openai = MockServer::start().await;
    let gemini = MockServer::start().await;
    let mistral = MockServer::start().await;
    for server in [&openai, &gemini, &mistral] {
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(server)
            .await;
    }

    let gateway = Muninn::builder()
        .openai("test-key")
        .gemini("test-key")
        .mistral("test-key")
        .openai_base_url(openai.uri())
        .gemini_base_url(gemini.uri())
        .mistral_base_url(mistral.uri())
        .no_cache()
        .build();

    assert!(matches!(
        gateway.generate(&request()).await,
        Err(GatewayError::AllProvidersExhausted)
    ));
}

/// No credentials at all reads the same as total failure.
#[tokio::test]
async fn unconfigured_gateway_is_exhausted() {
    let gateway = Muninn::builder().build();
    assert!(matches!(
        gateway.generate(&request()).await,
        Err(GatewayError::AllProvidersExhausted)
    ));
}

/// Fenced provider output is normalized before it reaches the caller.
#[tokio::test]
async fn fenced_output_is_normalized() {
    let openai = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(openai_chat_response(
            "```json\n{\"answer\": 42}\n```",
        )))
        .mount(&openai)
        .await;

    let gateway = Muninn::builder()
        .openai("test-key")
        .openai_base_url(openai.uri())
        .no_cache()
        .build();

    let text = gateway.generate(&request()).await.unwrap();
    assert_eq!(text, "{\"answer\": 42}");
    assert!(!text.contains("```"));
}

/// The JSON-mode flag is translated into each provider's native
/// mechanism: a response_format flag for OpenAI, a MIME-type hint for
/// Gemini.
#[tokio::test]
async fn json_mode_translates_per_provider() {
    let openai = MockServer::start().await;
    let gemini = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_string_contains("json_object"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&openai)
        .await;
    Mock::given(method("POST"))
        .and(body_string_contains("application/json"))
        .and(body_string_contains("responseMimeType"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_response("{}")))
        .expect(1)
        .mount(&gemini)
        .await;

    let gateway = Muninn::builder()
        .openai("test-key")
        .gemini("test-key")
        .openai_base_url(openai.uri())
        .gemini_base_url(gemini.uri())
        .build();

    let text = gateway
        .generate(&request().json_mode(true))
        .await
        .unwrap();
    assert_eq!(text, "{}");
}

/// Credentials are sent the way each vendor expects them.
#[tokio::test]
async fn provider_credentials_use_native_headers() {
    let openai = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("Authorization", "Bearer sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(openai_chat_response("ok")))
        .expect(1)
        .mount(&openai)
        .await;

    let gateway = Muninn::builder()
        .openai("sk-test")
        .openai_base_url(openai.uri())
        .no_cache()
        .build();
    assert_eq!(gateway.generate(&request()).await.unwrap(), "ok");
}
