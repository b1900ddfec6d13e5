//! Suggestion providers against mocked HTTP endpoints

mod common;

use archgraph_core::Relationship;
use archgraph_pipeline::suggest::{GeminiSuggester, OllamaSuggester, TgiSuggester};
use archgraph_pipeline::{Pipeline, PipelineConfig, Provider, ProviderKind, SuggestConfig, SuggestionProvider};
use common::ECOMMERCE_ARTICLE;
use mockito::Matcher;
use serde_json::json;

const SUGGESTION: &str = r#"{"components": ["Edge Router", "Checkout Service"], "relationships": [{"from": "Edge Router", "to": "Checkout Service", "type": "request"}]}"#;

fn config(kind: ProviderKind, url: &str) -> SuggestConfig {
    SuggestConfig::for_provider(kind)
        .with_base_url(url)
        .with_timeout_secs(5)
}

#[tokio::test]
async fn test_tgi_suggestion() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/generate")
        .match_body(Matcher::PartialJson(json!({
            "parameters": { "return_full_text": false }
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!([{ "generated_text": format!("```json\n{}\n```", SUGGESTION) }]).to_string())
        .create_async()
        .await;

    let tgi = TgiSuggester::new(&config(ProviderKind::Tgi, &server.url())).unwrap();
    let suggestion = tgi.suggest("The edge router calls checkout").await.unwrap();

    assert_eq!(suggestion.components, vec!["Edge Router", "Checkout Service"]);
    assert_eq!(suggestion.relationships.len(), 1);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_ollama_suggestion() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/chat")
        .match_body(Matcher::PartialJson(json!({
            "model": "phi4-mini:latest",
            "stream": false
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "message": { "role": "assistant", "content": SUGGESTION },
                "done": true,
                "done_reason": "stop"
            })
            .to_string(),
        )
        .create_async()
        .await;

    let ollama = OllamaSuggester::new(&config(ProviderKind::Ollama, &server.url())).unwrap();
    let suggestion = ollama.suggest("The edge router calls checkout").await.unwrap();

    assert_eq!(suggestion.components.len(), 2);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_gemini_suggestion() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1beta/models/gemini-pro:generateContent")
        .match_header("x-goog-api-key", "test-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "candidates": [{ "content": { "parts": [{ "text": SUGGESTION }] } }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let gemini =
        GeminiSuggester::new(&config(ProviderKind::Gemini, &server.url()).with_api_key("test-key"))
            .unwrap();
    let suggestion = gemini.suggest("The edge router calls checkout").await.unwrap();

    assert_eq!(suggestion.components[0], "Edge Router");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_prompt_is_truncated() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/generate")
        .match_body(Matcher::Regex("z{4000}".to_string()))
        .with_status(200)
        .with_body(json!({ "generated_text": SUGGESTION }).to_string())
        .create_async()
        .await;
    let too_long = server
        .mock("POST", "/generate")
        .match_body(Matcher::Regex("z{4001}".to_string()))
        .expect(0)
        .create_async()
        .await;

    let tgi = TgiSuggester::new(&config(ProviderKind::Tgi, &server.url())).unwrap();
    let text = "z".repeat(6000);
    assert!(tgi.suggest(&text).await.is_some());

    mock.assert_async().await;
    too_long.assert_async().await;
}

#[tokio::test]
async fn test_server_error_is_no_suggestion() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/generate")
        .with_status(503)
        .with_body("model is loading")
        .create_async()
        .await;

    let tgi = TgiSuggester::new(&config(ProviderKind::Tgi, &server.url())).unwrap();
    assert!(tgi.suggest("anything").await.is_none());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_prose_reply_is_no_suggestion() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/chat")
        .with_status(200)
        .with_body(
            json!({ "message": { "role": "assistant", "content": "I could not find any components." } })
                .to_string(),
        )
        .create_async()
        .await;

    let ollama = OllamaSuggester::new(&config(ProviderKind::Ollama, &server.url())).unwrap();
    assert!(ollama.suggest("anything").await.is_none());
}

#[tokio::test]
async fn test_empty_suggestion_is_no_suggestion() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/generate")
        .with_status(200)
        .with_body(json!({ "generated_text": "{\"components\": [], \"relationships\": []}" }).to_string())
        .create_async()
        .await;

    let tgi = TgiSuggester::new(&config(ProviderKind::Tgi, &server.url())).unwrap();
    assert!(tgi.suggest("anything").await.is_none());
}

#[tokio::test]
async fn test_unreachable_provider_is_no_suggestion() {
    // nothing listens on the discard port
    let tgi = TgiSuggester::new(&config(ProviderKind::Tgi, "http://127.0.0.1:9")).unwrap();
    assert!(tgi.suggest("anything").await.is_none());
}

#[tokio::test]
async fn test_pipeline_uses_provider_suggestion() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/generate")
        .with_status(200)
        .with_body(json!({ "generated_text": SUGGESTION }).to_string())
        .create_async()
        .await;

    let pipeline = Pipeline::new(PipelineConfig {
        suggest: config(ProviderKind::Tgi, &server.url()),
        ..PipelineConfig::default()
    })
    .unwrap();
    assert_eq!(pipeline.provider().kind(), ProviderKind::Tgi);

    let diagram = pipeline.run(ECOMMERCE_ARTICLE).await;
    assert_eq!(diagram.graph.components()[0], "Edge Router");
    assert_eq!(
        diagram.graph.relationships(),
        &[Relationship::new("Edge Router", "Checkout Service", "request")]
    );
}

#[tokio::test]
async fn test_pipeline_survives_provider_failure() {
    let pipeline = Pipeline::new(PipelineConfig {
        suggest: config(ProviderKind::Ollama, "http://127.0.0.1:9"),
        ..PipelineConfig::default()
    })
    .unwrap();
    let fallback = Pipeline::with_provider(PipelineConfig::default(), Provider::default()).unwrap();

    assert_eq!(
        pipeline.run(ECOMMERCE_ARTICLE).await,
        fallback.run(ECOMMERCE_ARTICLE).await
    );
}
