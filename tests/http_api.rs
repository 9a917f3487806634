//! HTTP API tests: the router is served on an ephemeral port and
//! exercised with a real client, with stubbed providers behind it.

mod common;

use std::sync::Arc;

use common::{FAQ_DOCUMENT, FailingGenerator, KeywordEmbedder, ScriptedGenerator};

use faqdesk::chunk::split_text;
use faqdesk::generate::Generator;
use faqdesk::history::ConversationLog;
use faqdesk::index::EmbeddingIndex;
use faqdesk::server::{router, AppState};

struct TestServer {
    base_url: String,
    generator: Arc<ScriptedGenerator>,
    client: reqwest::Client,
}

async fn spawn_with_generator(generator: Arc<dyn Generator>) -> (String, reqwest::Client) {
    let config = common::test_config();
    let chunks = split_text(FAQ_DOCUMENT, 1000, 200);
    let index = EmbeddingIndex::build(&KeywordEmbedder, chunks).await.unwrap();
    let log = Arc::new(ConversationLog::new(&config.generation.greeting));

    let state = AppState {
        config: Arc::new(config),
        index: Arc::new(index),
        embedder: Arc::new(KeywordEmbedder),
        generator,
        log,
    };

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });

    (format!("http://{}", addr), reqwest::Client::new())
}

async fn spawn_server() -> TestServer {
    let generator = Arc::new(ScriptedGenerator::new("Apply online."));
    let (base_url, client) = spawn_with_generator(generator.clone()).await;
    TestServer {
        base_url,
        generator,
        client,
    }
}

#[tokio::test]
async fn test_health() {
    let server = spawn_server().await;
    let body: serde_json::Value = server
        .client
        .get(format!("{}/health", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_history_starts_with_greeting() {
    let server = spawn_server().await;
    let body: serde_json::Value = server
        .client
        .get(format!("{}/api", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["type"], "ai");
    assert_eq!(items[0]["content"], "Hello, I am a bot. How can I help you?");
}

#[tokio::test]
async fn test_ask_in_scope_answers_and_suggests() {
    let server = spawn_server().await;
    let body: serde_json::Value = server
        .client
        .post(format!("{}/api/ask", server.base_url))
        .json(&serde_json::json!({ "data": "How do I enrol?" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[1]["type"], "human");
    assert_eq!(items[1]["content"], "How do I enrol?");
    assert_eq!(items[2]["type"], "ai");
    assert_eq!(items[2]["content"], "Apply online.");

    let questions = body["questions"].as_array().unwrap();
    assert_eq!(questions.len(), 1);
    assert_eq!(questions[0], "What are the fees?");

    assert!(server.generator.call_count() >= 1);
}

#[tokio::test]
async fn test_ask_out_of_scope_falls_back_without_generation() {
    let server = spawn_server().await;
    let body: serde_json::Value = server
        .client
        .post(format!("{}/api/ask", server.base_url))
        .json(&serde_json::json!({ "data": "What's the weather today?" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(
        items[2]["content"],
        "Apologies, but that's outside my current area of expertise."
    );
    assert_eq!(body["questions"].as_array().unwrap().len(), 0);

    // The scope gate must short-circuit: no generator call at all.
    assert_eq!(server.generator.call_count(), 0);
}

#[tokio::test]
async fn test_ask_degrades_to_fallback_when_generation_fails() {
    let (base_url, client) = spawn_with_generator(Arc::new(FailingGenerator)).await;

    // In-scope question, so the scope gate passes and the generator runs.
    let response = client
        .post(format!("{}/api/ask", base_url))
        .json(&serde_json::json!({ "data": "How do I enrol?" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let body: serde_json::Value = response.json().await.unwrap();
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[1]["content"], "How do I enrol?");
    assert_eq!(
        items[2]["content"],
        "Apologies, but that's outside my current area of expertise."
    );
    // Suggestions come from the index, not the generator, so the outage
    // does not affect them.
    assert_eq!(body["questions"].as_array().unwrap().len(), 1);

    // The degraded turn is recorded like any other.
    let log: serde_json::Value = client
        .get(format!("{}/api", base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(log["items"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_log_grows_by_one_pair_per_turn() {
    let server = spawn_server().await;
    for turn in 1..=3 {
        let body: serde_json::Value = server
            .client
            .post(format!("{}/api/ask", server.base_url))
            .json(&serde_json::json!({ "data": "What are the fees?" }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        let items = body["items"].as_array().unwrap();
        assert_eq!(items.len(), 1 + 2 * turn);
        // Strict alternation from the seed.
        for (i, item) in items.iter().enumerate() {
            let expected = if i % 2 == 0 { "ai" } else { "human" };
            assert_eq!(item["type"], expected);
        }
    }
}

#[tokio::test]
async fn test_word_suggestions() {
    let server = spawn_server().await;
    let body: serde_json::Value = server
        .client
        .post(format!("{}/api/word_suggestions", server.base_url))
        .json(&serde_json::json!({ "user_input": "fee" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let suggestions = body["suggestions"].as_array().unwrap();
    assert!(!suggestions.is_empty());
    assert_eq!(suggestions[0], "fees");
}

#[tokio::test]
async fn test_word_suggestions_empty_input_is_bad_request() {
    let server = spawn_server().await;
    let response = server
        .client
        .post(format!("{}/api/word_suggestions", server.base_url))
        .json(&serde_json::json!({ "user_input": "  " }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"]["code"], "bad_request");
    assert!(body["error"]["message"].as_str().unwrap().contains("user_input"));
}
