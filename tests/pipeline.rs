//! End-to-end retrieval pipeline tests with deterministic embeddings.

mod common;

use common::{FAQ_DOCUMENT, KeywordEmbedder, ScriptedGenerator};

use faqdesk::chunk::split_text;
use faqdesk::generate::answer_question;
use faqdesk::index::EmbeddingIndex;
use faqdesk::models::ChatMessage;
use faqdesk::scope::is_in_scope;
use faqdesk::suggest::suggest_questions;

async fn build_faq_index() -> EmbeddingIndex {
    let chunks = split_text(FAQ_DOCUMENT, 1000, 200);
    assert_eq!(chunks.len(), 1, "the sample FAQ should fit one chunk");
    EmbeddingIndex::build(&KeywordEmbedder, chunks).await.unwrap()
}

#[tokio::test]
async fn test_enrol_query_is_in_scope() {
    let index = build_faq_index().await;
    let in_scope = is_in_scope(&index, &KeywordEmbedder, "How do I enrol?", 0.6)
        .await
        .unwrap();
    assert!(in_scope);
}

#[tokio::test]
async fn test_weather_query_is_out_of_scope() {
    let index = build_faq_index().await;
    let in_scope = is_in_scope(&index, &KeywordEmbedder, "What's the weather today?", 0.6)
        .await
        .unwrap();
    assert!(!in_scope);
}

#[tokio::test]
async fn test_empty_query_classifies_out_of_scope_without_error() {
    let index = build_faq_index().await;
    let in_scope = is_in_scope(&index, &KeywordEmbedder, "", 0.6).await.unwrap();
    assert!(!in_scope);
}

#[tokio::test]
async fn test_suggestions_drop_self_match() {
    let index = build_faq_index().await;
    let suggestions = suggest_questions(&index, &KeywordEmbedder, "How do I enrol?", 0.7, 1)
        .await
        .unwrap();
    assert_eq!(suggestions, vec!["What are the fees?"]);
}

#[tokio::test]
async fn test_no_suggestions_when_nothing_clears_top_match_threshold() {
    let index = build_faq_index().await;
    let suggestions =
        suggest_questions(&index, &KeywordEmbedder, "What's the weather today?", 0.7, 3)
            .await
            .unwrap();
    assert!(suggestions.is_empty());
}

#[tokio::test]
async fn test_answer_prompt_carries_retrieved_context() {
    let index = build_faq_index().await;
    let config = common::test_config();
    let generator = ScriptedGenerator::new("Apply online.");
    let history = vec![ChatMessage::assistant(config.generation.greeting.as_str())];

    let answer = answer_question(
        &generator,
        &KeywordEmbedder,
        &index,
        &history,
        "How do I enrol?",
        &config.retrieval,
        &config.generation,
    )
    .await
    .unwrap();

    assert_eq!(answer, "Apply online.");
    // Fresh conversation: no condensation call, one answer call.
    assert_eq!(generator.call_count(), 1);

    let prompts = generator.prompts.lock().unwrap();
    let system = &prompts[0][0];
    assert_eq!(system.role, "system");
    assert!(system.content.contains("Apply online."));
    assert!(system.content.contains(&config.generation.fallback_message));
}

#[tokio::test]
async fn test_index_build_is_deterministic() {
    let first = build_faq_index().await;
    let second = build_faq_index().await;

    for query in ["How do I enrol?", "What are the fees?"] {
        let a = first.search(&KeywordEmbedder, query, 0.0, 1).await.unwrap();
        let b = second.search(&KeywordEmbedder, query, 0.0, 1).await.unwrap();
        assert_eq!(a[0].chunk.text, b[0].chunk.text);
        assert_eq!(a[0].score, b[0].score);
    }
}

#[tokio::test]
async fn test_multi_chunk_index_finds_best_chunk() {
    let document = "Q: How do I enrol?\nA: Apply online.\n\n\
                    Q: Is parking available on campus?\nA: Yes, permits are required.\n\n\
                    Q: What are the fees?\nA: See the fee schedule.";
    // Force each Q/A pair into its own chunk.
    let chunks = split_text(document, 60, 0);
    assert!(chunks.len() >= 3);
    let index = EmbeddingIndex::build(&KeywordEmbedder, chunks).await.unwrap();

    let results = index
        .search(&KeywordEmbedder, "Is parking available?", 0.6, 1)
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
    assert!(results[0].chunk.text.contains("parking"));
}
