//! End-to-end pipeline tests with a deterministic in-process provider.

use std::sync::Arc;

use async_trait::async_trait;

use docqa::core::config::Config;
use docqa::core::errors::DocqaError;
use docqa::llm::{ChatRequest, LlmProvider};
use docqa::pdf::PdfPage;
use docqa::rag::{RagPipeline, FALLBACK_ANSWER};

const DIM: usize = 32;

/// Deterministic bag-of-words embeddings: each lowercase alphanumeric
/// token increments one of 32 buckets. Similar texts land near each
/// other, which is all retrieval needs.
struct MockProvider {
    fail_chat: bool,
}

fn bag_of_words(text: &str) -> Vec<f32> {
    let mut vector = vec![0.0f32; DIM];
    for token in text
        .to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| !t.is_empty())
    {
        let bucket = token.bytes().map(|b| b as usize).sum::<usize>() % DIM;
        vector[bucket] += 1.0;
    }
    vector
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn health_check(&self) -> Result<bool, DocqaError> {
        Ok(true)
    }

    async fn chat(&self, request: ChatRequest, _: &str) -> Result<String, DocqaError> {
        if self.fail_chat {
            return Err(DocqaError::Provider("mock chat failure".to_string()));
        }
        let prompt = &request.messages[0].content;
        Ok(format!("answered from {} chars of prompt", prompt.len()))
    }

    async fn embed(&self, inputs: &[String], _: &str) -> Result<Vec<Vec<f32>>, DocqaError> {
        Ok(inputs.iter().map(|t| bag_of_words(t)).collect())
    }
}

fn test_config() -> Config {
    let mut config = Config::default();
    config.chunking.chunk_size = 20;
    config.chunking.chunk_overlap = 5;
    config.retrieval.top_k = 3;
    config
}

fn sample_doc() -> Vec<PdfPage> {
    vec![PdfPage {
        number: 1,
        text: "Page 1 content. Page 2 content.".to_string(),
    }]
}

#[tokio::test]
async fn indexing_splits_into_overlapping_segments() {
    let mut pipeline =
        RagPipeline::new(Arc::new(MockProvider { fail_chat: false }), &test_config()).unwrap();
    pipeline
        .build_from_pages(&sample_doc(), "doc.pdf")
        .await
        .unwrap();

    assert!(pipeline.segment_count() >= 2);
}

#[tokio::test]
async fn query_retrieves_the_matching_segment_first() {
    let mut pipeline =
        RagPipeline::new(Arc::new(MockProvider { fail_chat: false }), &test_config()).unwrap();
    pipeline
        .build_from_pages(&sample_doc(), "doc.pdf")
        .await
        .unwrap();

    let retrieved = pipeline.retrieve("Page 1").await.unwrap();
    assert!(!retrieved.is_empty());
    assert!(retrieved[0].segment.text.contains("Page 1 content"));
}

#[tokio::test]
async fn an_indexed_text_is_its_own_nearest_neighbor() {
    let mut pipeline =
        RagPipeline::new(Arc::new(MockProvider { fail_chat: false }), &test_config()).unwrap();
    let pages = vec![
        PdfPage {
            number: 1,
            text: "alpha beta gamma".to_string(),
        },
        PdfPage {
            number: 2,
            text: "delta epsilon zeta".to_string(),
        },
    ];
    pipeline.build_from_pages(&pages, "doc.pdf").await.unwrap();

    let retrieved = pipeline.retrieve("alpha beta gamma").await.unwrap();
    assert_eq!(retrieved[0].segment.text, "alpha beta gamma");
    assert!(retrieved[0].distance.abs() < 1e-6);
}

#[tokio::test]
async fn retrieved_distances_are_non_decreasing() {
    let mut pipeline =
        RagPipeline::new(Arc::new(MockProvider { fail_chat: false }), &test_config()).unwrap();
    pipeline
        .build_from_pages(&sample_doc(), "doc.pdf")
        .await
        .unwrap();

    let retrieved = pipeline.retrieve("content").await.unwrap();
    for pair in retrieved.windows(2) {
        assert!(pair[0].distance <= pair[1].distance);
    }
}

#[tokio::test]
async fn retrieval_before_build_is_empty_not_an_error() {
    let pipeline =
        RagPipeline::new(Arc::new(MockProvider { fail_chat: false }), &test_config()).unwrap();

    let retrieved = pipeline.retrieve("anything").await.unwrap();
    assert!(retrieved.is_empty());
}

#[tokio::test]
async fn chat_failure_yields_the_fixed_placeholder() {
    let mut pipeline =
        RagPipeline::new(Arc::new(MockProvider { fail_chat: true }), &test_config()).unwrap();
    pipeline
        .build_from_pages(&sample_doc(), "doc.pdf")
        .await
        .unwrap();

    let answer = pipeline.ask("Page 1").await.unwrap();
    assert_eq!(answer, FALLBACK_ANSWER);
    assert!(!answer.is_empty());
}

#[tokio::test]
async fn successful_chat_reaches_the_caller() {
    let mut pipeline =
        RagPipeline::new(Arc::new(MockProvider { fail_chat: false }), &test_config()).unwrap();
    pipeline
        .build_from_pages(&sample_doc(), "doc.pdf")
        .await
        .unwrap();

    let answer = pipeline.ask("Page 1").await.unwrap();
    assert!(answer.starts_with("answered from"));
}
