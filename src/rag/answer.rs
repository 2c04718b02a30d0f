use std::sync::Arc;

use crate::core::config::GenerationConfig;
use crate::llm::{ChatMessage, ChatRequest, LlmProvider};

use super::retriever::Retrieved;

/// Returned whenever the chat provider fails, so callers always get a
/// non-empty answer.
pub const FALLBACK_ANSWER: &str =
    "I was unable to generate an answer for this question. Please try again.";

/// Builds a cited context block from retrieved segments and asks the
/// chat model to answer from it alone.
pub struct AnswerGenerator {
    provider: Arc<dyn LlmProvider>,
    model: String,
    max_context_length: usize,
    include_citations: bool,
    generation: GenerationConfig,
}

impl AnswerGenerator {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        model: String,
        max_context_length: usize,
        include_citations: bool,
        generation: GenerationConfig,
    ) -> Self {
        Self {
            provider,
            model,
            max_context_length,
            include_citations,
            generation,
        }
    }

    /// Format retrieved segments into a numbered context block. Stops
    /// adding segments once the length budget would be exceeded.
    pub fn build_context(&self, retrieved: &[Retrieved]) -> String {
        let mut context = String::new();

        for (i, hit) in retrieved.iter().enumerate() {
            let entry = if self.include_citations {
                let location = match (&hit.segment.section, hit.segment.page) {
                    (Some(section), _) => format!("{}, section \"{}\"", hit.segment.source, section),
                    (None, Some(page)) => format!("{}, page {}", hit.segment.source, page),
                    (None, None) => hit.segment.source.clone(),
                };
                format!("[{}] ({})\n{}\n\n", i + 1, location, hit.segment.text.trim())
            } else {
                format!("[{}]\n{}\n\n", i + 1, hit.segment.text.trim())
            };

            if !context.is_empty()
                && context.chars().count() + entry.chars().count() > self.max_context_length
            {
                tracing::debug!("context budget reached after {} segments", i);
                break;
            }
            context.push_str(&entry);
        }

        context.trim_end().to_string()
    }

    pub fn build_prompt(&self, context: &str, question: &str) -> String {
        format!(
            "Answer the question using only the context below. If the context \
             does not contain the answer, say that the document does not cover it.\n\n\
             Context:\n{}\n\nQuestion: {}\n\nAnswer:",
            context, question
        )
    }

    /// Generate an answer. Provider failures are logged and replaced with
    /// [`FALLBACK_ANSWER`], never surfaced to the caller.
    pub async fn answer(&self, question: &str, retrieved: &[Retrieved]) -> String {
        let context = self.build_context(retrieved);
        let prompt = self.build_prompt(&context, question);
        let request =
            ChatRequest::new(vec![ChatMessage::user(prompt)]).with_generation(&self.generation);

        match self.provider.chat(request, &self.model).await {
            Ok(answer) if !answer.trim().is_empty() => answer.trim().to_string(),
            Ok(_) => {
                tracing::error!("chat model returned an empty answer");
                FALLBACK_ANSWER.to_string()
            }
            Err(e) => {
                tracing::error!("answer generation failed: {}", e);
                FALLBACK_ANSWER.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::DocqaError;
    use crate::rag::chunker::Segment;
    use async_trait::async_trait;

    struct FailingProvider;

    #[async_trait]
    impl LlmProvider for FailingProvider {
        fn name(&self) -> &str {
            "failing"
        }

        async fn health_check(&self) -> Result<bool, DocqaError> {
            Ok(false)
        }

        async fn chat(&self, _: ChatRequest, _: &str) -> Result<String, DocqaError> {
            Err(DocqaError::Provider("connection refused".to_string()))
        }

        async fn embed(&self, _: &[String], _: &str) -> Result<Vec<Vec<f32>>, DocqaError> {
            Err(DocqaError::Provider("connection refused".to_string()))
        }
    }

    fn retrieved(text: &str, page: Option<u32>) -> Retrieved {
        Retrieved {
            segment: Segment {
                text: text.to_string(),
                source: "doc.pdf".to_string(),
                page,
                section: None,
                chunk_index: 0,
            },
            distance: 0.1,
        }
    }

    #[tokio::test]
    async fn provider_failure_yields_fixed_placeholder() {
        let generator = AnswerGenerator::new(
            Arc::new(FailingProvider),
            "model".to_string(),
            4000,
            true,
            GenerationConfig::default(),
        );

        let answer = generator.answer("what?", &[retrieved("content", Some(1))]).await;
        assert_eq!(answer, FALLBACK_ANSWER);
        assert!(!answer.is_empty());
    }

    #[test]
    fn context_carries_numbered_citations() {
        let generator = AnswerGenerator::new(
            Arc::new(FailingProvider),
            "model".to_string(),
            4000,
            true,
            GenerationConfig::default(),
        );

        let context = generator.build_context(&[
            retrieved("first segment", Some(1)),
            retrieved("second segment", Some(2)),
        ]);

        assert!(context.contains("[1] (doc.pdf, page 1)"));
        assert!(context.contains("[2] (doc.pdf, page 2)"));
        assert!(context.contains("first segment"));
    }

    #[test]
    fn context_respects_length_budget() {
        let generator = AnswerGenerator::new(
            Arc::new(FailingProvider),
            "model".to_string(),
            60,
            false,
            GenerationConfig::default(),
        );

        let long = "x".repeat(50);
        let context = generator.build_context(&[retrieved(&long, None), retrieved(&long, None)]);
        assert!(context.contains("[1]"));
        assert!(!context.contains("[2]"));
    }

    #[test]
    fn prompt_embeds_context_and_question() {
        let generator = AnswerGenerator::new(
            Arc::new(FailingProvider),
            "model".to_string(),
            4000,
            true,
            GenerationConfig::default(),
        );

        let prompt = generator.build_prompt("some context", "the question");
        assert!(prompt.contains("some context"));
        assert!(prompt.contains("the question"));
        assert!(prompt.contains("only the context"));
    }
}
