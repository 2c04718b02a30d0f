use std::sync::Arc;

use crate::core::errors::DocqaError;
use crate::llm::LlmProvider;

use super::chunker::Segment;

/// Embeds segments and queries through the configured provider.
pub struct Embedder {
    provider: Arc<dyn LlmProvider>,
    model: String,
}

impl Embedder {
    pub fn new(provider: Arc<dyn LlmProvider>, model: String) -> Self {
        Self { provider, model }
    }

    /// Embed every segment, one vector per segment, in order.
    pub async fn embed_segments(
        &self,
        segments: &[Segment],
    ) -> Result<Vec<Vec<f32>>, DocqaError> {
        if segments.is_empty() {
            return Ok(Vec::new());
        }

        let inputs: Vec<String> = segments.iter().map(|s| s.text.clone()).collect();
        let vectors = self.provider.embed(&inputs, &self.model).await?;

        if vectors.len() != segments.len() {
            return Err(DocqaError::Provider(format!(
                "embedding count mismatch: sent {} inputs, got {} vectors",
                segments.len(),
                vectors.len()
            )));
        }

        tracing::debug!("embedded {} segments with {}", vectors.len(), self.model);
        Ok(vectors)
    }

    /// Embed a single query string.
    pub async fn embed_query(&self, query: &str) -> Result<Vec<f32>, DocqaError> {
        let inputs = vec![query.to_string()];
        let mut vectors = self.provider.embed(&inputs, &self.model).await?;
        vectors
            .pop()
            .ok_or_else(|| DocqaError::Provider("provider returned no embedding".to_string()))
    }
}
