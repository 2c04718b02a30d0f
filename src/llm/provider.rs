use async_trait::async_trait;

use crate::core::errors::DocqaError;

use super::types::ChatRequest;

#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// return the provider name (e.g. "ollama", "openai_compat")
    fn name(&self) -> &str;

    /// check if the provider is healthy/reachable
    async fn health_check(&self) -> Result<bool, DocqaError>;

    /// chat completion (non-streaming)
    async fn chat(&self, request: ChatRequest, model_id: &str) -> Result<String, DocqaError>;

    /// generate embeddings, one vector per input
    async fn embed(&self, inputs: &[String], model_id: &str)
        -> Result<Vec<Vec<f32>>, DocqaError>;
}
