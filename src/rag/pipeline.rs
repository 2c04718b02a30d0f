use std::sync::Arc;

use crate::core::config::{Config, GenerationConfig};
use crate::core::errors::DocqaError;
use crate::llm::{ChatMessage, ChatRequest, LlmProvider};
use crate::pdf::PdfPage;

use super::answer::AnswerGenerator;
use super::chunker::{Chunker, Segment};
use super::embedder::Embedder;
use super::index::FlatIndex;
use super::retriever::{resolve_hits, Retrieved};

const STRUCTURING_PROMPT: &str = "Reorganize the document below into titled sections. \
Output every section as a line `## SECTION: <title>` followed by that section's full \
content. Preserve all information from the document and output nothing else.";

/// End-to-end question answering over one document.
///
/// Holds the chunker, the embedding index, and the answer generator.
/// The index starts unbuilt; retrieval against an unbuilt pipeline
/// returns no results instead of failing.
pub struct RagPipeline {
    provider: Arc<dyn LlmProvider>,
    chat_model: String,
    generation: GenerationConfig,
    embedder: Embedder,
    answerer: AnswerGenerator,
    chunker: Chunker,
    index: Option<FlatIndex>,
    segments: Vec<Segment>,
    top_k: usize,
}

impl RagPipeline {
    pub fn new(provider: Arc<dyn LlmProvider>, config: &Config) -> Result<Self, DocqaError> {
        let chunker =
            Chunker::new(config.chunking.chunk_size, config.chunking.chunk_overlap)?;
        let embedder = Embedder::new(
            provider.clone(),
            config.provider.embedding_model.clone(),
        );
        let answerer = AnswerGenerator::new(
            provider.clone(),
            config.provider.chat_model.clone(),
            config.retrieval.max_context_length,
            config.retrieval.include_citations,
            config.generation.clone(),
        );

        Ok(Self {
            provider: provider.clone(),
            chat_model: config.provider.chat_model.clone(),
            generation: config.generation.clone(),
            embedder,
            answerer,
            chunker,
            index: None,
            segments: Vec::new(),
            top_k: config.retrieval.top_k,
        })
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Chunk pages with the fixed-overlap chunker, embed, and index.
    pub async fn build_from_pages(
        &mut self,
        pages: &[PdfPage],
        source: &str,
    ) -> Result<(), DocqaError> {
        let segments = self.chunker.chunk_pages(pages, source);
        self.build_from_segments(segments).await
    }

    /// Ask the chat model to restructure the document into sections, then
    /// chunk each section. Falls back to fixed-overlap chunking when the
    /// model output has no section delimiters.
    pub async fn build_sectioned(
        &mut self,
        pages: &[PdfPage],
        source: &str,
    ) -> Result<(), DocqaError> {
        let document = crate::pdf::join_pages(pages);
        let prompt = format!("{}\n\nDocument:\n{}", STRUCTURING_PROMPT, document);
        let request =
            ChatRequest::new(vec![ChatMessage::user(prompt)]).with_generation(&self.generation);
        let structured = self.provider.chat(request, &self.chat_model).await?;

        let segments = self.chunker.chunk_sections(&structured, source);
        if segments.is_empty() {
            tracing::warn!("falling back to fixed-overlap chunking");
            return self.build_from_pages(pages, source).await;
        }
        self.build_from_segments(segments).await
    }

    pub async fn build_from_segments(
        &mut self,
        segments: Vec<Segment>,
    ) -> Result<(), DocqaError> {
        if segments.is_empty() {
            return Err(DocqaError::InvalidInput(
                "document produced no segments".to_string(),
            ));
        }

        let vectors = self.embedder.embed_segments(&segments).await?;
        let index = FlatIndex::build(vectors)?;
        tracing::info!(
            "indexed {} segments ({} dimensions)",
            index.len(),
            index.dimension()
        );

        self.segments = segments;
        self.index = Some(index);
        Ok(())
    }

    /// Retrieve the nearest segments for a question. An unbuilt pipeline
    /// yields an empty result with a warning.
    pub async fn retrieve(&self, question: &str) -> Result<Vec<Retrieved>, DocqaError> {
        let index = match &self.index {
            Some(index) => index,
            None => {
                tracing::warn!("retrieval before index build, returning no results");
                return Ok(Vec::new());
            }
        };

        let query = self.embedder.embed_query(question).await?;
        let hits = index.search(&query, self.top_k);
        Ok(resolve_hits(&self.segments, &hits))
    }

    /// Answer a question from the indexed document.
    pub async fn ask(&self, question: &str) -> Result<String, DocqaError> {
        let retrieved = self.retrieve(question).await?;
        if retrieved.is_empty() {
            tracing::warn!("no segments retrieved for question");
        }
        Ok(self.answerer.answer(question, &retrieved).await)
    }
}
