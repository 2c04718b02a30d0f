//! Retrieval-augmented answering over extracted document text.
//!
//! The pipeline is: chunk pages into overlapping segments, embed each
//! segment, build a flat in-memory index, then answer questions by
//! retrieving the nearest segments and prompting the chat model with
//! them as context.

pub mod answer;
pub mod chunker;
pub mod embedder;
pub mod index;
pub mod pipeline;
pub mod retriever;

pub use answer::{AnswerGenerator, FALLBACK_ANSWER};
pub use chunker::{Chunker, Segment};
pub use embedder::Embedder;
pub use index::FlatIndex;
pub use pipeline::RagPipeline;
pub use retriever::Retrieved;
