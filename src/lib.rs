//! PDF question answering via retrieval-augmented generation.
//!
//! The pipeline is linear and synchronous: a PDF is parsed into per-page
//! text, chunked into overlapping segments, embedded, and indexed in an
//! in-memory flat vector index. A question is answered by embedding it,
//! retrieving the nearest segments, and prompting a generative model with
//! those segments as context.

pub mod core;
pub mod llm;
pub mod logging;
pub mod pdf;
pub mod questions;
pub mod rag;
pub mod repl;
