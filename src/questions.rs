//! Study-question generation.
//!
//! Walks a PDF page by page, picks representative text chunks, and asks
//! the chat model to write a question/answer pair for each. Output lands
//! next to the source file as `<stem>_QnA.txt`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::core::config::GenerationConfig;
use crate::core::errors::DocqaError;
use crate::llm::{ChatMessage, ChatRequest, LlmProvider};
use crate::pdf;

/// Chunks shorter than this are noise (page numbers, headers) and are
/// skipped.
pub const MIN_CHUNK_LENGTH: usize = 30;

const TUTOR_PROMPT: &str = "You are a tutor preparing study questions. Based only on \
the passage below, write one clear question and its answer. Respond in exactly this \
format:\nQ: <question>\nA: <answer>";

/// How many questions a document of `page_count` pages deserves. Small
/// documents get several per page, large ones taper off.
pub fn question_count(page_count: usize) -> usize {
    match page_count {
        0 => 0,
        1..=8 => page_count * 2,
        9..=15 => page_count,
        16..=49 => page_count / 2,
        50..=99 => page_count / 5,
        _ => (page_count / 5).min(20),
    }
}

/// Split text into sentences on `.`, `?` or `!` followed by whitespace.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        current.push(c);
        if matches!(c, '.' | '?' | '!') {
            if chars.peek().map(|n| n.is_whitespace()).unwrap_or(true) {
                let sentence = current.trim().to_string();
                if !sentence.is_empty() {
                    sentences.push(sentence);
                }
                current.clear();
            }
        }
    }

    let tail = current.trim().to_string();
    if !tail.is_empty() {
        sentences.push(tail);
    }
    sentences
}

/// Sentence-level chunks of a page, with fragments below
/// [`MIN_CHUNK_LENGTH`] dropped.
pub fn chunk_page_text(text: &str) -> Vec<String> {
    let mut chunks = Vec::new();
    for sentence in split_sentences(text) {
        let length = sentence.chars().count();
        if length < MIN_CHUNK_LENGTH {
            tracing::debug!("skipping short fragment ({} chars)", length);
            continue;
        }
        chunks.push(sentence);
    }
    chunks
}

/// Pick up to `count` chunks spread evenly across the list.
fn select_chunks(chunks: &[String], count: usize) -> Vec<String> {
    if chunks.is_empty() || count == 0 {
        return Vec::new();
    }
    if chunks.len() <= count {
        return chunks.to_vec();
    }

    (0..count)
        .map(|i| chunks[i * chunks.len() / count].clone())
        .collect()
}

pub struct QuestionGenerator {
    provider: Arc<dyn LlmProvider>,
    model: String,
    generation: GenerationConfig,
}

impl QuestionGenerator {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        model: String,
        generation: GenerationConfig,
    ) -> Self {
        Self {
            provider,
            model,
            generation,
        }
    }

    /// Generate questions for one PDF and write them to `<stem>_QnA.txt`
    /// next to it. Individual chunk failures are recorded inline so one
    /// bad model call does not lose the rest of the file.
    pub async fn generate_for_file(&self, path: &Path) -> Result<PathBuf, DocqaError> {
        let pages = pdf::extract_pages(path)?;
        let target = question_count(pages.len());

        let chunks: Vec<String> = pages
            .iter()
            .flat_map(|page| chunk_page_text(&page.text))
            .collect();
        if chunks.is_empty() {
            return Err(DocqaError::InvalidInput(format!(
                "no usable text chunks in {}",
                path.display()
            )));
        }

        let selected = select_chunks(&chunks, target);
        tracing::info!(
            "generating {} questions for {} ({} pages)",
            selected.len(),
            path.display(),
            pages.len()
        );

        let output = self.generate_pairs(&selected).await;
        let out_path = qna_path(path);
        std::fs::write(&out_path, output)?;
        tracing::info!("wrote {}", out_path.display());
        Ok(out_path)
    }

    /// Run the tutor prompt over each chunk and collect the numbered
    /// question blocks. A failed or empty model call becomes an inline
    /// `[Error]` marker; the remaining chunks are still processed.
    pub async fn generate_pairs(&self, chunks: &[String]) -> String {
        let mut output = String::new();

        for (i, chunk) in chunks.iter().enumerate() {
            let prompt = format!("{}\n\nPassage:\n{}", TUTOR_PROMPT, chunk);
            let request =
                ChatRequest::new(vec![ChatMessage::user(prompt)]).with_generation(&self.generation);

            match self.provider.chat(request, &self.model).await {
                Ok(pair) if !pair.trim().is_empty() => {
                    output.push_str(&format!("--- Question {} ---\n", i + 1));
                    output.push_str(pair.trim());
                    output.push_str("\n\n");
                }
                Ok(_) => {
                    tracing::warn!("empty model output for chunk {}", i + 1);
                    output.push_str(&format!(
                        "--- Question {} ---\n[Error] model returned no output\n\n",
                        i + 1
                    ));
                }
                Err(e) => {
                    tracing::warn!("question generation failed for chunk {}: {}", i + 1, e);
                    output.push_str(&format!("--- Question {} ---\n[Error] {}\n\n", i + 1, e));
                }
            }
        }

        output
    }
}

fn qna_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "document".to_string());
    path.with_file_name(format!("{}_QnA.txt", stem))
}

/// Collect the PDF paths under `path`: the file itself, or every `.pdf`
/// directly inside it when it is a directory.
pub fn collect_pdfs(path: &Path) -> Result<Vec<PathBuf>, DocqaError> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.is_dir() {
        return Err(DocqaError::InvalidInput(format!(
            "path not found: {}",
            path.display()
        )));
    }

    let mut pdfs = Vec::new();
    for entry in std::fs::read_dir(path)? {
        let entry = entry?;
        let entry_path = entry.path();
        let is_pdf = entry_path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("pdf"))
            .unwrap_or(false);
        if entry_path.is_file() && is_pdf {
            pdfs.push(entry_path);
        }
    }
    pdfs.sort();

    if pdfs.is_empty() {
        return Err(DocqaError::InvalidInput(format!(
            "no PDF files in {}",
            path.display()
        )));
    }
    Ok(pdfs)
}
