use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::core::errors::DocqaError;
use crate::pdf::PdfPage;

/// A chunk of document text carrying its provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    pub text: String,
    pub source: String,
    pub page: Option<u32>,
    pub section: Option<String>,
    pub chunk_index: usize,
}

/// Splits text into fixed-size segments with exact character overlap.
///
/// Windows advance by `size - overlap` characters, so consecutive
/// segments share exactly `overlap` characters. The final segment may be
/// shorter than `size`.
#[derive(Debug, Clone)]
pub struct Chunker {
    size: usize,
    overlap: usize,
}

static SECTION_HEADER: OnceLock<Regex> = OnceLock::new();

fn section_header_re() -> &'static Regex {
    SECTION_HEADER.get_or_init(|| {
        Regex::new(r"(?m)^##\s*SECTION:\s*(.+)$").expect("section header regex")
    })
}

impl Chunker {
    pub fn new(size: usize, overlap: usize) -> Result<Self, DocqaError> {
        if size == 0 {
            return Err(DocqaError::InvalidInput(
                "chunk size must be greater than zero".to_string(),
            ));
        }
        if overlap >= size {
            return Err(DocqaError::InvalidInput(format!(
                "chunk overlap ({}) must be smaller than chunk size ({})",
                overlap, size
            )));
        }
        Ok(Self { size, overlap })
    }

    /// Chunk a single text into overlapping segments.
    pub fn chunk(&self, text: &str, source: &str) -> Vec<Segment> {
        self.chunk_with_page(text, source, None, 0).0
    }

    /// Chunk pages independently, tagging each segment with its page
    /// number. Chunk indices run across the whole document.
    pub fn chunk_pages(&self, pages: &[PdfPage], source: &str) -> Vec<Segment> {
        let mut segments = Vec::new();
        let mut next_index = 0;
        for page in pages {
            let (mut page_segments, used) =
                self.chunk_with_page(&page.text, source, Some(page.number as u32), next_index);
            next_index += used;
            segments.append(&mut page_segments);
        }
        segments
    }

    fn chunk_with_page(
        &self,
        text: &str,
        source: &str,
        page: Option<u32>,
        start_index: usize,
    ) -> (Vec<Segment>, usize) {
        let chars: Vec<char> = text.chars().collect();
        if chars.is_empty() {
            return (Vec::new(), 0);
        }

        let step = (self.size - self.overlap).max(1);
        let mut segments = Vec::new();
        let mut start = 0;

        loop {
            let end = (start + self.size).min(chars.len());
            let chunk_text: String = chars[start..end].iter().collect();
            if !chunk_text.trim().is_empty() {
                segments.push(Segment {
                    text: chunk_text,
                    source: source.to_string(),
                    page,
                    section: None,
                    chunk_index: start_index + segments.len(),
                });
            }
            if end == chars.len() {
                break;
            }
            start += step;
        }

        let used = segments.len();
        (segments, used)
    }

    /// Chunk model-structured text by its `## SECTION:` delimiters.
    ///
    /// Each section body is chunked normally and its segments tagged with
    /// the section title. Returns an empty Vec (with a warning) when the
    /// text contains no delimiter at all.
    pub fn chunk_sections(&self, structured: &str, source: &str) -> Vec<Segment> {
        let sections = parse_sections(structured);
        if sections.is_empty() {
            tracing::warn!("structured output contains no section delimiters, skipping");
            return Vec::new();
        }

        let mut segments = Vec::new();
        let mut next_index = 0;
        for (title, body) in sections {
            let (page_segments, used) = self.chunk_with_page(&body, source, None, next_index);
            next_index += used;
            for mut segment in page_segments {
                segment.section = Some(title.clone());
                segments.push(segment);
            }
        }
        segments
    }
}

/// Parse `## SECTION: <title>` blocks out of model output. Sections with
/// empty bodies are dropped.
pub fn parse_sections(structured: &str) -> Vec<(String, String)> {
    let re = section_header_re();
    let mut sections = Vec::new();

    let headers: Vec<(usize, usize, String)> = re
        .captures_iter(structured)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let title = caps.get(1)?.as_str().trim().to_string();
            Some((whole.start(), whole.end(), title))
        })
        .collect();

    for (i, (_, body_start, title)) in headers.iter().enumerate() {
        let body_end = headers
            .get(i + 1)
            .map(|(next_start, _, _)| *next_start)
            .unwrap_or(structured.len());
        let body = structured[*body_start..body_end].trim();
        if !body.is_empty() {
            sections.push((title.clone(), body.to_string()));
        }
    }

    sections
}
