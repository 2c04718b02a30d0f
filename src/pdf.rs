//! PDF text extraction.
//!
//! Thin wrapper over `pdf_oxide`: per-page markdown conversion, empty
//! pages skipped. Table and image extraction are deliberately not handled
//! here; this only feeds document text into the pipeline.

use std::path::Path;

use pdf_oxide::converters::ConversionOptions;

use crate::core::errors::DocqaError;

#[derive(Debug, Clone)]
pub struct PdfPage {
    pub number: usize,
    pub text: String,
}

fn conversion_options() -> ConversionOptions {
    ConversionOptions {
        include_images: false,
        ..ConversionOptions::default()
    }
}

/// Extract per-page text from a PDF file.
///
/// Fails early on a missing path, an unparseable document, or a document
/// with no extractable text at all.
pub fn extract_pages(path: &Path) -> Result<Vec<PdfPage>, DocqaError> {
    if !path.exists() {
        return Err(DocqaError::InvalidInput(format!(
            "file not found: {}",
            path.display()
        )));
    }

    let path_str = path.to_string_lossy();
    let mut doc = pdf_oxide::PdfDocument::open(path_str.as_ref())
        .map_err(|e| DocqaError::InvalidInput(format!("failed to open PDF: {}", e)))?;
    let page_count = doc
        .page_count()
        .map_err(|e| DocqaError::InvalidInput(format!("failed to read PDF: {}", e)))?;

    let options = conversion_options();
    let mut pages = Vec::new();

    for page_index in 0..page_count {
        let text = doc
            .to_markdown(page_index, &options)
            .map_err(|e| DocqaError::InvalidInput(format!("failed to read PDF: {}", e)))?;
        if !text.trim().is_empty() {
            pages.push(PdfPage {
                number: page_index + 1,
                text,
            });
        }
    }

    if pages.is_empty() {
        return Err(DocqaError::InvalidInput(
            "PDF has no extractable text".to_string(),
        ));
    }

    tracing::info!("extracted {} pages from {}", pages.len(), path.display());
    Ok(pages)
}

/// Join pages into a single document string with page separators.
pub fn join_pages(pages: &[PdfPage]) -> String {
    let parts: Vec<&str> = pages
        .iter()
        .map(|page| page.text.trim())
        .filter(|text| !text.is_empty())
        .collect();
    parts.join("\n\n---\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_skips_blank_pages_and_separates_the_rest() {
        let pages = vec![
            PdfPage {
                number: 1,
                text: "first page".to_string(),
            },
            PdfPage {
                number: 2,
                text: "   ".to_string(),
            },
            PdfPage {
                number: 3,
                text: "third page".to_string(),
            },
        ];

        let joined = join_pages(&pages);
        assert!(joined.contains("first page"));
        assert!(joined.contains("third page"));
        assert_eq!(joined.matches("---").count(), 1);
    }

    #[test]
    fn missing_file_is_invalid_input() {
        let result = extract_pages(Path::new("/nonexistent/file.pdf"));
        assert!(matches!(result, Err(DocqaError::InvalidInput(_))));
    }
}
