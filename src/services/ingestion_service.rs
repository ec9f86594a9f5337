use std::sync::Arc;

use lopdf::Document;

use crate::constants::prompts::document_header;
use crate::errors::AppResult;
use crate::models::domain::UploadedDocument;

/// Per-page text extraction. A page without extractable text yields an empty string.
pub trait PageTextExtractor: Send + Sync {
    fn extract_pages(&self, name: &str, bytes: &[u8]) -> AppResult<Vec<String>>;
}

pub struct LopdfExtractor;

impl PageTextExtractor for LopdfExtractor {
    fn extract_pages(&self, name: &str, bytes: &[u8]) -> AppResult<Vec<String>> {
        let document = Document::load_mem(bytes).map_err(|e| {
            log::warn!("Could not load PDF '{}': {}", name, e);
            e
        })?;

        let pages = document.get_pages();
        log::debug!("Extracting {} pages from '{}'", pages.len(), name);

        Ok(pages
            .keys()
            .map(|page_number| match document.extract_text(&[*page_number]) {
                Ok(text) => text,
                Err(e) => {
                    log::warn!(
                        "No extractable text on page {} of '{}': {}",
                        page_number,
                        name,
                        e
                    );
                    String::new()
                }
            })
            .collect())
    }
}

/// Concatenates the text of every uploaded PDF, in upload order.
#[derive(Clone)]
pub struct IngestionService {
    extractor: Arc<dyn PageTextExtractor>,
    tag_documents: bool,
}

impl IngestionService {
    pub fn new(extractor: Arc<dyn PageTextExtractor>, tag_documents: bool) -> Self {
        Self {
            extractor,
            tag_documents,
        }
    }

    pub fn ingest(&self, documents: &[UploadedDocument]) -> AppResult<String> {
        let mut text = String::new();

        for (idx, document) in documents.iter().enumerate() {
            if self.tag_documents {
                text.push_str(&document_header(idx + 1, &document.name));
            }
            for page in self.extractor.extract_pages(&document.name, &document.bytes)? {
                text.push_str(&page);
            }
        }

        log::info!(
            "Ingested {} documents into {} chars",
            documents.len(),
            text.chars().count()
        );
        Ok(text)
    }

    /// Runs `ingest` on the blocking pool; PDF parsing is CPU bound.
    pub async fn ingest_blocking(&self, documents: Vec<UploadedDocument>) -> AppResult<String> {
        let service = self.clone();
        tokio::task::spawn_blocking(move || service.ingest(&documents)).await?
    }
}

/// First `budget` characters of `text`, never splitting a character.
pub fn truncate_chars(text: &str, budget: usize) -> &str {
    match text.char_indices().nth(budget) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}
