use std::path::Path;

use async_trait::async_trait;

use super::{ExtractionError, TextExtractor};

/// Page-by-page PDF text extraction via `pdf-extract`.
///
/// Parsing is synchronous and may panic on malformed input, so it runs on the
/// blocking pool and a panic surfaces as `ExtractionError::Panicked`.
pub struct PdfExtractor;

#[async_trait]
impl TextExtractor for PdfExtractor {
    async fn extract(&self, path: &Path) -> Result<String, ExtractionError> {
        let bytes = tokio::fs::read(path).await?;

        let pages = tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem_by_pages(&bytes)
                .map_err(|e| ExtractionError::Pdf(e.to_string()))
        })
        .await
        .map_err(|e| ExtractionError::Panicked(e.to_string()))??;

        Ok(join_pages(pages))
    }
}

/// Concatenates pages in order, skipping pages that produced no text.
fn join_pages(pages: Vec<String>) -> String {
    pages.into_iter().filter(|p| !p.is_empty()).collect()
}
