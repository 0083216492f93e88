//! Text extraction. Maps an uploaded file to plain text based on its extension.
//!
//! Supported: `.txt`, `.pdf`, `.docx`, `.doc` (external converter),
//! `.png` / `.jpg` / `.jpeg` (OCR).
//!
//! `Extractors::extract_text` is the error boundary: it always returns a
//! `String`. Unsupported extensions and parser failures are reported inline as
//! text so one unreadable upload never fails the whole request.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};

pub mod command;
pub mod docx;
pub mod legacy_doc;
pub mod ocr;
pub mod pdf;
pub mod plain_text;

use crate::config::Config;

pub use docx::DocxExtractor;
pub use legacy_doc::LegacyDocExtractor;
pub use ocr::OcrExtractor;
pub use pdf::PdfExtractor;
pub use plain_text::PlainTextExtractor;

// ────────────────────────────────────────────────────────────────────────────
// Formats & errors
// ────────────────────────────────────────────────────────────────────────────

/// Source format, decided purely from the (lowercased) file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    PlainText,
    Pdf,
    Docx,
    LegacyDoc,
    Image,
    Unsupported,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> Self {
        match Self::extension(path).as_str() {
            ".txt" => DocumentFormat::PlainText,
            ".pdf" => DocumentFormat::Pdf,
            ".docx" => DocumentFormat::Docx,
            ".doc" => DocumentFormat::LegacyDoc,
            ".png" | ".jpg" | ".jpeg" => DocumentFormat::Image,
            _ => DocumentFormat::Unsupported,
        }
    }

    /// Lowercased extension including the leading dot, or `""` if there is none.
    pub fn extension(path: &Path) -> String {
        path.extension()
            .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
            .unwrap_or_default()
    }
}

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("PDF parse failed: {0}")]
    Pdf(String),

    #[error("DOCX parse failed: {0}")]
    Docx(String),

    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}: {stderr}")]
    CommandFailed {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("parser panicked: {0}")]
    Panicked(String),
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// One parser per supported format. Implementations may fail freely; the
/// dispatcher turns failures into inline text.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, path: &Path) -> Result<String, ExtractionError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Dispatcher
// ────────────────────────────────────────────────────────────────────────────

/// The extension → parser table. Carried in `AppState` behind an `Arc`.
#[derive(Clone)]
pub struct Extractors {
    pub plain_text: Arc<dyn TextExtractor>,
    pub pdf: Arc<dyn TextExtractor>,
    pub docx: Arc<dyn TextExtractor>,
    pub legacy_doc: Arc<dyn TextExtractor>,
    pub image: Arc<dyn TextExtractor>,
}

impl Extractors {
    pub fn from_config(config: &Config) -> Self {
        Self {
            plain_text: Arc::new(PlainTextExtractor),
            pdf: Arc::new(PdfExtractor),
            docx: Arc::new(DocxExtractor),
            legacy_doc: Arc::new(LegacyDocExtractor::new(config.doc_converter.clone())),
            image: Arc::new(OcrExtractor::new(
                config.tesseract_cmd.clone(),
                config.ocr_lang.clone(),
            )),
        }
    }

    pub fn for_format(&self, format: DocumentFormat) -> Option<&dyn TextExtractor> {
        let extractor = match format {
            DocumentFormat::PlainText => &self.plain_text,
            DocumentFormat::Pdf => &self.pdf,
            DocumentFormat::Docx => &self.docx,
            DocumentFormat::LegacyDoc => &self.legacy_doc,
            DocumentFormat::Image => &self.image,
            DocumentFormat::Unsupported => return None,
        };
        Some(extractor.as_ref())
    }

    /// Extracts text from `path`. Never fails.
    pub async fn extract_text(&self, path: &Path) -> String {
        let format = DocumentFormat::from_path(path);

        let Some(extractor) = self.for_format(format) else {
            let ext = DocumentFormat::extension(path);
            debug!("No extractor for {}", path.display());
            return format!("Unsupported file extension: {ext}");
        };

        match extractor.extract(path).await {
            Ok(text) => {
                debug!(
                    "Extracted {} chars from {} ({format:?})",
                    text.chars().count(),
                    path.display()
                );
                text
            }
            Err(e) => {
                warn!("Extraction failed for {}: {e}", path.display());
                format!("Error extracting text from file {}: {e}", path.display())
            }
        }
    }
}
