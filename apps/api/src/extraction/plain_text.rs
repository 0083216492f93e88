use std::path::Path;

use async_trait::async_trait;

use super::{ExtractionError, TextExtractor};

/// `.txt` passthrough. The file must be valid UTF-8; `\r\n` and lone `\r`
/// line endings are normalized to `\n`.
pub struct PlainTextExtractor;

#[async_trait]
impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String, ExtractionError> {
        let bytes = tokio::fs::read(path).await?;
        let text = String::from_utf8(bytes)?;
        Ok(normalize_newlines(text))
    }
}

fn normalize_newlines(text: String) -> String {
    if !text.contains('\r') {
        return text;
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}
