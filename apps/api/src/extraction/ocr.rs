use std::ffi::OsString;
use std::path::Path;

use async_trait::async_trait;

use super::command::run_to_string;
use super::{ExtractionError, TextExtractor};

/// Image OCR via the `tesseract` CLI, writing recognised text to stdout.
pub struct OcrExtractor {
    program: String,
    lang: String,
}

impl OcrExtractor {
    pub fn new(program: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            lang: lang.into(),
        }
    }

    fn args(&self, path: &Path) -> Vec<OsString> {
        vec![
            path.as_os_str().to_os_string(),
            "stdout".into(),
            "-l".into(),
            self.lang.clone().into(),
        ]
    }
}

#[async_trait]
impl TextExtractor for OcrExtractor {
    async fn extract(&self, path: &Path) -> Result<String, ExtractionError> {
        run_to_string(&self.program, self.args(path)).await
    }
}
