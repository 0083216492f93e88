use std::path::Path;

use async_trait::async_trait;

use super::command::run_to_string;
use super::{ExtractionError, TextExtractor};

/// Legacy binary Word (`.doc`) extraction through an external converter
/// (`antiword` by default) that prints the document text to stdout.
pub struct LegacyDocExtractor {
    program: String,
}

impl LegacyDocExtractor {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

#[async_trait]
impl TextExtractor for LegacyDocExtractor {
    async fn extract(&self, path: &Path) -> Result<String, ExtractionError> {
        run_to_string(&self.program, [path.as_os_str()]).await
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_converter_stdout_is_the_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("old.doc");
        std::fs::write(&path, "converted body").unwrap();

        // `cat` stands in for a converter that prints the document text.
        let text = LegacyDocExtractor::new("cat").extract(&path).await.unwrap();
        assert_eq!(text, "converted body");
    }

    #[tokio::test]
    async fn test_converter_failure_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.doc");

        let err = LegacyDocExtractor::new("cat")
            .extract(&missing)
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractionError::CommandFailed { .. }));
    }
}
