use std::path::PathBuf;

use anyhow::{Context, Result};

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
///
/// `OPENAI_API_KEY` is deliberately optional: the service starts without it and
/// every optimize request then fails with a 500.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub model: String,
    pub scratch_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub doc_converter: String,
    pub tesseract_cmd: String,
    pub ocr_lang: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            openai_api_key: optional_env("OPENAI_API_KEY"),
            openai_base_url: env_or("OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL),
            model: env_or("OPENAI_MODEL", DEFAULT_MODEL),
            scratch_dir: optional_env("SCRATCH_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(std::env::temp_dir),
            max_upload_bytes: match optional_env("MAX_UPLOAD_BYTES") {
                Some(raw) => raw
                    .parse::<usize>()
                    .context("MAX_UPLOAD_BYTES must be a non-negative integer")?,
                None => DEFAULT_MAX_UPLOAD_BYTES,
            },
            doc_converter: env_or("DOC_CONVERTER", "antiword"),
            tesseract_cmd: env_or("TESSERACT_CMD", "tesseract"),
            ocr_lang: env_or("OCR_LANG", "eng"),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

/// Reads an env var, treating empty or whitespace-only values as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    optional_env(key).unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
pub(crate) fn test_config(openai_base_url: &str, api_key: Option<&str>) -> Config {
    Config {
        openai_api_key: api_key.map(String::from),
        openai_base_url: openai_base_url.to_string(),
        model: DEFAULT_MODEL.to_string(),
        scratch_dir: std::env::temp_dir(),
        max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        doc_converter: "antiword".to_string(),
        tesseract_cmd: "tesseract".to_string(),
        ocr_lang: "eng".to_string(),
        port: 0,
        rust_log: "info".to_string(),
    }
}
