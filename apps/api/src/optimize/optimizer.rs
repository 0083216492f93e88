//! Prompt construction and the completion call.

use tracing::info;

use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::optimize::prompts::OPTIMIZE_PROMPT_TEMPLATE;

/// Fills the optimization template with both extracted texts.
///
/// Substitution is positional rather than a chained `replace`, so placeholder
/// text that happens to appear inside the resume is left untouched.
pub fn build_prompt(resume_text: &str, jd_text: &str) -> String {
    let (head, rest) = OPTIMIZE_PROMPT_TEMPLATE
        .split_once("{resume_text}")
        .unwrap_or((OPTIMIZE_PROMPT_TEMPLATE, ""));
    let (middle, tail) = rest.split_once("{jd_text}").unwrap_or((rest, ""));

    let mut prompt =
        String::with_capacity(OPTIMIZE_PROMPT_TEMPLATE.len() + resume_text.len() + jd_text.len());
    prompt.push_str(head);
    prompt.push_str(resume_text);
    prompt.push_str(middle);
    prompt.push_str(jd_text);
    prompt.push_str(tail);
    prompt
}

/// Returns the model's optimized resume, verbatim.
pub async fn optimize_resume(
    llm: &LlmClient,
    resume_text: &str,
    jd_text: &str,
) -> Result<String, AppError> {
    let prompt = build_prompt(resume_text, jd_text);

    let optimized = llm.complete(&prompt).await?;

    info!(
        "Optimized resume received from {} ({} chars)",
        llm.model(),
        optimized.chars().count()
    );
    Ok(optimized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_build_prompt_layout() {
        let prompt = build_prompt("Jane Doe\nRust engineer", "Senior Rust role");
        assert_eq!(
            prompt,
            "\nOptimize the following resume based on the given job description.\n\
             \nResume:\nJane Doe\nRust engineer\n\
             \nJob Description:\nSenior Rust role\n\
             \nEnsure the resume is ATS optimized, keyword-rich, and condensed to one page.\n"
        );
    }

    #[test]
    fn test_placeholders_inside_inputs_are_not_expanded() {
        let prompt = build_prompt("literal {jd_text} in resume", "JD body");
        assert!(prompt.contains("Resume:\nliteral {jd_text} in resume\n"));
        assert!(prompt.contains("Job Description:\nJD body\n"));
    }

    #[test]
    fn test_inline_extraction_messages_pass_through() {
        let prompt = build_prompt(
            "Unsupported file extension: .odt",
            "Error extracting text from file /tmp/x/jd.pdf: PDF parse failed: eof",
        );
        assert!(prompt.contains("Unsupported file extension: .odt"));
        assert!(prompt.contains("PDF parse failed: eof"));
    }

    #[tokio::test]
    async fn test_optimize_resume_returns_completion_verbatim() {
        let server = MockServer::start().await;
        let expected_prompt = build_prompt("resume", "jd");

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(json!({
                "messages": [{"role": "system", "content": expected_prompt}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"content": "  OPTIMIZED\n\n"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let llm = LlmClient::new(Some("sk-test".to_string()), server.uri(), "gpt-4").unwrap();
        let out = optimize_resume(&llm, "resume", "jd").await.unwrap();
        assert_eq!(out, "  OPTIMIZED\n\n");
    }

    #[tokio::test]
    async fn test_completion_failure_is_llm_app_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let llm = LlmClient::new(Some("sk-test".to_string()), server.uri(), "gpt-4").unwrap();
        let err = optimize_resume(&llm, "resume", "jd").await.unwrap_err();
        assert!(matches!(err, AppError::Llm(_)));
        assert_eq!(err.status(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    }
}
