// Prompt template for resume optimization.

/// Sent as the single system message. Replace `{resume_text}` and `{jd_text}`.
pub const OPTIMIZE_PROMPT_TEMPLATE: &str = "
Optimize the following resume based on the given job description.

Resume:
{resume_text}

Job Description:
{jd_text}

Ensure the resume is ATS optimized, keyword-rich, and condensed to one page.
";
