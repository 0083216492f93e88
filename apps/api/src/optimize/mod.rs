// Resume optimization: upload → scratch storage → text extraction → completion.
// The completion call goes through llm_client, never directly to the API.

pub mod handlers;
pub mod optimizer;
pub mod prompts;
pub mod upload;
