//! Axum route handler for the Optimize API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;
use tracing::{debug, info, info_span, Instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::DocumentFormat;
use crate::optimize::optimizer::optimize_resume;
use crate::optimize::upload::{ScratchDir, UploadedFile};
use crate::state::AppState;

pub const RESUME_FIELD: &str = "resume";
pub const JD_FIELD: &str = "jd";

#[derive(Debug, Serialize)]
pub struct OptimizeResponse {
    pub optimized_resume: String,
}

/// POST /api/optimize
///
/// Multipart form with two file fields, `resume` and `jd`. Both files are
/// stored in a per-request scratch directory, converted to text, and sent to
/// the completion API in one prompt.
pub async fn handle_optimize(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<OptimizeResponse>, AppError> {
    let request_id = Uuid::new_v4();
    run_optimize(state, multipart)
        .instrument(info_span!("optimize", %request_id))
        .await
}

async fn run_optimize(
    state: AppState,
    mut multipart: Multipart,
) -> Result<Json<OptimizeResponse>, AppError> {
    let mut resume: Option<UploadedFile> = None;
    let mut jd: Option<UploadedFile> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        let slot = match name.as_str() {
            RESUME_FIELD => &mut resume,
            JD_FIELD => &mut jd,
            _ => continue,
        };
        let file_name = field.file_name().unwrap_or_default().to_string();
        let data = field.bytes().await?;
        *slot = Some(UploadedFile {
            field: name,
            file_name,
            data,
        });
    }

    let resume = resume.ok_or_else(|| missing_field(RESUME_FIELD))?;
    let jd = jd.ok_or_else(|| missing_field(JD_FIELD))?;

    let scratch = ScratchDir::create(&state.config.scratch_dir)?;
    debug!("Scratch dir {}", scratch.path().display());
    let resume_path = scratch.persist(&resume).await?;
    let jd_path = scratch.persist(&jd).await?;

    info!(
        "Received resume '{}' ({:?}) and job description '{}' ({:?})",
        resume.file_name,
        DocumentFormat::from_path(&resume_path),
        jd.file_name,
        DocumentFormat::from_path(&jd_path),
    );

    let resume_text = state.extractors.extract_text(&resume_path).await;
    let jd_text = state.extractors.extract_text(&jd_path).await;

    info!(
        "Extracted {} resume chars and {} job description chars",
        resume_text.chars().count(),
        jd_text.chars().count()
    );

    let optimized_resume = optimize_resume(&state.llm, &resume_text, &jd_text).await?;

    Ok(Json(OptimizeResponse { optimized_resume }))
}

fn missing_field(field: &str) -> AppError {
    AppError::UnprocessableEntity(format!("Missing required file field '{field}'"))
}
