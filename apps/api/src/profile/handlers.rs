use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::{JsonRejection, QueryRejection},
        Multipart, Query, State,
    },
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::profile::extract::{extract_skills, pdf_text, validate_upload};
use crate::profile::service::{require_profile, update_profile, ProfileResponse, UpdateProfileRequest};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Serialize)]
pub struct ExtractedSkillsResponse {
    pub skills: Vec<String>,
}

/// GET /api/v1/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    query: Result<Query<UserIdQuery>, QueryRejection>,
) -> Result<Json<ProfileResponse>, AppError> {
    let Query(params) = query?;
    let profile = require_profile(state.store.as_ref(), params.user_id).await?;
    Ok(Json(profile.into()))
}

/// PUT /api/v1/profile
pub async fn handle_update_profile(
    State(state): State<AppState>,
    body: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> Result<Json<ProfileResponse>, AppError> {
    let Json(req) = body?;
    let profile = update_profile(state.store.as_ref(), &state.catalog, req).await?;
    Ok(Json(profile.into()))
}

/// POST /api/v1/profile/extract-skills
///
/// Multipart upload with the resume PDF in the `resume` field. Returns skill
/// names only; the client decides which to keep and rates them via PUT.
pub async fn handle_extract_skills(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ExtractedSkillsResponse>, AppError> {
    let llm = state.llm.as_ref().ok_or_else(|| {
        AppError::Unavailable("Skill extraction requires an LLM API key".to_string())
    })?;
    let mut multipart = multipart?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some("resume") {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Could not read upload: {e}")))?;
        upload = Some((file_name, data));
        break;
    }

    let (file_name, data) =
        upload.ok_or_else(|| AppError::Validation("No resume file provided".to_string()))?;
    validate_upload(file_name.as_deref(), &data)?;

    let text = pdf_text(data).await?;
    let skills = extract_skills(llm, &text).await?;
    Ok(Json(ExtractedSkillsResponse { skills }))
}
