//! Axum route handlers for the Assessment API.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Json,
};
use uuid::Uuid;

use crate::assessment::service::{
    generate_quiz, submit_quiz, GenerateQuizRequest, GeneratedQuiz, QuizSubmission,
    SubmitQuizRequest,
};
use crate::errors::AppError;
use crate::state::AppState;

/// POST /api/v1/assessments
///
/// Generates a quiz for the requested skill, or for the user's largest skill gap.
pub async fn handle_generate_quiz(
    State(state): State<AppState>,
    body: Result<Json<GenerateQuizRequest>, JsonRejection>,
) -> Result<Json<GeneratedQuiz>, AppError> {
    let Json(request) = body?;
    let quiz = generate_quiz(
        state.store.as_ref(),
        state.question_generator.as_ref(),
        &state.catalog,
        state.config.quiz_question_count,
        request,
    )
    .await?;
    Ok(Json(quiz))
}

/// POST /api/v1/assessments/:id/submit
///
/// Scores the answers and adjusts the assessed skill's level.
pub async fn handle_submit_quiz(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<SubmitQuizRequest>, JsonRejection>,
) -> Result<Json<QuizSubmission>, AppError> {
    let Path(quiz_id) = path?;
    let Json(request) = body?;
    let submission = submit_quiz(state.store.as_ref(), quiz_id, request).await?;
    Ok(Json(submission))
}
