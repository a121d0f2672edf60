//! Assessment orchestration: choose a topic, generate and store a quiz, then
//! score its submission and move the assessed skill.
//!
//! All persistence goes through `ProfileStore`; all question sourcing through
//! `QuestionGenerator`.

use std::collections::BTreeMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::assessment::generator::{QuestionGenerator, QuizPlan};
use crate::assessment::questions::{Answer, Difficulty, QuestionKind, QuestionView};
use crate::assessment::scoring::{score_quiz, QuizResult};
use crate::errors::AppError;
use crate::learning::progress::{WorkflowProgress, WorkflowStage};
use crate::learning::ranking::rank;
use crate::models::profile::{Profile, QuizRecord};
use crate::profile::store::ProfileStore;
use crate::skills::benchmark::BenchmarkCatalog;
use crate::skills::skill::LevelChange;

/// Topic used when neither an explicit skill nor an open gap is available.
pub const GENERAL_TOPIC: &str = "general software development";

/// Upper bound on questions per quiz, whatever the request asks for.
pub const MAX_QUESTIONS_PER_QUIZ: usize = 50;

#[derive(Debug, Deserialize)]
pub struct GenerateQuizRequest {
    pub user_id: Uuid,
    /// Skill to assess. When absent the user's largest skill gap is used.
    #[serde(default)]
    pub skill: Option<String>,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub kind: QuestionKind,
    #[serde(default)]
    pub count: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct GeneratedQuiz {
    pub quiz_id: Uuid,
    pub skill: Option<String>,
    pub topic: String,
    pub difficulty: Difficulty,
    pub kind: QuestionKind,
    pub generator_backend: String,
    pub questions: Vec<QuestionView>,
}

#[derive(Debug, Deserialize)]
pub struct SubmitQuizRequest {
    pub user_id: Uuid,
    /// Answers keyed by zero-based question index.
    #[serde(default)]
    pub answers: BTreeMap<usize, Answer>,
}

#[derive(Debug, Serialize)]
pub struct QuizSubmission {
    pub quiz_id: Uuid,
    pub result: QuizResult,
    pub percentage: f64,
    pub passed: bool,
    pub skill: Option<String>,
    pub level_change: Option<LevelChange>,
    pub workflow: WorkflowProgress,
}

/// Picks what the quiz is about: the requested skill, else the user's largest
/// open gap, else the general topic.
pub fn choose_topic(
    requested: Option<&str>,
    profile: Option<&Profile>,
    catalog: &BenchmarkCatalog,
) -> (Option<String>, bool) {
    if let Some(skill) = requested.map(str::trim).filter(|s| !s.is_empty()) {
        return (Some(skill.to_string()), false);
    }
    let top_gap = profile.and_then(|p| {
        let gaps = catalog.gaps_for_role(p.skills.ratings(), &p.target_role);
        rank(&gaps).into_iter().next().map(|m| m.skill)
    });
    match top_gap {
        Some(skill) => (Some(skill), true),
        None => (None, false),
    }
}

pub async fn generate_quiz(
    store: &dyn ProfileStore,
    generator: &dyn QuestionGenerator,
    catalog: &BenchmarkCatalog,
    default_count: usize,
    request: GenerateQuizRequest,
) -> Result<GeneratedQuiz, AppError> {
    let count = request.count.unwrap_or(default_count);
    if count == 0 || count > MAX_QUESTIONS_PER_QUIZ {
        return Err(AppError::Validation(format!(
            "count must be between 1 and {MAX_QUESTIONS_PER_QUIZ}"
        )));
    }

    let profile = store.get_profile(request.user_id).await?;
    if profile.is_none() && request.skill.as_deref().map_or(true, |s| s.trim().is_empty()) {
        return Err(AppError::Validation(
            "Provide a skill to assess or set up a profile first".to_string(),
        ));
    }

    let (skill, targets_gap) = choose_topic(request.skill.as_deref(), profile.as_ref(), catalog);
    let topic = skill.clone().unwrap_or_else(|| GENERAL_TOPIC.to_string());

    let plan = QuizPlan {
        topic: topic.clone(),
        difficulty: request.difficulty,
        kind: request.kind,
        count,
        targets_gap,
    };
    let generated = generator.generate(&plan).await?;
    if generated.questions.is_empty() {
        return Err(AppError::Llm(format!("No questions generated for '{topic}'")));
    }

    let quiz = QuizRecord {
        quiz_id: Uuid::new_v4(),
        user_id: request.user_id,
        skill,
        topic,
        difficulty: request.difficulty,
        kind: request.kind,
        questions: generated.questions,
        score: None,
        created_at: Utc::now(),
        submitted_at: None,
    };
    store.save_quiz(&quiz).await?;

    if let Some(mut profile) = profile {
        profile.advance_stage(WorkflowStage::AssessmentCompleted);
        profile.updated_at = Utc::now();
        store.save_profile(&profile).await?;
    }

    info!(
        "Quiz {} generated for user {} on '{}' ({} questions, {})",
        quiz.quiz_id,
        quiz.user_id,
        quiz.topic,
        quiz.questions.len(),
        generated.backend
    );

    Ok(GeneratedQuiz {
        quiz_id: quiz.quiz_id,
        questions: quiz.questions.iter().map(|q| q.to_view()).collect(),
        skill: quiz.skill,
        topic: quiz.topic,
        difficulty: quiz.difficulty,
        kind: quiz.kind,
        generator_backend: generated.backend.to_string(),
    })
}

pub async fn submit_quiz(
    store: &dyn ProfileStore,
    quiz_id: Uuid,
    request: SubmitQuizRequest,
) -> Result<QuizSubmission, AppError> {
    let quiz = store
        .get_quiz(quiz_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Quiz {quiz_id} not found")))?;

    if quiz.user_id != request.user_id {
        return Err(AppError::Forbidden);
    }
    if quiz.is_submitted() {
        return Err(AppError::Conflict(format!("Quiz {quiz_id} was already submitted")));
    }

    let result = score_quiz(&quiz.questions, &request.answers);
    let score = i32::try_from(result.score).unwrap_or(i32::MAX);
    let passed = result.passed();

    let mut profile = store
        .get_profile(request.user_id)
        .await?
        .unwrap_or_else(|| Profile::new(request.user_id));

    let level_change = quiz
        .skill
        .as_deref()
        .map(|skill| profile.skills.apply_assessment(skill, passed));
    profile.advance_stage(WorkflowStage::RecommendationsGenerated);
    profile.updated_at = Utc::now();

    // The quiz is only used up together with the profile write
    if !store
        .record_submission(quiz_id, score, profile.updated_at, &profile)
        .await?
    {
        return Err(AppError::Conflict(format!("Quiz {quiz_id} was already submitted")));
    }

    info!(
        "Quiz {quiz_id} submitted by user {}: {}/{} ({})",
        request.user_id,
        result.score,
        result.total,
        if passed { "passed" } else { "failed" }
    );

    Ok(QuizSubmission {
        quiz_id,
        percentage: result.percentage(),
        passed,
        result,
        skill: quiz.skill,
        level_change,
        workflow: profile.workflow_stage.into(),
    })
}
