use anyhow::{anyhow, Context};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use crate::assessment::questions::{Difficulty, Question, QuestionKind};
use crate::learning::progress::WorkflowStage;
use crate::skills::skill::SkillSet;

/// A user's profile as held by the profile store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub skills: SkillSet,
    pub target_role: String,
    pub points: i64,
    pub completed_modules: Vec<String>,
    pub workflow_stage: WorkflowStage,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    pub fn new(user_id: Uuid) -> Self {
        Self {
            user_id,
            email: None,
            skills: SkillSet::default(),
            target_role: String::new(),
            points: 0,
            completed_modules: Vec::new(),
            workflow_stage: WorkflowStage::default(),
            updated_at: Utc::now(),
        }
    }

    /// Moves the workflow forward to `stage`. Never moves backwards.
    pub fn advance_stage(&mut self, stage: WorkflowStage) {
        if stage > self.workflow_stage {
            self.workflow_stage = stage;
        }
    }

    pub fn has_target_role(&self) -> bool {
        !self.target_role.trim().is_empty()
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct ProfileRow {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub skills: Value,
    pub target_role: String,
    pub points: i64,
    pub completed_modules: Vec<String>,
    pub workflow_stage: String,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ProfileRow> for Profile {
    type Error = anyhow::Error;

    fn try_from(row: ProfileRow) -> Result<Self, Self::Error> {
        let skills: SkillSet = serde_json::from_value(row.skills)
            .with_context(|| format!("Malformed skills for user {}", row.user_id))?;
        let workflow_stage = WorkflowStage::parse(&row.workflow_stage)
            .ok_or_else(|| anyhow!("Unknown workflow stage '{}'", row.workflow_stage))?;
        Ok(Profile {
            user_id: row.user_id,
            email: row.email,
            skills,
            target_role: row.target_role,
            points: row.points,
            completed_modules: row.completed_modules,
            workflow_stage,
            updated_at: row.updated_at,
        })
    }
}

/// A generated quiz, stored until (and after) it is submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizRecord {
    pub quiz_id: Uuid,
    pub user_id: Uuid,
    /// Skill whose level the quiz adjusts; `None` for general quizzes.
    pub skill: Option<String>,
    pub topic: String,
    pub difficulty: Difficulty,
    pub kind: QuestionKind,
    pub questions: Vec<Question>,
    pub score: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub submitted_at: Option<DateTime<Utc>>,
}

impl QuizRecord {
    pub fn is_submitted(&self) -> bool {
        self.submitted_at.is_some()
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct QuizRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub skill: Option<String>,
    pub topic: String,
    pub difficulty: String,
    pub question_kind: String,
    pub questions: Value,
    pub score: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub submitted_at: Option<DateTime<Utc>>,
}

impl TryFrom<QuizRow> for QuizRecord {
    type Error = anyhow::Error;

    fn try_from(row: QuizRow) -> Result<Self, Self::Error> {
        Ok(QuizRecord {
            quiz_id: row.id,
            user_id: row.user_id,
            skill: row.skill,
            topic: row.topic,
            difficulty: serde_json::from_value(Value::String(row.difficulty))
                .context("Malformed quiz difficulty")?,
            kind: serde_json::from_value(Value::String(row.question_kind))
                .context("Malformed quiz question kind")?,
            questions: serde_json::from_value(row.questions)
                .with_context(|| format!("Malformed questions for quiz {}", row.id))?,
            score: row.score,
            created_at: row.created_at,
            submitted_at: row.submitted_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(stage: &str, skills: Value) -> ProfileRow {
        ProfileRow {
            user_id: Uuid::new_v4(),
            email: Some("dev@example.com".to_string()),
            skills,
            target_role: "Data Scientist".to_string(),
            points: 100,
            completed_modules: vec!["R Fundamentals".to_string()],
            workflow_stage: stage.to_string(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_profile_row_converts() {
        let profile =
            Profile::try_from(row("assessment_pending", json!([{"name": "R", "level": 2}])))
                .unwrap();
        assert_eq!(profile.skills.get("r").map(|r| r.level), Some(2));
        assert_eq!(profile.workflow_stage, WorkflowStage::AssessmentPending);
    }

    #[test]
    fn test_profile_row_rejects_unknown_stage() {
        assert!(Profile::try_from(row("done", json!([]))).is_err());
    }

    #[test]
    fn test_profile_row_rejects_malformed_skills() {
        assert!(Profile::try_from(row("profile_loaded", json!({"R": 2}))).is_err());
    }

    #[test]
    fn test_advance_stage_never_goes_back() {
        let mut profile = Profile::new(Uuid::new_v4());
        profile.advance_stage(WorkflowStage::RecommendationsGenerated);
        profile.advance_stage(WorkflowStage::AssessmentPending);
        assert_eq!(
            profile.workflow_stage,
            WorkflowStage::RecommendationsGenerated
        );
    }

    #[test]
    fn test_quiz_row_converts() {
        let row = QuizRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            skill: Some("SQL".to_string()),
            topic: "SQL".to_string(),
            difficulty: "hard".to_string(),
            question_kind: "mixed".to_string(),
            questions: json!([{"type": "mcq", "question": "q", "correct_answer": "a"}]),
            score: None,
            created_at: Utc::now(),
            submitted_at: None,
        };
        let quiz = QuizRecord::try_from(row).unwrap();
        assert_eq!(quiz.difficulty, Difficulty::Hard);
        assert_eq!(quiz.kind, QuestionKind::Mixed);
        assert_eq!(quiz.questions.len(), 1);
        assert!(!quiz.is_submitted());
    }
}
