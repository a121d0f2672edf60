//! Profile store — the persistence collaborator for profiles and generated quizzes.
//!
//! Default: `PgProfileStore` (PostgreSQL via sqlx).
//! `InMemoryProfileStore` (see `memory.rs`) backs tests and runs without `DATABASE_URL`.
//!
//! `AppState` holds an `Arc<dyn ProfileStore>`, chosen at startup via config.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgExecutor;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::{Profile, ProfileRow, QuizRecord, QuizRow};

/// A leaderboard source row: user id, email, points.
pub type PointsRow = (Uuid, Option<String>, i64);

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get_profile(&self, user_id: Uuid) -> Result<Option<Profile>, AppError>;

    /// Inserts or fully replaces the profile for `profile.user_id`.
    async fn save_profile(&self, profile: &Profile) -> Result<(), AppError>;

    /// Highest-points profiles first, at most `limit`.
    async fn top_points(&self, limit: usize) -> Result<Vec<PointsRow>, AppError>;

    async fn save_quiz(&self, quiz: &QuizRecord) -> Result<(), AppError>;

    async fn get_quiz(&self, quiz_id: Uuid) -> Result<Option<QuizRecord>, AppError>;

    /// Records the score of an unsubmitted quiz and saves the updated profile
    /// as one unit: either both are written or neither is. Returns `false`
    /// when the quiz was already submitted (or does not exist), writing nothing.
    async fn record_submission(
        &self,
        quiz_id: Uuid,
        score: i32,
        submitted_at: DateTime<Utc>,
        profile: &Profile,
    ) -> Result<bool, AppError>;
}

pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn get_profile(&self, user_id: Uuid) -> Result<Option<Profile>, AppError> {
        let row: Option<ProfileRow> =
            sqlx::query_as("SELECT * FROM profiles WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(Profile::try_from)
            .transpose()
            .map_err(AppError::Internal)
    }

    async fn save_profile(&self, profile: &Profile) -> Result<(), AppError> {
        upsert_profile(&self.pool, profile).await?;
        debug!("Saved profile for user {}", profile.user_id);
        Ok(())
    }

    async fn top_points(&self, limit: usize) -> Result<Vec<PointsRow>, AppError> {
        let rows: Vec<PointsRow> = sqlx::query_as(
            "SELECT user_id, email, points FROM profiles ORDER BY points DESC, user_id ASC LIMIT $1",
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn save_quiz(&self, quiz: &QuizRecord) -> Result<(), AppError> {
        let questions = serde_json::to_value(&quiz.questions)
            .map_err(|e| AppError::Internal(e.into()))?;

        sqlx::query(
            r#"
            INSERT INTO quizzes
                (id, user_id, skill, topic, difficulty, question_kind, questions, score,
                 created_at, submitted_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(quiz.quiz_id)
        .bind(quiz.user_id)
        .bind(&quiz.skill)
        .bind(&quiz.topic)
        .bind(quiz.difficulty.as_str())
        .bind(quiz.kind.as_str())
        .bind(questions)
        .bind(quiz.score)
        .bind(quiz.created_at)
        .bind(quiz.submitted_at)
        .execute(&self.pool)
        .await?;

        debug!("Stored quiz {} for user {}", quiz.quiz_id, quiz.user_id);
        Ok(())
    }

    async fn get_quiz(&self, quiz_id: Uuid) -> Result<Option<QuizRecord>, AppError> {
        let row: Option<QuizRow> = sqlx::query_as("SELECT * FROM quizzes WHERE id = $1")
            .bind(quiz_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(QuizRecord::try_from)
            .transpose()
            .map_err(AppError::Internal)
    }

    async fn record_submission(
        &self,
        quiz_id: Uuid,
        score: i32,
        submitted_at: DateTime<Utc>,
        profile: &Profile,
    ) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        // Only the first submission matches `submitted_at IS NULL`
        let result = sqlx::query(
            "UPDATE quizzes SET score = $1, submitted_at = $2 WHERE id = $3 AND submitted_at IS NULL",
        )
        .bind(score)
        .bind(submitted_at)
        .bind(quiz_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() != 1 {
            tx.rollback().await?;
            return Ok(false);
        }

        upsert_profile(&mut *tx, profile).await?;
        tx.commit().await?;

        debug!("Recorded submission of quiz {quiz_id} for user {}", profile.user_id);
        Ok(true)
    }
}

async fn upsert_profile<'e, E>(executor: E, profile: &Profile) -> Result<(), AppError>
where
    E: PgExecutor<'e>,
{
    let skills =
        serde_json::to_value(&profile.skills).map_err(|e| AppError::Internal(e.into()))?;

    sqlx::query(
        r#"
        INSERT INTO profiles
            (user_id, email, skills, target_role, points, completed_modules,
             workflow_stage, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ON CONFLICT (user_id) DO UPDATE SET
            email = EXCLUDED.email,
            skills = EXCLUDED.skills,
            target_role = EXCLUDED.target_role,
            points = EXCLUDED.points,
            completed_modules = EXCLUDED.completed_modules,
            workflow_stage = EXCLUDED.workflow_stage,
            updated_at = EXCLUDED.updated_at
        "#,
    )
    .bind(profile.user_id)
    .bind(&profile.email)
    .bind(skills)
    .bind(&profile.target_role)
    .bind(profile.points)
    .bind(&profile.completed_modules)
    .bind(profile.workflow_stage.as_str())
    .bind(profile.updated_at)
    .execute(executor)
    .await?;
    Ok(())
}
