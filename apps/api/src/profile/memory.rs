use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::{Profile, QuizRecord};
use crate::profile::store::{PointsRow, ProfileStore};

/// Process-local store. Contents are lost on restart.
#[derive(Default)]
pub struct InMemoryProfileStore {
    profiles: RwLock<HashMap<Uuid, Profile>>,
    quizzes: RwLock<HashMap<Uuid, QuizRecord>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn get_profile(&self, user_id: Uuid) -> Result<Option<Profile>, AppError> {
        Ok(self.profiles.read().await.get(&user_id).cloned())
    }

    async fn save_profile(&self, profile: &Profile) -> Result<(), AppError> {
        self.profiles
            .write()
            .await
            .insert(profile.user_id, profile.clone());
        Ok(())
    }

    async fn top_points(&self, limit: usize) -> Result<Vec<PointsRow>, AppError> {
        let mut rows: Vec<PointsRow> = self
            .profiles
            .read()
            .await
            .values()
            .map(|p| (p.user_id, p.email.clone(), p.points))
            .collect();
        rows.sort_by(|a, b| b.2.cmp(&a.2).then_with(|| a.0.cmp(&b.0)));
        rows.truncate(limit);
        Ok(rows)
    }

    async fn save_quiz(&self, quiz: &QuizRecord) -> Result<(), AppError> {
        self.quizzes
            .write()
            .await
            .insert(quiz.quiz_id, quiz.clone());
        Ok(())
    }

    async fn get_quiz(&self, quiz_id: Uuid) -> Result<Option<QuizRecord>, AppError> {
        Ok(self.quizzes.read().await.get(&quiz_id).cloned())
    }

    async fn record_submission(
        &self,
        quiz_id: Uuid,
        score: i32,
        submitted_at: DateTime<Utc>,
        profile: &Profile,
    ) -> Result<bool, AppError> {
        // Both locks held so the quiz and the profile change together
        let mut quizzes = self.quizzes.write().await;
        let mut profiles = self.profiles.write().await;
        match quizzes.get_mut(&quiz_id) {
            Some(quiz) if quiz.submitted_at.is_none() => {
                quiz.score = Some(score);
                quiz.submitted_at = Some(submitted_at);
                profiles.insert(profile.user_id, profile.clone());
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
