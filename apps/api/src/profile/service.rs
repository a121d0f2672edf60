//! Profile lookup and updates.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::learning::progress::{WorkflowProgress, WorkflowStage};
use crate::models::profile::Profile;
use crate::profile::store::ProfileStore;
use crate::skills::benchmark::BenchmarkCatalog;
use crate::skills::skill::{SkillRating, SkillSet, DEFAULT_DECLARED_LEVEL, MAX_LEVEL};

/// Skills as submitted by the client: explicit ratings, or a comma-separated
/// list of names that all start at the default declared level.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SkillsInput {
    Ratings(Vec<SkillRating>),
    Names(String),
}

impl Default for SkillsInput {
    fn default() -> Self {
        SkillsInput::Ratings(Vec::new())
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub user_id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub skills: SkillsInput,
    #[serde(default)]
    pub target_role: String,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub profile: Profile,
    pub workflow: WorkflowProgress,
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        let workflow = profile.workflow_stage.into();
        Self { profile, workflow }
    }
}

pub async fn require_profile(store: &dyn ProfileStore, user_id: Uuid) -> Result<Profile, AppError> {
    store
        .get_profile(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No profile for user {user_id}")))
}

fn parse_skills(input: SkillsInput) -> Result<SkillSet, AppError> {
    match input {
        SkillsInput::Names(names) => Ok(SkillSet::from_names(&names, DEFAULT_DECLARED_LEVEL)),
        SkillsInput::Ratings(ratings) => {
            if let Some(bad) = ratings.iter().find(|r| r.level > MAX_LEVEL) {
                return Err(AppError::Validation(format!(
                    "Level for '{}' must be between 0 and {MAX_LEVEL}, got {}",
                    bad.name, bad.level
                )));
            }
            SkillSet::from_ratings(ratings).map_err(AppError::Validation)
        }
    }
}

/// Creates or replaces the user's skills, target role and email. Points,
/// completed modules and workflow progress carry over from the stored profile.
pub async fn update_profile(
    store: &dyn ProfileStore,
    catalog: &BenchmarkCatalog,
    req: UpdateProfileRequest,
) -> Result<Profile, AppError> {
    let skills = parse_skills(req.skills)?;

    let target_role = req.target_role.trim().to_string();
    if !target_role.is_empty() && catalog.get(&target_role).is_none() {
        return Err(AppError::Validation(format!(
            "Unknown target role '{target_role}'"
        )));
    }

    let mut profile = store
        .get_profile(req.user_id)
        .await?
        .unwrap_or_else(|| Profile::new(req.user_id));

    profile.skills = skills;
    profile.target_role = target_role;
    if let Some(email) = req.email.map(|e| e.trim().to_string()).filter(|e| !e.is_empty()) {
        profile.email = Some(email);
    }
    profile.advance_stage(WorkflowStage::AssessmentPending);
    profile.updated_at = Utc::now();

    store.save_profile(&profile).await?;
    info!(
        "Updated profile for user {}: {} skills, target role '{}'",
        profile.user_id,
        profile.skills.len(),
        profile.target_role
    );
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::memory::InMemoryProfileStore;

    fn request(user_id: Uuid, skills: serde_json::Value, role: &str) -> UpdateProfileRequest {
        serde_json::from_value(serde_json::json!({
            "user_id": user_id,
            "skills": skills,
            "target_role": role,
        }))
        .unwrap()
    }

    #[test]
    fn test_skills_input_accepts_both_shapes() {
        let uid = Uuid::new_v4();
        let list = request(uid, serde_json::json!([{"name": "Go", "level": 2}]), "");
        assert!(matches!(list.skills, SkillsInput::Ratings(ref r) if r.len() == 1));

        let names = request(uid, serde_json::json!("Go, Rust"), "");
        assert!(matches!(names.skills, SkillsInput::Names(_)));
    }

    #[tokio::test]
    async fn test_update_creates_profile_and_advances_stage() {
        let store = InMemoryProfileStore::new();
        let uid = Uuid::new_v4();
        let req = request(uid, serde_json::json!("HTML, CSS, html"), "Frontend Developer");

        let profile = update_profile(&store, &BenchmarkCatalog::default(), req)
            .await
            .unwrap();
        assert_eq!(profile.skills.len(), 2);
        assert_eq!(profile.skills.get("CSS").map(|r| r.level), Some(DEFAULT_DECLARED_LEVEL));
        assert_eq!(profile.workflow_stage, WorkflowStage::AssessmentPending);
        assert!(store.get_profile(uid).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_update_keeps_points_and_progress() {
        let store = InMemoryProfileStore::new();
        let uid = Uuid::new_v4();
        let mut existing = Profile::new(uid);
        existing.points = 150;
        existing.completed_modules.push("SQL Fundamentals".to_string());
        existing.workflow_stage = WorkflowStage::LearningInProgress;
        store.save_profile(&existing).await.unwrap();

        let req = request(uid, serde_json::json!([{"name": "SQL", "level": 4}]), "Data Scientist");
        let profile = update_profile(&store, &BenchmarkCatalog::default(), req)
            .await
            .unwrap();
        assert_eq!(profile.points, 150);
        assert_eq!(profile.completed_modules, vec!["SQL Fundamentals"]);
        assert_eq!(profile.workflow_stage, WorkflowStage::LearningInProgress);
    }

    #[tokio::test]
    async fn test_update_rejects_out_of_range_level() {
        let store = InMemoryProfileStore::new();
        let req = request(
            Uuid::new_v4(),
            serde_json::json!([{"name": "SQL", "level": 6}]),
            "",
        );
        let err = update_profile(&store, &BenchmarkCatalog::default(), req)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_rejects_duplicate_ratings() {
        let store = InMemoryProfileStore::new();
        let req = request(
            Uuid::new_v4(),
            serde_json::json!([{"name": "SQL", "level": 2}, {"name": "sql", "level": 3}]),
            "",
        );
        let err = update_profile(&store, &BenchmarkCatalog::default(), req)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_rejects_unknown_role() {
        let store = InMemoryProfileStore::new();
        let req = request(Uuid::new_v4(), serde_json::json!([]), "Astronaut");
        let err = update_profile(&store, &BenchmarkCatalog::default(), req)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_require_profile_missing() {
        let store = InMemoryProfileStore::new();
        let err = require_profile(&store, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
