//! Workflow stages and module completion (points and completed-module bookkeeping).

use serde::{Deserialize, Serialize};

use crate::learning::ranking::MODULE_COMPLETION_POINTS;
use crate::models::profile::Profile;

/// Coarse progress marker shown to the user. Declaration order is progression order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStage {
    #[default]
    ProfileLoaded,
    AssessmentPending,
    AssessmentCompleted,
    RecommendationsGenerated,
    LearningInProgress,
}

impl WorkflowStage {
    pub const ALL: [WorkflowStage; 5] = [
        WorkflowStage::ProfileLoaded,
        WorkflowStage::AssessmentPending,
        WorkflowStage::AssessmentCompleted,
        WorkflowStage::RecommendationsGenerated,
        WorkflowStage::LearningInProgress,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowStage::ProfileLoaded => "profile_loaded",
            WorkflowStage::AssessmentPending => "assessment_pending",
            WorkflowStage::AssessmentCompleted => "assessment_completed",
            WorkflowStage::RecommendationsGenerated => "recommendations_generated",
            WorkflowStage::LearningInProgress => "learning_in_progress",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|stage| stage.as_str() == s)
    }

    pub fn label(&self) -> &'static str {
        match self {
            WorkflowStage::ProfileLoaded => "Profile Loaded",
            WorkflowStage::AssessmentPending => "Assessment Pending",
            WorkflowStage::AssessmentCompleted => "Assessment Completed",
            WorkflowStage::RecommendationsGenerated => "Recommendations Generated",
            WorkflowStage::LearningInProgress => "Learning In Progress",
        }
    }

    pub fn progress_percent(&self) -> u8 {
        match self {
            WorkflowStage::ProfileLoaded => 0,
            WorkflowStage::AssessmentPending => 25,
            WorkflowStage::AssessmentCompleted => 50,
            WorkflowStage::RecommendationsGenerated => 75,
            WorkflowStage::LearningInProgress => 100,
        }
    }
}

/// Serializable progress summary for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowProgress {
    pub stage: WorkflowStage,
    pub label: &'static str,
    pub progress_percent: u8,
}

impl From<WorkflowStage> for WorkflowProgress {
    fn from(stage: WorkflowStage) -> Self {
        Self {
            stage,
            label: stage.label(),
            progress_percent: stage.progress_percent(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum ModuleCompletion {
    Awarded { points_awarded: u32, total_points: i64 },
    AlreadyCompleted { total_points: i64 },
}

/// Records `module_name` as completed and awards its points once.
/// A repeated completion changes nothing.
pub fn complete_module(profile: &mut Profile, module_name: &str) -> ModuleCompletion {
    if profile.completed_modules.iter().any(|m| m == module_name) {
        return ModuleCompletion::AlreadyCompleted {
            total_points: profile.points,
        };
    }
    profile.completed_modules.push(module_name.to_string());
    profile.points += i64::from(MODULE_COMPLETION_POINTS);
    profile.advance_stage(WorkflowStage::LearningInProgress);
    ModuleCompletion::Awarded {
        points_awarded: MODULE_COMPLETION_POINTS,
        total_points: profile.points,
    }
}
