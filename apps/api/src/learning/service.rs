//! Gap reports, recommendations, module completion and the leaderboard, resolved
//! against a stored profile.

use chrono::Utc;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::learning::leaderboard::{build_leaderboard, LeaderboardEntry};
use crate::learning::progress::{complete_module, ModuleCompletion, WorkflowProgress};
use crate::learning::ranking::{rank, RecommendedModule};
use crate::models::profile::Profile;
use crate::profile::service::require_profile;
use crate::profile::store::ProfileStore;
use crate::skills::benchmark::{BenchmarkCatalog, RoleBenchmark};
use crate::skills::gaps::{compute_gaps, SkillGap};

#[derive(Debug, Serialize)]
pub struct GapReport {
    pub target_role: String,
    pub gaps: Vec<SkillGap>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleStatus {
    NotStarted,
    Done,
}

#[derive(Debug, Serialize)]
pub struct ModuleView {
    #[serde(flatten)]
    pub module: RecommendedModule,
    pub status: ModuleStatus,
}

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub target_role: String,
    pub modules: Vec<ModuleView>,
}

#[derive(Debug, Serialize)]
pub struct ModuleCompletionResponse {
    pub module_name: String,
    #[serde(flatten)]
    pub completion: ModuleCompletion,
    pub workflow: WorkflowProgress,
}

/// The benchmark for the profile's target role. Unlike
/// `BenchmarkCatalog::gaps_for_role`, an unset or unknown role is an error here.
fn benchmark_for<'a>(
    catalog: &'a BenchmarkCatalog,
    profile: &Profile,
) -> Result<&'a RoleBenchmark, AppError> {
    if !profile.has_target_role() {
        return Err(AppError::Validation(
            "Set a target role in your profile to see skill gaps".to_string(),
        ));
    }
    catalog.get(&profile.target_role).ok_or_else(|| {
        AppError::NotFound(format!("Unknown target role '{}'", profile.target_role))
    })
}

pub fn gap_report(catalog: &BenchmarkCatalog, profile: &Profile) -> Result<GapReport, AppError> {
    let benchmark = benchmark_for(catalog, profile)?;
    Ok(GapReport {
        target_role: benchmark.role.clone(),
        gaps: compute_gaps(profile.skills.ratings(), benchmark),
    })
}

pub fn recommendations(
    catalog: &BenchmarkCatalog,
    profile: &Profile,
) -> Result<RecommendationsResponse, AppError> {
    let report = gap_report(catalog, profile)?;
    let modules = rank(&report.gaps)
        .into_iter()
        .map(|module| {
            let status = if profile.completed_modules.contains(&module.module_name) {
                ModuleStatus::Done
            } else {
                ModuleStatus::NotStarted
            };
            ModuleView { module, status }
        })
        .collect();
    Ok(RecommendationsResponse {
        target_role: report.target_role,
        modules,
    })
}

/// Completes a module from the user's current recommendations. Modules already
/// completed are accepted again without awarding more points.
pub async fn complete_module_for_user(
    store: &dyn ProfileStore,
    catalog: &BenchmarkCatalog,
    user_id: Uuid,
    module_name: &str,
) -> Result<ModuleCompletionResponse, AppError> {
    let mut profile = require_profile(store, user_id).await?;

    let already_done = profile.completed_modules.iter().any(|m| m == module_name);
    if !already_done {
        let offered = recommendations(catalog, &profile)?
            .modules
            .into_iter()
            .any(|m| m.module.module_name == module_name);
        if !offered {
            return Err(AppError::Validation(format!(
                "'{module_name}' is not one of your recommended modules"
            )));
        }
    }

    let completion = complete_module(&mut profile, module_name);
    if let ModuleCompletion::Awarded { points_awarded, total_points } = &completion {
        profile.updated_at = Utc::now();
        store.save_profile(&profile).await?;
        info!("User {user_id} completed '{module_name}': +{points_awarded} points ({total_points} total)");
    }

    Ok(ModuleCompletionResponse {
        module_name: module_name.to_string(),
        completion,
        workflow: profile.workflow_stage.into(),
    })
}

pub async fn leaderboard(
    store: &dyn ProfileStore,
    limit: usize,
) -> Result<Vec<LeaderboardEntry>, AppError> {
    let rows = store.top_points(limit).await?;
    Ok(build_leaderboard(rows, limit))
}
