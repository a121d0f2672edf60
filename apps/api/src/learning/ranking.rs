//! Recommendation ranking: turns skill gaps into an ordered list of learning modules.

use serde::{Deserialize, Serialize};

use crate::skills::gaps::SkillGap;

/// Points awarded for completing any recommended module.
pub const MODULE_COMPLETION_POINTS: u32 = 50;

/// A placeholder learning module derived from an unmet skill gap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedModule {
    pub skill: String,
    pub module_name: String,
    pub description: String,
    pub points_for_completion: u32,
    pub gap_percent: f64,
}

impl RecommendedModule {
    fn from_gap(gap: &SkillGap) -> Self {
        Self {
            skill: gap.skill.clone(),
            module_name: module_name_for(&gap.skill),
            description: format!(
                "Learn the core concepts and practices of {}.",
                gap.skill
            ),
            points_for_completion: MODULE_COMPLETION_POINTS,
            gap_percent: gap.gap_percent,
        }
    }
}

pub fn module_name_for(skill: &str) -> String {
    format!("{skill} Fundamentals")
}

/// Keeps gaps above 0%, largest first. Equal gaps keep their input order.
pub fn rank(gaps: &[SkillGap]) -> Vec<RecommendedModule> {
    let mut open: Vec<&SkillGap> = gaps.iter().filter(|g| g.gap_percent > 0.0).collect();
    // sort_by is stable
    open.sort_by(|a, b| b.gap_percent.total_cmp(&a.gap_percent));
    open.into_iter().map(RecommendedModule::from_gap).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skills::benchmark::RoleBenchmark;
    use crate::skills::gaps::compute_gaps;
    use crate::skills::skill::SkillRating;

    fn gap(skill: &str, gap_percent: f64) -> SkillGap {
        SkillGap {
            skill: skill.to_string(),
            required: 5,
            user: 0,
            gap_percent,
        }
    }

    #[test]
    fn test_zero_gaps_are_excluded() {
        let ranked = rank(&[gap("HTML", 0.0), gap("CSS", 40.0)]);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].skill, "CSS");
    }

    #[test]
    fn test_sorted_descending() {
        let ranked = rank(&[gap("A", 20.0), gap("B", 80.0), gap("C", 50.0)]);
        let skills: Vec<_> = ranked.iter().map(|m| m.skill.as_str()).collect();
        assert_eq!(skills, vec!["B", "C", "A"]);
        assert!(ranked
            .windows(2)
            .all(|w| w[0].gap_percent >= w[1].gap_percent));
    }

    #[test]
    fn test_ties_keep_input_order() {
        let ranked = rank(&[
            gap("First", 60.0),
            gap("Big", 90.0),
            gap("Second", 60.0),
            gap("Third", 60.0),
        ]);
        let skills: Vec<_> = ranked.iter().map(|m| m.skill.as_str()).collect();
        assert_eq!(skills, vec!["Big", "First", "Second", "Third"]);
    }

    #[test]
    fn test_module_naming_and_points() {
        let ranked = rank(&[gap("Statistics", 100.0)]);
        assert_eq!(ranked[0].module_name, "Statistics Fundamentals");
        assert_eq!(ranked[0].points_for_completion, 50);
        assert!(ranked[0].description.contains("Statistics"));
    }

    #[test]
    fn test_frontend_scenario_recommendations() {
        let benchmark = RoleBenchmark::new(
            "Frontend Developer",
            &[("HTML", 5), ("CSS", 5), ("JavaScript", 5), ("React", 4)],
        );
        let gaps = compute_gaps(&[SkillRating::new("React", 4)], &benchmark);
        let names: Vec<_> = rank(&gaps).into_iter().map(|m| m.module_name).collect();
        assert_eq!(
            names,
            vec![
                "HTML Fundamentals",
                "CSS Fundamentals",
                "JavaScript Fundamentals"
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(rank(&[]).is_empty());
    }
}
