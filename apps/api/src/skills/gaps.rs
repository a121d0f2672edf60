//! Skill gap calculation: how far a user's ratings fall short of a role benchmark.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::skills::benchmark::RoleBenchmark;
use crate::skills::skill::{SkillKey, SkillRating};

/// Shortfall for one benchmark skill. `gap_percent` is in 0.0..=100.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillGap {
    pub skill: String,
    pub required: u8,
    pub user: u8,
    pub gap_percent: f64,
}

/// Computes one gap per benchmark skill, in benchmark order.
///
/// User ratings are matched by case-insensitive name; a skill the user has not
/// rated counts as level 0. Levels above the requirement give a 0% gap.
pub fn compute_gaps(user_skills: &[SkillRating], benchmark: &RoleBenchmark) -> Vec<SkillGap> {
    let mut levels: HashMap<SkillKey, u8> = HashMap::with_capacity(user_skills.len());
    for rating in user_skills {
        levels.entry(rating.key()).or_insert(rating.level);
    }

    benchmark
        .requirements()
        .map(|(skill, required)| {
            let user = levels.get(&SkillKey::new(skill)).copied().unwrap_or(0);
            SkillGap {
                skill: skill.to_string(),
                required,
                user,
                gap_percent: gap_percent(required, user),
            }
        })
        .collect()
}

fn gap_percent(required: u8, user: u8) -> f64 {
    if required == 0 {
        return 0.0;
    }
    let required = f64::from(required);
    ((required - f64::from(user)) / required * 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frontend() -> RoleBenchmark {
        RoleBenchmark::new(
            "Frontend Developer",
            &[("HTML", 5), ("CSS", 5), ("JavaScript", 5), ("React", 4)],
        )
    }

    #[test]
    fn test_empty_user_skills_gives_full_gaps() {
        let gaps = compute_gaps(&[], &frontend());
        assert_eq!(gaps.len(), 4);
        for gap in &gaps {
            assert_eq!(gap.user, 0);
            assert_eq!(gap.gap_percent, 100.0);
        }
    }

    #[test]
    fn test_met_requirement_gives_zero_gap() {
        let gaps = compute_gaps(&[SkillRating::new("React", 4)], &frontend());
        let react = gaps.iter().find(|g| g.skill == "React").unwrap();
        assert_eq!(react.user, 4);
        assert_eq!(react.gap_percent, 0.0);
    }

    #[test]
    fn test_exceeding_requirement_clamps_to_zero() {
        let benchmark = RoleBenchmark::new("Backend Developer", &[("Cloud", 3)]);
        let gaps = compute_gaps(&[SkillRating::new("Cloud", 5)], &benchmark);
        assert_eq!(gaps[0].gap_percent, 0.0);
    }

    #[test]
    fn test_partial_gap_percentage() {
        let benchmark = RoleBenchmark::new("Data Scientist", &[("SQL", 4)]);
        let gaps = compute_gaps(&[SkillRating::new("SQL", 1)], &benchmark);
        assert!((gaps[0].gap_percent - 75.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_matching_ignores_case() {
        let gaps = compute_gaps(&[SkillRating::new("javascript", 5)], &frontend());
        let js = gaps.iter().find(|g| g.skill == "JavaScript").unwrap();
        assert_eq!(js.user, 5);
        assert_eq!(js.gap_percent, 0.0);
    }

    #[test]
    fn test_output_follows_benchmark_order() {
        let gaps = compute_gaps(
            &[SkillRating::new("HTML", 5), SkillRating::new("React", 1)],
            &frontend(),
        );
        let skills: Vec<_> = gaps.iter().map(|g| g.skill.as_str()).collect();
        assert_eq!(skills, vec!["HTML", "CSS", "JavaScript", "React"]);
    }

    #[test]
    fn test_frontend_scenario() {
        let gaps = compute_gaps(&[SkillRating::new("React", 4)], &frontend());
        let percents: Vec<_> = gaps.iter().map(|g| g.gap_percent).collect();
        assert_eq!(percents, vec![100.0, 100.0, 100.0, 0.0]);
    }

    #[test]
    fn test_skills_outside_benchmark_are_ignored() {
        let gaps = compute_gaps(&[SkillRating::new("Cobol", 5)], &frontend());
        assert_eq!(gaps.len(), 4);
        assert!(gaps.iter().all(|g| g.user == 0));
    }

    #[test]
    fn test_empty_benchmark_gives_no_gaps() {
        let benchmark = RoleBenchmark {
            role: "Nothing".to_string(),
            skills: vec![],
        };
        assert!(compute_gaps(&[SkillRating::new("HTML", 2)], &benchmark).is_empty());
    }
}
