//! Role benchmarks — the required proficiency per skill for each target role.
//!
//! The catalog is static reference data. It is built into the binary and can be
//! replaced at startup with a JSON file (`ROLE_BENCHMARKS_PATH`).

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::skills::gaps::{compute_gaps, SkillGap};
use crate::skills::skill::{SkillKey, SkillRating, MAX_LEVEL};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read benchmark file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse benchmark file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("role '{role}': required level for '{skill}' must be 1-5, got {required}")]
    InvalidLevel {
        role: String,
        skill: String,
        required: u8,
    },

    #[error("role '{0}' has no skills")]
    EmptyRole(String),

    #[error("role '{role}' lists '{skill}' more than once")]
    DuplicateSkill { role: String, skill: String },

    #[error("role '{0}' is defined more than once")]
    DuplicateRole(String),
}

/// One required skill within a benchmark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    pub skill: String,
    pub required: u8,
}

/// Required skills for a role, kept in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleBenchmark {
    pub role: String,
    pub skills: Vec<Requirement>,
}

impl RoleBenchmark {
    pub fn new(role: &str, skills: &[(&str, u8)]) -> Self {
        Self {
            role: role.to_string(),
            skills: skills
                .iter()
                .map(|(skill, required)| Requirement {
                    skill: skill.to_string(),
                    required: *required,
                })
                .collect(),
        }
    }

    pub fn requirements(&self) -> impl Iterator<Item = (&str, u8)> {
        self.skills.iter().map(|r| (r.skill.as_str(), r.required))
    }

    fn validate(&self) -> Result<(), CatalogError> {
        if self.skills.is_empty() {
            return Err(CatalogError::EmptyRole(self.role.clone()));
        }
        let mut seen: Vec<SkillKey> = Vec::with_capacity(self.skills.len());
        for req in &self.skills {
            if req.required == 0 || req.required > MAX_LEVEL {
                return Err(CatalogError::InvalidLevel {
                    role: self.role.clone(),
                    skill: req.skill.clone(),
                    required: req.required,
                });
            }
            let key = SkillKey::new(&req.skill);
            if seen.contains(&key) {
                return Err(CatalogError::DuplicateSkill {
                    role: self.role.clone(),
                    skill: req.skill.clone(),
                });
            }
            seen.push(key);
        }
        Ok(())
    }
}

/// Lookup from role name to benchmark. Role names match exactly.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct BenchmarkCatalog {
    roles: Vec<RoleBenchmark>,
}

impl Default for BenchmarkCatalog {
    fn default() -> Self {
        Self {
            roles: vec![
                RoleBenchmark::new(
                    "Frontend Developer",
                    &[
                        ("HTML", 5),
                        ("CSS", 5),
                        ("JavaScript", 5),
                        ("React", 4),
                        ("Tailwind CSS", 3),
                        ("Node.js", 2),
                        ("Databases", 1),
                    ],
                ),
                RoleBenchmark::new(
                    "Backend Developer",
                    &[
                        ("Node.js", 5),
                        ("Python", 4),
                        ("Databases", 5),
                        ("APIs", 4),
                        ("Cloud", 3),
                        ("Frontend", 2),
                    ],
                ),
                RoleBenchmark::new(
                    "Data Scientist",
                    &[
                        ("Python", 5),
                        ("R", 4),
                        ("Statistics", 5),
                        ("Machine Learning", 4),
                        ("SQL", 4),
                        ("Data Visualization", 3),
                    ],
                ),
            ],
        }
    }
}

impl BenchmarkCatalog {
    pub fn new(roles: Vec<RoleBenchmark>) -> Result<Self, CatalogError> {
        for (i, role) in roles.iter().enumerate() {
            role.validate()?;
            if roles[..i].iter().any(|r| r.role == role.role) {
                return Err(CatalogError::DuplicateRole(role.role.clone()));
            }
        }
        Ok(Self { roles })
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let roles: Vec<RoleBenchmark> = serde_json::from_str(json)?;
        Self::new(roles)
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn get(&self, role: &str) -> Option<&RoleBenchmark> {
        self.roles.iter().find(|r| r.role == role)
    }

    pub fn roles(&self) -> &[RoleBenchmark] {
        &self.roles
    }

    /// Gaps for `role`; an unknown role yields no gaps. Callers that need to tell
    /// the two apart check `get` first.
    pub fn gaps_for_role(&self, user_skills: &[SkillRating], role: &str) -> Vec<SkillGap> {
        match self.get(role) {
            Some(benchmark) => compute_gaps(user_skills, benchmark),
            None => Vec::new(),
        }
    }
}
