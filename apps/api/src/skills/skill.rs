//! Skill ratings and the case-insensitive skill set owned by a profile.

use serde::{Deserialize, Serialize};

use crate::assessment::scoring::{initial_skill_level, update_skill_level};

/// Highest proficiency level a skill can reach.
pub const MAX_LEVEL: u8 = 5;

/// Level assigned to skills entered as plain names (e.g. from a resume or a
/// comma-separated profile field) before any assessment has been taken.
pub const DEFAULT_DECLARED_LEVEL: u8 = 3;

/// A user's proficiency in one named skill. `level` is expected in 0..=5.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillRating {
    pub name: String,
    pub level: u8,
}

impl SkillRating {
    pub fn new(name: impl Into<String>, level: u8) -> Self {
        Self {
            name: name.into(),
            level,
        }
    }

    pub fn key(&self) -> SkillKey {
        SkillKey::new(&self.name)
    }
}

/// Canonical lookup key for a skill name: trimmed and lowercased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SkillKey(String);

impl SkillKey {
    pub fn new(name: &str) -> Self {
        Self(name.trim().to_lowercase())
    }
}

/// Result of applying a quiz outcome to a skill set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelChange {
    pub previous: Option<u8>,
    pub current: u8,
}

/// Ordered collection of skill ratings, unique by `SkillKey`.
/// Deserialization goes through `from_ratings`, so stored data is held to the
/// same uniqueness rules as client input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<SkillRating>", into = "Vec<SkillRating>")]
pub struct SkillSet {
    ratings: Vec<SkillRating>,
}

impl SkillSet {
    /// Builds a set, rejecting case-insensitive duplicate names.
    pub fn from_ratings(ratings: Vec<SkillRating>) -> Result<Self, String> {
        let mut set = SkillSet::default();
        for rating in ratings {
            if rating.name.trim().is_empty() {
                return Err("skill names cannot be empty".to_string());
            }
            if set.get(&rating.name).is_some() {
                return Err(format!("duplicate skill '{}'", rating.name.trim()));
            }
            set.ratings.push(SkillRating {
                name: rating.name.trim().to_string(),
                level: rating.level,
            });
        }
        Ok(set)
    }

    /// Parses a comma-separated list of skill names. Blank items are skipped and
    /// later duplicates of an earlier name are dropped.
    pub fn from_names(input: &str, level: u8) -> Self {
        let mut set = SkillSet::default();
        for name in input.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            if set.get(name).is_none() {
                set.ratings.push(SkillRating::new(name, level));
            }
        }
        set
    }

    pub fn get(&self, name: &str) -> Option<&SkillRating> {
        let key = SkillKey::new(name);
        self.ratings.iter().find(|r| r.key() == key)
    }

    pub fn ratings(&self) -> &[SkillRating] {
        &self.ratings
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    /// Applies one quiz outcome to `skill`. Existing skills move one level up or
    /// down; unknown skills are added at their initial level.
    pub fn apply_assessment(&mut self, skill: &str, passed: bool) -> LevelChange {
        let key = SkillKey::new(skill);
        match self.ratings.iter_mut().find(|r| r.key() == key) {
            Some(rating) => {
                let previous = rating.level;
                rating.level = update_skill_level(previous, passed);
                LevelChange {
                    previous: Some(previous),
                    current: rating.level,
                }
            }
            None => {
                let level = initial_skill_level(passed);
                self.ratings.push(SkillRating::new(skill.trim(), level));
                LevelChange {
                    previous: None,
                    current: level,
                }
            }
        }
    }
}

impl TryFrom<Vec<SkillRating>> for SkillSet {
    type Error = String;

    fn try_from(ratings: Vec<SkillRating>) -> Result<Self, Self::Error> {
        SkillSet::from_ratings(ratings)
    }
}

impl From<SkillSet> for Vec<SkillRating> {
    fn from(set: SkillSet) -> Self {
        set.ratings
    }
}
