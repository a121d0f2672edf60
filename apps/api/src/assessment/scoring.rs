//! Adaptive scoring — quiz scoring and the per-submission skill level update.
//!
//! Algorithm:
//! 1. Each question scores at most one point.
//!    - choice: the recorded answer equals `correct_answer` byte for byte
//!    - coding: an output is recorded for every test case and each one equals
//!      its `expected_output` byte for byte
//! 2. percentage = score / total × 100
//! 3. passed = percentage > 50, which moves the assessed skill one level up or
//!    down (clamped to 0..=5), or seeds a new skill at 3 or 1.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::assessment::questions::{Answer, ChoiceQuestion, CodingQuestion, Question};
use crate::skills::skill::MAX_LEVEL;

/// Quiz percentage a submission must exceed to count as passed.
pub const PASS_THRESHOLD_PERCENT: f64 = 50.0;

/// Level given to a newly assessed skill after a passed quiz.
pub const INITIAL_LEVEL_PASSED: u8 = 3;

/// Level given to a newly assessed skill after a failed quiz.
pub const INITIAL_LEVEL_FAILED: u8 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizResult {
    /// Per-question correctness, in question order.
    pub correct: Vec<bool>,
    pub score: usize,
    pub total: usize,
}

impl QuizResult {
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.score as f64 / self.total as f64 * 100.0
    }

    pub fn passed(&self) -> bool {
        self.percentage() > PASS_THRESHOLD_PERCENT
    }
}

/// Scores `answers` (keyed by question index) against `questions`.
///
/// Unanswered questions score zero. Answers whose index has no question are
/// ignored.
pub fn score_quiz(questions: &[Question], answers: &BTreeMap<usize, Answer>) -> QuizResult {
    let correct: Vec<bool> = questions
        .iter()
        .enumerate()
        .map(|(index, question)| match answers.get(&index) {
            Some(answer) => is_correct(question, answer),
            None => false,
        })
        .collect();

    QuizResult {
        score: correct.iter().filter(|c| **c).count(),
        total: questions.len(),
        correct,
    }
}

fn is_correct(question: &Question, answer: &Answer) -> bool {
    match (question, answer) {
        (Question::Mcq(q), Answer::Choice(given)) => choice_matches(q, given),
        (Question::Coding(q), Answer::Coding { outputs }) => coding_passes(q, outputs),
        _ => false,
    }
}

fn choice_matches(question: &ChoiceQuestion, given: &str) -> bool {
    given == question.correct_answer
}

fn coding_passes(question: &CodingQuestion, outputs: &[String]) -> bool {
    outputs.len() == question.test_cases.len()
        && question
            .test_cases
            .iter()
            .zip(outputs)
            .all(|(case, actual)| *actual == case.expected_output)
}

/// Moves an existing skill level one step after a quiz, clamped to 0..=5.
///
/// Input levels are not validated; only the result is clamped.
pub fn update_skill_level(current_level: u8, passed: bool) -> u8 {
    if passed {
        current_level.saturating_add(1).min(MAX_LEVEL)
    } else {
        current_level.saturating_sub(1).min(MAX_LEVEL)
    }
}

/// Level for a skill assessed for the first time.
pub fn initial_skill_level(passed: bool) -> u8 {
    if passed {
        INITIAL_LEVEL_PASSED
    } else {
        INITIAL_LEVEL_FAILED
    }
}
