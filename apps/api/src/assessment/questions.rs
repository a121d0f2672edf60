//! Quiz question and answer shapes.
//!
//! Field aliases accept the camelCase keys LLMs tend to emit even when asked
//! for snake_case.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

/// Which question variants a generated quiz should contain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    #[default]
    Mcq,
    Coding,
    Mixed,
}

impl QuestionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionKind::Mcq => "mcq",
            QuestionKind::Coding => "coding",
            QuestionKind::Mixed => "mixed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    pub input: String,
    #[serde(alias = "expectedOutput")]
    pub expected_output: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceQuestion {
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(alias = "correctAnswer")]
    pub correct_answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodingQuestion {
    pub question: String,
    #[serde(default, alias = "starterCode")]
    pub starter_code: String,
    #[serde(default)]
    pub language: String,
    #[serde(default, alias = "testCases")]
    pub test_cases: Vec<TestCase>,
    #[serde(default)]
    pub solution: Option<String>,
}

/// A quiz question, tagged by `type` (`"mcq"` or `"coding"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Question {
    #[serde(alias = "choice")]
    Mcq(ChoiceQuestion),
    Coding(CodingQuestion),
}

impl Question {
    /// Whether the question can be scored at all. Choice questions need a
    /// correct answer; coding questions need at least one test case.
    pub fn is_well_formed(&self) -> bool {
        match self {
            Question::Mcq(q) => !q.question.trim().is_empty() && !q.correct_answer.is_empty(),
            Question::Coding(q) => !q.question.trim().is_empty() && !q.test_cases.is_empty(),
        }
    }

    /// The question as shown to the quiz taker, with answers withheld.
    pub fn to_view(&self) -> QuestionView {
        match self {
            Question::Mcq(q) => QuestionView::Mcq {
                question: q.question.clone(),
                options: q.options.clone(),
            },
            Question::Coding(q) => QuestionView::Coding {
                question: q.question.clone(),
                starter_code: q.starter_code.clone(),
                language: q.language.clone(),
                test_inputs: q.test_cases.iter().map(|t| t.input.clone()).collect(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionView {
    Mcq {
        question: String,
        options: Vec<String>,
    },
    Coding {
        question: String,
        starter_code: String,
        language: String,
        test_inputs: Vec<String>,
    },
}

/// A recorded answer: the chosen option for choice questions, or the actual
/// output produced for each test case (in test-case order) for coding ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Choice(String),
    Coding { outputs: Vec<String> },
}
