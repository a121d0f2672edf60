//! Question generation — pluggable, trait-based source of quiz questions.
//!
//! Default: `FallbackQuestionGenerator` wrapping `LlmQuestionGenerator`, which
//! drops to `MockQuestionGenerator` when the LLM fails or returns nothing usable.
//! Without an API key only the mock is installed.
//!
//! `AppState` holds an `Arc<dyn QuestionGenerator>`, chosen at startup via config.

use async_trait::async_trait;
use tracing::{info, warn};

use crate::assessment::prompts::{
    GAP_PURPOSE, MIX_CODING, MIX_MCQ, MIX_MIXED, QUIZ_PROMPT_TEMPLATE, QUIZ_SYSTEM,
};
use crate::assessment::questions::{
    ChoiceQuestion, CodingQuestion, Difficulty, Question, QuestionKind, TestCase,
};
use crate::errors::AppError;
use crate::llm_client::{LlmClient, MAX_OUTPUT_TOKENS};

/// What to generate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizPlan {
    /// Topic of the quiz: a skill name or a general subject.
    pub topic: String,
    pub difficulty: Difficulty,
    pub kind: QuestionKind,
    pub count: usize,
    /// Whether the topic was chosen from the user's largest skill gap.
    pub targets_gap: bool,
}

#[derive(Debug, Clone)]
pub struct GeneratedQuestions {
    pub questions: Vec<Question>,
    /// "llm" or "mock", reported back to the client
    pub backend: &'static str,
}

/// Implement this to swap question sources without touching the assessment
/// service or handlers.
#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    async fn generate(&self, plan: &QuizPlan) -> Result<GeneratedQuestions, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// LlmQuestionGenerator
// ────────────────────────────────────────────────────────────────────────────

pub struct LlmQuestionGenerator(pub LlmClient);

/// Questions requested per LLM call. Large quizzes are generated in batches so
/// each reply fits its output budget.
pub const QUESTIONS_PER_BATCH: usize = 10;

/// Splits a plan into per-call plans of at most `QUESTIONS_PER_BATCH` questions.
pub fn batch_plans(plan: &QuizPlan) -> Vec<QuizPlan> {
    let mut batches = Vec::new();
    let mut remaining = plan.count;
    while remaining > 0 {
        let count = remaining.min(QUESTIONS_PER_BATCH);
        batches.push(QuizPlan {
            count,
            ..plan.clone()
        });
        remaining -= count;
    }
    batches
}

/// Output budget for one call: room for `count` questions of `kind` plus slack
/// for the array framing.
pub fn max_tokens_for(kind: QuestionKind, count: usize) -> u32 {
    let per_question: u32 = match kind {
        QuestionKind::Mcq => 250,
        QuestionKind::Mixed => 650,
        QuestionKind::Coding => 1000,
    };
    let count = u32::try_from(count).unwrap_or(u32::MAX);
    per_question
        .saturating_mul(count)
        .saturating_add(1024)
        .min(MAX_OUTPUT_TOKENS)
}

#[async_trait]
impl QuestionGenerator for LlmQuestionGenerator {
    async fn generate(&self, plan: &QuizPlan) -> Result<GeneratedQuestions, AppError> {
        let mut questions: Vec<Question> = Vec::with_capacity(plan.count);
        let mut received = 0;

        for batch in batch_plans(plan) {
            let prompt = build_quiz_prompt(&batch);
            let max_tokens = max_tokens_for(batch.kind, batch.count);
            let raw: Vec<Question> = match self
                .0
                .call_json_with_limit(&prompt, QUIZ_SYSTEM, max_tokens)
                .await
            {
                Ok(raw) => raw,
                // Keep what earlier batches produced
                Err(e) if !questions.is_empty() => {
                    warn!(
                        "Quiz batch for '{}' failed after {} questions: {e}",
                        plan.topic,
                        questions.len()
                    );
                    break;
                }
                Err(e) => return Err(AppError::Llm(format!("Quiz generation failed: {e}"))),
            };

            received += raw.len();
            questions.extend(
                raw.into_iter()
                    .filter(|q| q.is_well_formed() && kind_allows(batch.kind, q))
                    .take(batch.count),
            );
        }
        questions.truncate(plan.count);

        if questions.len() < received {
            warn!(
                "Discarded {} of {} generated questions for '{}'",
                received - questions.len(),
                received,
                plan.topic
            );
        }

        Ok(GeneratedQuestions {
            questions,
            backend: "llm",
        })
    }
}

fn kind_allows(kind: QuestionKind, question: &Question) -> bool {
    match (kind, question) {
        (QuestionKind::Mixed, _) => true,
        (QuestionKind::Mcq, Question::Mcq(_)) => true,
        (QuestionKind::Coding, Question::Coding(_)) => true,
        _ => false,
    }
}

pub fn build_quiz_prompt(plan: &QuizPlan) -> String {
    let mix = match plan.kind {
        QuestionKind::Mcq => MIX_MCQ,
        QuestionKind::Coding => MIX_CODING,
        QuestionKind::Mixed => MIX_MIXED,
    };
    QUIZ_PROMPT_TEMPLATE
        .replace("{count}", &plan.count.to_string())
        .replace("{difficulty}", plan.difficulty.as_str())
        .replace("{topic}", &plan.topic)
        .replace("{purpose}", if plan.targets_gap { GAP_PURPOSE } else { "" })
        .replace("{mix}", mix)
}

// ────────────────────────────────────────────────────────────────────────────
// MockQuestionGenerator
// ────────────────────────────────────────────────────────────────────────────

/// Deterministic placeholder questions. Used offline and as the fallback.
pub struct MockQuestionGenerator;

#[async_trait]
impl QuestionGenerator for MockQuestionGenerator {
    async fn generate(&self, plan: &QuizPlan) -> Result<GeneratedQuestions, AppError> {
        Ok(GeneratedQuestions {
            questions: mock_questions(plan),
            backend: "mock",
        })
    }
}

pub fn mock_questions(plan: &QuizPlan) -> Vec<Question> {
    (0..plan.count)
        .map(|i| {
            let coding = match plan.kind {
                QuestionKind::Mcq => false,
                QuestionKind::Coding => true,
                QuestionKind::Mixed => i % 2 == 1,
            };
            if coding {
                mock_coding(i + 1, &plan.topic)
            } else {
                mock_mcq(i + 1, &plan.topic)
            }
        })
        .collect()
}

fn mock_mcq(n: usize, topic: &str) -> Question {
    Question::Mcq(ChoiceQuestion {
        question: format!("(Mock MCQ {n} for {topic}) What is the capital of France?"),
        options: ["Berlin", "Madrid", "Paris", "Rome"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        correct_answer: "Paris".to_string(),
    })
}

fn mock_coding(n: usize, topic: &str) -> Question {
    Question::Coding(CodingQuestion {
        question: format!(
            "(Mock Coding {n} for {topic}) Write a JavaScript function 'addNumbers' \
             that takes two numbers and returns their sum."
        ),
        starter_code: "function addNumbers(a, b) {\n  // Your code here\n}".to_string(),
        language: "javascript".to_string(),
        test_cases: vec![
            TestCase {
                input: "[1,2]".to_string(),
                expected_output: "3".to_string(),
            },
            TestCase {
                input: "[10,20]".to_string(),
                expected_output: "30".to_string(),
            },
        ],
        solution: Some("function addNumbers(a, b) { return a + b; }".to_string()),
    })
}

// ────────────────────────────────────────────────────────────────────────────
// FallbackQuestionGenerator
// ────────────────────────────────────────────────────────────────────────────

pub struct FallbackQuestionGenerator {
    primary: Box<dyn QuestionGenerator>,
    fallback: Box<dyn QuestionGenerator>,
}

impl FallbackQuestionGenerator {
    pub fn new(primary: Box<dyn QuestionGenerator>) -> Self {
        Self {
            primary,
            fallback: Box::new(MockQuestionGenerator),
        }
    }
}

#[async_trait]
impl QuestionGenerator for FallbackQuestionGenerator {
    async fn generate(&self, plan: &QuizPlan) -> Result<GeneratedQuestions, AppError> {
        match self.primary.generate(plan).await {
            Ok(generated) if !generated.questions.is_empty() => {
                info!(
                    "Generated {} questions for '{}' via {}",
                    generated.questions.len(),
                    plan.topic,
                    generated.backend
                );
                Ok(generated)
            }
            Ok(_) => {
                warn!("Question generator returned no usable questions for '{}', falling back", plan.topic);
                self.fallback.generate(plan).await
            }
            Err(e) => {
                warn!("Question generation failed for '{}': {e}; falling back", plan.topic);
                self.fallback.generate(plan).await
            }
        }
    }
}
