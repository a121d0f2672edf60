// Assessment: quiz generation, scoring and adaptive skill levels.
// Question sourcing goes through the QuestionGenerator trait; LLM calls only via llm_client.

pub mod generator;
pub mod handlers;
pub mod prompts;
pub mod questions;
pub mod scoring;
pub mod service;
