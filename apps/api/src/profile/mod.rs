// Profiles: persistence, profile updates and resume skill extraction.
// Storage goes through the ProfileStore trait; LLM calls only via llm_client.

pub mod extract;
pub mod handlers;
pub mod memory;
pub mod prompts;
pub mod service;
pub mod store;
