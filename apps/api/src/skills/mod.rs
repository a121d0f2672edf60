// Skill model, role benchmarks and gap calculation.
// Pure logic only: nothing in here touches the store or the LLM.

pub mod benchmark;
pub mod gaps;
pub mod skill;
