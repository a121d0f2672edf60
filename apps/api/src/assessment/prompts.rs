// Quiz generation prompt templates.

pub const QUIZ_SYSTEM: &str = "\
You are an expert technical assessor who writes accurate, unambiguous quiz questions \
for software professionals. \
You MUST respond with a JSON array only. Do NOT use markdown fences or add explanations. \
Every multiple-choice question has exactly one correct option, and `correct_answer` \
repeats that option verbatim.";

pub const QUIZ_PROMPT_TEMPLATE: &str = r#"Generate {count} {difficulty} difficulty quiz questions about {topic}.{purpose}
{mix}

For multiple-choice questions provide exactly 4 options and the correct answer.
For coding challenges provide starter code, the language (javascript or python), at least 2 test
cases with an input (a stringified array or value) and the expected output (as a string), and a
`solution` field containing a correct implementation.

OUTPUT SCHEMA (a JSON array of objects shaped like one of these):
{"type": "mcq", "question": "string", "options": ["string", "string", "string", "string"], "correct_answer": "string"}
{"type": "coding", "question": "string", "starter_code": "string", "language": "javascript" | "python",
 "test_cases": [{"input": "string", "expected_output": "string"}], "solution": "string"}
"#;

pub const GAP_PURPOSE: &str = " The questions should help the learner close a skill gap.";

pub const MIX_MCQ: &str = "Use only multiple-choice questions.";
pub const MIX_CODING: &str = "Use only coding challenges.";
pub const MIX_MIXED: &str = "Include a mix of multiple-choice and coding challenges.";
