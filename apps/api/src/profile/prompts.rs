// Prompts for resume skill extraction.

pub const SKILL_EXTRACTION_SYSTEM: &str = "You are a technical recruiter who reads resumes \
    and lists the skills they demonstrate. \
    You MUST respond with a valid JSON array of strings only. \
    Do NOT include any text outside the JSON array.";

/// Placeholder: `{resume_text}`.
pub const SKILL_EXTRACTION_PROMPT_TEMPLATE: &str = "Extract all key technical skills and relevant soft skills \
from the following resume text. Focus on specific, quantifiable skills. \
Provide the output as a JSON array of strings, one skill per item, without levels or commentary.

Resume Text:
{resume_text}";
