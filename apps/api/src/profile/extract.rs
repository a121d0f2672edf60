//! Resume skill extraction: PDF bytes → plain text → LLM → skill names.

use std::collections::HashSet;

use bytes::Bytes;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::profile::prompts::{SKILL_EXTRACTION_PROMPT_TEMPLATE, SKILL_EXTRACTION_SYSTEM};
use crate::skills::skill::SkillKey;

/// Only this many characters of resume text are sent to the LLM.
pub const MAX_RESUME_CHARS: usize = 10_000;

/// Checks the upload looks like a PDF: a `.pdf` file name and a non-empty body.
pub fn validate_upload(file_name: Option<&str>, data: &[u8]) -> Result<(), AppError> {
    let name = file_name.map(str::trim).unwrap_or_default();
    if name.is_empty() {
        return Err(AppError::Validation("No selected file".to_string()));
    }
    if !name.to_lowercase().ends_with(".pdf") {
        return Err(AppError::Validation("File must be a PDF".to_string()));
    }
    if data.is_empty() {
        return Err(AppError::Validation("Uploaded file is empty".to_string()));
    }
    Ok(())
}

/// Extracts the text layer of a PDF. Parsing runs on the blocking pool since
/// large documents take a while.
pub async fn pdf_text(data: Bytes) -> Result<String, AppError> {
    let extracted = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&data))
        .await
        .map_err(|e| {
            warn!("PDF extraction task aborted: {e}");
            AppError::Validation("Invalid PDF file. Could not read.".to_string())
        })?;

    let text = extracted.map_err(|e| {
        warn!("PDF extraction failed: {e}");
        AppError::Validation("Invalid PDF file. Could not read.".to_string())
    })?;

    if text.trim().is_empty() {
        return Err(AppError::Validation(
            "Could not extract text from PDF. It might be an image-based PDF or empty.".to_string(),
        ));
    }
    Ok(text)
}

/// First `MAX_RESUME_CHARS` characters of `text`, cut on a char boundary.
pub fn resume_excerpt(text: &str) -> &str {
    match text.char_indices().nth(MAX_RESUME_CHARS) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

pub fn build_extraction_prompt(resume_text: &str) -> String {
    SKILL_EXTRACTION_PROMPT_TEMPLATE.replace("{resume_text}", resume_excerpt(resume_text))
}

/// Trims names, drops blanks and keeps the first spelling of each skill.
pub fn normalize_skill_names(names: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    names
        .into_iter()
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .filter(|n| seen.insert(SkillKey::new(n)))
        .collect()
}

pub async fn extract_skills(llm: &LlmClient, resume_text: &str) -> Result<Vec<String>, AppError> {
    let prompt = build_extraction_prompt(resume_text);
    let names: Vec<String> = llm
        .call_json(&prompt, SKILL_EXTRACTION_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("Skill extraction failed: {e}")))?;

    let skills = normalize_skill_names(names);
    info!("Extracted {} skills from resume", skills.len());
    Ok(skills)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_upload_rejects_non_pdf() {
        let err = validate_upload(Some("resume.docx"), b"data").unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("PDF")));
    }

    #[test]
    fn test_validate_upload_rejects_missing_name_and_empty_body() {
        assert!(validate_upload(None, b"data").is_err());
        assert!(validate_upload(Some("  "), b"data").is_err());
        assert!(validate_upload(Some("cv.pdf"), b"").is_err());
    }

    #[test]
    fn test_validate_upload_accepts_uppercase_extension() {
        assert!(validate_upload(Some("CV.PDF"), b"%PDF-1.4").is_ok());
    }

    #[tokio::test]
    async fn test_pdf_text_rejects_garbage() {
        let err = pdf_text(Bytes::from_static(b"definitely not a pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_resume_excerpt_truncates_on_char_boundary() {
        let text = "é".repeat(MAX_RESUME_CHARS + 5);
        let excerpt = resume_excerpt(&text);
        assert_eq!(excerpt.chars().count(), MAX_RESUME_CHARS);

        assert_eq!(resume_excerpt("short"), "short");
    }

    #[test]
    fn test_prompt_embeds_excerpt() {
        let prompt = build_extraction_prompt("Built services in Rust and PostgreSQL");
        assert!(prompt.contains("Built services in Rust and PostgreSQL"));
        assert!(!prompt.contains("{resume_text}"));
    }

    #[test]
    fn test_normalize_skill_names() {
        let names = vec![
            " Rust ".to_string(),
            "".to_string(),
            "rust".to_string(),
            "SQL".to_string(),
        ];
        assert_eq!(normalize_skill_names(names), vec!["Rust", "SQL"]);
    }
}
