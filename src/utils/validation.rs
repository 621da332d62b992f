use crate::error::{AppError, AppResult};
use regex::Regex;
use std::sync::LazyLock;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}$").unwrap()
});

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email.trim())
}

pub fn validate_email(email: &str) -> AppResult<()> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(AppError::ValidationError(format!(
            "Invalid email address: {email}"
        )))
    }
}

pub fn require_non_empty(field: &str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::ValidationError(format!("{field} is required")));
    }
    Ok(())
}

/// Only Italian and English are supported; anything else falls back to Italian.
pub fn normalize_language(language: Option<&str>) -> String {
    match language.map(|l| l.trim().to_lowercase()) {
        Some(l) if l.starts_with("en") => "en".to_string(),
        _ => "it".to_string(),
    }
}
