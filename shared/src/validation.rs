//! Input validation functions
//!
//! This module provides validation utilities for user input.

/// Extensions accepted for resume uploads
pub const RESUME_EXTENSIONS: [&str; 3] = ["pdf", "doc", "docx"];

/// Validate email format
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email cannot be empty".to_string());
    }
    if email.len() > 120 {
        return Err("Email too long".to_string());
    }
    let matches = regex_lite::Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
        .map(|re| re.is_match(email))
        .unwrap_or(false);
    if !matches {
        return Err("Invalid email format".to_string());
    }
    Ok(())
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters".to_string());
    }
    if password.len() > 128 {
        return Err("Password too long".to_string());
    }
    Ok(())
}

/// Validate a job title
pub fn validate_job_title(title: &str) -> Result<(), String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err("Title cannot be empty".to_string());
    }
    if trimmed.chars().count() > 100 {
        return Err("Title must be at most 100 characters".to_string());
    }
    Ok(())
}

/// Validate a job location; blank is allowed and means the default
pub fn validate_job_location(location: &str) -> Result<(), String> {
    if location.trim().chars().count() > 100 {
        return Err("Location must be at most 100 characters".to_string());
    }
    Ok(())
}

/// Validate a job description
pub fn validate_job_description(description: &str) -> Result<(), String> {
    if description.trim().is_empty() {
        return Err("Description cannot be empty".to_string());
    }
    Ok(())
}

/// Check whether a filename carries an accepted resume extension
pub fn is_allowed_resume(filename: &str) -> bool {
    match filename.rsplit_once('.') {
        Some((_, ext)) => RESUME_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()),
        None => false,
    }
}

/// Reduce a client-supplied filename to a safe, flat ASCII name
///
/// Path separators become word breaks, anything outside `[A-Za-z0-9._-]` is
/// dropped, whitespace runs collapse to `_`, and leading/trailing dots and
/// underscores are stripped. The result may be empty.
pub fn sanitize_filename(filename: &str) -> String {
    let spaced: String = filename
        .chars()
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = spaced
        .split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("_");

    joined.trim_matches(|c| c == '.' || c == '_').to_string()
}

/// Shorten a filename to at most `max_len` bytes, keeping its extension
///
/// Characters are never split; the stem loses its tail first.
pub fn truncate_filename(name: &str, max_len: usize) -> String {
    if name.len() <= max_len {
        return name.to_string();
    }

    match name.rsplit_once('.') {
        Some((stem, ext)) if ext.len() + 1 < max_len => {
            format!("{}.{}", byte_prefix(stem, max_len - ext.len() - 1), ext)
        }
        _ => byte_prefix(name, max_len).to_string(),
    }
}

fn byte_prefix(s: &str, max_bytes: usize) -> &str {
    let end = s
        .char_indices()
        .map(|(i, c)| i + c.len_utf8())
        .take_while(|&end| end <= max_bytes)
        .last()
        .unwrap_or(0);
    &s[..end]
}
