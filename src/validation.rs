//! Centralized validation functions for hostfold.
//!
//! This module provides unified validation for:
//! - Cache intervals (`30m`, `12h`, `1d`)
//! - Multi-part TLD suffixes
//! - Output templates
//! - Feed regex fragments

use regex::Regex;
use std::time::Duration;

use crate::emitter::HOST_PLACEHOLDER;

/// Parse an interval such as `90s`, `30m`, `12h` or `1d`.
///
/// Requires ASCII-only input to prevent Unicode-related edge cases.
///
/// # Examples
/// ```
/// use hostfold::validation::parse_interval;
/// use std::time::Duration;
/// assert_eq!(parse_interval("12h"), Some(Duration::from_secs(12 * 3600)));
/// assert_eq!(parse_interval("4x"), None);
/// ```
pub fn parse_interval(interval: &str) -> Option<Duration> {
    if !interval.is_ascii() || interval.len() < 2 {
        return None;
    }

    let (num_part, suffix) = interval.split_at(interval.len() - 1);
    let value: u64 = num_part.parse().ok()?;
    let unit = match suffix {
        "s" => 1,
        "m" => 60,
        "h" => 3600,
        "d" => 86400,
        _ => return None,
    };
    value.checked_mul(unit).map(Duration::from_secs)
}

/// Validate a multi-part suffix: exactly two non-empty labels of `[a-z0-9-]`.
///
/// # Examples
/// ```
/// use hostfold::validation::validate_suffix;
/// assert!(validate_suffix("co.uk").is_ok());
/// assert!(validate_suffix("uk").is_err());
/// assert!(validate_suffix("a.co.uk").is_err());
/// ```
pub fn validate_suffix(suffix: &str) -> Result<(), String> {
    let labels: Vec<&str> = suffix.split('.').collect();
    if labels.len() != 2 {
        return Err(format!(
            "Invalid multi-part suffix '{}': expected exactly two labels like 'co.uk'",
            suffix
        ));
    }
    for label in labels {
        if label.is_empty()
            || !label
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
        {
            return Err(format!(
                "Invalid multi-part suffix '{}': labels must be lowercase [a-z0-9-]",
                suffix
            ));
        }
    }
    Ok(())
}

/// Validate a per-host output template.
pub fn validate_template(template: &str) -> Result<(), String> {
    if !template.contains(HOST_PLACEHOLDER) {
        return Err(format!(
            "Template must contain the {} placeholder",
            HOST_PLACEHOLDER
        ));
    }
    Ok(())
}

/// Compile a regex fragment with the given inline flags, reporting the
/// fragment on failure.
pub fn compile_pattern(flags: &str, pattern: &str) -> Result<Regex, String> {
    let source = if flags.is_empty() {
        pattern.to_string()
    } else {
        format!("(?{}){}", flags, pattern)
    };
    Regex::new(&source).map_err(|e| format!("Invalid pattern '{}': {}", pattern, e))
}
