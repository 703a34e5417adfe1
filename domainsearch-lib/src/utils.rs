//! Utility functions for preparing pattern inputs.

use crate::error::DomainSearchError;
use std::fs;
use std::path::Path;

/// Append `suffix` to a pattern that has no `.` in it.
///
/// Patterns that already name a TLD (`redCV.io`) are returned unchanged.
///
/// ```
/// use domainsearch_lib::normalize_pattern;
///
/// assert_eq!(normalize_pattern("redCV", ".com"), "redCV.com");
/// assert_eq!(normalize_pattern("redCV.io", ".com"), "redCV.io");
/// ```
pub fn normalize_pattern(pattern: &str, suffix: &str) -> String {
    if pattern.contains('.') {
        pattern.to_string()
    } else {
        format!("{}{}", pattern, suffix)
    }
}

/// Parse pattern list text: one pattern per line.
///
/// Blank lines and lines starting with `//` are skipped. `#` is not a
/// comment marker here since it is the digit wildcard.
pub fn parse_pattern_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("//"))
        .map(str::to_string)
        .collect()
}

/// Read patterns from a file, see [`parse_pattern_lines`] for the format.
///
/// # Errors
///
/// Returns `DomainSearchError::FileError` if the file is missing or
/// unreadable, or contains no patterns.
pub fn read_patterns_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<String>, DomainSearchError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        DomainSearchError::file_error(path.to_string_lossy(), format!("Failed to read file: {}", e))
    })?;

    let patterns = parse_pattern_lines(&content);
    if patterns.is_empty() {
        return Err(DomainSearchError::file_error(
            path.to_string_lossy(),
            "No patterns found in file",
        ));
    }
    Ok(patterns)
}
