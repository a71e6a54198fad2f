// src/analysis/normalize.rs
//! Turns a section body into a clean list of entries

use once_cell::sync::Lazy;
use regex::Regex;

static LEADING_MARKERS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-*•]+\s*").unwrap());
static BOLD_MARKERS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*|__").unwrap());

/// Split on line breaks, strip bullets and bold markers (`**` and `__`),
/// drop empty lines and stray `*` or `_` lines. Document order is kept.
pub fn clean_list(body: &str) -> Vec<String> {
    body.lines().filter_map(clean_line).collect()
}

/// Normalize one line; `None` when nothing is left to show.
pub fn clean_line(line: &str) -> Option<String> {
    let stripped = LEADING_MARKERS.replace(line.trim(), "");
    let stripped = stripped.trim();

    if stripped.is_empty() || stripped == "*" || stripped == "_" {
        return None;
    }

    let cleaned = BOLD_MARKERS.replace_all(stripped, "");
    let cleaned = cleaned.trim();

    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_list_strips_markup() {
        let body = "\n- Strong React skills\n- **Good communication**\n*\n";
        assert_eq!(
            clean_list(body),
            vec!["Strong React skills", "Good communication"]
        );
    }

    #[test]
    fn test_clean_list_keeps_numbered_order() {
        let body = "1. Add keywords\r\n2. Quantify results\r\n3. Trim summary";
        assert_eq!(
            clean_list(body),
            vec!["1. Add keywords", "2. Quantify results", "3. Trim summary"]
        );
    }

    #[test]
    fn test_clean_line_variants() {
        assert_eq!(clean_line("   "), None);
        assert_eq!(clean_line("*"), None);
        assert_eq!(clean_line("** **"), None);
        assert_eq!(clean_line("**"), None);
        assert_eq!(clean_line("• Rust"), Some("Rust".to_string()));
        assert_eq!(clean_line("*  **Kubernetes**: missing"), Some("Kubernetes: missing".to_string()));
        assert_eq!(clean_line("--- Docker"), Some("Docker".to_string()));
    }

    #[test]
    fn test_underscore_emphasis() {
        let body = "- __Led migration__ to Rust\n_\n__\n- snake_case naming";
        assert_eq!(
            clean_list(body),
            vec!["Led migration to Rust", "snake_case naming"]
        );
    }

    #[test]
    fn test_empty_body() {
        assert!(clean_list("").is_empty());
        assert!(clean_list("\n\n  \n").is_empty());
    }
}
