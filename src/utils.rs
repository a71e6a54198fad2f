// src/utils.rs
use anyhow::Result;

/// Maximum accepted resume size (10MB)
pub const MAX_RESUME_SIZE: u64 = 10 * 1024 * 1024;

/// Get file extension in lowercase
pub fn get_file_extension(filename: &str) -> Option<String> {
    std::path::Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// Validate file extension against allowed types
pub fn validate_file_extension(filename: &str, allowed: &[&str]) -> Result<()> {
    let ext = get_file_extension(filename)
        .ok_or_else(|| anyhow::anyhow!("File has no extension: {}", filename))?;

    if !allowed.contains(&ext.as_str()) {
        anyhow::bail!(
            "Unsupported file extension: {}. Allowed: {:?}",
            ext,
            allowed
        );
    }

    Ok(())
}

/// Make sure an uploaded name carries a .pdf extension
pub fn resume_file_name(raw_name: Option<&str>) -> String {
    match raw_name.map(str::trim).filter(|n| !n.is_empty()) {
        Some(name) if get_file_extension(name).as_deref() == Some("pdf") => name.to_string(),
        Some(name) => format!("{}.pdf", name),
        None => "resume.pdf".to_string(),
    }
}

/// Trimmed job description, or `None` when there is nothing to compare against
pub fn normalize_job_description(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_file_extension() {
        assert_eq!(get_file_extension("test.pdf"), Some("pdf".to_string()));
        assert_eq!(get_file_extension("resume.PDF"), Some("pdf".to_string()));
        assert_eq!(get_file_extension("noext"), None);
    }

    #[test]
    fn test_validate_file_extension() {
        assert!(validate_file_extension("test.pdf", &["pdf"]).is_ok());
        assert!(validate_file_extension("test.txt", &["pdf"]).is_err());
        assert!(validate_file_extension("noext", &["pdf"]).is_err());
    }

    #[test]
    fn test_resume_file_name() {
        assert_eq!(resume_file_name(Some("cv.pdf")), "cv.pdf");
        assert_eq!(resume_file_name(Some("cv")), "cv.pdf");
        assert_eq!(resume_file_name(Some("  ")), "resume.pdf");
        assert_eq!(resume_file_name(None), "resume.pdf");
    }

    #[test]
    fn test_normalize_job_description() {
        assert_eq!(
            normalize_job_description("  Senior Rust engineer \n"),
            Some("Senior Rust engineer".to_string())
        );
        assert_eq!(normalize_job_description(" \n\t"), None);
    }
}
