// Error types for stream resolution

use thiserror::Error;

/// Errors surfaced by the resolver and its metadata backends.
///
/// "No stream matched the preference" is deliberately not represented here:
/// selection over an empty or fully-filtered catalog yields an empty
/// `SelectionResult`, which is an expected outcome rather than a failure.
#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    /// Caller omitted a required parameter (identifier, preference)
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// Neither the Python yt_dlp module nor the yt-dlp binary is usable
    #[error("tool not found: {0}")]
    ToolNotFound(String),

    /// Backend process failed to start, timed out, or exited with an error
    #[error("backend execution failed: {0}")]
    Execution(String),

    /// Backend output did not match the expected metadata schema
    #[error("malformed backend metadata: {0}")]
    Malformed(String),
}

impl ResolveError {
    /// True for the "upstream unavailable" category: the metadata backend
    /// broke, as opposed to the caller omitting a parameter.
    pub fn is_upstream(&self) -> bool {
        !matches!(self, Self::MissingField(_))
    }
}

// Categorize raw backend stderr into an error variant
impl From<String> for ResolveError {
    fn from(s: String) -> Self {
        if s.contains("not found") || s.contains("No such file") || s.contains("command not found")
        {
            return Self::ToolNotFound(s);
        }

        // Only the backend's own output-parse failures count as malformed
        // metadata; extraction-time messages like "Unable to parse player
        // response" are execution failures.
        if s.contains("Invalid JSON") || s.contains("Failed to parse JSON") {
            return Self::Malformed(s);
        }

        Self::Execution(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stderr_categorization() {
        let e = ResolveError::from("yt-dlp: command not found".to_string());
        assert!(matches!(e, ResolveError::ToolNotFound(_)));

        let e = ResolveError::from("Invalid JSON in output".to_string());
        assert!(matches!(e, ResolveError::Malformed(_)));

        let e = ResolveError::from("ERROR: Video unavailable".to_string());
        assert!(matches!(e, ResolveError::Execution(_)));
    }

    #[test]
    fn test_extraction_parse_messages_are_execution_failures() {
        let e = ResolveError::from(
            "ERROR: Unable to parse player response; signature extraction failed".to_string(),
        );
        assert!(matches!(e, ResolveError::Execution(_)));

        let e = ResolveError::from("Failed to parse JSON output".to_string());
        assert!(matches!(e, ResolveError::Malformed(_)));
    }

    #[test]
    fn test_upstream_category() {
        assert!(!ResolveError::MissingField("identifier").is_upstream());
        assert!(ResolveError::ToolNotFound("yt-dlp".to_string()).is_upstream());
        assert!(ResolveError::Execution("timeout".to_string()).is_upstream());
        assert!(ResolveError::Malformed("no formats".to_string()).is_upstream());
    }
}
