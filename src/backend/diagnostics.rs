// Failure categorization for backend errors
//
// yt-dlp reports unavailability as prose on stderr; map the known phrases to
// a coarse status so callers can distinguish "video gone" from "backend
// broke" without parsing messages themselves.

use serde::{Deserialize, Serialize};

/// Coarse availability status derived from a backend failure message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityStatus {
    Available,
    /// Private video requiring authorization
    Private,
    /// Deleted or taken down
    Removed,
    /// Requires a logged-in adult account
    AgeRestricted,
    /// Not available in the current region
    GeoBlocked,
    /// Unavailable for an unspecified reason
    Unavailable,
    /// Backend failure that says nothing about the video itself
    Error,
}

impl AvailabilityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Private => "private",
            Self::Removed => "removed",
            Self::AgeRestricted => "age_restricted",
            Self::GeoBlocked => "geo_blocked",
            Self::Unavailable => "unavailable",
            Self::Error => "error",
        }
    }
}

/// Categorize a backend failure message
pub fn categorize_failure(message: &str) -> AvailabilityStatus {
    let m = message.to_lowercase();

    if m.contains("private video") {
        return AvailabilityStatus::Private;
    }
    if m.contains("removed") || m.contains("terminated") {
        return AvailabilityStatus::Removed;
    }
    if m.contains("age-restricted")
        || m.contains("age restricted")
        || m.contains("confirm your age")
    {
        return AvailabilityStatus::AgeRestricted;
    }
    if m.contains("not available in your country") || m.contains("geo restriction") {
        return AvailabilityStatus::GeoBlocked;
    }
    if m.contains("video unavailable") || m.contains("no longer available") {
        return AvailabilityStatus::Unavailable;
    }

    AvailabilityStatus::Error
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_phrases() {
        assert_eq!(
            categorize_failure("ERROR: Private video. Sign in if you've been granted access"),
            AvailabilityStatus::Private
        );
        assert_eq!(
            categorize_failure("ERROR: This video has been removed by the uploader"),
            AvailabilityStatus::Removed
        );
        assert_eq!(
            categorize_failure("ERROR: Sign in to confirm your age"),
            AvailabilityStatus::AgeRestricted
        );
        assert_eq!(
            categorize_failure("ERROR: The uploader has not made this video available in your country"),
            AvailabilityStatus::GeoBlocked
        );
        assert_eq!(
            categorize_failure("ERROR: Video unavailable"),
            AvailabilityStatus::Unavailable
        );
    }

    #[test]
    fn test_unknown_message_is_error() {
        assert_eq!(
            categorize_failure("backend execution failed: yt-dlp timed out after 30s"),
            AvailabilityStatus::Error
        );
    }
}
