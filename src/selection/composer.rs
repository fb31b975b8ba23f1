// Unified result composition

use super::models::{NormalizedStream, SelectionResult, UnifiedStreams};

/// Merge per-kind selections into one response.
///
/// A kind's field is present if and only if it was requested; an empty
/// sequence there means "nothing matched". Never fails.
pub fn compose_unified(
    video: Option<SelectionResult>,
    audio: Option<SelectionResult>,
    duration_seconds: u64,
    include_video: bool,
    include_audio: bool,
) -> UnifiedStreams {
    UnifiedStreams {
        video: field(video, include_video),
        audio: field(audio, include_audio),
        duration_seconds,
    }
}

fn field(result: Option<SelectionResult>, include: bool) -> Option<Vec<NormalizedStream>> {
    include.then(|| result.unwrap_or_default().into_streams())
}
