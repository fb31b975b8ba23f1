// Common data models for stream selection

use serde::{Deserialize, Serialize};

/// What a stream record carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Video-only payload
    Video,
    /// Audio-only payload
    Audio,
    /// Single candidate carrying both video and audio
    Muxed,
}

impl MediaKind {
    pub fn has_video(&self) -> bool {
        matches!(self, Self::Video | Self::Muxed)
    }

    pub fn has_audio(&self) -> bool {
        matches!(self, Self::Audio | Self::Muxed)
    }
}

/// Canonical stream record derived from one raw format descriptor.
///
/// All fields are already defensively parsed; downstream code never touches
/// raw backend maps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedStream {
    /// Direct media URL (non-empty)
    pub url: String,
    /// Container extension, lowercase ("unknown" when the backend omits it)
    pub ext: String,
    /// Media kind (tagged by the backend or inferred from geometry)
    pub kind: MediaKind,
    /// Height in pixels
    pub height: Option<u32>,
    /// Width in pixels
    pub width: Option<u32>,
    /// Nominal bitrate in kbps
    pub bitrate_kbps: Option<f64>,
    /// Codec string, possibly a dotted profile ("avc1.640028")
    pub codec: Option<String>,
    /// Audio codec of a muxed stream (`codec` holds its video codec)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_codec: Option<String>,
    /// File size in bytes when the backend reports one
    pub filesize_bytes: Option<u64>,
    /// Backend-assigned format ID
    pub format_id: Option<String>,
    /// Backend-assigned format note ("1080p", "medium")
    pub format_note: Option<String>,
}

impl NormalizedStream {
    /// Codec seen by audio selection: muxed records match by their audio
    /// codec, not the video codec stored in `codec`
    pub fn audio_facing_codec(&self) -> Option<&str> {
        match self.kind {
            MediaKind::Muxed => self.audio_codec.as_deref(),
            _ => self.codec.as_deref(),
        }
    }

    /// Bitrate as a sortable integer key (hundredths of a kbps, 0 if unknown)
    pub(crate) fn bitrate_key(&self) -> u64 {
        self.bitrate_kbps.map(|b| (b * 100.0) as u64).unwrap_or(0)
    }

    /// Display resolution like "1920x1080" or "1080p"
    pub fn resolution_label(&self) -> Option<String> {
        match (self.width, self.height) {
            (Some(w), Some(h)) => Some(format!("{}x{}", w, h)),
            (None, Some(h)) => Some(format!("{}p", h)),
            _ => None,
        }
    }
}

/// Discrete video resolution class with a canonical pixel height
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum QualityTier {
    P144,
    P240,
    P360,
    P480,
    P720,
    P1080,
    P1440,
    P2160,
    P4320,
}

impl QualityTier {
    pub fn canonical_height(&self) -> u32 {
        match self {
            Self::P144 => 144,
            Self::P240 => 240,
            Self::P360 => 360,
            Self::P480 => 480,
            Self::P720 => 720,
            Self::P1080 => 1080,
            Self::P1440 => 1440,
            Self::P2160 => 2160,
            Self::P4320 => 4320,
        }
    }

    /// Parse a quality string: "720p", bare heights, K-notation, and the
    /// common marketing aliases. Returns None for anything else.
    pub fn parse(quality: &str) -> Option<Self> {
        let q = quality.trim().to_lowercase();
        if q.is_empty() {
            return None;
        }

        if let Some(num) = q.strip_suffix('p') {
            return num.parse::<u32>().ok().and_then(Self::from_height);
        }

        if let Ok(n) = q.parse::<u32>() {
            return Self::from_height(n);
        }

        let height = match q.as_str() {
            "1k" => 1080,
            "2k" => 1440,
            "4k" => 2160,
            "8k" => 4320,
            "hd" | "high" => 720,
            "fhd" | "full hd" | "fullhd" => 1080,
            "qhd" | "quad hd" | "quadhd" => 1440,
            "uhd" | "ultra hd" | "ultrahd" => 2160,
            _ => return None,
        };

        Self::from_height(height)
    }

    fn from_height(height: u32) -> Option<Self> {
        match height {
            144 => Some(Self::P144),
            240 => Some(Self::P240),
            360 => Some(Self::P360),
            480 => Some(Self::P480),
            720 => Some(Self::P720),
            1080 => Some(Self::P1080),
            1440 => Some(Self::P1440),
            2160 => Some(Self::P2160),
            4320 => Some(Self::P4320),
            _ => None,
        }
    }
}

impl std::fmt::Display for QualityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}p", self.canonical_height())
    }
}

/// Video selection preference: a quality tier plus an optional codec filter
#[derive(Debug, Clone)]
pub struct VideoPreference {
    pub tier: QualityTier,
    /// Codec constraint (prefix match, case-insensitive); strict when present
    pub codec: Option<String>,
}

impl VideoPreference {
    pub fn new(tier: QualityTier) -> Self {
        Self { tier, codec: None }
    }

    pub fn with_codec(mut self, codec: impl Into<String>) -> Self {
        self.codec = Some(codec.into());
        self
    }
}

/// Audio selection preference: a target bitrate plus an optional codec filter
#[derive(Debug, Clone)]
pub struct AudioPreference {
    pub target_kbps: u32,
    pub codec: Option<String>,
}

impl AudioPreference {
    pub fn new(target_kbps: u32) -> Self {
        Self {
            target_kbps,
            codec: None,
        }
    }

    pub fn with_codec(mut self, codec: impl Into<String>) -> Self {
        self.codec = Some(codec.into());
        self
    }
}

/// Zero-or-one chosen stream per media kind.
///
/// Serializes as a sequence so that "selection ran but nothing matched"
/// (empty) stays distinguishable from "selection was not requested"
/// (field absent) in composed output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionResult {
    streams: Vec<NormalizedStream>,
}

impl SelectionResult {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn of(stream: NormalizedStream) -> Self {
        Self {
            streams: vec![stream],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    pub fn best(&self) -> Option<&NormalizedStream> {
        self.streams.first()
    }

    pub fn into_streams(self) -> Vec<NormalizedStream> {
        self.streams
    }
}

/// Combined video + audio selection with overall media duration.
///
/// The video/audio fields are present if and only if the caller asked for
/// that kind, regardless of whether anything matched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnifiedStreams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<Vec<NormalizedStream>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<Vec<NormalizedStream>>,
    /// Overall media duration in seconds (0 if unknown)
    pub duration_seconds: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_parse_suffix_and_bare() {
        assert_eq!(QualityTier::parse("720p"), Some(QualityTier::P720));
        assert_eq!(QualityTier::parse("1080"), Some(QualityTier::P1080));
        assert_eq!(QualityTier::parse(" 144P "), Some(QualityTier::P144));
    }

    #[test]
    fn test_tier_parse_aliases() {
        assert_eq!(QualityTier::parse("4k"), Some(QualityTier::P2160));
        assert_eq!(QualityTier::parse("2K"), Some(QualityTier::P1440));
        assert_eq!(QualityTier::parse("hd"), Some(QualityTier::P720));
        assert_eq!(QualityTier::parse("Full HD"), Some(QualityTier::P1080));
        assert_eq!(QualityTier::parse("ultrahd"), Some(QualityTier::P2160));
    }

    #[test]
    fn test_tier_parse_rejects_unknown() {
        assert_eq!(QualityTier::parse(""), None);
        assert_eq!(QualityTier::parse("best"), None);
        assert_eq!(QualityTier::parse("600"), None);
        assert_eq!(QualityTier::parse("600p"), None);
    }

    #[test]
    fn test_tier_ordering() {
        assert!(QualityTier::P144 < QualityTier::P4320);
        assert!(QualityTier::P720 < QualityTier::P1080);
    }

    #[test]
    fn test_media_kind_coverage() {
        assert!(MediaKind::Muxed.has_video());
        assert!(MediaKind::Muxed.has_audio());
        assert!(MediaKind::Video.has_video());
        assert!(!MediaKind::Video.has_audio());
        assert!(!MediaKind::Audio.has_video());
    }

    #[test]
    fn test_selection_result_serializes_as_sequence() {
        let json = serde_json::to_string(&SelectionResult::empty()).unwrap();
        assert_eq!(json, "[]");
    }
}
