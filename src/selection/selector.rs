// Stream selection - nearest-match ranking over a normalized catalog
//
// Requested qualities are preferences, not hard minimums: real catalogs
// rarely contain an exact match for every tier, so candidates are ranked by
// distance to the target rather than "at least this quality". The codec
// filter, by contrast, is a strict constraint - it never falls back to a
// non-matching codec.

use std::cmp::Reverse;

use super::models::{AudioPreference, NormalizedStream, SelectionResult, VideoPreference};

/// How a candidate codec satisfied the filter; exact beats prefix on ties
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum CodecMatch {
    Exact,
    Prefix,
}

pub struct StreamSelector;

impl StreamSelector {
    /// Pick the single best video (or muxed) candidate for the preference.
    ///
    /// Ranking: absolute distance between candidate height and the tier's
    /// canonical height, then higher bitrate, then presence of filesize,
    /// then catalog order.
    pub fn select_video(
        catalog: &[NormalizedStream],
        preference: &VideoPreference,
    ) -> SelectionResult {
        let target = preference.tier.canonical_height();
        let filter = preference.codec.as_deref();

        let best = catalog
            .iter()
            .filter(|s| s.kind.has_video())
            .filter(|s| match filter {
                Some(f) => codec_matches(s.codec.as_deref(), f).is_some(),
                None => true,
            })
            .min_by_key(|s| {
                (
                    height_distance(s.height, target),
                    Reverse(s.bitrate_key()),
                    s.filesize_bytes.is_none(),
                )
            })
            .cloned();

        match best {
            Some(stream) => {
                log::debug!(
                    "video selection: {} for {} ({} candidates)",
                    stream.resolution_label().unwrap_or_default(),
                    preference.tier,
                    catalog.len()
                );
                SelectionResult::of(stream)
            }
            None => SelectionResult::empty(),
        }
    }

    /// Pick the single best audio (or muxed) candidate for the preference.
    ///
    /// Ranking: absolute distance between candidate bitrate and the target,
    /// then codec-match strictness, then presence of filesize, then catalog
    /// order.
    pub fn select_audio(
        catalog: &[NormalizedStream],
        preference: &AudioPreference,
    ) -> SelectionResult {
        let target = preference.target_kbps as f64;
        let filter = preference.codec.as_deref();

        let best = catalog
            .iter()
            .filter(|s| s.kind.has_audio())
            .filter_map(|s| {
                let strictness = match filter {
                    Some(f) => codec_matches(s.audio_facing_codec(), f)?,
                    None => CodecMatch::Exact,
                };
                Some((s, strictness))
            })
            .min_by_key(|(s, strictness)| {
                (
                    bitrate_distance(s.bitrate_kbps, target),
                    *strictness,
                    s.filesize_bytes.is_none(),
                )
            })
            .map(|(s, _)| s.clone());

        match best {
            Some(stream) => {
                log::debug!(
                    "audio selection: {:?} kbps for target {}",
                    stream.bitrate_kbps,
                    preference.target_kbps
                );
                SelectionResult::of(stream)
            }
            None => SelectionResult::empty(),
        }
    }
}

fn height_distance(height: Option<u32>, target: u32) -> u32 {
    height.unwrap_or(0).abs_diff(target)
}

/// Distance in hundredths of a kbps so the ranking key stays integral
fn bitrate_distance(bitrate: Option<f64>, target: f64) -> u64 {
    ((bitrate.unwrap_or(0.0) - target).abs() * 100.0) as u64
}

/// Case-insensitive prefix match with the codec-family aliases seen in real
/// catalogs ("aac" covers "mp4a.40.2", "h264" covers "avc1.640028").
fn codec_matches(codec: Option<&str>, filter: &str) -> Option<CodecMatch> {
    let codec = codec?.to_ascii_lowercase();
    let filter = filter.to_ascii_lowercase();

    if codec == filter {
        return Some(CodecMatch::Exact);
    }
    if codec.starts_with(&filter) {
        return Some(CodecMatch::Prefix);
    }

    let aliases: &[&str] = match filter.as_str() {
        "h264" | "avc" => &["avc1"],
        "vp9" => &["vp09"],
        "av1" => &["av01"],
        "aac" => &["mp4a"],
        _ => &[],
    };

    aliases
        .iter()
        .any(|prefix| codec.starts_with(prefix))
        .then_some(CodecMatch::Prefix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::models::{MediaKind, QualityTier};

    fn video(height: u32, bitrate: f64, codec: &str) -> NormalizedStream {
        NormalizedStream {
            url: format!("https://cdn/v{}.mp4", height),
            ext: "mp4".to_string(),
            kind: MediaKind::Video,
            height: Some(height),
            width: Some(height * 16 / 9),
            bitrate_kbps: Some(bitrate),
            codec: Some(codec.to_string()),
            audio_codec: None,
            filesize_bytes: None,
            format_id: None,
            format_note: None,
        }
    }

    fn audio(bitrate: f64, codec: &str) -> NormalizedStream {
        NormalizedStream {
            url: format!("https://cdn/a{}.webm", bitrate),
            ext: "webm".to_string(),
            kind: MediaKind::Audio,
            height: None,
            width: None,
            bitrate_kbps: Some(bitrate),
            codec: Some(codec.to_string()),
            audio_codec: None,
            filesize_bytes: None,
            format_id: None,
            format_note: None,
        }
    }

    fn muxed(height: u32, vcodec: &str, acodec: &str) -> NormalizedStream {
        let mut stream = video(height, 500.0, vcodec);
        stream.kind = MediaKind::Muxed;
        stream.audio_codec = Some(acodec.to_string());
        stream
    }

    #[test]
    fn test_empty_catalog_yields_empty_result() {
        let pref = VideoPreference::new(QualityTier::P720);
        assert!(StreamSelector::select_video(&[], &pref).is_empty());

        let pref = AudioPreference::new(192);
        assert!(StreamSelector::select_audio(&[], &pref).is_empty());
    }

    #[test]
    fn test_exact_height_wins_over_bitrate() {
        let catalog = vec![video(720, 9000.0, "avc1"), video(1080, 100.0, "avc1")];
        let pref = VideoPreference::new(QualityTier::P1080);

        let result = StreamSelector::select_video(&catalog, &pref);
        assert_eq!(result.best().unwrap().height, Some(1080));
    }

    #[test]
    fn test_equidistant_tie_breaks_on_bitrate() {
        let catalog = vec![
            video(720, 1500.0, "avc1"),
            video(1080, 2500.0, "avc1"),
            video(1080, 3000.0, "avc1"),
        ];
        let pref = VideoPreference::new(QualityTier::P1080);

        let result = StreamSelector::select_video(&catalog, &pref);
        assert_eq!(result.best().unwrap().bitrate_kbps, Some(3000.0));
    }

    #[test]
    fn test_equal_bitrate_prefers_known_filesize() {
        let mut a = video(1080, 2500.0, "avc1");
        let mut b = video(1080, 2500.0, "avc1");
        a.url = "https://cdn/a.mp4".to_string();
        b.url = "https://cdn/b.mp4".to_string();
        b.filesize_bytes = Some(100_000_000);

        let pref = VideoPreference::new(QualityTier::P1080);
        let result = StreamSelector::select_video(&[a, b.clone()], &pref);
        assert_eq!(result.best().unwrap().url, b.url);
    }

    #[test]
    fn test_full_tie_resolves_to_catalog_order() {
        let mut a = video(1080, 2500.0, "avc1");
        let mut b = video(1080, 2500.0, "avc1");
        a.url = "https://cdn/first.mp4".to_string();
        b.url = "https://cdn/second.mp4".to_string();

        let pref = VideoPreference::new(QualityTier::P1080);
        let result = StreamSelector::select_video(&[a.clone(), b], &pref);
        assert_eq!(result.best().unwrap().url, a.url);
    }

    #[test]
    fn test_nearest_tier_when_no_exact_match() {
        let catalog = vec![video(480, 800.0, "avc1"), video(1440, 5000.0, "vp9")];
        let pref = VideoPreference::new(QualityTier::P1080);

        let result = StreamSelector::select_video(&catalog, &pref);
        assert_eq!(result.best().unwrap().height, Some(1440));
    }

    #[test]
    fn test_codec_filter_is_strict() {
        let catalog = vec![video(1080, 3000.0, "vp9"), video(720, 2000.0, "vp9")];
        let pref = VideoPreference::new(QualityTier::P1080).with_codec("avc1");

        let result = StreamSelector::select_video(&catalog, &pref);
        assert!(result.is_empty());
    }

    #[test]
    fn test_codec_filter_prefix_and_aliases() {
        let catalog = vec![
            video(1080, 3000.0, "vp09.00.40.08"),
            video(1080, 2500.0, "avc1.640028"),
        ];

        let pref = VideoPreference::new(QualityTier::P1080).with_codec("h264");
        let result = StreamSelector::select_video(&catalog, &pref);
        assert_eq!(result.best().unwrap().codec.as_deref(), Some("avc1.640028"));

        let pref = VideoPreference::new(QualityTier::P1080).with_codec("VP9");
        let result = StreamSelector::select_video(&catalog, &pref);
        assert_eq!(
            result.best().unwrap().codec.as_deref(),
            Some("vp09.00.40.08")
        );
    }

    #[test]
    fn test_audio_nearest_bitrate() {
        let catalog = vec![audio(128.0, "mp4a.40.2"), audio(160.0, "opus")];
        let pref = AudioPreference::new(192);

        let result = StreamSelector::select_audio(&catalog, &pref);
        assert_eq!(result.best().unwrap().bitrate_kbps, Some(160.0));
    }

    #[test]
    fn test_audio_codec_filter_beats_bitrate_distance() {
        let catalog = vec![audio(128.0, "aac"), audio(192.0, "opus")];

        let pref = AudioPreference::new(192).with_codec("opus");
        let result = StreamSelector::select_audio(&catalog, &pref);
        assert_eq!(result.best().unwrap().codec.as_deref(), Some("opus"));

        // Only the aac candidate matches, despite the bitrate distance
        let pref = AudioPreference::new(192).with_codec("aac");
        let result = StreamSelector::select_audio(&catalog, &pref);
        assert_eq!(result.best().unwrap().bitrate_kbps, Some(128.0));
    }

    #[test]
    fn test_audio_exact_codec_match_beats_prefix_on_ties() {
        let mut by_prefix = audio(192.0, "opus.1");
        let exact = audio(192.0, "opus");
        by_prefix.url = "https://cdn/prefix.webm".to_string();

        let pref = AudioPreference::new(192).with_codec("opus");
        let result = StreamSelector::select_audio(&[by_prefix, exact.clone()], &pref);
        assert_eq!(result.best().unwrap().url, exact.url);
    }

    #[test]
    fn test_muxed_candidates_participate_in_video_selection() {
        let catalog = vec![muxed(720, "avc1", "mp4a.40.2")];
        let pref = VideoPreference::new(QualityTier::P720);

        let result = StreamSelector::select_video(&catalog, &pref);
        assert!(!result.is_empty());
    }

    #[test]
    fn test_muxed_audio_filter_matches_audio_codec() {
        let catalog = vec![muxed(360, "avc1.640028", "mp4a.40.2")];

        let pref = AudioPreference::new(128).with_codec("aac");
        let result = StreamSelector::select_audio(&catalog, &pref);
        assert_eq!(
            result.best().unwrap().audio_codec.as_deref(),
            Some("mp4a.40.2")
        );
    }

    #[test]
    fn test_muxed_video_codec_never_satisfies_audio_filter() {
        let catalog = vec![muxed(360, "avc1.640028", "mp4a.40.2")];

        let pref = AudioPreference::new(128).with_codec("h264");
        assert!(StreamSelector::select_audio(&catalog, &pref).is_empty());
    }

    #[test]
    fn test_audio_ignores_video_only_candidates() {
        let catalog = vec![video(1080, 3000.0, "avc1")];
        let pref = AudioPreference::new(128);

        assert!(StreamSelector::select_audio(&catalog, &pref).is_empty());
    }
}
