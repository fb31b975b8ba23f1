// Format catalog normalization
//
// The single defensive-parsing boundary of the crate: raw backend maps come
// in with fields that may be numbers, strings, booleans, or missing, and
// everything downstream sees only typed NormalizedStream records. Malformed
// fields become absent values; descriptors without a usable url are dropped.

use serde_json::Value;

use super::models::{MediaKind, NormalizedStream};

/// Convert raw format descriptors into normalized stream records.
///
/// Partial metadata is the normal case upstream, so individual bad entries
/// are skipped silently rather than failing the whole catalog.
pub fn normalize_catalog(raw: &[Value]) -> Vec<NormalizedStream> {
    raw.iter().filter_map(normalize_descriptor).collect()
}

fn normalize_descriptor(raw: &Value) -> Option<NormalizedStream> {
    let url = coerce_string(&raw["url"]).filter(|u| !u.is_empty())?;

    // Manifest URLs name playlists, not fetchable media
    if url.contains("manifest") {
        return None;
    }

    let vcodec = coerce_string(&raw["vcodec"]).filter(|c| !c.is_empty() && c != "none");
    let acodec = coerce_string(&raw["acodec"]).filter(|c| !c.is_empty() && c != "none");

    let mut height = coerce_u32(&raw["height"]);
    let mut width = coerce_u32(&raw["width"]);

    // Some catalogs carry only a resolution string
    if height.is_none() || width.is_none() {
        if let Some((w, h)) = parse_resolution(&raw["resolution"]) {
            width = width.or(w);
            height = height.or(h);
        }
    }

    let kind = match (&vcodec, &acodec) {
        (Some(_), Some(_)) => MediaKind::Muxed,
        (Some(_), None) => MediaKind::Video,
        (None, Some(_)) => MediaKind::Audio,
        // Untagged descriptor: geometry presence decides
        (None, None) => {
            if height.is_some() || width.is_some() {
                MediaKind::Video
            } else {
                MediaKind::Audio
            }
        }
    };

    // Muxed records carry the video codec in `codec` and keep their audio
    // codec alongside for audio-side matching
    let (codec, audio_codec) = match kind {
        MediaKind::Audio => (acodec, None),
        MediaKind::Muxed => (vcodec, acodec),
        MediaKind::Video => (vcodec, None),
    };

    let ext = coerce_string(&raw["ext"])
        .map(|e| e.to_lowercase())
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| "unknown".to_string());

    let bitrate_kbps = coerce_f64(&raw["tbr"])
        .or_else(|| coerce_f64(&raw["bitrate"]))
        .or_else(|| coerce_f64(&raw["abr"]))
        .or_else(|| coerce_f64(&raw["vbr"]));

    Some(NormalizedStream {
        url,
        ext,
        kind,
        height,
        width,
        bitrate_kbps,
        codec,
        audio_codec,
        filesize_bytes: coerce_u64(&raw["filesize"]),
        format_id: coerce_string(&raw["format_id"]).filter(|s| !s.is_empty()),
        format_note: coerce_string(&raw["format_note"]).filter(|s| !s.is_empty()),
    })
}

fn coerce_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn coerce_f64(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };
    n.filter(|f| f.is_finite() && *f >= 0.0)
}

fn coerce_u32(value: &Value) -> Option<u32> {
    coerce_f64(value).map(|f| f as u32)
}

fn coerce_u64(value: &Value) -> Option<u64> {
    coerce_f64(value).map(|f| f as u64)
}

/// Parse a resolution string like "1920x1080" or "720p"
fn parse_resolution(value: &Value) -> Option<(Option<u32>, Option<u32>)> {
    let s = coerce_string(value)?;
    let s = s.trim().to_lowercase();

    if let Some((w, h)) = s.split_once('x') {
        let w = w.trim().parse::<u32>().ok();
        let h = h.trim().parse::<u32>().ok();
        if w.is_some() || h.is_some() {
            return Some((w, h));
        }
        return None;
    }

    if let Some(h) = s.strip_suffix('p').and_then(|n| n.parse::<u32>().ok()) {
        return Some((None, Some(h)));
    }

    None
}
