// Metadata backend layer - the external extraction collaborator
//
// Two interchangeable backends behind one trait:
// - Python mode: `python3 -m yt_dlp` (better at avoiding bot detection)
// - CLI mode: native `yt-dlp` binary (faster, no Python dependency)
//
// Backends return RAW format maps plus duration; field typing is deferred to
// the normalization boundary. The one thing enforced here is structure: no
// formats array means the upstream contract was not met, and that fails fast
// rather than being patched over.

mod cli;
mod diagnostics;
mod process;
mod python;
mod traits;

pub use cli::CliBackend;
pub use diagnostics::{categorize_failure, AvailabilityStatus};
pub use python::PythonBackend;
pub use traits::{Availability, BackendConfig, BackendMode, MetadataBackend, RawCatalog};

use crate::errors::ResolveError;

/// Parse `--dump-json` output into a raw catalog
pub(crate) fn parse_dump_json(stdout: &[u8]) -> Result<RawCatalog, ResolveError> {
    let text = String::from_utf8_lossy(stdout);
    let json: serde_json::Value = serde_json::from_str(&text)
        .map_err(|e| ResolveError::Malformed(format!("invalid JSON from backend: {}", e)))?;

    let formats = json["formats"]
        .as_array()
        .ok_or_else(|| ResolveError::Malformed("no formats array in backend output".to_string()))?
        .clone();

    let duration_seconds = json["duration"].as_f64().unwrap_or(0.0).max(0.0) as u64;

    Ok(RawCatalog {
        formats,
        duration_seconds,
    })
}
