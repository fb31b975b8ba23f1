// stream-resolver - best-match media stream selection over yt-dlp metadata
//
// The pipeline: a metadata backend (Python module or CLI binary) dumps raw
// format maps for an identifier; the normalizer types them defensively; the
// selector picks the nearest-matching video/audio candidate per preference;
// the composer merges both into one response. The selection core is pure and
// synchronous - only the backend layer touches processes.

pub mod backend;
pub mod errors;
pub mod resolver;
pub mod selection;

pub use backend::{
    Availability, AvailabilityStatus, BackendConfig, BackendMode, CliBackend, MetadataBackend,
    PythonBackend, RawCatalog,
};
pub use errors::ResolveError;
pub use resolver::{StreamResolver, UnifiedRequest};
pub use selection::{
    compose_unified, normalize_catalog, AudioPreference, MediaKind, NormalizedStream, QualityTier,
    SelectionResult, StreamSelector, UnifiedStreams, VideoPreference,
};
