// Selection core - pure transformations over in-memory catalogs
//
// Three stages, applied per request with no shared state:
// - normalizer: raw backend maps -> typed NormalizedStream records
// - selector: best-match ranking per media kind
// - composer: merge per-kind selections under inclusion flags

pub mod composer;
pub mod models;
pub mod normalizer;
pub mod selector;

pub use composer::compose_unified;
pub use models::{
    AudioPreference, MediaKind, NormalizedStream, QualityTier, SelectionResult, UnifiedStreams,
    VideoPreference,
};
pub use normalizer::normalize_catalog;
pub use selector::StreamSelector;
