// MetadataBackend trait and configuration

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::diagnostics::AvailabilityStatus;
use crate::errors::ResolveError;

/// Which backend to use for metadata extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendMode {
    /// Python module yt_dlp (better at avoiding bot detection)
    Python,
    /// Native yt-dlp binary (faster, no Python dependency)
    Cli,
    /// Python first, CLI fallback
    #[default]
    Auto,
}

impl fmt::Display for BackendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Python => write!(f, "python"),
            Self::Cli => write!(f, "cli"),
            Self::Auto => write!(f, "auto"),
        }
    }
}

/// Configuration for metadata extraction
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub mode: BackendMode,
    /// SOCKS5/HTTP proxy URL
    pub proxy: Option<String>,
    /// Socket timeout in seconds
    pub timeout_seconds: u32,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            mode: BackendMode::Auto,
            proxy: None,
            timeout_seconds: 30,
        }
    }
}

impl BackendConfig {
    pub fn with_mode(mut self, mode: BackendMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_proxy(mut self, proxy: Option<String>) -> Self {
        self.proxy = proxy;
        self
    }

    pub fn with_timeout(mut self, seconds: u32) -> Self {
        self.timeout_seconds = seconds;
        self
    }
}

/// Raw extraction output: untyped format maps plus overall duration.
///
/// Typing happens later, at the normalization boundary - the backend only
/// guarantees the structural shape (a formats array), never field contents.
#[derive(Debug, Clone, Default)]
pub struct RawCatalog {
    pub formats: Vec<Value>,
    pub duration_seconds: u64,
}

/// Availability probe result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Availability {
    pub available: bool,
    pub status: AvailabilityStatus,
    /// Backend-provided context for unavailability
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// External metadata/extraction collaborator
#[async_trait]
pub trait MetadataBackend: Send + Sync {
    /// Name of the backend (for logging)
    fn name(&self) -> &'static str;

    /// Check if this backend is usable on the host
    fn is_available(&self) -> bool;

    /// Fetch raw format descriptors and duration for a media URL
    async fn fetch(&self, url: &str, config: &BackendConfig)
        -> Result<RawCatalog, ResolveError>;
}
