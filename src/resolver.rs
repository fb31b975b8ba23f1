// StreamResolver - request validation, fetch, normalize, select, compose
//
// Owns the backends and the per-call wiring; all actual ranking lives in the
// pure selection core. Each call fetches fresh metadata, so there is no
// shared mutable state between requests.

use lazy_static::lazy_static;
use regex::Regex;

use crate::backend::{
    categorize_failure, Availability, AvailabilityStatus, BackendConfig, BackendMode, CliBackend,
    MetadataBackend, PythonBackend, RawCatalog,
};
use crate::errors::ResolveError;
use crate::selection::{
    compose_unified, normalize_catalog, AudioPreference, QualityTier, SelectionResult,
    StreamSelector, UnifiedStreams, VideoPreference,
};

lazy_static! {
    // Bare video IDs are expanded to a watch URL before reaching the backend
    static ref VIDEO_ID_RE: Regex = Regex::new(r"^[A-Za-z0-9_-]{11}$").unwrap();
}

/// Parameters for a unified (video + audio) resolution call
#[derive(Debug, Clone)]
pub struct UnifiedRequest {
    pub identifier: String,
    pub video_quality: String,
    pub audio_bitrate_kbps: u32,
    pub video_codec: Option<String>,
    pub audio_codec: Option<String>,
    pub include_video: bool,
    pub include_audio: bool,
}

impl UnifiedRequest {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            video_quality: "1080p".to_string(),
            audio_bitrate_kbps: 192,
            video_codec: None,
            audio_codec: None,
            include_video: true,
            include_audio: true,
        }
    }

    pub fn with_video_quality(mut self, quality: impl Into<String>) -> Self {
        self.video_quality = quality.into();
        self
    }

    pub fn with_audio_bitrate(mut self, kbps: u32) -> Self {
        self.audio_bitrate_kbps = kbps;
        self
    }

    pub fn with_video_codec(mut self, codec: impl Into<String>) -> Self {
        self.video_codec = Some(codec.into());
        self
    }

    pub fn with_audio_codec(mut self, codec: impl Into<String>) -> Self {
        self.audio_codec = Some(codec.into());
        self
    }

    pub fn video_only(mut self) -> Self {
        self.include_video = true;
        self.include_audio = false;
        self
    }

    pub fn audio_only(mut self) -> Self {
        self.include_video = false;
        self.include_audio = true;
        self
    }
}

/// Resolves media identifiers to best-matching stream records.
///
/// Construct one per host-application handle; the resolver itself keeps no
/// state between calls beyond backend discovery done at construction.
pub struct StreamResolver {
    python: PythonBackend,
    cli: CliBackend,
    config: BackendConfig,
}

impl StreamResolver {
    pub fn new() -> Self {
        Self::with_config(BackendConfig::default())
    }

    pub fn with_config(config: BackendConfig) -> Self {
        Self {
            python: PythonBackend::new(),
            cli: CliBackend::new(),
            config,
        }
    }

    /// Select the best video stream for an identifier and quality string
    pub async fn video_streams(
        &self,
        identifier: &str,
        quality: &str,
        codec: Option<&str>,
    ) -> Result<SelectionResult, ResolveError> {
        let url = Self::canonical_url(identifier)?;
        let preference = Self::video_preference(quality, codec)?;

        let catalog = self.fetch(&url).await?;
        let streams = normalize_catalog(&catalog.formats);
        Ok(StreamSelector::select_video(&streams, &preference))
    }

    /// Select the best audio stream for an identifier and bitrate target
    pub async fn audio_streams(
        &self,
        identifier: &str,
        target_kbps: u32,
        codec: Option<&str>,
    ) -> Result<SelectionResult, ResolveError> {
        let url = Self::canonical_url(identifier)?;
        let preference = AudioPreference {
            target_kbps,
            codec: Self::normalize_codec(codec),
        };

        let catalog = self.fetch(&url).await?;
        let streams = normalize_catalog(&catalog.formats);
        Ok(StreamSelector::select_audio(&streams, &preference))
    }

    /// Select video and audio in one pass over a single metadata fetch
    pub async fn unified_streams(
        &self,
        request: &UnifiedRequest,
    ) -> Result<UnifiedStreams, ResolveError> {
        if !request.include_video && !request.include_audio {
            return Err(ResolveError::MissingField("include_video or include_audio"));
        }

        let url = Self::canonical_url(&request.identifier)?;

        // Validate the video preference before any fetch happens
        let video_preference = if request.include_video {
            Some(Self::video_preference(
                &request.video_quality,
                request.video_codec.as_deref(),
            )?)
        } else {
            None
        };

        let catalog = self.fetch(&url).await?;
        let streams = normalize_catalog(&catalog.formats);

        let video = video_preference
            .as_ref()
            .map(|p| StreamSelector::select_video(&streams, p));
        let audio = request.include_audio.then(|| {
            let preference = AudioPreference {
                target_kbps: request.audio_bitrate_kbps,
                codec: Self::normalize_codec(request.audio_codec.as_deref()),
            };
            StreamSelector::select_audio(&streams, &preference)
        });

        Ok(compose_unified(
            video,
            audio,
            catalog.duration_seconds,
            request.include_video,
            request.include_audio,
        ))
    }

    /// Probe whether the media is available at all
    pub async fn check_status(&self, identifier: &str) -> Result<Availability, ResolveError> {
        let url = Self::canonical_url(identifier)?;

        match self.fetch(&url).await {
            Ok(_) => Ok(Availability {
                available: true,
                status: AvailabilityStatus::Available,
                detail: None,
            }),
            Err(e) => {
                let message = e.to_string();
                Ok(Availability {
                    available: false,
                    status: categorize_failure(&message),
                    detail: Some(message),
                })
            }
        }
    }

    async fn fetch(&self, url: &str) -> Result<RawCatalog, ResolveError> {
        match self.config.mode {
            BackendMode::Python => self.python.fetch(url, &self.config).await,
            BackendMode::Cli => self.cli.fetch(url, &self.config).await,
            BackendMode::Auto => self.fetch_auto(url).await,
        }
    }

    /// Python first (better anti-bot), CLI fallback.
    ///
    /// Each backend already probes its own availability inside `fetch`;
    /// probing here as well would spawn the interpreter check twice per
    /// request.
    async fn fetch_auto(&self, url: &str) -> Result<RawCatalog, ResolveError> {
        let python_err = match self.python.fetch(url, &self.config).await {
            Ok(catalog) => return Ok(catalog),
            Err(e) => {
                log::warn!("python backend failed, trying cli: {}", e);
                e
            }
        };

        match self.cli.fetch(url, &self.config).await {
            Ok(catalog) => Ok(catalog),
            Err(cli_err) => Err(Self::auto_error(python_err, cli_err)),
        }
    }

    /// Pick the error worth reporting when both backends failed: a missing
    /// binary is noise next to a real upstream failure
    fn auto_error(python_err: ResolveError, cli_err: ResolveError) -> ResolveError {
        match (python_err, cli_err) {
            (ResolveError::ToolNotFound(_), ResolveError::ToolNotFound(_)) => {
                ResolveError::ToolNotFound(
                    "neither Python yt_dlp module nor yt-dlp binary available".to_string(),
                )
            }
            (python_err, ResolveError::ToolNotFound(_)) => python_err,
            (_, cli_err) => cli_err,
        }
    }

    fn canonical_url(identifier: &str) -> Result<String, ResolveError> {
        let id = identifier.trim();
        if id.is_empty() {
            return Err(ResolveError::MissingField("identifier"));
        }

        if VIDEO_ID_RE.is_match(id) {
            Ok(format!("https://www.youtube.com/watch?v={}", id))
        } else {
            Ok(id.to_string())
        }
    }

    fn video_preference(
        quality: &str,
        codec: Option<&str>,
    ) -> Result<VideoPreference, ResolveError> {
        let tier = QualityTier::parse(quality).ok_or(ResolveError::MissingField("quality"))?;
        Ok(VideoPreference {
            tier,
            codec: Self::normalize_codec(codec),
        })
    }

    fn normalize_codec(codec: Option<&str>) -> Option<String> {
        codec
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
    }
}

impl Default for StreamResolver {
    fn default() -> Self {
        Self::new()
    }
}
