// Python MetadataBackend - uses `python3 -m yt_dlp`
//
// Better at bypassing bot detection than the native binary, at the cost of
// requiring Python 3 with the yt_dlp module installed.

use async_trait::async_trait;
use std::process::Command as StdCommand;

use super::process::run_with_timeout;
use super::traits::{BackendConfig, MetadataBackend, RawCatalog};
use crate::errors::ResolveError;

/// Python-based metadata backend using the yt_dlp module
pub struct PythonBackend {
    python_cmd: String,
}

impl PythonBackend {
    pub fn new() -> Self {
        Self {
            python_cmd: Self::find_python(),
        }
    }

    /// Find the Python interpreter
    fn find_python() -> String {
        // Allow override via environment variable
        if let Ok(custom) = std::env::var("YTDLP_PYTHON") {
            return custom;
        }

        let candidates = [
            "python3",
            "/opt/homebrew/bin/python3",
            "/usr/local/bin/python3",
        ];

        for cmd in candidates {
            if let Ok(output) = StdCommand::new(cmd).arg("--version").output() {
                if output.status.success() {
                    return cmd.to_string();
                }
            }
        }

        "python3".to_string()
    }

    /// Check if the yt_dlp module is installed
    fn has_ytdlp_module(&self) -> bool {
        let code = "import yt_dlp; print('ok')";
        match StdCommand::new(&self.python_cmd).args(["-c", code]).output() {
            Ok(out) => out.status.success(),
            Err(_) => false,
        }
    }

    fn build_args(&self, url: &str, config: &BackendConfig) -> Vec<String> {
        let mut args = vec![
            "-m".to_string(),
            "yt_dlp".to_string(),
            "--dump-json".to_string(),
            "--no-playlist".to_string(),
            "--no-warnings".to_string(),
            "--socket-timeout".to_string(),
            config.timeout_seconds.to_string(),
            "--retries".to_string(),
            "2".to_string(),
        ];

        if let Some(proxy) = &config.proxy {
            args.push("--proxy".to_string());
            args.push(proxy.clone());
        }

        args.push(url.to_string());
        args
    }
}

impl Default for PythonBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MetadataBackend for PythonBackend {
    fn name(&self) -> &'static str {
        "python-yt-dlp"
    }

    fn is_available(&self) -> bool {
        self.has_ytdlp_module()
    }

    async fn fetch(
        &self,
        url: &str,
        config: &BackendConfig,
    ) -> Result<RawCatalog, ResolveError> {
        if !self.is_available() {
            return Err(ResolveError::ToolNotFound(
                "Python yt_dlp module not installed".to_string(),
            ));
        }

        let args = self.build_args(url, config);
        log::debug!("[{}] running: {} {}", self.name(), self.python_cmd, args.join(" "));

        let output =
            run_with_timeout(&self.python_cmd, args, config.timeout_seconds as u64).await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            log::warn!("[{}] failed: {}", self.name(), stderr.trim());
            return Err(ResolveError::from(stderr.to_string()));
        }

        super::parse_dump_json(&output.stdout)
    }
}
