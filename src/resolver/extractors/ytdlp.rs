// yt-dlp extractor - runs `yt-dlp --dump-json` as a subprocess
//
// Two launchers:
// - Python: `python3 -m yt_dlp`, better at getting past YouTube bot checks
// - Binary: native `yt-dlp`, faster and no Python dependency

use async_trait::async_trait;
use tracing::debug;

use super::traits::{watch_url, ExtractionRequest, MediaExtractor};
use crate::resolver::errors::ResolveError;
use crate::resolver::models::ExtractedMedia;
use crate::resolver::utils::run_output_with_timeout;

// Version probes are tiny; a hung interpreter should not stall startup
const PROBE_TIMEOUT_SECS: u64 = 10;

/// How yt-dlp gets started
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Launcher {
    Python { interpreter: String },
    Binary { path: String },
}

/// yt-dlp backed extractor
pub struct YtDlpExtractor {
    launcher: Launcher,
    version: Option<String>,
}

impl YtDlpExtractor {
    /// Unprobed launcher; reports itself unavailable until built through `probe`
    pub fn new(launcher: Launcher) -> Self {
        Self {
            launcher,
            version: None,
        }
    }

    /// Launcher with its installed yt-dlp version looked up once
    pub async fn probe(launcher: Launcher) -> Self {
        let mut extractor = Self::new(launcher);
        extractor.version = extractor.probe_version().await;
        debug!(
            extractor = extractor.name(),
            version = extractor.version.as_deref().unwrap_or("missing"),
            "[YtDlp] Probed {}",
            extractor.program()
        );
        extractor
    }

    /// Python module launcher; probes for an interpreter unless one is given
    pub async fn python(interpreter: Option<String>) -> Self {
        let interpreter = match interpreter {
            Some(interpreter) => interpreter,
            None => Self::find_python().await,
        };
        Self::probe(Launcher::Python { interpreter }).await
    }

    /// Native binary launcher; probes common install paths unless one is given
    pub async fn binary(path: Option<String>) -> Self {
        let path = match path {
            Some(path) => path,
            None => Self::find_ytdlp().await,
        };
        Self::probe(Launcher::Binary { path }).await
    }

    /// Find Python interpreter
    async fn find_python() -> String {
        let candidates = ["python3", "/opt/homebrew/bin/python3", "/usr/local/bin/python3"];
        let args = ["--version".to_string()];

        for cmd in candidates {
            if let Ok(output) = run_output_with_timeout(cmd, &args, PROBE_TIMEOUT_SECS).await {
                if output.status.success() {
                    return cmd.to_string();
                }
            }
        }

        "python3".to_string()
    }

    /// Find yt-dlp binary
    async fn find_ytdlp() -> String {
        let common_paths = [
            "/opt/homebrew/bin/yt-dlp", // Homebrew on Apple Silicon
            "/usr/local/bin/yt-dlp",    // Homebrew on Intel Mac
            "/usr/bin/yt-dlp",          // System installation
        ];

        for path in common_paths {
            if tokio::fs::try_exists(path).await.unwrap_or(false) {
                return path.to_string();
            }
        }

        // Try to find via `which`
        let args = ["yt-dlp".to_string()];
        if let Ok(output) = run_output_with_timeout("which", &args, PROBE_TIMEOUT_SECS).await {
            if output.status.success() {
                let path = String::from_utf8_lossy(&output.stdout);
                let trimmed = path.trim();
                if !trimmed.is_empty() {
                    return trimmed.to_string();
                }
            }
        }

        "yt-dlp".to_string()
    }

    fn program(&self) -> &str {
        match &self.launcher {
            Launcher::Python { interpreter } => interpreter,
            Launcher::Binary { path } => path,
        }
    }

    /// Installed yt-dlp version, if the probe found one
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    async fn probe_version(&self) -> Option<String> {
        let args: Vec<String> = match &self.launcher {
            Launcher::Python { .. } => vec![
                "-c".to_string(),
                "import yt_dlp; print(yt_dlp.version.__version__)".to_string(),
            ],
            Launcher::Binary { .. } => vec!["--version".to_string()],
        };

        match run_output_with_timeout(self.program(), &args, PROBE_TIMEOUT_SECS).await {
            Ok(out) if out.status.success() => {
                let version = String::from_utf8_lossy(&out.stdout).trim().to_string();
                Some(if version.is_empty() {
                    "unknown".to_string()
                } else {
                    version
                })
            }
            _ => None,
        }
    }

    /// Build command arguments
    pub(crate) fn build_args(&self, content_id: &str, request: &ExtractionRequest) -> Vec<String> {
        let mut args = Vec::new();

        if matches!(self.launcher, Launcher::Python { .. }) {
            args.push("-m".to_string());
            args.push("yt_dlp".to_string());
        }

        args.extend(
            [
                "--dump-json",
                "--no-playlist",
                "--no-warnings",
                "--no-check-certificates",
            ]
            .map(String::from),
        );

        if let Some(format) = &request.format {
            args.push("-f".to_string());
            args.push(format.to_string());
        }

        args.push("--socket-timeout".to_string());
        args.push(request.socket_timeout.to_string());
        args.push("--retries".to_string());
        args.push(request.retries.to_string());
        args.push("--extractor-retries".to_string());
        args.push(request.extractor_retries.to_string());
        args.push("--age-limit".to_string());
        args.push(request.age_limit.to_string());

        // Also binds the source address to 0.0.0.0
        if request.force_ipv4 {
            args.push("--force-ipv4".to_string());
        }

        args.push("--user-agent".to_string());
        args.push(request.headers.user_agent.clone());
        for (key, value) in &request.headers.extra {
            args.push("--add-header".to_string());
            args.push(format!("{}:{}", key, value));
        }

        // Player client for YouTube
        if !request.player_clients.is_empty() {
            args.push("--extractor-args".to_string());
            args.push(format!(
                "youtube:player_client={};player_skip=configs;skip=translated_subs,hls",
                request.player_clients.join(",")
            ));
            args.push("--compat-options".to_string());
            args.push("no-youtube-unavailable-videos".to_string());
        }

        // Proxy
        if let Some(proxy) = &request.proxy {
            args.push("--proxy".to_string());
            args.push(proxy.clone());
        }

        args.push(watch_url(content_id));
        args
    }

    /// Parse JSON output into ExtractedMedia
    fn parse_json(stdout: &[u8]) -> Result<ExtractedMedia, ResolveError> {
        let json_str = String::from_utf8_lossy(stdout);
        let json: serde_json::Value = serde_json::from_str(&json_str)
            .map_err(|e| ResolveError::Parse(format!("Invalid JSON: {}", e)))?;

        if !json.is_object() {
            return Err(ResolveError::Parse("Expected a JSON object".to_string()));
        }

        Ok(ExtractedMedia::from_json(&json))
    }
}

#[async_trait]
impl MediaExtractor for YtDlpExtractor {
    fn name(&self) -> &'static str {
        match self.launcher {
            Launcher::Python { .. } => "python-yt-dlp",
            Launcher::Binary { .. } => "cli-yt-dlp",
        }
    }

    fn is_available(&self) -> bool {
        self.version.is_some()
    }

    async fn extract(
        &self,
        content_id: &str,
        request: &ExtractionRequest,
    ) -> Result<ExtractedMedia, ResolveError> {
        let args = self.build_args(content_id, request);
        debug!(
            extractor = self.name(),
            format = request.format.as_ref().map(|f| f.as_str()).unwrap_or("default"),
            "[YtDlp] Running: {} {}",
            self.program(),
            args.join(" ")
        );

        let output = run_output_with_timeout(self.program(), &args, request.process_timeout).await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ResolveError::from(stderr.trim().to_string()));
        }

        Self::parse_json(&output.stdout)
    }
}
