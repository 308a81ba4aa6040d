// Extractor orchestrator - mode selection and Python → CLI fallback
//
// Strategy:
// 1. Python mode preferred (better anti-bot bypass)
// 2. CLI binary as fallback
// 3. Only local failures (missing tool, crash, bad output) reach the fallback;
//    blocked or unavailable answers go straight back to the caller

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, warn};

use super::diagnostics::diagnose_error;
use super::traits::{ExtractionRequest, ExtractorMode, MediaExtractor};
use super::ytdlp::YtDlpExtractor;
use crate::config::ResolverConfig;
use crate::resolver::errors::{ResolveError, StrategyDisposition};
use crate::resolver::models::ExtractedMedia;

/// Orchestrator that manages the Python and CLI extractors
pub struct ExtractorChain {
    mode: ExtractorMode,
    python: Box<dyn MediaExtractor>,
    cli: Box<dyn MediaExtractor>,
}

impl ExtractorChain {
    pub fn new(
        mode: ExtractorMode,
        python: Box<dyn MediaExtractor>,
        cli: Box<dyn MediaExtractor>,
    ) -> Self {
        Self { mode, python, cli }
    }

    /// yt-dlp launchers as configured, probed up front
    pub async fn from_config(config: &ResolverConfig) -> Self {
        let (python, cli) = tokio::join!(
            YtDlpExtractor::python(config.python.clone()),
            YtDlpExtractor::binary(config.ytdlp_path.clone()),
        );
        Self::new(config.mode, Box::new(python), Box::new(cli))
    }

    /// Extractors in the order they are tried
    fn order(&self) -> Vec<&dyn MediaExtractor> {
        match self.mode {
            ExtractorMode::Python => vec![self.python.as_ref()],
            ExtractorMode::Cli => vec![self.cli.as_ref()],
            ExtractorMode::Auto => vec![self.python.as_ref(), self.cli.as_ref()],
        }
    }
}

#[async_trait]
impl MediaExtractor for ExtractorChain {
    fn name(&self) -> &'static str {
        "extractor-chain"
    }

    fn is_available(&self) -> bool {
        self.order().iter().any(|e| e.is_available())
    }

    async fn extract(
        &self,
        content_id: &str,
        request: &ExtractionRequest,
    ) -> Result<ExtractedMedia, ResolveError> {
        let mut last_error = None;

        for extractor in self.order() {
            if !extractor.is_available() {
                debug!("[Orchestrator] {} not available, skipping", extractor.name());
                continue;
            }

            debug!("[Orchestrator] Trying {} for {}", extractor.name(), content_id);
            match extractor.extract(content_id, request).await {
                Ok(media) => return Ok(media),
                Err(e) => {
                    let reason = diagnose_error(&e.to_string());
                    warn!(
                        extractor = extractor.name(),
                        reason = reason.map(|r| r.description()).unwrap_or("none"),
                        "[Orchestrator] {} failed: {}",
                        extractor.name(),
                        e
                    );
                    // The next backend would repeat the same request against the same service
                    if e.disposition() != StrategyDisposition::Next {
                        return Err(e);
                    }
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            ResolveError::ToolNotFound(format!(
                "No yt-dlp backend available for mode {}",
                self.mode
            ))
        }))
    }
}

/// Readiness of the extraction backends
#[derive(Debug, Clone, Serialize)]
pub struct BackendStatus {
    pub success: bool,
    pub python_ready: bool,
    pub python_version: Option<String>,
    pub cli_ready: bool,
    pub cli_version: Option<String>,
    pub message: String,
}

/// Probe both yt-dlp launchers
pub async fn status(config: &ResolverConfig) -> BackendStatus {
    let (python, cli) = tokio::join!(
        YtDlpExtractor::python(config.python.clone()),
        YtDlpExtractor::binary(config.ytdlp_path.clone()),
    );
    let python_version = python.version().map(str::to_string);
    let cli_version = cli.version().map(str::to_string);

    let success = python_version.is_some() || cli_version.is_some();
    let message = match (&python_version, &cli_version) {
        (Some(_), Some(_)) => "All systems ready".to_string(),
        (Some(v), None) => format!("Python yt_dlp {} ready, yt-dlp binary missing", v),
        (None, Some(v)) => format!("yt-dlp binary {} ready, Python yt_dlp missing", v),
        (None, None) => {
            "yt-dlp not found. Install: pip3 install yt-dlp OR brew install yt-dlp".to_string()
        }
    };

    BackendStatus {
        success,
        python_ready: python_version.is_some(),
        python_version,
        cli_ready: cli_version.is_some(),
        cli_version,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    struct FakeExtractor {
        name: &'static str,
        available: bool,
        result: Result<ExtractedMedia, ResolveError>,
        calls: Arc<AtomicU32>,
    }

    impl FakeExtractor {
        fn boxed(
            name: &'static str,
            available: bool,
            result: Result<ExtractedMedia, ResolveError>,
        ) -> (Box<dyn MediaExtractor>, Arc<AtomicU32>) {
            let calls = Arc::new(AtomicU32::new(0));
            let fake = Self {
                name,
                available,
                result,
                calls: calls.clone(),
            };
            (Box::new(fake), calls)
        }
    }

    #[async_trait]
    impl MediaExtractor for FakeExtractor {
        fn name(&self) -> &'static str {
            self.name
        }

        fn is_available(&self) -> bool {
            self.available
        }

        async fn extract(
            &self,
            _content_id: &str,
            _request: &ExtractionRequest,
        ) -> Result<ExtractedMedia, ResolveError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }
    }

    fn make_media(id: &str) -> ExtractedMedia {
        ExtractedMedia {
            id: id.to_string(),
            ..Default::default()
        }
    }

    fn request() -> ExtractionRequest {
        ExtractionRequest::metadata_only(&ResolverConfig::default())
    }

    #[tokio::test]
    async fn test_auto_falls_back_to_cli() {
        let (python, _) = FakeExtractor::boxed(
            "py",
            true,
            Err(ResolveError::Execution("Traceback: ModuleNotFoundError".to_string())),
        );
        let (cli, cli_calls) = FakeExtractor::boxed("cli", true, Ok(make_media("from-cli")));
        let chain = ExtractorChain::new(ExtractorMode::Auto, python, cli);

        let media = chain.extract("abc", &request()).await.unwrap();
        assert_eq!(media.id, "from-cli");
        assert_eq!(cli_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_forbidden_does_not_hit_cli() {
        let (python, py_calls) =
            FakeExtractor::boxed("py", true, Err(ResolveError::from("HTTP Error 403: Forbidden")));
        let (cli, cli_calls) = FakeExtractor::boxed("cli", true, Ok(make_media("from-cli")));
        let chain = ExtractorChain::new(ExtractorMode::Auto, python, cli);

        let err = chain.extract("abc", &request()).await.unwrap_err();
        assert_eq!(err.disposition(), StrategyDisposition::DelayThenNext);
        assert_eq!(py_calls.load(Ordering::SeqCst), 1);
        assert_eq!(cli_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_rate_limit_does_not_hit_cli() {
        let (python, _) =
            FakeExtractor::boxed("py", true, Err(ResolveError::from("HTTP Error 429: Too Many Requests")));
        let (cli, cli_calls) = FakeExtractor::boxed("cli", true, Ok(make_media("from-cli")));
        let chain = ExtractorChain::new(ExtractorMode::Auto, python, cli);

        assert!(chain.extract("abc", &request()).await.is_err());
        assert_eq!(cli_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unavailable_skips_fallback() {
        let (python, _) = FakeExtractor::boxed("py", true, Err(ResolveError::from("Video unavailable")));
        let (cli, cli_calls) = FakeExtractor::boxed("cli", true, Ok(make_media("from-cli")));
        let chain = ExtractorChain::new(ExtractorMode::Auto, python, cli);

        let err = chain.extract("abc", &request()).await.unwrap_err();
        assert!(matches!(err, ResolveError::Unavailable(_)));
        assert_eq!(cli_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unavailable_backends_are_skipped() {
        let (python, py_calls) = FakeExtractor::boxed("py", false, Ok(make_media("py")));
        let (cli, _) = FakeExtractor::boxed("cli", true, Ok(make_media("cli")));
        let chain = ExtractorChain::new(ExtractorMode::Auto, python, cli);

        let media = chain.extract("abc", &request()).await.unwrap();
        assert_eq!(media.id, "cli");
        assert_eq!(py_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_nothing_available() {
        let (python, _) = FakeExtractor::boxed("py", false, Ok(make_media("py")));
        let (cli, _) = FakeExtractor::boxed("cli", false, Ok(make_media("cli")));
        let chain = ExtractorChain::new(ExtractorMode::Auto, python, cli);

        assert!(!chain.is_available());
        let err = chain.extract("abc", &request()).await.unwrap_err();
        assert!(matches!(err, ResolveError::ToolNotFound(_)));
    }

    #[tokio::test]
    async fn test_cli_mode_only_uses_cli() {
        let (python, py_calls) = FakeExtractor::boxed("py", true, Ok(make_media("py")));
        let (cli, _) = FakeExtractor::boxed("cli", true, Ok(make_media("cli")));
        let chain = ExtractorChain::new(ExtractorMode::Cli, python, cli);

        assert_eq!(chain.extract("abc", &request()).await.unwrap().id, "cli");
        assert_eq!(py_calls.load(Ordering::SeqCst), 0);
    }
}
