// MediaExtractor trait and common types

use async_trait::async_trait;
use std::fmt;

use crate::config::ResolverConfig;
use crate::resolver::errors::ResolveError;
use crate::resolver::format_selector::FormatStrategy;
use crate::resolver::models::ExtractedMedia;
use crate::resolver::utils::{generate_headers, RequestHeaders};

/// Extraction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ExtractorMode {
    /// Python module yt_dlp (better for YouTube, avoids bot detection)
    Python,
    /// CLI binary yt-dlp (faster, no Python dependency)
    Cli,
    /// Auto-select: Python → CLI fallback
    #[default]
    Auto,
}

impl fmt::Display for ExtractorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Python => write!(f, "python"),
            Self::Cli => write!(f, "cli"),
            Self::Auto => write!(f, "auto"),
        }
    }
}

/// Options for a single extraction call
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    /// yt-dlp format selector; `None` leaves the backend default
    pub format: Option<FormatStrategy>,
    pub headers: RequestHeaders,
    /// SOCKS5/HTTP proxy URL
    pub proxy: Option<String>,
    pub socket_timeout: u32,
    /// Wall-clock limit for the whole call
    pub process_timeout: u64,
    pub retries: u32,
    pub extractor_retries: u32,
    pub age_limit: u32,
    pub force_ipv4: bool,
    /// YouTube player clients; empty skips the extractor args
    pub player_clients: Vec<String>,
}

impl ExtractionRequest {
    /// Stream lookup for one format strategy, with a fresh random User-Agent
    pub fn for_format(strategy: &FormatStrategy, config: &ResolverConfig) -> Self {
        Self {
            format: Some(strategy.clone()),
            headers: generate_headers(),
            proxy: config.proxy.clone(),
            socket_timeout: config.socket_timeout,
            process_timeout: config.process_timeout,
            retries: config.retries,
            extractor_retries: config.extractor_retries,
            age_limit: config.age_limit,
            force_ipv4: config.force_ipv4,
            player_clients: config.player_clients.clone(),
        }
    }

    /// Full metadata (thumbnails, album fields) without picking a format
    pub fn metadata_only(config: &ResolverConfig) -> Self {
        Self {
            format: None,
            headers: generate_headers(),
            proxy: config.proxy.clone(),
            socket_timeout: config.socket_timeout,
            process_timeout: config.process_timeout,
            retries: 2,
            extractor_retries: config.extractor_retries,
            age_limit: config.age_limit,
            force_ipv4: config.force_ipv4,
            player_clients: Vec::new(),
        }
    }
}

/// Trait for stream-extraction backends
#[async_trait]
pub trait MediaExtractor: Send + Sync {
    /// Name of the extractor (for logging)
    fn name(&self) -> &'static str;

    /// Check if this extractor is available
    fn is_available(&self) -> bool {
        true
    }

    /// Extract metadata and formats without downloading
    async fn extract(
        &self,
        content_id: &str,
        request: &ExtractionRequest,
    ) -> Result<ExtractedMedia, ResolveError>;
}

/// Watch page for a content id
pub fn watch_url(content_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", content_id)
}
