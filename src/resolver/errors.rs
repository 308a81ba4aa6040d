// Error types for media resolution

use thiserror::Error;

use super::extractors::diagnostics::{diagnose_error, BlockingReason};

#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    /// The media host answered HTTP 403 (throttling, bot checks)
    #[error("Access denied (HTTP 403): {0}")]
    Forbidden(String),

    /// HTTP 429 or similar pacing complaints
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Content is gone for this id; no strategy can recover it
    #[error("Content unavailable: {0}")]
    Unavailable(String),

    /// Timeouts, refused or reset connections
    #[error("Network error: {0}")]
    Network(String),

    /// DRM-protected content reported by the backend itself
    #[error("DRM-protected content: {0}")]
    DrmProtected(String),

    /// yt-dlp or python not found in system
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// Failed to parse yt-dlp JSON output
    #[error("Parse error: {0}")]
    Parse(String),

    /// Command execution failed
    #[error("Execution error: {0}")]
    Execution(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

/// What the strategy loop does after an attempt failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyDisposition {
    /// Wait for the configured error delay, then try the next strategy
    DelayThenNext,
    /// Stop trying strategies for this content id
    Abort,
    /// Try the next strategy right away
    Next,
}

impl ResolveError {
    pub fn disposition(&self) -> StrategyDisposition {
        match self {
            Self::Forbidden(_) | Self::RateLimited(_) | Self::Network(_) => {
                StrategyDisposition::DelayThenNext
            }
            Self::Unavailable(_) => StrategyDisposition::Abort,
            _ => StrategyDisposition::Next,
        }
    }
}

// Backend stderr is the only signal we get, so classify by message
impl From<String> for ResolveError {
    fn from(s: String) -> Self {
        match diagnose_error(&s) {
            Some(BlockingReason::Http403Forbidden) => return Self::Forbidden(s),
            Some(BlockingReason::VideoUnavailable) => return Self::Unavailable(s),
            Some(BlockingReason::RateLimited) => return Self::RateLimited(s),
            Some(BlockingReason::NetworkTimeout) => return Self::Network(s),
            Some(BlockingReason::DrmProtected) => return Self::DrmProtected(s),
            _ => {}
        }

        let lower = s.to_lowercase();

        if lower.contains("command not found") || lower.contains("no such file") {
            return Self::ToolNotFound(s);
        }

        if lower.contains("invalid json") || lower.contains("parse") {
            return Self::Parse(s);
        }

        Self::Unknown(s)
    }
}

impl From<&str> for ResolveError {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}
