// Blocking diagnostics - classifies extraction backend failures
//
// yt-dlp reports everything through stderr text, so the resolvers decide
// between "wait and move on", "give up on this id" and "just move on" by
// matching known message fragments here.

use serde::{Deserialize, Serialize};

/// What a failed extraction most likely ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockingReason {
    /// 403 from the stream host, usually throttling or a stale signature
    Http403Forbidden,
    /// Removed, private or region-locked; no strategy will help
    VideoUnavailable,
    DrmProtected,
    RateLimited,
    /// "Sign in to confirm you're not a bot" and friends
    BotDetection,
    AgeRestricted,
    NetworkTimeout,
    Unknown,
}

impl BlockingReason {
    /// Short label for log lines
    pub fn description(&self) -> &'static str {
        match self {
            Self::Http403Forbidden => "Access denied (HTTP 403)",
            Self::VideoUnavailable => "Video unavailable",
            Self::DrmProtected => "DRM-protected content",
            Self::RateLimited => "Rate limited",
            Self::BotDetection => "Bot detection triggered",
            Self::AgeRestricted => "Age-restricted content",
            Self::NetworkTimeout => "Network timeout or connection failure",
            Self::Unknown => "Unknown blocking reason",
        }
    }
}

/// Classify backend stderr; `None` only for an empty message
pub fn diagnose_error(error: &str) -> Option<BlockingReason> {
    let lower = error.to_lowercase();

    // 403 first: throttled responses often also mention unavailable formats
    if lower.contains("http error 403") || lower.contains("403: forbidden") {
        return Some(BlockingReason::Http403Forbidden);
    }

    if lower.contains("unavailable") || lower.contains("video has been removed") {
        return Some(BlockingReason::VideoUnavailable);
    }

    if lower.contains("drm")
        || lower.contains("widevine")
        || lower.contains("playready")
        || lower.contains("fairplay")
    {
        return Some(BlockingReason::DrmProtected);
    }

    if lower.contains("429") || lower.contains("too many requests") || lower.contains("rate limit") {
        return Some(BlockingReason::RateLimited);
    }

    if lower.contains("not a bot") || lower.contains("captcha") || lower.contains("unusual traffic") {
        return Some(BlockingReason::BotDetection);
    }

    if lower.contains("confirm your age") || lower.contains("age-restricted") {
        return Some(BlockingReason::AgeRestricted);
    }

    if lower.contains("timeout")
        || lower.contains("timed out")
        || lower.contains("connection refused")
        || lower.contains("connection reset")
        || lower.contains("network is unreachable")
        || lower.contains("temporary failure in name resolution")
    {
        return Some(BlockingReason::NetworkTimeout);
    }

    if !error.trim().is_empty() {
        return Some(BlockingReason::Unknown);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_403_detection() {
        let error = "ERROR: HTTP Error 403: Forbidden";
        assert_eq!(diagnose_error(error), Some(BlockingReason::Http403Forbidden));
    }

    #[test]
    fn test_unavailable_detection() {
        let error = "ERROR: [youtube] dQw4w9WgXcQ: Video unavailable. This video is private";
        assert_eq!(diagnose_error(error), Some(BlockingReason::VideoUnavailable));
    }

    #[test]
    fn test_drm_detection() {
        let error = "This video is DRM protected";
        assert_eq!(diagnose_error(error), Some(BlockingReason::DrmProtected));
    }

    #[test]
    fn test_timeout_detection() {
        let error = "Timed out after 30s";
        assert_eq!(diagnose_error(error), Some(BlockingReason::NetworkTimeout));
    }

    #[test]
    fn test_rate_limit_detection() {
        let error = "HTTP Error 429: Too Many Requests";
        assert_eq!(diagnose_error(error), Some(BlockingReason::RateLimited));
    }

    #[test]
    fn test_empty_message() {
        assert_eq!(diagnose_error("   "), None);
        assert_eq!(diagnose_error("something odd"), Some(BlockingReason::Unknown));
    }
}
