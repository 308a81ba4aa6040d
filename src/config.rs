// Configuration for the resolvers
//
// Defaults mirror what the music client ships with. Every value can be
// overridden with the `with_*` builders; the CLI maps its flags onto them.

use std::time::Duration;

use crate::resolver::extractors::ExtractorMode;
use crate::resolver::format_selector::{default_strategies, FormatStrategy};
use crate::resolver::retry::RetryPolicy;

/// Sleeps inserted between backend calls
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pacing {
    /// Random delay before every extraction, lower bound
    pub pre_request_min: Duration,
    /// Random delay before every extraction, upper bound
    pub pre_request_max: Duration,
    /// Fixed delay after a 403 or network failure
    pub error_delay: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            pre_request_min: Duration::from_millis(500),
            pre_request_max: Duration::from_millis(1500),
            error_delay: Duration::from_secs(2),
        }
    }
}

impl Pacing {
    /// No sleeping at all (tests, local mirrors)
    pub fn none() -> Self {
        Self {
            pre_request_min: Duration::ZERO,
            pre_request_max: Duration::ZERO,
            error_delay: Duration::ZERO,
        }
    }
}

/// Media resolution settings
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Extraction mode (Python, CLI, or Auto)
    pub mode: ExtractorMode,
    /// Explicit yt-dlp binary, skips path probing
    pub ytdlp_path: Option<String>,
    /// Explicit Python interpreter, skips interpreter probing
    pub python: Option<String>,
    /// SOCKS5/HTTP proxy URL
    pub proxy: Option<String>,
    /// Catalog region, upper-cased
    pub country: String,
    /// yt-dlp socket timeout in seconds
    pub socket_timeout: u32,
    /// Wall-clock limit for one yt-dlp process in seconds
    pub process_timeout: u64,
    pub retries: u32,
    pub extractor_retries: u32,
    pub age_limit: u32,
    pub force_ipv4: bool,
    /// YouTube player clients, in preference order
    pub player_clients: Vec<String>,
    pub strategies: Vec<FormatStrategy>,
    pub pacing: Pacing,
    /// Catalog initialization and search attempts
    pub catalog_retry: RetryPolicy,
    /// Per-item audio attempts inside the aggregators
    pub item_audio_retry: RetryPolicy,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            mode: ExtractorMode::Auto,
            ytdlp_path: None,
            python: None,
            proxy: None,
            country: "US".to_string(),
            socket_timeout: 30,
            process_timeout: 30,
            retries: 3,
            extractor_retries: 3,
            age_limit: 99,
            force_ipv4: true,
            player_clients: vec!["android".to_string(), "web".to_string()],
            strategies: default_strategies(),
            pacing: Pacing::default(),
            catalog_retry: RetryPolicy::exponential(3).with_jitter(true),
            item_audio_retry: RetryPolicy::fixed(3, Duration::from_secs(1)),
        }
    }
}

impl ResolverConfig {
    /// Defaults plus `YTDLP_PATH`, `YTDLP_PYTHON`, `YTMUSIC_PROXY`, `YTMUSIC_COUNTRY`
    pub fn from_env() -> Self {
        let var = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());

        let mut config = Self::default()
            .with_ytdlp_path(var("YTDLP_PATH"))
            .with_python(var("YTDLP_PYTHON"))
            .with_proxy(var("YTMUSIC_PROXY"));

        if let Some(country) = var("YTMUSIC_COUNTRY") {
            config = config.with_country(&country);
        }
        config
    }

    pub fn with_mode(mut self, mode: ExtractorMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_ytdlp_path(mut self, path: Option<String>) -> Self {
        self.ytdlp_path = path;
        self
    }

    pub fn with_python(mut self, python: Option<String>) -> Self {
        self.python = python;
        self
    }

    pub fn with_proxy(mut self, proxy: Option<String>) -> Self {
        self.proxy = proxy;
        self
    }

    /// Empty input keeps the default region
    pub fn with_country(mut self, country: &str) -> Self {
        let country = country.trim();
        if !country.is_empty() {
            self.country = country.to_uppercase();
        }
        self
    }

    pub fn with_socket_timeout(mut self, seconds: u32) -> Self {
        self.socket_timeout = seconds;
        self
    }

    pub fn with_process_timeout(mut self, seconds: u64) -> Self {
        self.process_timeout = seconds;
        self
    }

    pub fn with_strategies(mut self, strategies: Vec<FormatStrategy>) -> Self {
        self.strategies = strategies;
        self
    }

    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    /// Same attempt ceilings, zero sleeps everywhere
    pub fn without_delays(mut self) -> Self {
        self.pacing = Pacing::none();
        self.catalog_retry = self.catalog_retry.without_delay();
        self.item_audio_retry = self.item_audio_retry.without_delay();
        self
    }
}

/// Lyrics lookup settings
#[derive(Debug, Clone)]
pub struct LyricsConfig {
    /// Lines scanned from each end when trimming credit lines
    pub trim_window: usize,
    /// Accepted difference between catalog and provider durations, seconds
    pub duration_tolerance: u32,
    /// Songs requested from the provider's song search
    pub page_size: u32,
    /// Per-request HTTP timeout in seconds
    pub http_timeout: u64,
    pub proxy: Option<String>,
}

impl Default for LyricsConfig {
    fn default() -> Self {
        Self {
            trim_window: 30,
            duration_tolerance: 8,
            page_size: 8,
            http_timeout: 10,
            proxy: None,
        }
    }
}

impl LyricsConfig {
    pub fn with_trim_window(mut self, lines: usize) -> Self {
        self.trim_window = lines;
        self
    }

    pub fn with_duration_tolerance(mut self, seconds: u32) -> Self {
        self.duration_tolerance = seconds;
        self
    }

    pub fn with_proxy(mut self, proxy: Option<String>) -> Self {
        self.proxy = proxy;
        self
    }

    pub fn with_http_timeout(mut self, seconds: u64) -> Self {
        self.http_timeout = seconds;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ResolverConfig::default();
        assert_eq!(config.country, "US");
        assert_eq!(config.strategies.len(), 4);
        assert_eq!(config.age_limit, 99);
        assert_eq!(config.pacing.error_delay, Duration::from_secs(2));
        assert_eq!(config.item_audio_retry.max_attempts, 3);

        let lyrics = LyricsConfig::default();
        assert_eq!(lyrics.trim_window, 30);
        assert_eq!(lyrics.duration_tolerance, 8);
    }

    #[test]
    fn test_country_is_normalized() {
        assert_eq!(ResolverConfig::default().with_country("de").country, "DE");
        assert_eq!(ResolverConfig::default().with_country("  ").country, "US");
    }

    #[test]
    fn test_without_delays_keeps_attempts() {
        let config = ResolverConfig::default().without_delays();
        assert_eq!(config.pacing, Pacing::none());
        assert_eq!(config.catalog_retry.max_attempts, 3);
        assert_eq!(config.catalog_retry.delay_for(2), Duration::ZERO);
        assert_eq!(config.item_audio_retry.delay_for(0), Duration::ZERO);
    }
}
