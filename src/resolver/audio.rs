// Audio stream resolution
//
// Walks the format strategies in order and returns the best direct audio
// URL of the first strategy that yields one. Failures never escape:
// exhaustion is reported as `None`.

use std::sync::Arc;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use super::errors::StrategyDisposition;
use super::extractors::{ExtractionRequest, MediaExtractor};
use super::format_selector::FormatSelector;
use super::models::AudioQuality;
use super::retry::random_delay;
use crate::config::ResolverConfig;

pub struct AudioResolver {
    extractor: Arc<dyn MediaExtractor>,
    config: Arc<ResolverConfig>,
}

impl AudioResolver {
    pub fn new(extractor: Arc<dyn MediaExtractor>, config: Arc<ResolverConfig>) -> Self {
        Self { extractor, config }
    }

    /// Best playable audio URL for `content_id`, or `None` when no strategy works
    ///
    /// The strategy list does not depend on `quality`; it is only logged.
    pub async fn resolve_audio(&self, content_id: &str, quality: AudioQuality) -> Option<String> {
        let pacing = self.config.pacing;
        debug!(content_id, %quality, "[Audio] Resolving stream");

        for (index, strategy) in self.config.strategies.iter().enumerate() {
            let request = ExtractionRequest::for_format(strategy, &self.config);
            random_delay(pacing.pre_request_min, pacing.pre_request_max).await;

            let media = match self.extractor.extract(content_id, &request).await {
                Ok(media) => media,
                Err(e) => match e.disposition() {
                    StrategyDisposition::DelayThenNext => {
                        warn!(content_id, strategy = index, "[Audio] {}, backing off", e);
                        sleep(pacing.error_delay).await;
                        continue;
                    }
                    StrategyDisposition::Abort => {
                        warn!(content_id, "[Audio] Giving up: {}", e);
                        break;
                    }
                    StrategyDisposition::Next => {
                        debug!(content_id, strategy = index, "[Audio] Strategy failed: {}", e);
                        continue;
                    }
                },
            };

            match FormatSelector::select(&media) {
                Ok(candidate) => {
                    if let Some(url) = candidate.url.clone() {
                        info!(
                            content_id,
                            strategy = %strategy,
                            format_id = candidate.format_id.as_deref().unwrap_or("?"),
                            bitrate = candidate.bitrate(),
                            "[Audio] Found stream"
                        );
                        return Some(url);
                    }
                }
                Err(rejection) => {
                    debug!(content_id, strategy = index, "[Audio] Skipping strategy: {}", rejection);
                }
            }
        }

        warn!(content_id, "[Audio] No playable source");
        None
    }
}
