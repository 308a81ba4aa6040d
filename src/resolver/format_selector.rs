// FormatSelector - picks the playable stream out of an extraction result
//
// Handles:
// - Policy exclusions (live, unavailable, DRM)
// - Filtering manifests, HLS playlists and video-only streams
// - Bitrate ranking (abr, then tbr)

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;

use super::models::{ExtractedMedia, StreamCandidate};

/// One yt-dlp format selector expression
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatStrategy(pub String);

impl FormatStrategy {
    pub fn new(expr: impl Into<String>) -> Self {
        Self(expr.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FormatStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Strategies tried in order, from most to least compatible
pub fn default_strategies() -> Vec<FormatStrategy> {
    [
        "bestaudio[ext=m4a]/bestaudio[ext=mp4]/best[ext=m4a]/best[ext=mp4]",
        "251/250/249/140/139/171/18/22",
        "bestaudio/best",
        "worstaudio/worst",
    ]
    .into_iter()
    .map(FormatStrategy::new)
    .collect()
}

/// Why an extraction result yielded no stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MediaRejection {
    #[error("live stream")]
    Live,
    #[error("marked unavailable")]
    Unavailable,
    #[error("DRM-protected")]
    DrmProtected,
    #[error("no usable audio candidates")]
    NoAudio,
}

pub struct FormatSelector;

impl FormatSelector {
    /// Highest-bitrate usable candidate of `media`
    pub fn select(media: &ExtractedMedia) -> Result<&StreamCandidate, MediaRejection> {
        if media.is_live {
            return Err(MediaRejection::Live);
        }
        if media.is_unplayable() {
            return Err(MediaRejection::Unavailable);
        }
        if media.has_drm() {
            return Err(MediaRejection::DrmProtected);
        }

        let mut usable: Vec<&StreamCandidate> = media
            .stream_candidates()
            .into_iter()
            .filter(|c| c.is_streamable())
            .collect();

        // Stable sort: equal bitrates keep backend order
        usable.sort_by(|a, b| {
            b.bitrate()
                .partial_cmp(&a.bitrate())
                .unwrap_or(Ordering::Equal)
        });

        usable.into_iter().next().ok_or(MediaRejection::NoAudio)
    }
}
