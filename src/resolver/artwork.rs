// Artwork resolution
//
// Ordered chain of sources, first non-empty answer wins:
// 1. Catalog song page thumbnails (square preferred)
// 2. yt-dlp metadata (album art fields, official channel avatar, large thumbnails)
// 3. The caller's own thumbnail list with the size token rewritten
//
// Whatever wins is forced to the requested tier when it lives on a known
// image host.

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::{debug, warn};

use super::extractors::{ExtractionRequest, MediaExtractor};
use super::models::{ExtractedMedia, ThumbnailCandidate, ThumbnailQuality};
use crate::catalog::CatalogClient;
use crate::config::ResolverConfig;

lazy_static! {
    static ref SIZE_TOKEN_RE: Regex = Regex::new(r"w\d+-h\d+").unwrap();
}

const IMAGE_HOSTS: [&str; 3] = ["googleusercontent.com", "ytimg.com", "youtube.com"];
const OFFICIAL_UPLOADER_MARKERS: [&str; 5] = ["official", "records", "music", "vevo", "label"];

/// Inputs shared by every source in the chain
pub struct ArtworkRequest<'a> {
    pub content_id: &'a str,
    /// Thumbnails of the caller's catalog record, smallest first
    pub hint_thumbnails: &'a [ThumbnailCandidate],
    pub quality: ThumbnailQuality,
    pub catalog: Option<&'a dyn CatalogClient>,
}

/// One link of the artwork chain
#[async_trait]
pub trait ArtworkSource: Send + Sync {
    fn name(&self) -> &'static str;

    /// Artwork URL, or `None` to let the next source try
    async fn find(&self, request: &ArtworkRequest<'_>) -> Option<String>;
}

/// Catalog song page thumbnails
pub struct CatalogArtwork;

#[async_trait]
impl ArtworkSource for CatalogArtwork {
    fn name(&self) -> &'static str {
        "catalog"
    }

    async fn find(&self, request: &ArtworkRequest<'_>) -> Option<String> {
        let catalog = request.catalog?;

        let song = match catalog.get_song(request.content_id).await {
            Ok(song) => song,
            Err(e) => {
                warn!(content_id = request.content_id, "[Artwork] Catalog lookup failed: {}", e);
                return None;
            }
        };

        let thumbnails =
            ThumbnailCandidate::list_from_value(&song["videoDetails"]["thumbnail"]["thumbnails"]);
        pick_catalog_thumbnail(&thumbnails).map(|t| t.url.clone())
    }
}

/// Full yt-dlp metadata of the content id
pub struct ExtractorArtwork {
    extractor: Arc<dyn MediaExtractor>,
    config: Arc<ResolverConfig>,
}

impl ExtractorArtwork {
    pub fn new(extractor: Arc<dyn MediaExtractor>, config: Arc<ResolverConfig>) -> Self {
        Self { extractor, config }
    }
}

#[async_trait]
impl ArtworkSource for ExtractorArtwork {
    fn name(&self) -> &'static str {
        "extractor"
    }

    async fn find(&self, request: &ArtworkRequest<'_>) -> Option<String> {
        let extraction = ExtractionRequest::metadata_only(&self.config);

        let media = match self.extractor.extract(request.content_id, &extraction).await {
            Ok(media) => media,
            Err(e) => {
                warn!(
                    content_id = request.content_id,
                    "[Artwork] Metadata extraction failed: {}",
                    e
                );
                return None;
            }
        };

        metadata_artwork(&media)
            .or_else(|| pick_extractor_thumbnail(&media.thumbnails).map(|t| t.url.clone()))
    }
}

/// Last thumbnail of the caller's record, resized to the tier
pub struct HintArtwork;

#[async_trait]
impl ArtworkSource for HintArtwork {
    fn name(&self) -> &'static str {
        "hint"
    }

    async fn find(&self, request: &ArtworkRequest<'_>) -> Option<String> {
        request
            .hint_thumbnails
            .last()
            .filter(|t| !t.url.is_empty())
            .map(|t| rewrite_size_token(&t.url, request.quality))
    }
}

pub struct ArtworkResolver {
    sources: Vec<Box<dyn ArtworkSource>>,
}

impl ArtworkResolver {
    /// Default chain: catalog, extractor metadata, caller hint
    pub fn new(extractor: Arc<dyn MediaExtractor>, config: Arc<ResolverConfig>) -> Self {
        Self::with_sources(vec![
            Box::new(CatalogArtwork),
            Box::new(ExtractorArtwork::new(extractor, config)),
            Box::new(HintArtwork),
        ])
    }

    pub fn with_sources(sources: Vec<Box<dyn ArtworkSource>>) -> Self {
        Self { sources }
    }

    /// Artwork URL for `content_id`, empty when no source has one
    pub async fn resolve_artwork(
        &self,
        catalog: Option<&dyn CatalogClient>,
        content_id: &str,
        hint_thumbnails: &[ThumbnailCandidate],
        quality: ThumbnailQuality,
    ) -> String {
        let request = ArtworkRequest {
            content_id,
            hint_thumbnails,
            quality,
            catalog,
        };

        for source in &self.sources {
            if let Some(url) = source.find(&request).await.filter(|u| !u.is_empty()) {
                debug!(content_id, source = source.name(), "[Artwork] Found {}", url);
                return enforce_tier(&url, quality);
            }
        }

        debug!(content_id, "[Artwork] No artwork found");
        String::new()
    }
}

/// Largest near-square thumbnail, else the largest one
pub fn pick_catalog_thumbnail(thumbnails: &[ThumbnailCandidate]) -> Option<&ThumbnailCandidate> {
    let mut by_area: Vec<&ThumbnailCandidate> = thumbnails.iter().collect();
    by_area.sort_by(|a, b| b.area().cmp(&a.area()));

    by_area
        .iter()
        .find(|t| t.squareness() < 0.1)
        .or_else(|| by_area.first())
        .copied()
}

/// Among thumbnails of at least 720x720 the most square then largest,
/// else the largest overall
pub fn pick_extractor_thumbnail(thumbnails: &[ThumbnailCandidate]) -> Option<&ThumbnailCandidate> {
    let mut hq: Vec<&ThumbnailCandidate> = thumbnails
        .iter()
        .filter(|t| t.width >= 720 && t.height >= 720)
        .collect();

    if !hq.is_empty() {
        hq.sort_by(|a, b| {
            a.squareness()
                .partial_cmp(&b.squareness())
                .unwrap_or(Ordering::Equal)
                .then_with(|| b.area().cmp(&a.area()))
        });
        return hq.first().copied();
    }

    let mut by_area: Vec<&ThumbnailCandidate> = thumbnails.iter().collect();
    by_area.sort_by(|a, b| b.area().cmp(&a.area()));
    by_area.first().copied()
}

/// Explicit album art, or an official channel's avatar, for album tracks
pub fn metadata_artwork(media: &ExtractedMedia) -> Option<String> {
    if media.album.is_none() || media.album_artist.is_none() {
        return None;
    }

    if let Some(url) = media.explicit_artwork.first() {
        return Some(url.clone());
    }

    let uploader = media.uploader.as_deref().unwrap_or("").to_lowercase();
    if OFFICIAL_UPLOADER_MARKERS.iter().any(|m| uploader.contains(m)) {
        return media.uploader_avatar.clone();
    }

    None
}

/// Replace every `w<digits>-h<digits>` token with the tier's square size
pub fn rewrite_size_token(url: &str, quality: ThumbnailQuality) -> String {
    SIZE_TOKEN_RE
        .replace_all(url, quality.size_token().as_str())
        .into_owned()
}

/// Force the tier size on known image hosts, leave other URLs alone
pub fn enforce_tier(url: &str, quality: ThumbnailQuality) -> String {
    if IMAGE_HOSTS.iter().any(|host| url.contains(host)) {
        rewrite_size_token(url, quality)
    } else {
        url.to_string()
    }
}
