// Streaming song aggregators
//
// Each aggregator turns catalog records into `SongDetails`, resolving artwork
// and audio per item, and yields them one at a time. A failing item is
// counted and skipped; it never ends the stream.

use async_stream::stream;
use futures_util::Stream;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::catalog::{CatalogError, CatalogFactory, CatalogHandle, SearchFilter, SongDetails, SongRecord};
use crate::config::ResolverConfig;
use crate::resolver::extractors::MediaExtractor;
use crate::resolver::models::{AudioQuality, ThumbnailQuality};
use crate::resolver::{ArtworkResolver, AudioResolver};

const SEED_SEARCH_LIMIT: usize = 10;
const ARTIST_SEARCH_LIMIT: usize = 5;
const ARTIST_ALBUM_FALLBACK: usize = 5;

/// What to resolve for every yielded song
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    pub limit: usize,
    pub thumb_quality: ThumbnailQuality,
    pub audio_quality: AudioQuality,
    pub include_audio_url: bool,
    pub include_album_art: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            limit: 10,
            thumb_quality: ThumbnailQuality::VeryHigh,
            audio_quality: AudioQuality::High,
            include_audio_url: true,
            include_album_art: true,
        }
    }
}

impl SearchOptions {
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Metadata only: no artwork lookups, no audio extraction
    pub fn metadata_only(mut self) -> Self {
        self.include_audio_url = false;
        self.include_album_art = false;
        self
    }
}

#[derive(Debug, Default)]
struct BatchSummary {
    yielded: usize,
    skipped: usize,
}

impl BatchSummary {
    fn log(&self, label: &str) {
        info!(
            yielded = self.yielded,
            skipped = self.skipped,
            "[Batch] {} finished: {} songs (skipped {})",
            label,
            self.yielded,
            self.skipped
        );
    }
}

/// Catalog-backed song aggregator
pub struct MusicSearcher {
    catalog: CatalogHandle,
    audio: AudioResolver,
    artwork: ArtworkResolver,
    config: Arc<ResolverConfig>,
}

impl MusicSearcher {
    pub fn new(
        catalog: CatalogHandle,
        extractor: Arc<dyn MediaExtractor>,
        config: Arc<ResolverConfig>,
    ) -> Self {
        Self {
            catalog,
            audio: AudioResolver::new(extractor.clone(), config.clone()),
            artwork: ArtworkResolver::new(extractor, config.clone()),
            config,
        }
    }

    /// Connect the catalog for `config.country`, then build the searcher
    pub async fn connect(
        factory: Arc<dyn CatalogFactory>,
        extractor: Arc<dyn MediaExtractor>,
        config: Arc<ResolverConfig>,
    ) -> Result<Self, CatalogError> {
        let catalog = CatalogHandle::connect(factory, &config.country, config.catalog_retry).await?;
        Ok(Self::new(catalog, extractor, config))
    }

    /// Songs matching `query`
    pub fn search_music<'a>(
        &'a mut self,
        query: &'a str,
        options: SearchOptions,
    ) -> impl Stream<Item = SongDetails> + 'a {
        stream! {
            info!(query, limit = options.limit, "[Search] Starting search");
            let results = self
                .search_or_empty(query, SearchFilter::Songs, options.limit * 3)
                .await;

            let mut summary = BatchSummary::default();
            for item in &results {
                if summary.yielded >= options.limit {
                    debug!("[Search] Reached limit of {}", options.limit);
                    break;
                }

                let record = SongRecord::from_value(item, None);
                match self.assemble(&record, &options).await {
                    Some(details) => {
                        summary.yielded += 1;
                        yield details;
                    }
                    None => summary.skipped += 1,
                }
            }
            summary.log("search");
        }
    }

    /// Radio tracks related to a song, the song itself excluded
    pub fn related_songs<'a>(
        &'a mut self,
        song_name: &'a str,
        artist_name: &'a str,
        options: SearchOptions,
    ) -> impl Stream<Item = SongDetails> + 'a {
        stream! {
            let tracks = self.related_tracks(song_name, artist_name).await;

            let mut summary = BatchSummary::default();
            if let Some((seed, tracks)) = tracks {
                debug!(seed = %seed, count = tracks.len(), "[Related] Processing tracks");
                for item in &tracks {
                    if summary.yielded >= options.limit {
                        break;
                    }

                    let record = SongRecord::from_value(item, None);
                    if record.video_id.as_deref() == Some(seed.as_str()) {
                        summary.skipped += 1;
                        continue;
                    }

                    match self.assemble(&record, &options).await {
                        Some(mut details) => {
                            details.is_original = Some(false);
                            summary.yielded += 1;
                            yield details;
                        }
                        None => summary.skipped += 1,
                    }
                }
            }
            summary.log("related");
        }
    }

    /// Songs of the best-matching artist
    pub fn artist_songs<'a>(
        &'a mut self,
        artist_name: &'a str,
        options: SearchOptions,
    ) -> impl Stream<Item = SongDetails> + 'a {
        stream! {
            let songs = self.artist_tracks(artist_name).await;
            info!(artist = artist_name, count = songs.len(), "[Artist] Processing songs");

            let mut summary = BatchSummary::default();
            for item in &songs {
                if summary.yielded >= options.limit {
                    break;
                }

                let record = SongRecord::from_value(item, Some(artist_name));
                match self.assemble(&record, &options).await {
                    Some(mut details) => {
                        details.artist_name = Some(artist_name.to_string());
                        summary.yielded += 1;
                        yield details;
                    }
                    None => summary.skipped += 1,
                }
            }
            summary.log("artist");
        }
    }

    async fn search_or_empty(&mut self, query: &str, filter: SearchFilter, limit: usize) -> Vec<Value> {
        match self.catalog.search_with_retry(query, filter, limit).await {
            Ok(results) => results,
            Err(e) => {
                warn!(query, %filter, "[Search] Giving up: {}", e);
                Vec::new()
            }
        }
    }

    /// Seed video id and its watch playlist tracks
    async fn related_tracks(&mut self, song_name: &str, artist_name: &str) -> Option<(String, Vec<Value>)> {
        if song_name.trim().is_empty() || artist_name.trim().is_empty() {
            warn!("[Related] Both song name and artist name are required");
            return None;
        }

        let query = format!("{} {}", song_name, artist_name);
        let results = self
            .search_or_empty(&query, SearchFilter::Songs, SEED_SEARCH_LIMIT)
            .await;
        let Some(seed) = find_seed(&results, song_name, artist_name) else {
            warn!(song = song_name, artist = artist_name, "[Related] Seed song not found");
            return None;
        };
        debug!(seed = %seed, "[Related] Seed song");

        let playlist = match self.catalog.client().get_watch_playlist(&seed).await {
            Ok(playlist) => playlist,
            Err(e) => {
                warn!(seed = %seed, "[Related] Watch playlist failed: {}", e);
                return None;
            }
        };

        let tracks = playlist["tracks"].as_array().cloned().unwrap_or_default();
        Some((seed, tracks))
    }

    async fn artist_tracks(&mut self, artist_name: &str) -> Vec<Value> {
        let artists = self
            .search_or_empty(artist_name, SearchFilter::Artists, ARTIST_SEARCH_LIMIT)
            .await;

        let wanted = artist_name.to_lowercase();
        let target = artists
            .iter()
            .find(|a| a["artist"].as_str().map(str::to_lowercase).as_deref() == Some(wanted.as_str()))
            .or_else(|| artists.first());

        let Some(browse_id) = target.and_then(|a| a["browseId"].as_str()) else {
            warn!(artist = artist_name, "[Artist] No matching artist");
            return Vec::new();
        };
        debug!(browse_id, "[Artist] Using artist");

        let client = self.catalog.client();
        let page = match client.get_artist(browse_id).await {
            Ok(page) => page,
            Err(e) => {
                warn!(browse_id, "[Artist] Artist page failed: {}", e);
                return Vec::new();
            }
        };

        let songs = page["songs"]["results"].as_array().cloned().unwrap_or_default();
        if !songs.is_empty() {
            return songs;
        }

        debug!("[Artist] No direct songs, collecting album tracks");
        let mut tracks = Vec::new();
        let albums = page["albums"]["results"].as_array().cloned().unwrap_or_default();
        for album in albums.iter().take(ARTIST_ALBUM_FALLBACK) {
            let Some(album_id) = album["browseId"].as_str() else {
                continue;
            };
            match client.get_album(album_id).await {
                Ok(album_page) => {
                    if let Some(album_tracks) = album_page["tracks"].as_array() {
                        tracks.extend(album_tracks.iter().cloned());
                    }
                }
                Err(e) => warn!(album_id, "[Artist] Album page failed: {}", e),
            }
        }
        tracks
    }

    /// Build one `SongDetails`; `None` means skip
    async fn assemble(&self, record: &SongRecord, options: &SearchOptions) -> Option<SongDetails> {
        let Some(mut details) = SongDetails::from_record(record) else {
            debug!(title = %record.title, "[Batch] Skipping item without video id");
            return None;
        };
        let video_id = details.video_id.clone();

        if options.include_album_art {
            let client = self.catalog.client();
            let art = self
                .artwork
                .resolve_artwork(
                    Some(client.as_ref()),
                    &video_id,
                    &record.thumbnails,
                    options.thumb_quality,
                )
                .await;
            details.album_art = Some(art);
        }

        if options.include_audio_url {
            let audio = &self.audio;
            let quality = options.audio_quality;
            let url = self
                .config
                .item_audio_retry
                .retry_until_some("audio url", |_| audio.resolve_audio(&video_id, quality))
                .await;

            match url {
                Some(url) => details.audio_url = Some(url),
                None => {
                    warn!(video_id = %video_id, "[Batch] Skipping item without audio");
                    return None;
                }
            }
        }

        Some(details)
    }
}

/// First result whose title shares a word with `song_name` and whose
/// artists include `artist_name`, else the first result
fn find_seed(results: &[Value], song_name: &str, artist_name: &str) -> Option<String> {
    let words: Vec<String> = song_name.to_lowercase().split_whitespace().map(String::from).collect();
    let artist = artist_name.to_lowercase();

    let matched = results.iter().find(|item| {
        let title = item["title"].as_str().unwrap_or("").to_lowercase();
        words.iter().any(|w| title.contains(w.as_str()))
            && SongRecord::artist_names_lower(item).iter().any(|a| a.contains(&artist))
    });

    matched
        .or_else(|| results.first())
        .and_then(|item| item["videoId"].as_str())
        .filter(|id| !id.is_empty())
        .map(String::from)
}
