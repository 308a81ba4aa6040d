// Synchronized lyrics resolution
//
// Hash search first (song search, then lyrics by hash per matching song),
// keyword search second. Provider I/O errors count as empty results.

use std::sync::Arc;
use tracing::{debug, info, warn};

use super::keyword::SearchKeyword;
use super::parse::{decode_content, is_instrumental, normalize_lyrics, parse_lrc_timestamps};
use super::provider::{LyricsProvider, LyricsQuery, SongMatch};
use super::types::{FailureKind, LyricCue, LyricsFailure, LyricsFound};
use crate::config::LyricsConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchPath {
    Hash,
    Keyword,
}

const SEARCH_PATHS: [SearchPath; 2] = [SearchPath::Hash, SearchPath::Keyword];

enum PathOutcome {
    Found(Vec<LyricCue>),
    /// Stop the whole lookup with this failure
    Terminal(FailureKind),
    Continue(Option<FailureKind>),
}

/// Keep the most specific failure: a generic "not found" never replaces one already seen
fn merge_failure(current: Option<FailureKind>, next: FailureKind) -> Option<FailureKind> {
    match (current, next) {
        (Some(kind), FailureKind::LyricsNotFound) => Some(kind),
        _ => Some(next),
    }
}

pub struct LyricsResolver {
    provider: Arc<dyn LyricsProvider>,
    config: LyricsConfig,
}

impl LyricsResolver {
    pub fn new(provider: Arc<dyn LyricsProvider>, config: LyricsConfig) -> Self {
        Self { provider, config }
    }

    /// Find time-synced lyrics for a song; `duration_hint` is in seconds
    pub async fn resolve_lyrics(
        &self,
        title: &str,
        artist: &str,
        duration_hint: Option<u32>,
    ) -> Result<LyricsFound, LyricsFailure> {
        let keyword = SearchKeyword::new(title, artist);
        info!("[Lyrics] Looking up '{}' (hint: {:?}s)", keyword, duration_hint);

        let mut failure = None;
        for path in SEARCH_PATHS {
            let outcome = match path {
                SearchPath::Hash => self.search_by_hash(&keyword, duration_hint).await,
                SearchPath::Keyword => self.search_by_keyword(&keyword, duration_hint).await,
            };

            match outcome {
                PathOutcome::Found(lyrics) => {
                    info!("[Lyrics] {:?} search found {} lines", path, lyrics.len());
                    return Ok(LyricsFound::new(lyrics, self.provider.name()));
                }
                PathOutcome::Terminal(kind) => {
                    info!("[Lyrics] {:?} search stopped: {:?}", path, kind);
                    return Err(LyricsFailure::new(kind, title, artist));
                }
                PathOutcome::Continue(kind) => {
                    debug!("[Lyrics] {:?} search gave nothing ({:?})", path, kind);
                    if let Some(kind) = kind {
                        failure = merge_failure(failure, kind);
                    }
                }
            }
        }

        let kind = failure.unwrap_or(FailureKind::LyricsNotFound);
        Err(LyricsFailure::new(kind, title, artist))
    }

    fn within_tolerance(&self, song: &SongMatch, hint: Option<u32>) -> bool {
        match (hint, song.duration) {
            (None, _) => true,
            (Some(hint), Some(duration)) => duration.abs_diff(hint) <= self.config.duration_tolerance,
            (Some(_), None) => false,
        }
    }

    async fn search_by_hash(&self, keyword: &SearchKeyword, hint: Option<u32>) -> PathOutcome {
        let songs = match self.provider.search_songs(keyword).await {
            Ok(songs) => songs,
            Err(e) => {
                warn!("[Lyrics] Song search failed: {}", e);
                Vec::new()
            }
        };

        let candidates: Vec<&SongMatch> = songs.iter().filter(|s| self.within_tolerance(s, hint)).collect();
        debug!(
            "[Lyrics] {} songs, {} within duration tolerance",
            songs.len(),
            candidates.len()
        );
        if candidates.is_empty() {
            return PathOutcome::Continue(Some(FailureKind::SongNotFound));
        }

        let mut failure = None;
        for song in candidates {
            debug!(hash = %song.hash, "[Lyrics] Trying song hash");
            match self.fetch_lyrics(LyricsQuery::Hash(&song.hash)).await {
                Ok(lyrics) => return PathOutcome::Found(lyrics),
                Err(FailureKind::Instrumental) => {
                    debug!(hash = %song.hash, "[Lyrics] Skipping instrumental track");
                    failure = merge_failure(failure, FailureKind::Instrumental);
                }
                Err(kind) => failure = merge_failure(failure, kind),
            }
        }
        PathOutcome::Continue(failure)
    }

    async fn search_by_keyword(&self, keyword: &SearchKeyword, hint: Option<u32>) -> PathOutcome {
        let query = LyricsQuery::Keyword {
            keyword,
            duration_ms: hint.map(|seconds| u64::from(seconds) * 1000),
        };

        match self.fetch_lyrics(query).await {
            Ok(lyrics) => PathOutcome::Found(lyrics),
            Err(FailureKind::Instrumental) => PathOutcome::Terminal(FailureKind::Instrumental),
            Err(kind) => PathOutcome::Continue(Some(kind)),
        }
    }

    /// First candidate of a lyrics search, downloaded and parsed
    async fn fetch_lyrics(&self, query: LyricsQuery<'_>) -> Result<Vec<LyricCue>, FailureKind> {
        let candidates = self.provider.search_lyrics(query).await.unwrap_or_else(|e| {
            warn!("[Lyrics] Lyrics search failed: {}", e);
            Vec::new()
        });
        let candidate = candidates.first().ok_or(FailureKind::LyricsNotFound)?;

        let content = self
            .provider
            .download(candidate)
            .await
            .unwrap_or_else(|e| {
                warn!(id = %candidate.id, "[Lyrics] Download failed: {}", e);
                None
            })
            .ok_or(FailureKind::LyricsNotFound)?;

        let decoded = decode_content(&content).map_err(|e| {
            warn!(id = %candidate.id, "[Lyrics] {}", e);
            FailureKind::DecodeError
        })?;

        if is_instrumental(&decoded) {
            return Err(FailureKind::Instrumental);
        }

        let normalized = normalize_lyrics(&decoded, self.config.trim_window);
        let lyrics = parse_lrc_timestamps(&normalized);
        if lyrics.is_empty() {
            return Err(FailureKind::EmptyAfterFilter);
        }
        Ok(lyrics)
    }
}
