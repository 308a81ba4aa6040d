use async_trait::async_trait;

use super::keyword::SearchKeyword;
use super::types::LyricsError;

/// Song hit from the provider's catalog search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongMatch {
    pub hash: String,
    /// Seconds
    pub duration: Option<u32>,
}

/// Downloadable lyrics entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LyricCandidate {
    pub id: String,
    pub accesskey: String,
}

/// How a lyrics search is keyed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LyricsQuery<'a> {
    Hash(&'a str),
    Keyword {
        keyword: &'a SearchKeyword,
        duration_ms: Option<u64>,
    },
}

/// Lyrics backend: song search, lyrics search, content download
#[async_trait]
pub trait LyricsProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn search_songs(&self, keyword: &SearchKeyword) -> Result<Vec<SongMatch>, LyricsError>;

    async fn search_lyrics(&self, query: LyricsQuery<'_>) -> Result<Vec<LyricCandidate>, LyricsError>;

    /// Base64 content of a candidate, `None` when the provider returned nothing
    async fn download(&self, candidate: &LyricCandidate) -> Result<Option<String>, LyricsError>;
}
