use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One synchronized lyric line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LyricCue {
    /// Offset from the start of the song in milliseconds
    pub timestamp: u64,
    pub text: String,
    /// `mm:ss.mmm`
    pub time_formatted: String,
}

impl LyricCue {
    pub fn new(minutes: u64, seconds: u64, millis: u64, text: impl Into<String>) -> Self {
        Self {
            timestamp: minutes * 60_000 + seconds * 1_000 + millis,
            text: text.into(),
            time_formatted: format!("{:02}:{:02}.{:03}", minutes, seconds, millis),
        }
    }
}

/// Why no lyrics could be returned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The provider's song search had no results
    SongNotFound,
    /// No lyric candidates or no downloadable content
    LyricsNotFound,
    /// The provider marks the song as having no lyrics
    Instrumental,
    /// Content was not valid base64 / UTF-8
    DecodeError,
    /// Content had no usable timed lines after filtering
    EmptyAfterFilter,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LyricsFound {
    pub lyrics: Vec<LyricCue>,
    pub source: String,
    pub total_lines: usize,
}

impl LyricsFound {
    pub fn new(lyrics: Vec<LyricCue>, source: impl Into<String>) -> Self {
        Self {
            total_lines: lyrics.len(),
            lyrics,
            source: source.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct LyricsFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl LyricsFailure {
    pub fn new(kind: FailureKind, title: &str, artist: &str) -> Self {
        Self {
            kind,
            message: format!("No lyrics found for {} by {}", title, artist),
        }
    }
}

/// Wire shape: `{success, lyrics, source, total_lines}` or `{success: false, error, kind}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LyricsResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lyrics: Option<Vec<LyricCue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_lines: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<FailureKind>,
}

impl From<Result<LyricsFound, LyricsFailure>> for LyricsResponse {
    fn from(result: Result<LyricsFound, LyricsFailure>) -> Self {
        match result {
            Ok(found) => Self {
                success: true,
                total_lines: Some(found.total_lines),
                lyrics: Some(found.lyrics),
                source: Some(found.source),
                error: None,
                kind: None,
            },
            Err(failure) => Self {
                success: false,
                lyrics: None,
                source: None,
                total_lines: None,
                error: Some(failure.message),
                kind: Some(failure.kind),
            },
        }
    }
}

#[derive(Error, Debug)]
pub enum LyricsError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("API error: {0}")]
    Api(String),
    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Decode error: {0}")]
    Decode(String),
}
