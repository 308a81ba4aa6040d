// Time-synced lyrics: keyword normalization, provider search, LRC parsing

pub mod keyword;
mod kugou;
pub mod parse;
mod provider;
mod resolver;
mod types;

pub use keyword::SearchKeyword;
pub use kugou::KugouProvider;
pub use parse::{normalize_lyrics, parse_lrc_timestamps};
pub use provider::{LyricCandidate, LyricsProvider, LyricsQuery, SongMatch};
pub use resolver::LyricsResolver;
pub use types::{FailureKind, LyricCue, LyricsError, LyricsFailure, LyricsFound, LyricsResponse};
