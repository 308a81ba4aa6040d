// YouTube Music media resolution and KuGou synchronized lyrics
//
// `resolver`: direct audio URLs and artwork through yt-dlp.
// `lyrics`: time-synced lyrics with credit trimming.
// `streams`: catalog-driven song aggregators built on both.

pub mod catalog;
pub mod config;
pub mod logging;
pub mod lyrics;
pub mod resolver;
pub mod streams;

pub use catalog::{CatalogClient, CatalogError, CatalogFactory, CatalogHandle, SearchFilter, SongDetails};
pub use config::{LyricsConfig, Pacing, ResolverConfig};
pub use lyrics::{
    FailureKind, KugouProvider, LyricCue, LyricsFailure, LyricsFound, LyricsProvider, LyricsResolver,
    LyricsResponse,
};
pub use resolver::extractors::{status, BackendStatus, ExtractorChain, ExtractorMode, MediaExtractor};
pub use resolver::{
    ArtworkResolver, AudioQuality, AudioResolver, ResolveError, ThumbnailCandidate, ThumbnailQuality,
};
pub use streams::{MusicSearcher, SearchOptions};
