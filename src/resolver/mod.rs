// Media resolution engine
//
// Audio: ordered yt-dlp format strategies, first usable stream wins.
// Artwork: ordered chain of sources, first non-empty URL wins.

pub mod artwork;
pub mod audio;
pub mod errors;
pub mod extractors;
pub mod format_selector;
pub mod models;
pub mod retry;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_support;

pub use artwork::{ArtworkResolver, ArtworkSource};
pub use audio::AudioResolver;
pub use errors::{ResolveError, StrategyDisposition};
pub use format_selector::{FormatSelector, FormatStrategy};
pub use models::{AudioQuality, ExtractedMedia, StreamCandidate, ThumbnailCandidate, ThumbnailQuality};
