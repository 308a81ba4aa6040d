// Music catalog seam
//
// The catalog (search, song pages, watch playlists, artist and album pages)
// is an external service. Records stay loosely typed JSON; `records` reads
// them with defaults.

mod handle;
mod records;
#[cfg(test)]
pub(crate) mod test_support;

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

pub use handle::CatalogHandle;
pub use records::{SongDetails, SongRecord};

#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    /// Client could not be created or lost its session
    #[error("Catalog connection failed: {0}")]
    Connection(String),

    #[error("Catalog item not found: {0}")]
    NotFound(String),

    #[error("Catalog request failed: {0}")]
    Request(String),

    #[error("Unexpected catalog response: {0}")]
    Parse(String),
}

/// Result category for catalog searches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchFilter {
    Songs,
    Artists,
}

impl SearchFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Songs => "songs",
            Self::Artists => "artists",
        }
    }
}

impl fmt::Display for SearchFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Search and browse operations of the catalog
#[async_trait]
pub trait CatalogClient: Send + Sync {
    async fn search(
        &self,
        query: &str,
        filter: SearchFilter,
        limit: usize,
    ) -> Result<Vec<Value>, CatalogError>;

    /// Song page; thumbnails live at `videoDetails.thumbnail.thumbnails`
    async fn get_song(&self, video_id: &str) -> Result<Value, CatalogError>;

    /// Radio for a song; related items under `tracks`
    async fn get_watch_playlist(&self, video_id: &str) -> Result<Value, CatalogError>;

    /// Artist page with `songs.results` and `albums.results`
    async fn get_artist(&self, browse_id: &str) -> Result<Value, CatalogError>;

    /// Album page with `tracks`
    async fn get_album(&self, browse_id: &str) -> Result<Value, CatalogError>;
}

/// Builds fresh catalog clients (initial connect and reinitialization)
#[async_trait]
pub trait CatalogFactory: Send + Sync {
    async fn create(&self, country: &str) -> Result<Arc<dyn CatalogClient>, CatalogError>;
}
