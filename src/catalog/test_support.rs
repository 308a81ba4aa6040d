// In-memory catalog used by the tests

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use super::{CatalogClient, CatalogError, CatalogFactory, SearchFilter};

#[derive(Default)]
pub(crate) struct FakeCatalog {
    search_results: HashMap<&'static str, Vec<Value>>,
    songs: HashMap<String, Value>,
    playlists: HashMap<String, Value>,
    artists: HashMap<String, Value>,
    albums: HashMap<String, Value>,
    failing_searches: AtomicU32,
    pub(crate) searches: Mutex<Vec<(String, SearchFilter, usize)>>,
    pub(crate) song_lookups: AtomicU32,
}

impl FakeCatalog {
    pub(crate) fn with_search(mut self, filter: SearchFilter, results: Vec<Value>) -> Self {
        self.search_results.insert(filter.as_str(), results);
        self
    }

    pub(crate) fn with_song(mut self, video_id: &str, page: Value) -> Self {
        self.songs.insert(video_id.to_string(), page);
        self
    }

    pub(crate) fn with_playlist(mut self, video_id: &str, playlist: Value) -> Self {
        self.playlists.insert(video_id.to_string(), playlist);
        self
    }

    pub(crate) fn with_artist(mut self, browse_id: &str, page: Value) -> Self {
        self.artists.insert(browse_id.to_string(), page);
        self
    }

    pub(crate) fn with_album(mut self, browse_id: &str, page: Value) -> Self {
        self.albums.insert(browse_id.to_string(), page);
        self
    }

    /// The next `n` searches fail with a request error
    pub(crate) fn failing_searches(self, n: u32) -> Self {
        self.failing_searches.store(n, Ordering::SeqCst);
        self
    }

    fn lookup(map: &HashMap<String, Value>, key: &str) -> Result<Value, CatalogError> {
        map.get(key)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(key.to_string()))
    }
}

#[async_trait]
impl CatalogClient for FakeCatalog {
    async fn search(
        &self,
        query: &str,
        filter: SearchFilter,
        limit: usize,
    ) -> Result<Vec<Value>, CatalogError> {
        self.searches
            .lock()
            .unwrap()
            .push((query.to_string(), filter, limit));

        let pending = self.failing_searches.load(Ordering::SeqCst);
        if pending > 0 {
            self.failing_searches.store(pending - 1, Ordering::SeqCst);
            return Err(CatalogError::Request("search failed".to_string()));
        }

        let mut results = self
            .search_results
            .get(filter.as_str())
            .cloned()
            .unwrap_or_default();
        results.truncate(limit);
        Ok(results)
    }

    async fn get_song(&self, video_id: &str) -> Result<Value, CatalogError> {
        self.song_lookups.fetch_add(1, Ordering::SeqCst);
        Self::lookup(&self.songs, video_id)
    }

    async fn get_watch_playlist(&self, video_id: &str) -> Result<Value, CatalogError> {
        Self::lookup(&self.playlists, video_id)
    }

    async fn get_artist(&self, browse_id: &str) -> Result<Value, CatalogError> {
        Self::lookup(&self.artists, browse_id)
    }

    async fn get_album(&self, browse_id: &str) -> Result<Value, CatalogError> {
        Self::lookup(&self.albums, browse_id)
    }
}

/// Hands out the same shared catalog, optionally failing the first creations
pub(crate) struct FakeFactory {
    catalog: Arc<FakeCatalog>,
    fail_first: AtomicU32,
    pub(crate) created: AtomicU32,
}

impl FakeFactory {
    pub(crate) fn new(catalog: FakeCatalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
            fail_first: AtomicU32::new(0),
            created: AtomicU32::new(0),
        }
    }

    pub(crate) fn failing_first(self, n: u32) -> Self {
        self.fail_first.store(n, Ordering::SeqCst);
        self
    }

    /// Fail the next `n` creations from now on
    pub(crate) fn fail_next(&self, n: u32) {
        self.fail_first.store(n, Ordering::SeqCst);
    }

    pub(crate) fn catalog(&self) -> Arc<FakeCatalog> {
        self.catalog.clone()
    }
}

#[async_trait]
impl CatalogFactory for FakeFactory {
    async fn create(&self, _country: &str) -> Result<Arc<dyn CatalogClient>, CatalogError> {
        self.created.fetch_add(1, Ordering::SeqCst);

        let pending = self.fail_first.load(Ordering::SeqCst);
        if pending > 0 {
            self.fail_first.store(pending - 1, Ordering::SeqCst);
            return Err(CatalogError::Connection("catalog offline".to_string()));
        }

        Ok(self.catalog.clone())
    }
}
