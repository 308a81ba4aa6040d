// Owned catalog client with retrying initialization
//
// The client is replaced wholesale on reinitialization. Reinitializing
// needs `&mut self`, so every worker owns its own handle.

use serde_json::Value;
use std::sync::Arc;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use super::{CatalogClient, CatalogError, CatalogFactory, SearchFilter};
use crate::resolver::retry::RetryPolicy;

pub struct CatalogHandle {
    factory: Arc<dyn CatalogFactory>,
    client: Arc<dyn CatalogClient>,
    country: String,
    policy: RetryPolicy,
}

impl CatalogHandle {
    /// Create the first client, retrying with backoff
    pub async fn connect(
        factory: Arc<dyn CatalogFactory>,
        country: &str,
        policy: RetryPolicy,
    ) -> Result<Self, CatalogError> {
        let client = Self::create_client(factory.as_ref(), country, &policy).await?;
        info!(country, "[Catalog] Client initialized");

        Ok(Self {
            factory,
            client,
            country: country.to_string(),
            policy,
        })
    }

    async fn create_client(
        factory: &dyn CatalogFactory,
        country: &str,
        policy: &RetryPolicy,
    ) -> Result<Arc<dyn CatalogClient>, CatalogError> {
        policy
            .retry("catalog init", |_| factory.create(country))
            .await
            .map_err(|e| {
                CatalogError::Connection(format!(
                    "Failed to initialize catalog after {} attempts: {}",
                    policy.attempts(),
                    e
                ))
            })
    }

    /// Current client (cheap clone of the shared handle)
    pub fn client(&self) -> Arc<dyn CatalogClient> {
        self.client.clone()
    }

    /// Swap in a freshly created client; the old one stays on failure.
    /// One factory attempt only: callers already pace their own retries.
    pub async fn reinitialize(&mut self) -> Result<(), CatalogError> {
        let client = self.factory.create(&self.country).await?;
        self.client = client;
        debug!("[Catalog] Client reinitialized");
        Ok(())
    }

    /// Search with backoff, reinitializing the client between attempts
    pub async fn search_with_retry(
        &mut self,
        query: &str,
        filter: SearchFilter,
        limit: usize,
    ) -> Result<Vec<Value>, CatalogError> {
        let attempts = self.policy.attempts();
        let mut attempt = 0;

        loop {
            debug!(query, %filter, limit, attempt = attempt + 1, "[Catalog] Searching");
            match self.client.search(query, filter, limit).await {
                Ok(results) => {
                    debug!(count = results.len(), "[Catalog] Search returned");
                    return Ok(results);
                }
                Err(e) if attempt + 1 >= attempts => {
                    warn!(query, "[Catalog] All search attempts failed: {}", e);
                    return Err(e);
                }
                Err(e) => {
                    warn!(query, attempt = attempt + 1, "[Catalog] Search failed: {}", e);
                    sleep(self.policy.delay_for(attempt)).await;
                    if let Err(re) = self.reinitialize().await {
                        warn!("[Catalog] Reinitialization failed: {}", re);
                    }
                }
            }
            attempt += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::test_support::{FakeCatalog, FakeFactory};
    use serde_json::json;
    use std::sync::atomic::Ordering;

    fn policy() -> RetryPolicy {
        RetryPolicy::exponential(3).without_delay()
    }

    #[tokio::test]
    async fn test_connect_retries_then_succeeds() {
        let factory = Arc::new(FakeFactory::new(FakeCatalog::default()).failing_first(2));
        let handle = CatalogHandle::connect(factory.clone(), "US", policy()).await;

        assert!(handle.is_ok());
        assert_eq!(factory.created.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_connect_gives_up() {
        let factory = Arc::new(FakeFactory::new(FakeCatalog::default()).failing_first(5));
        let err = CatalogHandle::connect(factory.clone(), "US", policy())
            .await
            .err()
            .unwrap();

        assert!(matches!(err, CatalogError::Connection(_)));
        assert_eq!(factory.created.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_search_reinitializes_between_attempts() {
        let catalog = FakeCatalog::default()
            .with_search(SearchFilter::Songs, vec![json!({"videoId": "a"})])
            .failing_searches(2);
        let factory = Arc::new(FakeFactory::new(catalog));
        let mut handle = CatalogHandle::connect(factory.clone(), "US", policy()).await.unwrap();

        let results = handle.search_with_retry("q", SearchFilter::Songs, 5).await.unwrap();
        assert_eq!(results.len(), 1);
        // one initial client plus one per failed attempt
        assert_eq!(factory.created.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_reinitialize_makes_a_single_attempt() {
        let factory = Arc::new(FakeFactory::new(FakeCatalog::default()));
        let mut handle = CatalogHandle::connect(factory.clone(), "US", policy()).await.unwrap();

        factory.fail_next(5);
        assert!(handle.reinitialize().await.is_err());
        assert_eq!(factory.created.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failed_reinitialize_keeps_old_client() {
        let catalog = FakeCatalog::default()
            .with_search(SearchFilter::Songs, vec![json!({"videoId": "a"})])
            .failing_searches(1);
        let factory = Arc::new(FakeFactory::new(catalog));
        let mut handle = CatalogHandle::connect(factory.clone(), "US", policy()).await.unwrap();

        factory.fail_next(5);
        let results = handle.search_with_retry("q", SearchFilter::Songs, 5).await.unwrap();
        assert_eq!(results.len(), 1);
        // connect plus a single reinitialization attempt
        assert_eq!(factory.created.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_search_exhaustion_returns_error() {
        let catalog = FakeCatalog::default().failing_searches(10);
        let factory = Arc::new(FakeFactory::new(catalog));
        let mut handle = CatalogHandle::connect(factory, "US", policy()).await.unwrap();

        assert!(handle.search_with_retry("q", SearchFilter::Songs, 5).await.is_err());
    }
}
