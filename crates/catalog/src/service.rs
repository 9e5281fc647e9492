use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, error};

use crate::{Catalog, CatalogError, ProviderRecord, ProviderSource, SearchQuery};

/// The search could not produce a result set. Callers show an empty or
/// error state and may retry.
#[derive(Debug, Error)]
#[error("Failed to fetch doctors")]
pub struct QueryFailure {
    #[source]
    source: CatalogError,
}

impl QueryFailure {
    pub fn new(source: CatalogError) -> Self {
        Self { source }
    }

    pub fn cause(&self) -> &CatalogError {
        &self.source
    }
}

impl From<CatalogError> for QueryFailure {
    fn from(source: CatalogError) -> Self {
        Self::new(source)
    }
}

/// Stateless query/filter component over a provider source.
pub struct SearchService<S: ?Sized = Catalog> {
    source: Arc<S>,
    latency: Duration,
}

impl<S: ?Sized> Clone for SearchService<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            latency: self.latency,
        }
    }
}

impl<S: ProviderSource> SearchService<S> {
    pub fn new(source: S, latency: Duration) -> Self {
        Self::from_shared(Arc::new(source), latency)
    }
}

impl<S: ProviderSource + 'static> SearchService<S> {
    /// Erases the source type so services over different sources can share a slot.
    pub fn into_dyn(self) -> SearchService<dyn ProviderSource> {
        SearchService {
            source: self.source,
            latency: self.latency,
        }
    }
}

impl<S: ProviderSource + ?Sized> SearchService<S> {
    pub fn from_shared(source: Arc<S>, latency: Duration) -> Self {
        Self { source, latency }
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    /// Providers matching `location` and `specialty`, in catalog order.
    pub async fn query(
        &self,
        location: &str,
        specialty: &str,
    ) -> Result<Vec<ProviderRecord>, QueryFailure> {
        self.search(&SearchQuery::new(location, specialty)).await
    }

    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<ProviderRecord>, QueryFailure> {
        let records = self.source.providers().map_err(|e| {
            error!(error = %e, "provider source failed");
            QueryFailure::new(e)
        })?;

        let results = query.apply(records);

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        debug!(
            location = %query.location,
            specialty = %query.specialty,
            results = results.len(),
            "provider search completed"
        );
        Ok(results)
    }

    pub fn provider(&self, id: &str) -> Result<Option<ProviderRecord>, QueryFailure> {
        let records = self.source.providers()?;
        Ok(records.iter().find(|record| record.id == id).cloned())
    }
}
