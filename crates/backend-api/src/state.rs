use carefinder_auth::{SessionHandle, SessionStore};
use carefinder_catalog::{ProviderSource, SearchService};

/// Shared handler state. The session is reached through a handle; the
/// owning [`SessionStore`] must outlive the router.
#[derive(Clone)]
pub struct AppState {
    search: SearchService<dyn ProviderSource>,
    session: SessionHandle,
}

impl AppState {
    pub fn new<S: ProviderSource + 'static>(search: SearchService<S>, session: SessionHandle) -> Self {
        Self {
            search: search.into_dyn(),
            session,
        }
    }

    pub fn from_store<S: ProviderSource + 'static>(
        search: SearchService<S>,
        store: &SessionStore,
    ) -> Self {
        Self::new(search, store.handle())
    }

    pub fn search(&self) -> &SearchService<dyn ProviderSource> {
        &self.search
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }
}
