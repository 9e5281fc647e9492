//! Storefront session: who is logged in, persisted across restarts.
//!
//! There is no credential verification. `login` and `signup` simulate a
//! network round trip and then publish a session built from their inputs.
//! Callers reach the session through [`SessionHandle`]s issued by a
//! [`SessionStore`]; a handle outliving its store reports
//! [`SessionError::OutsideScope`] instead of silently reading nothing.

mod storage;

pub use storage::{FileStorage, MemoryStorage, SessionStorage, StorageError};

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock, Weak};
use std::time::Duration;

use carefinder_config::SessionConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

pub const DEFAULT_DISPLAY_NAME: &str = "Shivam";
pub const DEFAULT_PHONE: &str = "+91 9876543210";
pub const DEFAULT_LOCATION: &str = "Bangalore";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session accessed outside of its provider scope")]
    OutsideScope,
    #[error("session storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("failed to encode session: {0}")]
    Encode(#[from] serde_json::Error),
}

/// The authenticated identity. Serialised as-is into durable storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
}

#[derive(Clone, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

impl LoginCredentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Clone, Deserialize)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub location: String,
}

impl fmt::Debug for SignupForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupForm")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("phone", &self.phone)
            .field("location", &self.location)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Anonymous,
    Authenticating,
    Authenticated,
}

struct Inner {
    current: RwLock<Option<UserSession>>,
    pending: AtomicUsize,
    storage: Box<dyn SessionStorage>,
    namespace: String,
    latency: Duration,
}

/// Decrements the pending counter when an attempt finishes or is dropped.
struct PendingGuard<'a>(&'a AtomicUsize);

impl<'a> PendingGuard<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl Inner {
    fn current_session(&self) -> Option<UserSession> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn state(&self) -> SessionState {
        if self.pending.load(Ordering::SeqCst) > 0 {
            SessionState::Authenticating
        } else if self.current_session().is_some() {
            SessionState::Authenticated
        } else {
            SessionState::Anonymous
        }
    }

    async fn establish(&self, session: UserSession) -> Result<UserSession, SessionError> {
        let _pending = PendingGuard::enter(&self.pending);

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let encoded = serde_json::to_string(&session)?;
        {
            // Memory and the durable record change under the same write guard.
            let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
            self.storage.set(&self.namespace, &encoded)?;
            *current = Some(session.clone());
        }
        Ok(session)
    }

    async fn login(&self, credentials: LoginCredentials) -> Result<UserSession, SessionError> {
        let session = UserSession {
            name: DEFAULT_DISPLAY_NAME.to_string(),
            email: credentials.email,
            phone: DEFAULT_PHONE.to_string(),
            location: DEFAULT_LOCATION.to_string(),
        };
        let session = self.establish(session).await?;
        info!(email = %session.email, "user logged in");
        Ok(session)
    }

    async fn signup(&self, form: SignupForm) -> Result<UserSession, SessionError> {
        let name = if form.name.is_empty() {
            DEFAULT_DISPLAY_NAME.to_string()
        } else {
            form.name
        };
        let session = UserSession {
            name,
            email: form.email,
            phone: form.phone,
            location: form.location,
        };
        let session = self.establish(session).await?;
        info!(email = %session.email, name = %session.name, "user signed up");
        Ok(session)
    }

    fn logout(&self) -> Result<(), SessionError> {
        let previous = {
            let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
            let previous = current.take();
            self.storage.remove(&self.namespace)?;
            previous
        };

        if let Some(session) = previous {
            info!(email = %session.email, "user logged out");
        }
        Ok(())
    }
}

/// Owns the session value and its durable record. Dropping the store ends
/// the scope: outstanding handles start returning `OutsideScope`.
pub struct SessionStore {
    inner: Arc<Inner>,
}

impl SessionStore {
    pub fn new(storage: impl SessionStorage + 'static, config: &SessionConfig) -> Self {
        Self::with_namespace(
            storage,
            config.namespace.clone(),
            Duration::from_millis(config.latency_ms),
        )
    }

    pub fn with_namespace(
        storage: impl SessionStorage + 'static,
        namespace: impl Into<String>,
        latency: Duration,
    ) -> Self {
        let namespace = namespace.into();
        let restored = restore(&storage, &namespace);

        Self {
            inner: Arc::new(Inner {
                current: RwLock::new(restored),
                pending: AtomicUsize::new(0),
                storage: Box::new(storage),
                namespace,
                latency,
            }),
        }
    }

    pub fn handle(&self) -> SessionHandle {
        SessionHandle {
            inner: Arc::downgrade(&self.inner),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.inner.namespace
    }

    pub fn current_session(&self) -> Option<UserSession> {
        self.inner.current_session()
    }

    pub fn state(&self) -> SessionState {
        self.inner.state()
    }

    pub async fn login(&self, credentials: LoginCredentials) -> Result<UserSession, SessionError> {
        self.inner.login(credentials).await
    }

    pub async fn signup(&self, form: SignupForm) -> Result<UserSession, SessionError> {
        self.inner.signup(form).await
    }

    pub fn logout(&self) -> Result<(), SessionError> {
        self.inner.logout()
    }
}

fn restore(storage: &dyn SessionStorage, namespace: &str) -> Option<UserSession> {
    let raw = match storage.get(namespace) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(error) => {
            warn!(%error, namespace, "could not read stored session");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(session) => Some(session),
        Err(error) => {
            warn!(%error, namespace, "ignoring malformed stored session");
            None
        }
    }
}

/// Cheap, clonable access to a [`SessionStore`] for presentation code.
#[derive(Clone)]
pub struct SessionHandle {
    inner: Weak<Inner>,
}

impl SessionHandle {
    fn scope(&self) -> Result<Arc<Inner>, SessionError> {
        self.inner.upgrade().ok_or(SessionError::OutsideScope)
    }

    pub fn current_session(&self) -> Result<Option<UserSession>, SessionError> {
        Ok(self.scope()?.current_session())
    }

    pub fn state(&self) -> Result<SessionState, SessionError> {
        Ok(self.scope()?.state())
    }

    pub async fn login(&self, credentials: LoginCredentials) -> Result<UserSession, SessionError> {
        self.scope()?.login(credentials).await
    }

    pub async fn signup(&self, form: SignupForm) -> Result<UserSession, SessionError> {
        self.scope()?.signup(form).await
    }

    pub fn logout(&self) -> Result<(), SessionError> {
        self.scope()?.logout()
    }
}
