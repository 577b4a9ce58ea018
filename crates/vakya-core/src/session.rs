//! The session authentication gate.
//!
//! The gate holds one piece of state: whether a credential token is
//! present. It is created once at start-up from a [`TokenStore`], mutated
//! only by explicit [`SessionGate::login`] / [`SessionGate::logout`] calls,
//! and handed to whatever needs to know if the learner is signed in.
//!
//! The gate never talks to the network. A stale or revoked token keeps the
//! gate open until an authenticated request fails downstream.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::error::SessionError;

/// Durable storage for the single credential token.
pub trait TokenStore: Send + Sync {
    /// Reads the stored token, if any.
    fn load(&self) -> Result<Option<String>, SessionError>;

    /// Persists `token`, replacing any previous one.
    fn save(&self, token: &str) -> Result<(), SessionError>;

    /// Removes the stored token. Clearing an empty store is not an error.
    fn clear(&self) -> Result<(), SessionError>;
}

/// In-process token store. Survives for as long as the value lives.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `token`, as if a previous run logged in.
    pub fn with_token(token: &str) -> Self {
        Self {
            token: Mutex::new(Some(token.to_string())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>, SessionError> {
        Ok(self.lock()?.clone())
    }

    fn save(&self, token: &str) -> Result<(), SessionError> {
        *self.lock()? = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        *self.lock()? = None;
        Ok(())
    }
}

impl MemoryTokenStore {
    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Option<String>>, SessionError> {
        self.token
            .lock()
            .map_err(|_| SessionError::Storage("token store lock poisoned".into()))
    }
}

/// Views of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    Landing,
    Questions,
    Login,
    Dashboard,
    Hero,
    Game,
}

impl Route {
    /// Public routes are reachable without a credential.
    pub fn is_public(&self) -> bool {
        matches!(self, Route::Landing | Route::Questions | Route::Login)
    }
}

/// Holds the "is a credential present" flag and guards protected routes.
pub struct SessionGate<S: TokenStore> {
    store: S,
    token: Option<String>,
}

impl<S: TokenStore> SessionGate<S> {
    /// Restores the session from `store`. Reads the store exactly once.
    pub fn restore(store: S) -> Result<Self, SessionError> {
        let token = store.load()?.filter(|t| !t.trim().is_empty());
        tracing::debug!(authenticated = token.is_some(), "session restored");
        Ok(Self { store, token })
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// The current token, for attaching to authenticated requests.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Stores `token` durably and opens the gate.
    ///
    /// The token's contents are not inspected; the service that issued it
    /// is trusted.
    pub fn login(&mut self, token: &str) -> Result<(), SessionError> {
        if token.trim().is_empty() {
            return Err(SessionError::EmptyToken);
        }
        self.store.save(token)?;
        self.token = Some(token.to_string());
        tracing::info!("logged in");
        Ok(())
    }

    /// Clears the durable token and closes the gate.
    pub fn logout(&mut self) -> Result<(), SessionError> {
        self.store.clear()?;
        self.token = None;
        tracing::info!("logged out");
        Ok(())
    }

    /// Maps a requested route to the route actually shown: protected routes
    /// redirect to [`Route::Login`] while the gate is closed.
    pub fn resolve(&self, requested: Route) -> Route {
        if requested.is_public() || self.is_authenticated() {
            requested
        } else {
            tracing::debug!(?requested, "redirecting to login");
            Route::Login
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Hands the store back, e.g. to simulate a process restart in tests.
    pub fn into_store(self) -> S {
        self.store
    }
}
