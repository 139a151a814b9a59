use std::sync::Arc;

use crate::error::Error;
use crate::models::{AuthResponse, User};
use crate::storage::{KeyValueStore, MemoryStore};

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";
pub const USER_KEY: &str = "food_court_user";

/// Authenticated identity: access credential, refresh credential and the
/// cached user profile, persisted through a [`KeyValueStore`].
///
/// Cloning is cheap and clones share the same store.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").finish_non_exhaustive()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl Session {
    #[must_use]
    pub fn new(store: impl KeyValueStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Session backed by a [`MemoryStore`].
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    /// Stored access credential, if any.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] if the store cannot be read.
    pub fn access_token(&self) -> Result<Option<String>, Error> {
        self.store.get(ACCESS_TOKEN_KEY)
    }

    /// Stored refresh credential, if any.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] if the store cannot be read.
    pub fn refresh_token(&self) -> Result<Option<String>, Error> {
        self.store.get(REFRESH_TOKEN_KEY)
    }

    /// Cached profile. An unreadable stored profile counts as absent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] if the store cannot be read.
    pub fn user(&self) -> Result<Option<User>, Error> {
        let Some(raw) = self.store.get(USER_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable stored profile");
                Ok(None)
            }
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self.access_token(), Ok(Some(_)))
    }

    /// Store everything a login or registration returned.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] if a write fails; entries written before
    /// the failure are kept.
    pub fn establish(&self, auth: &AuthResponse) -> Result<(), Error> {
        self.set_tokens(&auth.access, &auth.refresh)?;
        self.set_user(&auth.user)
    }

    /// Store both credentials.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] if either write fails.
    pub fn set_tokens(&self, access: &str, refresh: &str) -> Result<(), Error> {
        self.store.set(ACCESS_TOKEN_KEY, access)?;
        self.store.set(REFRESH_TOKEN_KEY, refresh)
    }

    /// Replace the access credential after a refresh. The refresh
    /// credential is not rotated.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] if the write fails.
    pub fn replace_access_token(&self, access: &str) -> Result<(), Error> {
        self.store.set(ACCESS_TOKEN_KEY, access)
    }

    /// Cache the profile as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if the profile cannot be serialized and
    /// [`Error::Storage`] if the write fails.
    pub fn set_user(&self, user: &User) -> Result<(), Error> {
        let raw = serde_json::to_string(user)?;
        self.store.set(USER_KEY, &raw)
    }

    /// Discard both credentials and the cached profile.
    ///
    /// Every key is attempted even if an earlier removal fails; the first
    /// failure is returned.
    ///
    /// # Errors
    ///
    /// Returns the first [`Error::Storage`] raised while removing keys.
    pub fn clear(&self) -> Result<(), Error> {
        [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_KEY]
            .into_iter()
            .map(|key| self.store.remove(key))
            .fold(Ok(()), |acc, res| acc.and(res))
    }
}
