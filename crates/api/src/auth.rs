use std::sync::{Arc, RwLock};

/// Shared, read-mostly bearer credential.
///
/// Owned by the authentication collaborator, which may rotate the token at
/// any time (token refresh can land mid-playback). Consumers read at request
/// time and must not cache a token beyond a single request, so a refreshed
/// token is honored on the next fetch without tearing anything down.
#[derive(Clone, Default)]
pub struct CredentialStore {
    token: Arc<RwLock<Option<String>>>,
}

impl CredentialStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        let store = Self::new();
        store.set_token(token);
        store
    }

    /// Current bearer token, if any. Synchronous by contract.
    #[must_use]
    pub fn bearer_token(&self) -> Option<String> {
        // A poisoned lock means a reader panicked; the token is still valid.
        match self.token.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Replaces the token. Called by the auth collaborator on login/refresh.
    pub fn set_token(&self, token: impl Into<String>) {
        let mut guard = match self.token.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = Some(token.into());
    }

    /// Drops the token. Subsequent requests go out unauthenticated.
    pub fn clear(&self) {
        let mut guard = match self.token.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = None;
    }
}
