//! Session identity shared by the API client and the views.
//!
//! A [`Session`] is the only place the bearer token lives. It is created once
//! in the app shell, handed to the [`ApiClient`](crate::api::ApiClient) and
//! provided to components through context. The token is persisted on native
//! targets in an `access-token` file under the local data directory.

use std::sync::{Arc, RwLock};

#[cfg(not(target_arch = "wasm32"))]
use std::{fs, path::PathBuf};

const TOKEN_FILE: &str = "access-token";

/// Where the token survives restarts. `None` keeps it in memory only.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TokenStore {
    #[cfg(not(target_arch = "wasm32"))]
    dir: Option<PathBuf>,
}

impl TokenStore {
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Store under the platform data dir (`~/.local/share/diagnoai` on Linux).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn platform() -> Self {
        let dir = dirs::data_local_dir()
            .map(|d| d.join("diagnoai"))
            .unwrap_or_else(|| PathBuf::from("cache").join("diagnoai"));
        Self { dir: Some(dir) }
    }

    #[cfg(target_arch = "wasm32")]
    pub fn platform() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(&self) -> Option<String> {
        let path = self.dir.as_ref()?.join(TOKEN_FILE);
        let raw = fs::read_to_string(path).ok()?;
        let token = raw.trim();
        (!token.is_empty()).then(|| token.to_string())
    }

    #[cfg(target_arch = "wasm32")]
    pub fn load(&self) -> Option<String> {
        None
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self, token: &str) -> Result<(), String> {
        let Some(dir) = &self.dir else {
            return Ok(());
        };
        fs::create_dir_all(dir).map_err(|e| format!("Failed to create session directory: {}", e))?;
        fs::write(dir.join(TOKEN_FILE), token)
            .map_err(|e| format!("Failed to write session token: {}", e))
    }

    #[cfg(target_arch = "wasm32")]
    pub fn save(&self, _token: &str) -> Result<(), String> {
        Ok(())
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn clear(&self) -> Result<(), String> {
        let Some(dir) = &self.dir else {
            return Ok(());
        };
        let path = dir.join(TOKEN_FILE);
        if path.exists() {
            fs::remove_file(path).map_err(|e| format!("Failed to remove session token: {}", e))?;
        }
        Ok(())
    }

    #[cfg(target_arch = "wasm32")]
    pub fn clear(&self) -> Result<(), String> {
        Ok(())
    }
}

#[derive(Clone, Debug, Default)]
pub struct Session {
    token: Arc<RwLock<Option<String>>>,
    store: TokenStore,
}

impl PartialEq for Session {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.token, &other.token)
    }
}

impl Session {
    /// Seed from an explicit token, falling back to whatever the store holds.
    pub fn restore(initial: Option<String>, store: TokenStore) -> Self {
        let token = initial.or_else(|| store.load());
        if token.is_some() {
            tracing::debug!("session restored with an access token");
        }
        Self {
            token: Arc::new(RwLock::new(token)),
            store,
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self::restore(Some(token.into()), TokenStore::in_memory())
    }

    pub fn token(&self) -> Option<String> {
        self.token.read().ok().and_then(|guard| guard.clone())
    }

    pub fn is_signed_in(&self) -> bool {
        self.token().is_some()
    }

    pub fn sign_in(&self, token: &str) -> Result<(), String> {
        let token = token.trim();
        if token.is_empty() {
            return Err("Access token is empty".to_string());
        }
        {
            let mut guard = self
                .token
                .write()
                .map_err(|_| "Session lock poisoned".to_string())?;
            *guard = Some(token.to_string());
        }
        tracing::info!("signed in");
        self.store.save(token)
    }

    pub fn sign_out(&self) -> Result<(), String> {
        {
            let mut guard = self
                .token
                .write()
                .map_err(|_| "Session lock poisoned".to_string())?;
            *guard = None;
        }
        tracing::info!("signed out");
        self.store.clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_token() {
        let session = Session::anonymous();
        let view = session.clone();
        session.sign_in("tok").unwrap();
        assert_eq!(view.token().as_deref(), Some("tok"));
        view.sign_out().unwrap();
        assert!(!session.is_signed_in());
    }

    #[test]
    fn blank_token_is_rejected() {
        let session = Session::anonymous();
        assert!(session.sign_in("   ").is_err());
        assert!(!session.is_signed_in());
    }

    #[test]
    fn explicit_token_wins_over_store() {
        let tmp = tempfile::tempdir().unwrap();
        let store = TokenStore::at(tmp.path());
        store.save("stored").unwrap();
        let session = Session::restore(Some("explicit".into()), store);
        assert_eq!(session.token().as_deref(), Some("explicit"));
    }
}
