// svckit/src/http/session.rs
//
// Explicit session context: the access token and admin profile, persisted
// through a pluggable credential store. Built once at start-up and handed to
// the API facade.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::errors::ApiError;
use crate::types::AdminUser;

pub const ACCESS_TOKEN_KEY: &str = "glohorizon_access_token";
pub const USER_DATA_KEY: &str = "glohorizon_user_data";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredCredentials {
    #[serde(rename = "glohorizon_access_token")]
    pub access_token: String,
    #[serde(rename = "glohorizon_user_data", default)]
    pub user: Option<AdminUser>,
}

/// Durable storage for the credential record.
pub trait CredentialStore: Send + Sync {
    fn load(&self) -> Result<Option<StoredCredentials>, ApiError>;
    fn save(&self, credentials: &StoredCredentials) -> Result<(), ApiError>;
    fn clear(&self) -> Result<(), ApiError>;
}

/// JSON file keyed by the fixed credential names.
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<Option<StoredCredentials>, ApiError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ApiError::Storage(format!("{}: {}", self.path.display(), e))),
        };

        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| ApiError::Storage(format!("{}: {}", self.path.display(), e)))
    }

    fn save(&self, credentials: &StoredCredentials) -> Result<(), ApiError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| ApiError::Storage(format!("{}: {}", parent.display(), e)))?;
        }

        let body = serde_json::to_vec_pretty(credentials)
            .map_err(|e| ApiError::Storage(e.to_string()))?;
        fs::write(&self.path, body)
            .map_err(|e| ApiError::Storage(format!("{}: {}", self.path.display(), e)))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))
                .map_err(|e| ApiError::Storage(format!("{}: {}", self.path.display(), e)))?;
        }

        Ok(())
    }

    fn clear(&self) -> Result<(), ApiError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ApiError::Storage(format!("{}: {}", self.path.display(), e))),
        }
    }
}

/// Process-local store for tests and demo mode.
#[derive(Default)]
pub struct MemoryCredentialStore {
    record: Mutex<Option<StoredCredentials>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            record: Mutex::new(Some(StoredCredentials {
                access_token: token.to_string(),
                user: None,
            })),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Result<Option<StoredCredentials>, ApiError> {
        Ok(self.record.lock().clone())
    }

    fn save(&self, credentials: &StoredCredentials) -> Result<(), ApiError> {
        *self.record.lock() = Some(credentials.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), ApiError> {
        *self.record.lock() = None;
        Ok(())
    }
}

pub struct Session {
    store: Arc<dyn CredentialStore>,
    current: RwLock<Option<StoredCredentials>>,
}

impl Session {
    /// Restore any persisted credentials. An unreadable record is discarded
    /// and the session starts unauthenticated.
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        let current = match store.load() {
            Ok(record) => {
                if record.is_some() {
                    info!("Restored stored admin session");
                }
                record
            }
            Err(e) => {
                warn!("Discarding unreadable credentials: {}", e);
                if let Err(e) = store.clear() {
                    warn!("Failed to remove unreadable credentials: {}", e);
                }
                None
            }
        };

        Self {
            store,
            current: RwLock::new(current),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryCredentialStore::new()))
    }

    pub fn token(&self) -> Option<String> {
        self.current.read().as_ref().map(|c| c.access_token.clone())
    }

    pub fn user(&self) -> Option<AdminUser> {
        self.current.read().as_ref().and_then(|c| c.user.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.read().is_some()
    }

    /// Store a freshly issued token. The in-memory session is updated even
    /// when persisting fails; the error is still returned.
    pub fn establish(&self, token: String, user: Option<AdminUser>) -> Result<(), ApiError> {
        let record = StoredCredentials {
            access_token: token,
            user,
        };
        let mut current = self.current.write();
        *current = Some(record.clone());
        self.store.save(&record)
    }

    /// Forget everything. Never fails: a store error is logged and the
    /// in-memory credentials are dropped regardless.
    pub fn clear(&self) {
        let mut current = self.current.write();
        let had_token = current.take().is_some();
        self.clear_store();
        if had_token {
            debug!("Session cleared");
        }
    }

    /// Clear only while `token` is still the live credential. A rejection of
    /// a token that a newer login already replaced leaves the session alone.
    /// Returns whether anything was cleared.
    pub fn clear_if_token(&self, token: &str) -> bool {
        let mut current = self.current.write();
        if current.as_ref().map(|c| c.access_token.as_str()) != Some(token) {
            debug!("Ignoring rejection of a superseded token");
            return false;
        }
        *current = None;
        self.clear_store();
        debug!("Session cleared");
        true
    }

    fn clear_store(&self) {
        if let Err(e) = self.store.clear() {
            warn!("Failed to clear stored credentials: {}", e);
        }
    }
}
