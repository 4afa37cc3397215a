use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// User fields the server hands back at register/login, kept alongside the
/// token for later display without a round trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredUser {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub phone: Option<String>,
}

/// Token plus user, persisted together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: StoredUser,
}

/// File-backed session persistence, the browser localStorage analog. Logout
/// is nothing more than deleting this file; the server keeps no record of
/// issued tokens.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn save(&self, session: &Session) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(session)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    /// The stored session, or None when absent or unreadable. A corrupt file
    /// is treated the same as a logged-out state.
    pub fn load(&self) -> Option<Session> {
        let raw = fs::read_to_string(&self.path).ok()?;
        serde_json::from_str(&raw).ok()
    }

    pub fn clear(&self) {
        let _ = fs::remove_file(&self.path);
    }
}
