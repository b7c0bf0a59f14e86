use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Context};
use directories::ProjectDirs;

use crate::models::auth::Session;

/// File-backed session state, the durable equivalent of the browser's
/// localStorage keys (`token`, `userId`, `userName`, `userEmail`).
#[derive(Clone, Debug)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Opens the store at `override_path`, or at the platform data directory
    /// when no override is configured.
    pub fn open(override_path: Option<&str>) -> Result<Self, anyhow::Error> {
        let path = match override_path {
            Some(p) => PathBuf::from(p),
            None => {
                let dirs = ProjectDirs::from("", "", "fintrack")
                    .ok_or_else(|| anyhow!("could not determine a home directory"))?;
                dirs.data_dir().join("session.json")
            }
        };
        Ok(Self { path })
    }

    /// A missing or unreadable session file simply means "not logged in".
    pub fn load(&self) -> Option<Session> {
        let raw = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                log::warn!("discarding corrupt session file: {e}");
                None
            }
        }
    }

    pub fn save(&self, session: &Session) -> Result<(), anyhow::Error> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let raw = serde_json::to_string_pretty(session)?;
        fs::write(&self.path, raw).with_context(|| format!("writing {}", self.path.display()))
    }

    /// Clears the session unconditionally; clearing an absent session is fine.
    pub fn clear(&self) -> Result<(), anyhow::Error> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("removing {}", self.path.display())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_store(name: &str) -> SessionStore {
        let path = std::env::temp_dir().join(format!("fintrack-test-{name}-{}", std::process::id()));
        let store = SessionStore::open(Some(path.to_str().unwrap())).unwrap();
        store.clear().unwrap();
        store
    }

    fn session() -> Session {
        Session {
            token: "tok-123".into(),
            user_id: "u1".into(),
            user_name: "Asha".into(),
            user_email: "asha@example.com".into(),
        }
    }

    #[test]
    fn save_then_load_round_trips() {
        let store = scratch_store("round-trip");
        store.save(&session()).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.token, "tok-123");
        assert_eq!(loaded.user_id, "u1");
        assert_eq!(loaded.user_name, "Asha");
        assert_eq!(loaded.user_email, "asha@example.com");

        store.clear().unwrap();
    }

    #[test]
    fn load_without_file_is_none() {
        let store = scratch_store("absent");
        assert!(store.load().is_none());
    }

    #[test]
    fn clear_is_idempotent() {
        let store = scratch_store("clear");
        store.save(&session()).unwrap();
        store.clear().unwrap();
        store.clear().unwrap();
        assert!(store.load().is_none());
    }
}
