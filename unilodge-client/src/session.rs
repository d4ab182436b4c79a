use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::Session;
use crate::error::ClientError;

pub const DEFAULT_SESSION_FILE: &str = ".unilodge_session";

/// Keeps the logged-in session on disk between CLI invocations.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `None` when no session file exists.
    pub fn load(&self) -> Result<Option<Session>, ClientError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(None),
            Ok(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Writes the session readable by the current user only (on unix).
    pub fn save(&self, session: &Session) -> Result<(), ClientError> {
        let raw = serde_json::to_string(session)?;

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&self.path)?;

        // mode only applies on creation; tighten a file left by an older run
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(0o600))?;
        }

        file.write_all(raw.as_bytes())?;
        Ok(())
    }

    pub fn clear(&self) -> Result<(), ClientError> {
        match fs::remove_file(&self.path) {
            Err(err) if err.kind() != ErrorKind::NotFound => Err(err.into()),
            _ => Ok(()),
        }
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn saved_session_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session"));
        assert!(store.load().unwrap().is_none());

        let session = Session {
            token: "abc.def.ghi".into(),
            user_id: Uuid::new_v4(),
        };
        store.save(&session).unwrap();
        assert_eq!(store.load().unwrap(), Some(session));

        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\"userId\""));
    }

    #[test]
    fn clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session"));
        store
            .save(&Session {
                token: "t".into(),
                user_id: Uuid::new_v4(),
            })
            .unwrap();

        store.clear().unwrap();
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session"));
        fs::write(store.path(), "not json").unwrap();
        assert!(matches!(store.load(), Err(ClientError::SessionFormat(_))));
    }

    #[cfg(unix)]
    #[test]
    fn session_file_is_private_to_the_user() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session"));
        fs::write(store.path(), "").unwrap();
        fs::set_permissions(store.path(), fs::Permissions::from_mode(0o644)).unwrap();

        store
            .save(&Session {
                token: "t".into(),
                user_id: Uuid::new_v4(),
            })
            .unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert!(store.load().unwrap().is_some());
    }
}
