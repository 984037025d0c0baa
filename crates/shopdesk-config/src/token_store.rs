// ── Durable token stores ──
//
// `TokenStore` implementations backing the session between CLI runs. Both
// keep the token under the fixed `_token` key: a file named `_token` in
// the profile's data directory, or keyring entry `<profile>/_token`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use shopdesk_core::{CoreError, TOKEN_KEY, TokenStore};

use crate::{KEYRING_SERVICE, data_dir};

fn persistence(message: impl Into<String>) -> CoreError {
    CoreError::Persistence {
        message: message.into(),
    }
}

// ── File ────────────────────────────────────────────────────────────

/// Token kept in a plain file, readable only by the owner on Unix.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Store under `<data_dir>/<profile>/_token`.
    pub fn for_profile(profile_name: &str) -> Self {
        Self::in_dir(&data_dir().join(profile_name))
    }

    pub fn in_dir(dir: &Path) -> Self {
        Self {
            path: dir.join(TOKEN_KEY),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<SecretString>, CoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => {
                let token = raw.trim();
                Ok((!token.is_empty()).then(|| SecretString::from(token.to_owned())))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(persistence(format!("{}: {e}", self.path.display()))),
        }
    }

    fn save(&self, token: &SecretString) -> Result<(), CoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| persistence(format!("{}: {e}", parent.display())))?;
        }
        std::fs::write(&self.path, token.expose_secret())
            .map_err(|e| persistence(format!("{}: {e}", self.path.display())))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))
                .map_err(|e| persistence(format!("{}: {e}", self.path.display())))?;
        }

        debug!(path = %self.path.display(), "token saved");
        Ok(())
    }

    fn clear(&self) -> Result<(), CoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(persistence(format!("{}: {e}", self.path.display()))),
        }
    }
}

// ── Keyring ─────────────────────────────────────────────────────────

/// Token kept in the system keyring.
#[derive(Debug, Clone)]
pub struct KeyringTokenStore {
    user: String,
}

impl KeyringTokenStore {
    pub fn new(profile_name: &str) -> Self {
        Self {
            user: format!("{profile_name}/{TOKEN_KEY}"),
        }
    }

    fn entry(&self) -> Result<keyring::Entry, CoreError> {
        keyring::Entry::new(KEYRING_SERVICE, &self.user)
            .map_err(|e| persistence(format!("keyring: {e}")))
    }
}

impl TokenStore for KeyringTokenStore {
    fn load(&self) -> Result<Option<SecretString>, CoreError> {
        match self.entry()?.get_password() {
            Ok(token) => Ok(Some(SecretString::from(token))),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(persistence(format!("keyring: {e}"))),
        }
    }

    fn save(&self, token: &SecretString) -> Result<(), CoreError> {
        self.entry()?
            .set_password(token.expose_secret())
            .map_err(|e| persistence(format!("keyring: {e}")))
    }

    fn clear(&self) -> Result<(), CoreError> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(persistence(format!("keyring: {e}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::in_dir(&dir.path().join("shop"));
        assert!(store.load().unwrap().is_none());

        store.save(&SecretString::from("tok1".to_owned())).unwrap();
        assert!(store.path().ends_with("shop/_token"));
        assert_eq!(
            store.load().unwrap().unwrap().expose_secret(),
            "tok1"
        );

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        // Clearing twice is fine.
        store.clear().unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn file_store_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::in_dir(dir.path());
        store.save(&SecretString::from("tok1".to_owned())).unwrap();
        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn blank_file_counts_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::in_dir(dir.path());
        std::fs::write(store.path(), "\n").unwrap();
        assert!(store.load().unwrap().is_none());
    }
}
